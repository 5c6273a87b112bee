//! Delay-list scheduler advanced by the host update loop
//!
//! Timers are identified by a small key enum. Starting a timer always replaces
//! any running timer with the same key, so a purpose never has two pending
//! firings. Time never flows on its own: the host calls [`Scheduler::pop_due`]
//! until it returns `None`, then [`Scheduler::advance_to`].
//!
//! A repeating timer that fell several intervals behind either replays every
//! missed firing (the default, for counters that must see each step) or, on a
//! [`Scheduler::skipping`] scheduler, fires once and rejoins its grid after
//! `until`.

/// Shortest allowed repeat interval, keeps `pop_due` loops finite
const MIN_PERIOD: f64 = 1e-3;

/// A single pending timer
#[derive(Debug, Clone, Copy, PartialEq)]
struct Timer<K> {
    key: K,
    fire_at: f64,
    /// `Some(interval)` for repeating timers
    period: Option<f64>,
    /// Insertion order, breaks ties between equal deadlines
    seq: u64,
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fired<K> {
    pub key: K,
    /// Scheduled fire time (the clock is moved here before returning)
    pub at: f64,
}

/// Named one-shot and repeating timers on a single timeline
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    now: f64,
    timers: Vec<Timer<K>>,
    next_seq: u64,
    skip_missed: bool,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            now: 0.0,
            timers: Vec::new(),
            next_seq: 0,
            skip_missed: false,
        }
    }
}

impl<K: Copy + Eq + std::fmt::Debug> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repeating timers that fall behind fire once instead of catching up
    pub fn skipping() -> Self {
        Self {
            skip_missed: true,
            ..Self::default()
        }
    }

    /// Current scheduler time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Move the clock forward. Never moves backwards.
    pub fn advance_to(&mut self, t: f64) {
        if t > self.now {
            self.now = t;
        }
    }

    /// Fire once, `delay` seconds from now
    pub fn start_once(&mut self, key: K, delay: f64) {
        self.insert(key, delay, None);
    }

    /// Fire every `interval` seconds, first firing one interval from now
    pub fn start_repeating(&mut self, key: K, interval: f64) {
        self.insert(key, interval, Some(interval));
    }

    fn insert(&mut self, key: K, delay: f64, period: Option<f64>) {
        self.cancel(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            key,
            fire_at: self.now + delay.max(0.0),
            period: period.map(|p| p.max(MIN_PERIOD)),
            seq,
        });
    }

    /// Cancel a timer. Returns false if it was not running.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.key != key);
        self.timers.len() != before
    }

    /// Cancel every timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_running(&self, key: K) -> bool {
        self.timers.iter().any(|t| t.key == key)
    }

    /// Next fire time of a timer, if running
    pub fn deadline(&self, key: K) -> Option<f64> {
        self.timers.iter().find(|t| t.key == key).map(|t| t.fire_at)
    }

    /// Interval of a repeating timer
    pub fn interval(&self, key: K) -> Option<f64> {
        self.timers.iter().find(|t| t.key == key).and_then(|t| t.period)
    }

    /// Earliest pending deadline across all timers
    pub fn next_deadline(&self) -> Option<f64> {
        self.earliest().map(|i| self.timers[i].fire_at)
    }

    fn earliest(&self) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.fire_at
                    .partial_cmp(&b.fire_at)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)
    }

    /// Pop the earliest timer due at or before `until`.
    ///
    /// One-shot timers are removed, repeating timers are rescheduled one
    /// interval after their own deadline (or, when skipping, to the first
    /// point of their grid past `until`). The clock moves to the fire time so
    /// that timers started by the caller while handling the firing are
    /// relative to it.
    pub fn pop_due(&mut self, until: f64) -> Option<Fired<K>> {
        let idx = self.earliest()?;
        let timer = self.timers[idx];
        if timer.fire_at > until {
            return None;
        }

        self.advance_to(timer.fire_at);
        match timer.period {
            Some(period) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let mut next = timer.fire_at + period;
                if self.skip_missed && next <= until {
                    let missed = ((until - timer.fire_at) / period).floor();
                    next = timer.fire_at + (missed + 1.0) * period;
                    while next <= until {
                        next += period;
                    }
                    log::debug!(
                        "timer {:?} skipped {} missed firings",
                        timer.key,
                        missed
                    );
                }
                let slot = &mut self.timers[idx];
                slot.fire_at = next;
                slot.seq = seq;
            }
            None => {
                self.timers.swap_remove(idx);
            }
        }

        log::trace!("timer {:?} fired at {:.3}", timer.key, timer.fire_at);
        Some(Fired {
            key: timer.key,
            at: timer.fire_at,
        })
    }
}
