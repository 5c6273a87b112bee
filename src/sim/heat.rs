//! Weapon overheat and cooldown
//!
//! Every shot adds one heat point. Once heat reaches the limit the weapon is
//! blocked until it cools. Cooling starts two steps after the last shot and
//! then removes one point per step.

use super::scheduler::Scheduler;

/// Cooldown timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoolOff {
    /// First decrement after a shot (two steps)
    Delayed,
    /// Every following decrement
    Steady,
}

/// Result of one cooldown timer firing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatStep {
    /// Time of the decrement
    pub at: f64,
    /// Heat after the decrement
    pub heat: u32,
    /// Set on the first decrement after a shot: seconds until fully cooled
    pub cooldown_started: Option<f64>,
}

/// Heat gauge of the player's weapon
#[derive(Debug, Clone)]
pub struct WeaponHeat {
    heat: u32,
    heat_limit: u32,
    infinite_shoot: bool,
    step: f64,
    timers: Scheduler<CoolOff>,
}

impl WeaponHeat {
    pub fn new(heat_limit: u32, step: f64) -> Self {
        Self {
            heat: 0,
            heat_limit,
            infinite_shoot: false,
            step,
            timers: Scheduler::new(),
        }
    }

    pub fn heat(&self) -> u32 {
        self.heat
    }

    pub fn heat_limit(&self) -> u32 {
        self.heat_limit
    }

    pub fn infinite_shoot(&self) -> bool {
        self.infinite_shoot
    }

    /// Fill level of the gauge in [0, 1]
    pub fn overheat_ratio(&self) -> f32 {
        if self.heat_limit == 0 {
            return 0.0;
        }
        self.heat as f32 / self.heat_limit as f32
    }

    pub fn can_shoot(&self) -> bool {
        self.heat < self.heat_limit || self.infinite_shoot
    }

    /// True while a cooldown decrement is pending
    pub fn is_cooling(&self) -> bool {
        self.timers.next_deadline().is_some()
    }

    /// Register a shot and restart the cooldown sequence
    pub fn did_shot(&mut self) {
        if self.infinite_shoot {
            return;
        }

        self.heat = (self.heat + 1).min(self.heat_limit);

        self.timers.clear();
        self.timers.start_once(CoolOff::Delayed, self.step * 2.0);
    }

    /// Drop all heat at once and forget pending decrements
    pub fn cool_off(&mut self) {
        self.heat = 0;
        self.timers.clear();
    }

    /// Permanently raise the limit
    pub fn upgrade(&mut self, delta: u32) {
        self.heat_limit = self.heat_limit.saturating_add(delta);
    }

    /// Enabling infinite shoot cools the weapon off immediately
    pub fn set_infinite_shoot(&mut self, enabled: bool) {
        self.infinite_shoot = enabled;
        if enabled {
            self.cool_off();
        }
    }

    /// Deadline of the next decrement
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.next_deadline()
    }

    /// Apply the next decrement due at or before `until`
    pub fn step_due(&mut self, until: f64) -> Option<HeatStep> {
        let fired = self.timers.pop_due(until)?;

        let cooldown_started = match fired.key {
            CoolOff::Delayed => {
                self.timers.start_repeating(CoolOff::Steady, self.step);
                Some(self.step * self.heat as f64)
            }
            CoolOff::Steady => None,
        };

        self.heat = self.heat.saturating_sub(1);
        if self.heat == 0 {
            self.timers.clear();
        }

        Some(HeatStep {
            at: fired.at,
            heat: self.heat,
            cooldown_started,
        })
    }

    /// Run every decrement due up to `now` and move the clock there
    pub fn advance_to(&mut self, now: f64, mut on_cooldown_started: impl FnMut(f64)) {
        while let Some(step) = self.step_due(now) {
            if let Some(remaining) = step.cooldown_started {
                on_cooldown_started(remaining);
            }
        }
        self.timers.advance_to(now);
    }

    /// Current clock of the cooldown timeline
    pub fn now(&self) -> f64 {
        self.timers.now()
    }
}

impl Default for WeaponHeat {
    fn default() -> Self {
        Self::new(20, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overheat(w: &mut WeaponHeat) {
        for _ in 0..w.heat_limit() {
            assert!(w.can_shoot());
            w.did_shot();
        }
    }

    #[test]
    fn test_overheats_after_limit_shots() {
        let mut w = WeaponHeat::default();
        overheat(&mut w);
        assert_eq!(w.heat(), 20);
        assert!(!w.can_shoot());

        // Extra shots stay clamped
        w.did_shot();
        assert_eq!(w.heat(), 20);
    }

    #[test]
    fn test_cooldown_cadence() {
        let mut w = WeaponHeat::default();
        overheat(&mut w);

        let mut started = Vec::new();
        w.advance_to(0.99, |t| started.push(t));
        assert_eq!(w.heat(), 20);
        assert!(started.is_empty());

        // First decrement at 2 * step
        w.advance_to(1.0, |t| started.push(t));
        assert_eq!(w.heat(), 19);
        assert_eq!(started, vec![10.0]);
        assert!(w.can_shoot());

        // Then one per step, no further cooldown notifications
        w.advance_to(2.5, |t| started.push(t));
        assert_eq!(w.heat(), 16);
        assert_eq!(started.len(), 1);
    }

    #[test]
    fn test_steps_report_time_and_level() {
        let mut w = WeaponHeat::default();
        w.did_shot();
        w.did_shot();
        w.did_shot();

        assert_eq!(w.step_due(0.9), None);
        let first = w.step_due(5.0).unwrap();
        assert_eq!((first.at, first.heat), (1.0, 2));
        assert_eq!(first.cooldown_started, Some(1.5));

        let second = w.step_due(5.0).unwrap();
        assert_eq!(
            (second.at, second.heat, second.cooldown_started),
            (1.5, 1, None)
        );
    }

    #[test]
    fn test_cools_to_zero_and_stops() {
        let mut w = WeaponHeat::default();
        w.did_shot();
        w.did_shot();
        w.advance_to(100.0, |_| {});
        assert_eq!(w.heat(), 0);
        assert!(!w.is_cooling());
    }

    #[test]
    fn test_shot_restarts_cooldown() {
        let mut w = WeaponHeat::default();
        w.did_shot();
        w.did_shot();
        w.advance_to(0.75, |_| {});
        w.did_shot();
        assert_eq!(w.next_deadline(), Some(1.75));

        let mut started = Vec::new();
        w.advance_to(1.75, |t| started.push(t));
        assert_eq!(started, vec![1.5]);
        assert_eq!(w.heat(), 2);
    }

    #[test]
    fn test_cool_off_resets_immediately() {
        let mut w = WeaponHeat::default();
        overheat(&mut w);
        w.cool_off();
        assert_eq!(w.heat(), 0);
        assert!(w.can_shoot());
        assert!(!w.is_cooling());
    }

    #[test]
    fn test_infinite_shoot() {
        let mut w = WeaponHeat::default();
        w.did_shot();
        w.set_infinite_shoot(true);
        assert_eq!(w.heat(), 0);
        for _ in 0..100 {
            w.did_shot();
        }
        assert_eq!(w.heat(), 0);
        assert!(w.can_shoot());
    }

    #[test]
    fn test_upgrade_raises_limit() {
        let mut w = WeaponHeat::default();
        overheat(&mut w);
        w.upgrade(5);
        assert_eq!(w.heat_limit(), 25);
        assert!(w.can_shoot());
        assert!((w.overheat_ratio() - 0.8).abs() < 1e-6);
    }
}
