//! Rule engine
//!
//! Owns the session, the weapon and every timer, and talks to the host
//! through [`RuleListener`]. All methods take `&mut self`: the engine lives
//! on the host's update loop and is never shared between threads.
//!
//! Ordering contract:
//! - lives: listener is told `(old, new)` before the value changes
//! - score: value changes first, then the listener is told
//! - game over happens once per session; only a restart leaves it

use super::collision::{Body, ContactCategory, ContactRule, EntityId, classify};
use super::heat::WeaponHeat;
use super::scheduler::Scheduler;
use super::spawn::{DecorationPool, SpawnPlanner};
use super::state::{
    BonusSpawn, DecorationSpawn, EnemySpawn, GamePhase, GameSession, score_text,
};
use crate::highscores::HighScore;
use crate::persistence::HighScoreStore;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Seed used when the settings don't pin one
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;

/// Outbound notifications to the host. Everything defaults to a no-op so a
/// host only implements what it renders.
pub trait RuleListener {
    /// Score changed; `text` is the HUD string
    fn on_score_changed(&mut self, _score: u64, _text: &str) {}

    /// Lives are about to change from `old` to `new`
    fn on_lives_changed(&mut self, _old: i32, _new: i32) {}

    /// Session over. `destroyed` is true when an enemy hit the player,
    /// false when the player ran out of lives.
    fn on_player_lost(&mut self, _destroyed: bool) {}

    fn on_spawn_enemy_requested(&mut self, _spawn: &EnemySpawn) {}

    fn on_spawn_bonus_requested(&mut self, _spawn: &BonusSpawn) {}

    /// Try to blow up an entity. Return false to refuse (e.g. an enemy that
    /// has not entered the screen yet).
    fn on_explode_requested(&mut self, _entity: EntityId) -> bool {
        true
    }

    /// Remove an entity without an explosion (spent bullets)
    fn on_remove_requested(&mut self, _entity: EntityId) {}

    /// Spawn interval got shorter
    fn on_difficulty_increased(&mut self) {}

    /// Enemy speed multiplier went up
    fn on_enemy_speed_changed(&mut self, _multiplier: f64) {}

    /// Weapon started cooling; `remaining` seconds until empty
    fn on_cooldown_started(&mut self, _remaining: f64) {}

    fn on_scroll_speed_changed(&mut self, _speed: f64) {}

    fn on_spawn_decoration_requested(&mut self, _spawn: &DecorationSpawn) {}
}

/// Timers owned by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnTimer {
    Enemy,
    Bonus,
    Decoration,
}

/// True if `value` is a positive multiple of `step` (a zero step never matches)
fn is_positive_multiple(value: u64, step: u64) -> bool {
    step > 0 && value > 0 && value % step == 0
}

/// The game rules for one player
pub struct GameRuleEngine<L, S> {
    tuning: Tuning,
    god_mode: bool,
    phase: GamePhase,
    session: GameSession,
    scroll_speed: f64,
    weapon: WeaponHeat,
    timers: Scheduler<SpawnTimer>,
    planner: SpawnPlanner,
    decorations: DecorationPool,
    high_score: HighScore<S>,
    listener: L,
}

impl<L: RuleListener, S: HighScoreStore> GameRuleEngine<L, S> {
    /// Build an engine waiting in the menu
    pub fn new(tuning: Tuning, settings: &Settings, listener: L, store: S) -> Self {
        let mut weapon = WeaponHeat::new(tuning.heat_limit, tuning.cooldown_step);
        weapon.set_infinite_shoot(settings.infinite_shoot);

        let seed = settings.seed.unwrap_or(DEFAULT_SEED);
        if settings.god_mode {
            log::warn!("God mode enabled");
        }
        log::debug!("Rule engine seeded with {}", seed);

        Self {
            session: GameSession::new(&tuning),
            scroll_speed: tuning.menu_scroll_speed,
            god_mode: settings.god_mode,
            phase: GamePhase::Waiting,
            weapon,
            timers: Scheduler::skipping(),
            planner: SpawnPlanner::new(seed),
            decorations: DecorationPool::new(),
            high_score: HighScore::load(store),
            listener,
            tuning,
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn score(&self) -> u64 {
        self.session.score
    }

    pub fn lives(&self) -> i32 {
        self.session.lives
    }

    pub fn god_mode(&self) -> bool {
        self.god_mode
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn weapon(&self) -> &WeaponHeat {
        &self.weapon
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn high_score_store(&self) -> &S {
        self.high_score.store()
    }

    pub fn scroll_speed(&self) -> f64 {
        self.scroll_speed
    }

    /// Engine clock (seconds, as passed to [`Self::tick`])
    pub fn now(&self) -> f64 {
        self.timers.now()
    }

    pub fn is_timer_running(&self, timer: SpawnTimer) -> bool {
        self.timers.is_running(timer)
    }

    pub fn timer_deadline(&self, timer: SpawnTimer) -> Option<f64> {
        self.timers.deadline(timer)
    }

    /// Current repeat interval of the enemy spawner
    pub fn enemy_timer_interval(&self) -> Option<f64> {
        self.timers.interval(SpawnTimer::Enemy)
    }

    pub fn decorations_available(&self) -> usize {
        self.decorations.len()
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    // === Lifecycle ===

    /// New session: reset everything and start spawning
    pub fn game_did_start(&mut self) {
        self.reset_session();
        self.high_score.refresh();
        self.phase = GamePhase::InGame;
        self.set_scroll_speed(self.tuning.game_scroll_speed);
        self.restart_spawners();
        log::info!("Game started");
    }

    /// Cancel spawning. The session is kept so a restart can resume it.
    pub fn game_did_stop(&mut self) {
        self.stop_spawners();
        if self.phase == GamePhase::InGame {
            self.phase = GamePhase::Stopped;
        }
        log::info!("Game stopped ({:?})", self.phase);
    }

    /// Restart spawning. After a game over (or from the menu) this begins a
    /// fresh session, otherwise it resumes the stopped one.
    pub fn game_did_restart(&mut self) {
        match self.phase {
            GamePhase::GameOver | GamePhase::Waiting => {
                self.reset_session();
                self.high_score.refresh();
                self.set_scroll_speed(self.tuning.game_scroll_speed);
                log::info!("Game restarted with a fresh session");
            }
            GamePhase::InGame | GamePhase::Stopped => {
                log::info!("Game resumed at score {}", self.session.score);
            }
        }
        self.phase = GamePhase::InGame;
        self.restart_spawners();
    }

    /// Back to the start menu
    pub fn enter_menu(&mut self) {
        self.stop_spawners();
        self.phase = GamePhase::Waiting;
        self.high_score.refresh();
        self.set_scroll_speed(self.tuning.menu_scroll_speed);
    }

    fn reset_session(&mut self) {
        let old = std::mem::replace(&mut self.session, GameSession::new(&self.tuning));
        self.weapon.cool_off();

        if old.score != self.session.score {
            let text = score_text(self.session.score);
            self.listener.on_score_changed(self.session.score, &text);
        }
        if old.lives != self.session.lives {
            self.listener.on_lives_changed(old.lives, self.session.lives);
        }
    }

    fn set_scroll_speed(&mut self, speed: f64) {
        if self.scroll_speed != speed {
            self.scroll_speed = speed;
            self.listener.on_scroll_speed_changed(speed);
        }
    }

    // === Spawners ===

    fn restart_spawners(&mut self) {
        self.stop_spawners();
        self.start_enemy_spawner();
        self.start_bonus_spawner();
    }

    fn stop_spawners(&mut self) {
        self.timers.cancel(SpawnTimer::Enemy);
        self.timers.cancel(SpawnTimer::Bonus);
    }

    fn start_enemy_spawner(&mut self) {
        self.timers
            .start_repeating(SpawnTimer::Enemy, self.session.spawn_enemy_interval);
    }

    fn start_bonus_spawner(&mut self) {
        let delay = self.planner.bonus_delay(&self.tuning);
        self.timers.start_once(SpawnTimer::Bonus, delay);
        log::debug!("Next bonus in {:.1}s", delay);
    }

    /// Start dropping background decorations (runs in every phase)
    pub fn start_decorations(&mut self) {
        let delay = self
            .planner
            .decoration_delay(&self.tuning, self.scroll_speed);
        self.timers.start_once(SpawnTimer::Decoration, delay);
    }

    pub fn stop_decorations(&mut self) {
        self.timers.cancel(SpawnTimer::Decoration);
    }

    /// Hand a decoration entity to the pool
    pub fn add_decoration(&mut self, entity: EntityId) {
        self.decorations.put(entity);
    }

    /// A decoration left the screen and can be reused
    pub fn recycle_decoration(&mut self, entity: EntityId) {
        self.decorations.put(entity);
    }

    // === Time ===

    /// Advance the engine clock to `now`, firing every due timer in order
    pub fn tick(&mut self, now: f64) {
        loop {
            let spawn_due = self.timers.next_deadline().filter(|t| *t <= now);
            let heat_due = self.weapon.next_deadline().filter(|t| *t <= now);
            match (spawn_due, heat_due) {
                (None, None) => break,
                (Some(s), Some(h)) if h < s => self.fire_heat(now),
                (Some(_), _) => self.fire_spawn(now),
                (None, Some(_)) => self.fire_heat(now),
            }
        }
        self.timers.advance_to(now);
        self.weapon.advance_to(now, |_| {});
    }

    fn fire_spawn(&mut self, now: f64) {
        let Some(fired) = self.timers.pop_due(now) else {
            return;
        };

        match fired.key {
            SpawnTimer::Enemy => {
                let spawn = self.planner.enemy(
                    &self.tuning,
                    self.session.score,
                    self.session.enemy_speed_multiplier,
                );
                log::trace!("Spawning enemy {:?}", spawn.movement);
                self.listener.on_spawn_enemy_requested(&spawn);
            }
            SpawnTimer::Bonus => {
                let spawn = self.planner.bonus(&self.tuning);
                self.listener.on_spawn_bonus_requested(&spawn);
                self.start_bonus_spawner();
            }
            SpawnTimer::Decoration => {
                if let Some(spawn) = self.planner.decoration(&self.tuning, &mut self.decorations) {
                    self.listener.on_spawn_decoration_requested(&spawn);
                }
                self.start_decorations();
            }
        }
    }

    fn fire_heat(&mut self, now: f64) {
        if let Some(step) = self.weapon.step_due(now) {
            log::trace!("Weapon heat {} at {:.2}", step.heat, step.at);
            if let Some(remaining) = step.cooldown_started {
                self.listener.on_cooldown_started(remaining);
            }
        }
    }

    // === Weapon ===

    /// Fire if the weapon is not overheated. Returns whether a shot left.
    pub fn try_fire(&mut self) -> bool {
        if !self.weapon.can_shoot() {
            return false;
        }
        self.weapon.did_shot();
        true
    }

    pub fn upgrade_heat(&mut self, delta: u32) {
        self.weapon.upgrade(delta);
    }

    pub fn set_infinite_shoot(&mut self, enabled: bool) {
        self.weapon.set_infinite_shoot(enabled);
    }

    pub fn force_cool_off(&mut self) {
        self.weapon.cool_off();
    }

    // === Contacts ===

    /// Resolve a contact reported by the host's physics. Contacts outside of
    /// active play are ignored.
    pub fn report_contact(
        &mut self,
        category_a: ContactCategory,
        category_b: ContactCategory,
        entity_a: Option<EntityId>,
        entity_b: Option<EntityId>,
    ) {
        if self.phase != GamePhase::InGame {
            log::debug!(
                "Ignoring {:?}/{:?} contact in {:?}",
                category_a,
                category_b,
                self.phase
            );
            return;
        }

        let rule = classify(Body::new(category_a, entity_a), Body::new(category_b, entity_b));
        match rule {
            Some(ContactRule::PlayerHitsEnemy { enemy }) => {
                if let Some(enemy) = enemy {
                    let _ = self.listener.on_explode_requested(enemy);
                }
                self.enemy_touches_player();
            }
            Some(ContactRule::BulletHitsEnemy { bullet, enemy }) => {
                if let Some(enemy) = enemy {
                    if self.listener.on_explode_requested(enemy) {
                        self.enemy_killed();
                    } else {
                        log::debug!("Enemy {:?} off screen, no kill credit", enemy);
                    }
                }
                if let Some(bullet) = bullet {
                    self.listener.on_remove_requested(bullet);
                }
            }
            Some(ContactRule::BulletHitsBonus { bullet, bonus }) => {
                if let Some(bonus) = bonus {
                    let _ = self.listener.on_explode_requested(bonus);
                    self.bonus_killed();
                }
                if let Some(bullet) = bullet {
                    self.listener.on_remove_requested(bullet);
                }
            }
            None => {}
        }
    }

    // === Score / lives ===

    fn assert_live(&self, op: &str) -> bool {
        debug_assert!(
            self.phase != GamePhase::GameOver,
            "{} called after game over without a restart",
            op
        );
        self.phase != GamePhase::GameOver
    }

    /// An enemy was shot down
    pub fn enemy_killed(&mut self) {
        if !self.assert_live("enemy_killed") {
            return;
        }
        let score = self.session.score.saturating_add(self.tuning.kill_score);
        self.set_score(score);
    }

    fn set_score(&mut self, score: u64) {
        if score == self.session.score {
            return;
        }
        self.session.score = score;
        let text = score_text(score);
        self.listener.on_score_changed(score, &text);

        if is_positive_multiple(score, self.tuning.speed_threshold) {
            self.session.enemy_speed_multiplier += self.tuning.enemy_speed_step;
            log::debug!(
                "Enemy speed x{:.1} at score {}",
                self.session.enemy_speed_multiplier,
                score
            );
            self.listener
                .on_enemy_speed_changed(self.session.enemy_speed_multiplier);
        } else if is_positive_multiple(score, self.tuning.spawn_threshold) {
            self.session.spawn_enemy_interval = (self.session.spawn_enemy_interval
                - self.tuning.enemy_interval_step)
                .max(self.tuning.enemy_interval_floor);
            if self.phase == GamePhase::InGame {
                self.timers.cancel(SpawnTimer::Enemy);
                self.start_enemy_spawner();
            }
            log::debug!(
                "Enemy interval {:.1}s at score {}",
                self.session.spawn_enemy_interval,
                score
            );
            self.set_scroll_speed(self.scroll_speed + self.tuning.scroll_speed_step);
            self.listener.on_difficulty_increased();
        }
    }

    /// An enemy crossed the bottom edge
    pub fn enemy_escaped(&mut self) {
        if !self.assert_live("enemy_escaped") {
            return;
        }
        let lives = self.session.lives - 1;
        self.set_lives(lives);
        if lives == 0 && !self.god_mode {
            self.game_over(false);
        }
    }

    /// The bonus was shot: one extra life
    pub fn bonus_killed(&mut self) {
        if !self.assert_live("bonus_killed") {
            return;
        }
        let lives = self.session.lives + 1;
        self.set_lives(lives);
    }

    fn set_lives(&mut self, lives: i32) {
        self.listener.on_lives_changed(self.session.lives, lives);
        self.session.lives = lives;
    }

    /// An enemy rammed the player
    pub fn enemy_touches_player(&mut self) {
        if !self.assert_live("enemy_touches_player") {
            return;
        }
        if !self.god_mode {
            self.game_over(true);
        }
    }

    fn game_over(&mut self, destroyed: bool) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.stop_spawners();
        self.weapon.cool_off();

        let score = self.session.score;
        if self.high_score.submit(score) {
            log::info!("New high score: {}", score);
        }
        log::info!(
            "Game over at score {} ({})",
            score,
            if destroyed { "destroyed" } else { "out of lives" }
        );
        self.listener.on_player_lost(destroyed);
    }
}
