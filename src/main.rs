//! Spaceman headless demo
//!
//! Drives the rule engine with a scripted host: enemies fly straight down,
//! the ship fires on a fixed cadence and hits what is on screen most of the
//! time. Useful for balance passes without a renderer.
//!
//! Usage: `spaceman [settings.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;

    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use spaceman::consts::SIM_DT;
    use spaceman::persistence::JsonFileStore;
    use spaceman::sim::{
        BonusSpawn, ContactCategory, DEFAULT_SEED, EnemySpawn, EntityId, GamePhase,
        GameRuleEngine, RuleListener, lives_text,
    };
    use spaceman::{Settings, Tuning};

    /// Base enemy speed in points per second before the multiplier
    const ENEMY_SPEED: f32 = 260.0;
    /// Bonus crossing speed in points per second
    const BONUS_SPEED: f32 = 180.0;
    /// Seconds between trigger pulls
    const FIRE_INTERVAL: f64 = 0.3;
    /// Player ship hit box around its center
    const PLAYER_Y: f32 = 150.0;
    const PLAYER_HALF_WIDTH: f32 = 40.0;

    struct Mover {
        id: EntityId,
        pos: Vec2,
        vel: Vec2,
        end: Vec2,
    }

    /// Scene stand-in: owns entity positions, answers explode requests
    struct DemoHost {
        field: Vec2,
        next_id: u32,
        enemies: Vec<Mover>,
        bonus: Option<Mover>,
        lost: Option<bool>,
    }

    impl DemoHost {
        fn new(field: Vec2) -> Self {
            Self {
                field,
                next_id: 1,
                enemies: Vec::new(),
                bonus: None,
                lost: None,
            }
        }

        fn next_entity(&mut self) -> EntityId {
            let id = EntityId(self.next_id);
            self.next_id += 1;
            id
        }

        /// Move everything; returns how many enemies left the bottom edge
        fn step(&mut self, dt: f32) -> usize {
            for e in &mut self.enemies {
                e.pos += e.vel * dt;
            }
            let before = self.enemies.len();
            self.enemies.retain(|e| e.pos.y > e.end.y);
            let escaped = before - self.enemies.len();

            let bonus_gone = match &mut self.bonus {
                Some(b) => {
                    b.pos += b.vel * dt;
                    b.pos.x > b.end.x
                }
                None => false,
            };
            if bonus_gone {
                self.bonus = None;
            }
            escaped
        }

        /// Lowest on-screen enemy
        fn target(&self) -> Option<EntityId> {
            self.enemies
                .iter()
                .filter(|e| e.pos.y < self.field.y)
                .min_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(std::cmp::Ordering::Equal))
                .map(|e| e.id)
        }

        /// Enemy overlapping the ship
        fn rammer(&self) -> Option<EntityId> {
            let player_x = self.field.x / 2.0;
            self.enemies
                .iter()
                .find(|e| {
                    (e.pos.y - PLAYER_Y).abs() < 30.0
                        && (e.pos.x - player_x).abs() < PLAYER_HALF_WIDTH
                })
                .map(|e| e.id)
        }
    }

    impl RuleListener for DemoHost {
        fn on_score_changed(&mut self, _score: u64, text: &str) {
            log::info!("{}", text);
        }

        fn on_lives_changed(&mut self, _old: i32, new: i32) {
            log::info!("{}", lives_text(new));
        }

        fn on_player_lost(&mut self, destroyed: bool) {
            self.lost = Some(destroyed);
        }

        fn on_spawn_enemy_requested(&mut self, spawn: &EnemySpawn) {
            let id = self.next_entity();
            let dir = (spawn.to - spawn.from).normalize_or_zero();
            self.enemies.push(Mover {
                id,
                pos: spawn.from,
                vel: dir * ENEMY_SPEED * spawn.speed_multiplier as f32,
                end: spawn.to,
            });
        }

        fn on_spawn_bonus_requested(&mut self, spawn: &BonusSpawn) {
            let id = self.next_entity();
            log::info!("Bonus {:?} crossing at y={:.0}", id, spawn.from.y);
            self.bonus = Some(Mover {
                id,
                pos: spawn.from,
                vel: Vec2::new(BONUS_SPEED, 0.0),
                end: spawn.to,
            });
        }

        fn on_explode_requested(&mut self, entity: EntityId) -> bool {
            if let Some(i) = self.enemies.iter().position(|e| e.id == entity) {
                if self.enemies[i].pos.y >= self.field.y {
                    return false;
                }
                self.enemies.remove(i);
                return true;
            }
            if self.bonus.as_ref().is_some_and(|b| b.id == entity) {
                self.bonus = None;
            }
            true
        }

        fn on_difficulty_increased(&mut self) {
            log::info!("Enemies spawn faster");
        }

        fn on_enemy_speed_changed(&mut self, multiplier: f64) {
            log::info!("Enemy speed x{:.1}", multiplier);
        }

        fn on_cooldown_started(&mut self, remaining: f64) {
            log::debug!("Weapon cooling for {:.1}s", remaining);
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Spaceman (headless) starting...");

        let mut args = std::env::args().skip(1);
        let settings_path =
            PathBuf::from(args.next().unwrap_or_else(|| "spaceman_settings.json".into()));
        let seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(300.0);

        let mut settings = Settings::load_from(&settings_path);
        let seed = settings.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(DEFAULT_SEED)
        });
        settings.seed = Some(seed);
        log::info!("Game initialized with seed: {}", seed);

        let tuning = Tuning::default();
        let host = DemoHost::new(tuning.field);
        let store = JsonFileStore::new("spaceman_scores.json");
        let mut engine = GameRuleEngine::new(tuning, &settings, host, store);
        let mut aim = Pcg32::seed_from_u64(seed ^ 0xA11);

        engine.game_did_start();

        let mut now = 0.0;
        let mut next_shot = FIRE_INTERVAL;
        let mut bullet_id = 1_000_000;
        let steps = (seconds / SIM_DT) as u64;

        for _ in 0..steps {
            now += SIM_DT;
            engine.tick(now);

            let escaped = engine.listener_mut().step(SIM_DT as f32);
            for _ in 0..escaped {
                if engine.phase() == GamePhase::InGame {
                    engine.enemy_escaped();
                }
            }

            if let Some(enemy) = engine.listener().rammer() {
                engine.report_contact(
                    ContactCategory::Enemy,
                    ContactCategory::Player,
                    Some(enemy),
                    None,
                );
            }

            if now >= next_shot {
                next_shot += FIRE_INTERVAL;
                if engine.phase() == GamePhase::InGame && engine.try_fire() {
                    bullet_id += 1;
                    let bullet = Some(EntityId(bullet_id));
                    let bonus = engine.listener().bonus.as_ref().map(|b| b.id);
                    let target = engine.listener().target();
                    if let Some(bonus) = bonus.filter(|_| aim.random_bool(0.3)) {
                        engine.report_contact(
                            ContactCategory::Bullet,
                            ContactCategory::Bonus,
                            bullet,
                            Some(bonus),
                        );
                    } else if let Some(enemy) = target.filter(|_| aim.random_bool(0.7)) {
                        engine.report_contact(
                            ContactCategory::Bullet,
                            ContactCategory::Enemy,
                            bullet,
                            Some(enemy),
                        );
                    }
                }
            }

            if engine.listener().lost.is_some() {
                break;
            }
        }

        engine.game_did_stop();
        match engine.listener().lost {
            Some(true) => log::info!("Ship destroyed after {:.1}s", now),
            Some(false) => log::info!("Out of lives after {:.1}s", now),
            None => log::info!("Survived {:.1}s", now),
        }
        log::info!(
            "Final score {} (best {})",
            engine.score(),
            engine.high_score()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build embeds the library; there is no standalone entry point
}
