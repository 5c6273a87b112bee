//! Spawn planning
//!
//! Random choices (delays, positions, flight paths) come from one seeded
//! PCG stream so a session replays identically from its seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::EntityId;
use super::state::{BonusSpawn, DecorationSpawn, EnemyMovement, EnemySpawn};
use crate::tuning::Tuning;

/// Uniform sample in [min, max], collapsing an empty range to `min`
fn uniform<T>(rng: &mut Pcg32, min: T, max: T) -> T
where
    T: PartialOrd + Copy + rand::distr::uniform::SampleUniform,
{
    if max <= min {
        min
    } else {
        rng.random_range(min..=max)
    }
}

/// Seeded source of spawn decisions
#[derive(Debug, Clone)]
pub struct SpawnPlanner {
    rng: Pcg32,
}

impl SpawnPlanner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Wait before the next bonus
    pub fn bonus_delay(&mut self, tuning: &Tuning) -> f64 {
        uniform(&mut self.rng, tuning.bonus_delay_min, tuning.bonus_delay_max)
    }

    /// Wait before the next decoration, scaled so faster scrolling spawns
    /// more often
    pub fn decoration_delay(&mut self, tuning: &Tuning, scroll_speed: f64) -> f64 {
        let ratio = if scroll_speed > 0.0 {
            tuning.game_scroll_speed / scroll_speed
        } else {
            1.0
        };
        uniform(
            &mut self.rng,
            tuning.decoration_delay_min * ratio,
            tuning.decoration_delay_max * ratio,
        )
    }

    /// Plan an enemy: top-to-bottom flight between random columns
    pub fn enemy(&mut self, tuning: &Tuning, score: u64, speed_multiplier: f64) -> EnemySpawn {
        let movement = if score > tuning.curvy_score && self.rng.random_bool(0.5) {
            EnemyMovement::Curvy
        } else {
            EnemyMovement::Straight
        };

        let field = tuning.field;
        let x_start = uniform(&mut self.rng, 10.0, field.x - 10.0);
        let x_end = uniform(&mut self.rng, 10.0, field.x - 10.0);

        EnemySpawn {
            speed_multiplier,
            movement,
            from: Vec2::new(x_start, field.y + 200.0),
            to: Vec2::new(x_end, -tuning.enemy_height),
        }
    }

    /// Plan a bonus crossing the upper part of the field left to right
    pub fn bonus(&mut self, tuning: &Tuning) -> BonusSpawn {
        let field = tuning.field;
        let y = uniform(&mut self.rng, field.y * 0.33, field.y * 0.8);
        BonusSpawn {
            from: Vec2::new(-tuning.bonus_width, y),
            to: Vec2::new(field.x + tuning.bonus_width, y),
        }
    }

    /// Take a random decoration out of the pool and place it above the field
    pub fn decoration(
        &mut self,
        tuning: &Tuning,
        pool: &mut DecorationPool,
    ) -> Option<DecorationSpawn> {
        if pool.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..pool.available.len());
        let entity = pool.available.swap_remove(index);

        let field = tuning.field;
        let scale = uniform(&mut self.rng, 0.3, 1.0);
        let y = field.y + uniform(&mut self.rng, 600.0, 2500.0);
        let x = uniform(&mut self.rng, 10.0, field.x - 10.0);

        Some(DecorationSpawn {
            entity,
            scale,
            position: Vec2::new(x, y),
        })
    }
}

/// Reusable background decorations not currently on screen
#[derive(Debug, Clone, Default)]
pub struct DecorationPool {
    available: Vec<EntityId>,
}

impl DecorationPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a decoration to the pool. Duplicates are ignored.
    pub fn put(&mut self, entity: EntityId) {
        if !self.available.contains(&entity) {
            self.available.push(entity);
        }
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}
