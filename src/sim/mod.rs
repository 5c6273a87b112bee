//! Deterministic rule engine
//!
//! All gameplay rules live here. This module must stay pure and deterministic:
//! - Time only advances through `tick(now)`
//! - Seeded RNG only
//! - No rendering, physics detection or platform dependencies

pub mod collision;
pub mod engine;
pub mod heat;
pub mod scheduler;
pub mod spawn;
pub mod state;

pub use collision::{Body, ContactCategory, ContactRule, EntityId, canonicalize, classify};
pub use engine::{DEFAULT_SEED, GameRuleEngine, RuleListener, SpawnTimer};
pub use heat::{HeatStep, WeaponHeat};
pub use scheduler::{Fired, Scheduler};
pub use spawn::{DecorationPool, SpawnPlanner};
pub use state::{
    BonusSpawn, DecorationSpawn, EnemyMovement, EnemySpawn, GamePhase, GameSession, lives_text,
    score_text,
};
