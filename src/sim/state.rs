//! Session state and core rule types
//!
//! Everything the rules mutate during a play-through lives in
//! [`GameSession`]. Reset means rebuilding it from the tuning.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::EntityId;
use crate::tuning::Tuning;

/// Lifecycle of the rule engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start menu, no session running
    Waiting,
    /// Active gameplay
    InGame,
    /// Spawners canceled, session kept for resume
    Stopped,
    /// Session ended
    GameOver,
}

/// Mutable state of one play-through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub score: u64,
    /// Can go below zero under god mode
    pub lives: i32,
    /// Seconds between enemy spawns
    pub spawn_enemy_interval: f64,
    /// Never decreases within a session
    pub enemy_speed_multiplier: f64,
}

impl GameSession {
    /// Fresh session with the tuning's defaults
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives,
            spawn_enemy_interval: tuning.enemy_interval,
            enemy_speed_multiplier: tuning.enemy_speed,
        }
    }
}

/// HUD text for a score
pub fn score_text(score: u64) -> String {
    format!("SCORE : {}", score)
}

/// HUD text for lives (never shows a negative count)
pub fn lives_text(lives: i32) -> String {
    format!("LIVES : {}", lives.max(0))
}

/// Flight path of a spawned enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyMovement {
    Straight,
    Curvy,
}

/// Everything the host needs to place a new enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub speed_multiplier: f64,
    pub movement: EnemyMovement,
    /// Start point, above the top edge
    pub from: Vec2,
    /// End point, below the bottom edge
    pub to: Vec2,
}

/// Horizontal crossing of the bonus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusSpawn {
    pub from: Vec2,
    pub to: Vec2,
}

/// Background decoration taken out of the pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecorationSpawn {
    pub entity: EntityId,
    pub scale: f32,
    pub position: Vec2,
}
