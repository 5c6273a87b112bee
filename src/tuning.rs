//! Data-driven game balance
//!
//! Every number the rule engine uses lives here so a balance pass never has
//! to touch the rules themselves. Missing fields in a JSON file fall back to
//! the shipped defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Balance values for one play-through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    /// Lives at session start
    pub starting_lives: i32,
    /// Score granted per enemy kill
    pub kill_score: u64,
    /// Score multiple that bumps enemy speed
    pub speed_threshold: u64,
    /// Score multiple that shortens the enemy spawn interval
    pub spawn_threshold: u64,

    // === Enemy spawner ===
    /// Initial enemy spawn interval (seconds)
    pub enemy_interval: f64,
    /// Interval reduction per spawn threshold crossed (seconds)
    pub enemy_interval_step: f64,
    /// Shortest enemy spawn interval (seconds)
    pub enemy_interval_floor: f64,
    /// Initial enemy speed multiplier
    pub enemy_speed: f64,
    /// Multiplier increase per speed threshold crossed
    pub enemy_speed_step: f64,
    /// Above this score enemies may fly curved paths
    pub curvy_score: u64,

    // === Bonus spawner ===
    /// Shortest wait between bonuses (seconds)
    pub bonus_delay_min: f64,
    /// Longest wait between bonuses (seconds)
    pub bonus_delay_max: f64,

    // === Weapon ===
    /// Shots before the weapon overheats
    pub heat_limit: u32,
    /// Seconds per heat point during cooldown
    pub cooldown_step: f64,

    // === Play field ===
    /// Play field size in points
    pub field: Vec2,
    /// Sprite height of an enemy ship
    pub enemy_height: f32,
    /// Sprite width of the bonus
    pub bonus_width: f32,

    // === Background scroll ===
    /// Scroll speed while waiting in the menu (px/s)
    pub menu_scroll_speed: f64,
    /// Scroll speed at session start (px/s)
    pub game_scroll_speed: f64,
    /// Scroll speed gained per difficulty increase (px/s)
    pub scroll_speed_step: f64,
    /// Decoration wait range at game scroll speed (seconds)
    pub decoration_delay_min: f64,
    pub decoration_delay_max: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            kill_score: 579,
            speed_threshold: 3000,
            spawn_threshold: 1000,

            enemy_interval: 3.3,
            enemy_interval_step: 0.5,
            enemy_interval_floor: 0.5,
            enemy_speed: 1.0,
            enemy_speed_step: 0.1,
            curvy_score: 4000,

            bonus_delay_min: 50.0,
            bonus_delay_max: 120.0,

            heat_limit: 20,
            cooldown_step: 0.5,

            field: Vec2::new(750.0, 1334.0),
            enemy_height: 120.0,
            bonus_width: 160.0,

            menu_scroll_speed: 120.0,
            game_scroll_speed: 550.0,
            scroll_speed_step: 100.0,
            decoration_delay_min: 3.0,
            decoration_delay_max: 22.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON balance file
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
