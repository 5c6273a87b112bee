//! Spaceman - rules of a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic rule engine (score, lives, spawning, weapon heat)
//! - `persistence`: High score storage backends
//! - `tuning`: Data-driven game balance
//! - `settings`: Player and debug preferences

pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::Settings;
pub use sim::{GameRuleEngine, RuleListener};
pub use tuning::Tuning;

/// Host loop constants
pub mod consts {
    /// Fixed update timestep the demo host drives the engine with (120 Hz)
    pub const SIM_DT: f64 = 1.0 / 120.0;
}
