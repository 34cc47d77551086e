//! Zombie Piranhas - a casual fishing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hook motion, catch rolls, scoring)
//! - `input`: Intent vocabulary and the channel input adapters feed
//! - `config`: Data-driven, per-platform tuning

pub mod config;
pub mod input;
pub mod sim;

pub use config::{GameConfig, Platform};
pub use input::{Intent, IntentReceiver, IntentSender, intent_channel};
pub use sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, tick};

/// Game loop constants
pub mod consts {
    /// Fixed frame step used by the headless driver (60 Hz, like the display link)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Seed used when none is supplied
    pub const DEFAULT_SEED: u64 = 0x5EED_F15B;
}
