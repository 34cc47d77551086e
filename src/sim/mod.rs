//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in through `tick`, never from a clock
//! - Injected RNG only (seeded `Pcg32` by default)
//! - Stable iteration order (fish by id)
//! - No rendering, audio or platform dependencies

pub mod ambience;
pub mod fish;
pub mod hook;
pub mod state;
pub mod tick;

pub use ambience::{Cloud, CloudSpawner};
pub use fish::{Fish, FishKind, FishPopulation, Proximity, distance_to_hook};
pub use hook::{CrownReel, CrownStep, Hook, HookMotion, HookTween, ease_out};
pub use state::{GameEvent, GamePhase, GameState, Snapshot};
pub use tick::{TickInput, tick};
