//! Player intents
//!
//! Input adapters (touch, keyboard, controllers, crown) translate raw events
//! into [`Intent`]s. They either call [`GameState::apply`] directly or hold an
//! [`IntentSender`] handed to them at construction; the game loop drains the
//! matching [`IntentReceiver`] once per frame.

use std::sync::mpsc::{self, Receiver, Sender};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameState};

/// Abstract player input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    Cast,
    Release,
    Reel,
    Bash,
    AcknowledgeGameOver,
    /// Context action: tap, click, button A, spacebar
    Primary,
    /// Swipe up: give up and reel in
    Swipe,
    /// Digital crown rotation; positive reels in
    CrownTurn { rotation_speed: f32 },
}

/// Cloneable sending half, owned by input adapters
#[derive(Debug, Clone)]
pub struct IntentSender(Sender<Intent>);

impl IntentSender {
    /// Queue an intent; returns false once the game loop has gone away
    pub fn send(&self, intent: Intent) -> bool {
        self.0.send(intent).is_ok()
    }
}

/// Receiving half, drained by the game loop
#[derive(Debug)]
pub struct IntentReceiver(Receiver<Intent>);

impl IntentReceiver {
    /// Next queued intent, if any, without blocking
    pub fn try_next(&self) -> Option<Intent> {
        self.0.try_recv().ok()
    }
}

/// Create a connected sender/receiver pair
pub fn intent_channel() -> (IntentSender, IntentReceiver) {
    let (tx, rx) = mpsc::channel();
    (IntentSender(tx), IntentReceiver(rx))
}

impl<R: Rng> GameState<R> {
    /// Apply one intent; intents that do not fit the phase are ignored
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Cast => self.cast(),
            Intent::Release => self.release(),
            Intent::Reel | Intent::Swipe => self.reel(),
            Intent::Bash => self.bash(),
            Intent::AcknowledgeGameOver => self.acknowledge_game_over(),
            Intent::Primary => self.primary_action(),
            Intent::CrownTurn { rotation_speed } => self.crown_turn(rotation_speed),
        }
    }

    /// What a tap means depends on where the game is
    pub fn primary_action(&mut self) {
        match self.phase() {
            GamePhase::ReadyToCast => self.cast(),
            GamePhase::Casting => self.release(),
            GamePhase::ReelingIn => self.bash(),
            GamePhase::GameOver => self.acknowledge_game_over(),
            GamePhase::Fishing | GamePhase::CollectingFish => {
                log::trace!("Ignored primary action in {:?}", self.phase());
            }
        }
    }

    /// Apply every queued intent, returning how many were applied
    pub fn pump(&mut self, intents: &IntentReceiver) -> usize {
        let mut applied = 0;
        while let Some(intent) = intents.try_next() {
            self.apply(intent);
            applied += 1;
        }
        applied
    }
}
