//! Sky ambience
//!
//! Clouds carry no gameplay weight but draw from the run RNG, so they are
//! spawned here to keep runs reproducible.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// A cloud for the presentation layer to draw and drift across the sky
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub alpha: f32,
    pub scale: f32,
    /// Extra vertical squash applied on top of `scale`
    pub squash: f32,
    /// Horizontal start in [-1, 1] of the half-width; -1 is off the left edge
    pub x: f32,
    /// Vertical position as a fraction of the scene height
    pub height: f32,
}

impl Cloud {
    fn random<R: Rng>(scatter: bool, rng: &mut R) -> Self {
        let alpha = rng.random_range(0.5..=1.0f32);
        let scale = rng.random_range(0.5..=1.0f32);
        let squash = rng.random_range(0.25..=0.75f32);
        let x = if scatter {
            rng.random_range(-1.0..=1.0f32)
        } else {
            -1.0
        };
        let height = rng.random_range(0.40..=0.5f32);
        Self {
            alpha,
            scale,
            squash,
            x,
            height,
        }
    }

    /// Seconds to cross the sky; higher clouds drift faster
    pub fn drift_duration(&self) -> f64 {
        60.0 * f64::from(0.5 / self.height)
    }
}

/// Timed cloud spawner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudSpawner {
    last_roll: f64,
}

impl CloudSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clouds scattered across the sky at startup
    pub fn initial<R: Rng>(&self, config: &GameConfig, rng: &mut R) -> Vec<Cloud> {
        (0..config.initial_clouds)
            .map(|_| Cloud::random(true, rng))
            .collect()
    }

    /// Roll for a new cloud once per `cloud_interval`
    pub fn update<R: Rng>(
        &mut self,
        now: f64,
        config: &GameConfig,
        rng: &mut R,
    ) -> Option<Cloud> {
        if now - self.last_roll <= config.cloud_interval {
            return None;
        }
        self.last_roll = now;
        if rng.random_range(0.0..=100.0f32) <= config.cloud_chance {
            Some(Cloud::random(false, rng))
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.last_roll = 0.0;
    }
}
