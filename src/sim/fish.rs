//! Fish population
//!
//! Fish records are indexed by id and iterated in id order. Positions belong
//! to the presentation layer; it reports proximity back each tick.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Fish types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FishKind {
    /// Benign, scores points
    Yum,
    /// Hostile, costs a fisherman when landed
    Piranha,
}

impl FishKind {
    pub fn is_hostile(&self) -> bool {
        matches!(self, FishKind::Piranha)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FishKind::Yum => "yum fish",
            FishKind::Piranha => "piranha",
        }
    }
}

/// A fish record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fish {
    pub id: u32,
    pub kind: FishKind,
    /// Size in [fish_scale_min, fish_scale_max]
    pub scale: f32,
    /// Resistance to bashing
    pub life: f32,
    /// Swim speed hint for the presentation layer
    pub speed: f32,
    /// Vertical row the fish swims along
    pub row: f32,
    /// Enters from the right edge, swimming left
    pub from_right: bool,
    pub caught: bool,
    /// Within catch radius of the hook this tick
    pub active: bool,
}

/// Distances from fish to the hook, supplied by the presentation layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Proximity {
    distances: BTreeMap<u32, f32>,
}

impl Proximity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Proximity::set`]
    pub fn with(mut self, id: u32, distance: f32) -> Self {
        self.set(id, distance);
        self
    }

    pub fn set(&mut self, id: u32, distance: f32) {
        self.distances.insert(id, distance);
    }

    pub fn distance(&self, id: u32) -> Option<f32> {
        self.distances.get(&id).copied()
    }

    /// True if the fish was reported strictly inside `radius`
    pub fn is_near(&self, id: u32, radius: f32) -> bool {
        self.distance(id).is_some_and(|d| d < radius)
    }

    /// Compute distances from world positions
    pub fn from_positions(
        positions: impl IntoIterator<Item = (u32, Vec2)>,
        hook: Vec2,
        hook_offset: Vec2,
    ) -> Self {
        let distances = positions
            .into_iter()
            .map(|(id, pos)| (id, distance_to_hook(pos, hook, hook_offset)))
            .collect();
        Self { distances }
    }
}

/// Distance from a fish to the bait point, which sits `hook_offset` below
/// and behind the hook anchor
#[inline]
pub fn distance_to_hook(fish: Vec2, hook: Vec2, hook_offset: Vec2) -> f32 {
    fish.distance(hook - hook_offset)
}

/// All free-swimming fish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishPopulation {
    fish: BTreeMap<u32, Fish>,
    next_id: u32,
}

impl Default for FishPopulation {
    fn default() -> Self {
        Self::new()
    }
}

impl FishPopulation {
    pub fn new() -> Self {
        Self {
            fish: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Spawn one fish of `kind` at a random row and edge
    pub fn spawn<R: Rng>(&mut self, kind: FishKind, config: &GameConfig, rng: &mut R) -> &Fish {
        let tuning = config.fish_tuning(kind.is_hostile());
        let scale = rng.random_range(config.fish_scale_min..=config.fish_scale_max);
        let speed = tuning.base_speed * rng.random_range(0.5..=1.0f32);
        let row = rng.random_range(config.fish_row_min..=config.fish_row_max);
        let from_right = rng.random_range(0.0..=100.0f32) <= 50.0;

        let id = self.next_id;
        self.next_id += 1;
        log::debug!("Spawned {} #{id} (scale {scale:.2})", kind.as_str());

        self.fish.entry(id).or_insert(Fish {
            id,
            kind,
            scale,
            life: tuning.base_life * scale,
            speed,
            row,
            from_right,
            caught: false,
            active: false,
        })
    }

    /// Spawn a yum fish or a piranha with even odds
    pub fn spawn_random<R: Rng>(&mut self, config: &GameConfig, rng: &mut R) -> &Fish {
        let kind = if rng.random_range(0.0..=100.0f32) <= 50.0 {
            FishKind::Yum
        } else {
            FishKind::Piranha
        };
        self.spawn(kind, config, rng)
    }

    /// Spawn the startup population, returning the new ids in order
    pub fn populate<R: Rng>(&mut self, config: &GameConfig, rng: &mut R) -> Vec<u32> {
        let mut ids = Vec::new();
        for _ in 0..config.yum_count {
            ids.push(self.spawn(FishKind::Yum, config, rng).id);
        }
        for _ in 0..config.piranha_count {
            ids.push(self.spawn(FishKind::Piranha, config, rng).id);
        }
        ids
    }

    pub fn remove(&mut self, id: u32) -> Option<Fish> {
        self.fish.remove(&id)
    }

    pub fn get(&self, id: u32) -> Option<&Fish> {
        self.fish.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fish> {
        self.fish.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Fish> {
        self.fish.values_mut()
    }

    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    /// Remove every fish; ids keep counting up
    pub fn clear(&mut self) {
        self.fish.clear();
    }

    /// Forget which fish were near the hook
    pub fn deactivate_all(&mut self) {
        for fish in self.fish.values_mut() {
            fish.active = false;
        }
    }
}
