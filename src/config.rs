//! Game configuration
//!
//! Platform tuning is injected at construction instead of being compiled in
//! per target. Loaded from JSON on top of a platform preset.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Target platform presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Platform {
    #[default]
    Phone,
    Desktop,
    Tv,
    Watch,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Phone => "Phone",
            Platform::Desktop => "Desktop",
            Platform::Tv => "Tv",
            Platform::Watch => "Watch",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "phone" | "ios" => Some(Platform::Phone),
            "desktop" | "macos" | "mac" => Some(Platform::Desktop),
            "tv" | "tvos" => Some(Platform::Tv),
            "watch" | "watchos" => Some(Platform::Watch),
            _ => None,
        }
    }

    /// Depth the line runs out to on a full cast
    pub fn cast_depth(&self) -> f32 {
        match self {
            Platform::Phone => 3600.0,
            Platform::Desktop | Platform::Tv => 7000.0,
            Platform::Watch => 1350.0,
        }
    }

    /// Shallow depth the hook retracts to when reeling in
    pub fn reel_target_depth(&self) -> f32 {
        match self {
            Platform::Watch => 50.0,
            _ => 100.0,
        }
    }

    /// Catch radius around the hook
    pub fn hook_radius(&self) -> f32 {
        match self {
            Platform::Watch => 50.0,
            _ => 100.0,
        }
    }

    /// Offset from the hook anchor to its bait point
    pub fn hook_offset(&self) -> Vec2 {
        match self {
            Platform::Watch => Vec2::new(6.0, 30.0),
            _ => Vec2::new(12.0, 60.0),
        }
    }

    /// (yum fish, piranhas) spawned at startup
    pub fn fish_counts(&self) -> (u32, u32) {
        match self {
            Platform::Watch => (5, 10),
            _ => (10, 20),
        }
    }

    /// Vertical band fish swim in
    pub fn fish_rows(&self) -> (f32, f32) {
        match self {
            Platform::Watch => (-700.0, 515.0),
            _ => (-1900.0, 1450.0),
        }
    }
}

/// Per-kind fish tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FishTuning {
    /// Swim speed before the random [0.5, 1.0] factor
    pub base_speed: f32,
    /// Life before scaling by fish size
    pub base_life: f32,
}

/// Digital crown reel tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrownTuning {
    /// Depth change per frame per unit of rotation speed
    pub gain: f32,
    /// Cap on depth change per frame
    pub max_delta: f32,
    /// Momentum multiplier applied every frame
    pub decay: f32,
    /// Momentum below which the hook settles and fishing starts
    pub stop_threshold: f32,
}

impl Default for CrownTuning {
    fn default() -> Self {
        Self {
            gain: 10.0,
            max_delta: 20.0,
            decay: 0.95,
            stop_threshold: 0.02,
        }
    }
}

/// Full gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub platform: Platform,

    // === Hook ===
    pub cast_depth: f32,
    pub reel_target_depth: f32,
    /// Line speed: tween duration is depth / depth_per_second
    pub depth_per_second: f32,
    /// Minimum travel before a cast can be stopped early
    pub hook_height: f32,
    pub hook_radius: f32,
    pub hook_offset: Vec2,

    // === Timers (seconds) ===
    pub fishing_timeout: f64,
    pub catch_roll_interval: f64,
    pub reel_tick_interval: f64,
    /// How long a landed fish is shown before the next cast
    pub collect_hold: f64,
    pub cloud_interval: f64,

    // === Odds ===
    /// Percent; compared against a rounded roll in [0, 100]
    pub catch_chance: f32,
    pub bash_damage_min: f32,
    pub bash_damage_max: f32,
    /// Fish scale above which a yum fish scores the bonus point
    pub bonus_scale: f32,
    pub cloud_chance: f32,

    // === Population ===
    pub initial_lives: u32,
    pub yum_count: u32,
    pub piranha_count: u32,
    pub fish_row_min: f32,
    pub fish_row_max: f32,
    pub fish_scale_min: f32,
    pub fish_scale_max: f32,
    pub yum: FishTuning,
    pub piranha: FishTuning,
    pub initial_clouds: u32,

    pub crown: CrownTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_platform(Platform::default())
    }
}

impl GameConfig {
    /// Create a config from a platform preset
    pub fn from_platform(platform: Platform) -> Self {
        let (yum_count, piranha_count) = platform.fish_counts();
        let (fish_row_min, fish_row_max) = platform.fish_rows();
        Self {
            platform,

            cast_depth: platform.cast_depth(),
            reel_target_depth: platform.reel_target_depth(),
            depth_per_second: 500.0,
            hook_height: 64.0,
            hook_radius: platform.hook_radius(),
            hook_offset: platform.hook_offset(),

            fishing_timeout: 5.0,
            catch_roll_interval: 1.0,
            reel_tick_interval: 0.1,
            collect_hold: 3.0,
            cloud_interval: 5.0,

            catch_chance: 25.0,
            bash_damage_min: 0.25,
            bash_damage_max: 1.0,
            bonus_scale: 0.75,
            cloud_chance: 75.0,

            initial_lives: 1,
            yum_count,
            piranha_count,
            fish_row_min,
            fish_row_max,
            fish_scale_min: 0.40,
            fish_scale_max: 1.0,
            yum: FishTuning {
                base_speed: 3.0,
                base_life: 1.0,
            },
            piranha: FishTuning {
                base_speed: 4.0,
                base_life: 2.0,
            },
            initial_clouds: 11,

            crown: CrownTuning::default(),
        }
    }

    /// Parse a config from JSON.
    ///
    /// Missing fields come from the preset named by `platform` (or the
    /// default preset), so `{"platform": "Watch"}` is a complete watch config.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: Value = serde_json::from_str(json)?;
        let platform = overrides
            .get("platform")
            .cloned()
            .map(serde_json::from_value::<Platform>)
            .transpose()?
            .unwrap_or_default();

        let mut merged = serde_json::to_value(Self::from_platform(platform))?;
        merge_json(&mut merged, overrides);
        let config: Self = serde_json::from_value(merged)?;
        Ok(config.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a config file, falling back to the default preset
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!(
                        "Loaded {} config from {}",
                        config.platform.as_str(),
                        path.display()
                    );
                    config
                }
                Err(err) => {
                    log::warn!("Invalid config {}: {}, using defaults", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Clamp values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        if self.depth_per_second <= 0.0 {
            log::warn!("depth_per_second must be positive, using 500");
            self.depth_per_second = 500.0;
        }
        if self.bash_damage_min > self.bash_damage_max {
            std::mem::swap(&mut self.bash_damage_min, &mut self.bash_damage_max);
        }
        if self.fish_scale_min > self.fish_scale_max {
            std::mem::swap(&mut self.fish_scale_min, &mut self.fish_scale_max);
        }
        if self.fish_row_min > self.fish_row_max {
            std::mem::swap(&mut self.fish_row_min, &mut self.fish_row_max);
        }
        if self.reel_target_depth > self.cast_depth {
            std::mem::swap(&mut self.reel_target_depth, &mut self.cast_depth);
        }
        self.catch_chance = self.catch_chance.clamp(0.0, 100.0);
        self.cloud_chance = self.cloud_chance.clamp(0.0, 100.0);
        self.initial_lives = self.initial_lives.max(1);
        self
    }

    /// Tuning for a fish kind
    pub fn fish_tuning(&self, hostile: bool) -> FishTuning {
        if hostile { self.piranha } else { self.yum }
    }
}

/// Overlay `overrides` onto `base`, recursing into objects
fn merge_json(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
