//! Game state and intent handling
//!
//! Everything the game loop owns lives here. Intents that arrive in the
//! wrong phase are ignored; they are never errors.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ambience::{Cloud, CloudSpawner};
use super::fish::{Fish, FishKind, FishPopulation};
use super::hook::{CrownReel, Hook, HookMotion};
use crate::config::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Hook at the surface, waiting for a cast
    ReadyToCast,
    /// Line running out
    Casting,
    /// Hook resting, fish may bite
    Fishing,
    /// Hook coming back up, with or without a fish
    ReelingIn,
    /// Catch being scored
    CollectingFish,
    /// Out of fishermen
    GameOver,
}

/// Outcomes for the presentation layer to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CastStarted { depth: f32 },
    /// Cast stopped early by the player
    HookStopped { depth: f32 },
    FishingStarted { depth: f32 },
    /// Reel click while the line moves
    ReelTick,
    FishCaught { id: u32, kind: FishKind, scale: f32 },
    ReelStarted { with_fish: bool },
    FishBashed { id: u32, life: f32 },
    FishBashedOff { id: u32 },
    YumFish { points: u32, bonus: bool },
    ZombiePiranha { lives: u32 },
    NothingCaught,
    GameOver { score: u32 },
    Ready,
    FishSpawned(Fish),
    CloudSpawned(Cloud),
    Reset,
}

/// Read-only view of the game for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    /// Piranhas landed this run
    pub zombies: u32,
    pub hook_depth: f32,
    pub caught: Option<Fish>,
    pub fish: Vec<Fish>,
    pub time: f64,
}

/// Complete game state, generic over the RNG so tests can script rolls
#[derive(Debug, Clone)]
pub struct GameState<R = Pcg32> {
    pub(crate) config: GameConfig,
    pub(crate) phase: GamePhase,
    pub(crate) score: u32,
    pub(crate) lives: u32,
    pub(crate) zombies: u32,
    pub(crate) hook: Hook,
    /// Depth the current cast started from
    pub(crate) cast_origin: f32,
    pub(crate) fish: FishPopulation,
    pub(crate) caught: Option<Fish>,
    /// Time of the latest tick
    pub(crate) now: f64,
    pub(crate) last_catch_roll: f64,
    /// Fishing deadline runs from here
    pub(crate) fishing_since: f64,
    pub(crate) last_reel_tick: f64,
    /// End of the collect hold, while a landed fish is shown
    pub(crate) collect_until: Option<f64>,
    pub(crate) clouds: CloudSpawner,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) rng: R,
}

impl GameState<Pcg32> {
    /// Create a new game with a seeded PCG stream
    pub fn new(seed: u64, config: GameConfig) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed), config)
    }
}

impl<R: Rng> GameState<R> {
    /// Create a new game drawing randomness from `rng`
    pub fn with_rng(rng: R, config: GameConfig) -> Self {
        let config = config.sanitized();
        let mut state = Self {
            phase: GamePhase::ReadyToCast,
            score: 0,
            lives: config.initial_lives,
            zombies: 0,
            hook: Hook::new(config.reel_target_depth),
            cast_origin: config.reel_target_depth,
            fish: FishPopulation::new(),
            caught: None,
            now: 0.0,
            last_catch_roll: 0.0,
            fishing_since: 0.0,
            last_reel_tick: 0.0,
            collect_until: None,
            clouds: CloudSpawner::new(),
            events: Vec::new(),
            rng,
            config,
        };
        state.setup_scene();
        state
    }

    fn setup_scene(&mut self) {
        for cloud in self.clouds.initial(&self.config, &mut self.rng) {
            self.events.push(GameEvent::CloudSpawned(cloud));
        }
        for id in self.fish.populate(&self.config, &mut self.rng) {
            if let Some(fish) = self.fish.get(id) {
                self.events.push(GameEvent::FishSpawned(fish.clone()));
            }
        }
        self.events.push(GameEvent::Ready);
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn zombies(&self) -> u32 {
        self.zombies
    }

    pub fn hook(&self) -> &Hook {
        &self.hook
    }

    pub fn caught(&self) -> Option<&Fish> {
        self.caught.as_ref()
    }

    pub fn fish(&self) -> &FishPopulation {
        &self.fish
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn time(&self) -> f64 {
        self.now
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            zombies: self.zombies,
            hook_depth: self.hook.depth,
            caught: self.caught.clone(),
            fish: self.fish.iter().cloned().collect(),
            time: self.now,
        }
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Intents ===

    /// Start a cast (ready to cast only)
    pub fn cast(&mut self) {
        if self.phase != GamePhase::ReadyToCast {
            self.ignore("cast");
            return;
        }
        let depth = self.config.cast_depth;
        let duration = f64::from(depth / self.config.depth_per_second);
        self.set_phase(GamePhase::Casting);
        self.cast_origin = self.hook.depth;
        self.hook.tween_to(depth, self.now, duration);
        self.last_reel_tick = self.now;
        self.events.push(GameEvent::CastStarted { depth });
    }

    /// Stop the hook mid-cast, once it has cleared the boat
    pub fn release(&mut self) {
        if self.phase != GamePhase::Casting {
            self.ignore("release");
            return;
        }
        if self.hook.depth - self.cast_origin < self.config.hook_height {
            self.ignore("release (hook still at the boat)");
            return;
        }
        self.hook.stop();
        self.events.push(GameEvent::HookStopped {
            depth: self.hook.depth,
        });
        self.start_fishing();
    }

    /// Reel the hook back in (fishing only)
    pub fn reel(&mut self) {
        if self.phase != GamePhase::Fishing {
            self.ignore("reel");
            return;
        }
        let duration = f64::from(self.hook.depth / self.config.depth_per_second);
        self.set_phase(GamePhase::ReelingIn);
        self.fish.deactivate_all();
        self.hook
            .tween_to(self.config.reel_target_depth, self.now, duration);
        self.last_reel_tick = self.now;
        self.events.push(GameEvent::ReelStarted {
            with_fish: self.caught.is_some(),
        });
    }

    /// Hit the piranha on the hook while reeling in
    pub fn bash(&mut self) {
        if self.phase != GamePhase::ReelingIn {
            self.ignore("bash");
            return;
        }
        if !self.caught.as_ref().is_some_and(|f| f.kind.is_hostile()) {
            self.ignore("bash (no piranha on the hook)");
            return;
        }
        let damage = self
            .rng
            .random_range(self.config.bash_damage_min..=self.config.bash_damage_max);
        let Some(fish) = self.caught.as_mut() else {
            return;
        };

        fish.life -= damage;
        let id = fish.id;
        if fish.life <= 0.0 {
            log::info!("Piranha #{id} bashed off the hook");
            self.caught = None;
            self.events.push(GameEvent::FishBashedOff { id });
        } else {
            log::debug!("Bashed piranha #{id} for {damage:.2}, {:.2} left", fish.life);
            let life = fish.life;
            self.events.push(GameEvent::FishBashed { id, life });
        }
    }

    /// Hook is back at the surface: score the catch
    pub fn reel_complete(&mut self) {
        if self.phase != GamePhase::ReelingIn {
            self.ignore("reel complete");
            return;
        }
        self.hook.stop();
        self.hook.depth = self.config.reel_target_depth;
        self.set_phase(GamePhase::CollectingFish);

        let Some(fish) = self.caught.clone() else {
            self.events.push(GameEvent::NothingCaught);
            self.finish_collecting();
            return;
        };

        match fish.kind {
            FishKind::Piranha => {
                self.lives = self.lives.saturating_sub(1);
                self.zombies += 1;
                if self.lives == 0 {
                    log::info!("Game over with {} fish", self.score);
                    self.caught = None;
                    self.set_phase(GamePhase::GameOver);
                    self.events.push(GameEvent::GameOver { score: self.score });
                    return;
                }
                log::info!("Zombie piranha! {} fishermen left", self.lives);
                self.events.push(GameEvent::ZombiePiranha { lives: self.lives });
            }
            FishKind::Yum => {
                let bonus = fish.scale > self.config.bonus_scale;
                let points = if bonus { 2 } else { 1 };
                self.score += points;
                log::info!("Yum fish! +{points} (score {})", self.score);
                self.events.push(GameEvent::YumFish { points, bonus });
            }
        }

        let replacement = self.fish.spawn_random(&self.config, &mut self.rng).clone();
        self.events.push(GameEvent::FishSpawned(replacement));

        if self.config.collect_hold > 0.0 {
            self.collect_until = Some(self.now + self.config.collect_hold);
        } else {
            self.finish_collecting();
        }
    }

    /// Start a new run after game over
    pub fn acknowledge_game_over(&mut self) {
        if self.phase != GamePhase::GameOver {
            self.ignore("acknowledge game over");
            return;
        }
        log::info!("New game");
        self.score = 0;
        self.lives = self.config.initial_lives;
        self.zombies = 0;
        self.hook = Hook::new(self.config.reel_target_depth);
        self.cast_origin = self.config.reel_target_depth;
        self.caught = None;
        self.last_catch_roll = 0.0;
        self.fishing_since = self.now;
        self.last_reel_tick = self.now;
        self.collect_until = None;
        self.clouds.reset();
        self.fish.clear();
        self.set_phase(GamePhase::ReadyToCast);
        self.events.push(GameEvent::Reset);
        self.setup_scene();
    }

    /// Move the hook by hand; turning one way reels in, the other lets out
    pub fn crown_turn(&mut self, rotation_speed: f32) {
        let phase_ok = matches!(
            self.phase,
            GamePhase::ReadyToCast | GamePhase::Casting | GamePhase::Fishing
        );
        if !phase_ok || self.caught.is_some() || self.hook.is_tweening() {
            self.ignore("crown turn");
            return;
        }
        if self.phase != GamePhase::Casting {
            self.cast_origin = self.hook.depth;
            self.set_phase(GamePhase::Casting);
        }
        self.fish.deactivate_all();
        let reel = CrownReel::from_rotation(rotation_speed, &self.config.crown);
        self.hook.motion = HookMotion::Crown(reel);
        self.last_reel_tick = self.now;
    }

    // === Internal transitions ===

    pub(crate) fn start_fishing(&mut self) {
        self.set_phase(GamePhase::Fishing);
        self.fishing_since = self.now;
        self.events.push(GameEvent::FishingStarted {
            depth: self.hook.depth,
        });
    }

    /// Take `id` off the population and onto the hook, then reel in
    pub(crate) fn catch_fish(&mut self, id: u32) {
        let Some(mut fish) = self.fish.remove(id) else {
            return;
        };
        fish.caught = true;
        fish.active = false;
        log::info!("Caught {} #{} (scale {:.2})", fish.kind.as_str(), id, fish.scale);
        self.events.push(GameEvent::FishCaught {
            id,
            kind: fish.kind,
            scale: fish.scale,
        });
        self.caught = Some(fish);
        self.reel();
    }

    pub(crate) fn finish_collecting(&mut self) {
        self.caught = None;
        self.collect_until = None;
        self.set_phase(GamePhase::ReadyToCast);
        self.events.push(GameEvent::Ready);
    }

    /// Hook surfaced under crown control
    pub(crate) fn surface(&mut self) {
        self.hook.stop();
        self.set_phase(GamePhase::ReadyToCast);
        self.events.push(GameEvent::Ready);
    }

    /// Presentation reports a fish swam off-screen; replace it
    pub fn fish_exited(&mut self, id: u32) {
        if self.fish.remove(id).is_none() {
            return;
        }
        let replacement = self.fish.spawn_random(&self.config, &mut self.rng).clone();
        self.events.push(GameEvent::FishSpawned(replacement));
    }

    pub(crate) fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::debug!("{:?} -> {:?} at {:.2}s", self.phase, phase, self.now);
            self.phase = phase;
        }
    }

    fn ignore(&self, intent: &str) {
        log::trace!("Ignored {intent} in {:?}", self.phase);
    }
}
