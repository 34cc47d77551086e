//! Zombie Piranhas headless driver
//!
//! Plays seeded sessions with a scripted angler, standing in for the sprite
//! layer, and prints a JSON summary.
//!
//! Usage: `zombie-piranhas [seed] [config.json] [seconds]`

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use zombie_piranhas::consts::{DEFAULT_SEED, SIM_DT};
use zombie_piranhas::sim::{
    Fish, FishKind, GameEvent, GamePhase, GameState, Proximity, TickInput, tick,
};
use zombie_piranhas::{GameConfig, Intent, IntentSender, Snapshot, intent_channel};

/// Scene half-width in points
const SCENE_HALF_WIDTH: f32 = 768.0;
/// Fish are dropped this far past the edge
const EXIT_MARGIN: f32 = 64.0;
/// Boat waterline in scene coordinates
const BOAT_Y: f32 = 1600.0;
/// Stop after this many games
const MAX_GAMES: u32 = 3;
/// Default session length in seconds
const DEFAULT_SECONDS: f64 = 600.0;
/// Chance per frame that the angler bashes a hooked piranha
const BASH_CHANCE: f64 = 0.05;

#[derive(Parser)]
#[command(name = "zombie-piranhas")]
#[command(about = "Play seeded Zombie Piranhas sessions headlessly")]
struct Cli {
    /// RNG seed for the game and the scripted angler
    seed: Option<u64>,
    /// JSON config file, merged over its platform preset
    config: Option<PathBuf>,
    /// Session length in seconds
    seconds: Option<f64>,
}

/// Fish positions, as the sprite layer would keep them
#[derive(Default)]
struct School {
    positions: BTreeMap<u32, Vec2>,
}

impl School {
    fn add(&mut self, fish: &Fish) {
        let x = if fish.from_right {
            SCENE_HALF_WIDTH
        } else {
            -SCENE_HALF_WIDTH
        };
        self.positions.insert(fish.id, Vec2::new(x, fish.row));
    }

    fn remove(&mut self, id: u32) {
        self.positions.remove(&id);
    }

    /// Swim every fish one frame; returns fish that left the scene.
    /// Fish nosing the bait hold still.
    fn swim(&mut self, state: &GameState) -> Vec<u32> {
        let fishing = state.phase() == GamePhase::Fishing;
        let mut exited = Vec::new();
        for fish in state.fish().iter() {
            if fishing && fish.active {
                continue;
            }
            let Some(pos) = self.positions.get_mut(&fish.id) else {
                continue;
            };
            pos.x += if fish.from_right { -fish.speed } else { fish.speed };
            if pos.x.abs() > SCENE_HALF_WIDTH + EXIT_MARGIN {
                exited.push(fish.id);
            }
        }
        exited
    }

    fn proximity(&self, state: &GameState) -> Proximity {
        let hook = Vec2::new(0.0, BOAT_Y - state.hook().depth);
        Proximity::from_positions(
            self.positions.iter().map(|(id, pos)| (*id, *pos)),
            hook,
            state.config().hook_offset,
        )
    }
}

/// Scripted player: stops each cast at a random depth and sometimes bashes
struct Angler {
    intents: IntentSender,
    rng: Pcg32,
    stop_depth: f32,
}

impl Angler {
    fn new(intents: IntentSender, seed: u64) -> Self {
        Self {
            intents,
            rng: Pcg32::seed_from_u64(seed),
            stop_depth: 0.0,
        }
    }

    fn act(&mut self, state: &GameState) {
        let config = state.config();
        match state.phase() {
            GamePhase::ReadyToCast => {
                let shallowest = config.reel_target_depth + config.hook_height;
                self.stop_depth = self.rng.random_range(shallowest..=config.cast_depth);
                self.intents.send(Intent::Cast);
            }
            GamePhase::Casting if state.hook().depth >= self.stop_depth => {
                self.intents.send(Intent::Release);
            }
            GamePhase::ReelingIn => {
                let piranha = state.caught().is_some_and(|f| f.kind == FishKind::Piranha);
                if piranha && self.rng.random_bool(BASH_CHANCE) {
                    self.intents.send(Intent::Bash);
                }
            }
            GamePhase::GameOver => {
                self.intents.send(Intent::AcknowledgeGameOver);
            }
            _ => {}
        }
    }
}

/// Session results
#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    seconds: f64,
    games: u32,
    scores: Vec<u32>,
    yum_fish: u32,
    bonus_fish: u32,
    zombies: u32,
    bashed_off: u32,
    empty_hooks: u32,
    last: Option<Snapshot>,
}

impl Summary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::YumFish { bonus, .. } => {
                self.yum_fish += 1;
                if *bonus {
                    self.bonus_fish += 1;
                }
            }
            GameEvent::ZombiePiranha { .. } => self.zombies += 1,
            GameEvent::FishBashedOff { .. } => self.bashed_off += 1,
            GameEvent::NothingCaught => self.empty_hooks += 1,
            GameEvent::GameOver { score } => {
                self.zombies += 1;
                self.games += 1;
                self.scores.push(*score);
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or(DEFAULT_SEED);
    let config = cli.config.map(GameConfig::load).unwrap_or_default();
    let seconds = cli.seconds.unwrap_or(DEFAULT_SECONDS).max(0.0);

    log::info!(
        "Zombie Piranhas (headless) seed={} platform={}",
        seed,
        config.platform.as_str()
    );

    let (tx, rx) = intent_channel();
    let mut angler = Angler::new(tx, seed.rotate_left(17));
    let mut state = GameState::new(seed, config);
    let mut school = School::default();
    let mut summary = Summary {
        seed,
        ..Summary::default()
    };

    let frames = (seconds / SIM_DT).ceil() as u64;
    for frame in 0..frames {
        let now = frame as f64 * SIM_DT;

        angler.act(&state);
        state.pump(&rx);

        let input = TickInput {
            now,
            proximity: school.proximity(&state),
        };
        tick(&mut state, &input);

        for id in school.swim(&state) {
            school.remove(id);
            state.fish_exited(id);
        }

        for event in state.drain_events() {
            match &event {
                GameEvent::FishSpawned(fish) => school.add(fish),
                GameEvent::FishCaught { id, kind, .. } => {
                    school.remove(*id);
                    log::info!("{:.2}s: hooked a {}", now, kind.as_str());
                }
                GameEvent::ReelTick | GameEvent::CloudSpawned(_) => {
                    log::trace!("{:.2}s: {:?}", now, event)
                }
                _ => log::debug!("{:.2}s: {:?}", now, event),
            }
            summary.record(&event);
        }

        if summary.games >= MAX_GAMES {
            break;
        }
        summary.seconds = now;
    }

    summary.last = Some(state.snapshot());
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Could not serialize summary: {}", err),
    }
}
