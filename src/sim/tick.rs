//! Per-frame simulation tick
//!
//! Advances hook motion, catch rolls and timers. Called once per rendered
//! frame with the absolute time and the fish proximity the presentation
//! layer measured for that frame.

use rand::Rng;

use super::fish::Proximity;
use super::hook::{CrownStep, HookMotion};
use super::state::{GameEvent, GamePhase, GameState};

/// Inputs for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Absolute monotonic time in seconds
    pub now: f64,
    /// Distances from fish to the hook
    pub proximity: Proximity,
}

impl TickInput {
    /// A frame with no fish near the hook
    pub fn at(now: f64) -> Self {
        Self {
            now,
            proximity: Proximity::new(),
        }
    }
}

/// Advance the game to `input.now`
pub fn tick<R: Rng>(state: &mut GameState<R>, input: &TickInput) {
    state.now = input.now;

    advance_hook(state);
    click_reel(state);

    if let Some(cloud) = state.clouds.update(input.now, &state.config, &mut state.rng) {
        state.events.push(GameEvent::CloudSpawned(cloud));
    }

    roll_for_bite(state, &input.proximity);

    // Nothing biting: bring the hook back up
    if state.phase == GamePhase::Fishing
        && state.now - state.fishing_since > state.config.fishing_timeout
    {
        log::info!("Nothing biting after {:.1}s, reeling in", state.config.fishing_timeout);
        state.reel();
    }

    if state.phase == GamePhase::CollectingFish
        && state.collect_until.is_some_and(|until| state.now >= until)
    {
        state.finish_collecting();
    }
}

fn advance_hook<R: Rng>(state: &mut GameState<R>) {
    let now = state.now;
    match state.hook.motion {
        HookMotion::Idle => {}
        HookMotion::Tween(tween) => {
            state.hook.depth = tween.depth_at(now);
            if tween.is_finished(now) {
                state.hook.depth = tween.to;
                state.hook.stop();
                match state.phase {
                    GamePhase::Casting => state.start_fishing(),
                    GamePhase::ReelingIn => state.reel_complete(),
                    _ => {}
                }
            }
        }
        HookMotion::Crown(mut reel) => {
            let step = reel.step(
                &mut state.hook.depth,
                state.config.reel_target_depth,
                state.config.cast_depth,
                &state.config.crown,
            );
            state.hook.motion = HookMotion::Crown(reel);
            match step {
                CrownStep::Moving => {}
                CrownStep::Surfaced => state.surface(),
                CrownStep::Settled => {
                    state.hook.stop();
                    state.start_fishing();
                }
            }
        }
    }
}

fn click_reel<R: Rng>(state: &mut GameState<R>) {
    let line_moving = matches!(state.phase, GamePhase::Casting | GamePhase::ReelingIn)
        && state.hook.is_moving();
    if line_moving && state.now - state.last_reel_tick > state.config.reel_tick_interval {
        state.last_reel_tick = state.now;
        state.events.push(GameEvent::ReelTick);
    }
}

/// Mark fish near the hook and roll at most once per roll interval.
///
/// A fish near the hook holds off the fishing deadline. The roll goes to the
/// first active fish in id order.
fn roll_for_bite<R: Rng>(state: &mut GameState<R>, proximity: &Proximity) {
    if state.phase != GamePhase::Fishing || state.caught.is_some() {
        return;
    }

    let radius = state.config.hook_radius;
    let mut candidate = None;
    for fish in state.fish.iter_mut() {
        fish.active = proximity.is_near(fish.id, radius);
        if fish.active {
            state.fishing_since = state.now;
            candidate.get_or_insert(fish.id);
        }
    }

    let Some(id) = candidate else {
        return;
    };
    if state.now - state.last_catch_roll <= state.config.catch_roll_interval {
        return;
    }
    state.last_catch_roll = state.now;

    let dice = state.rng.random_range(0.0..=100.0f32).round();
    log::debug!("Fish #{id} sniffs the bait, rolled {dice}");
    if dice <= state.config.catch_chance {
        state.catch_fish(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, Platform};
    use crate::input::Intent;
    use crate::sim::fish::FishKind;
    use crate::sim::state::tests::{ConstRng, quiet_config};
    use proptest::prelude::*;
    use rand::Rng;

    fn first_of_kind<R: Rng>(state: &GameState<R>, kind: FishKind) -> u32 {
        state
            .fish()
            .iter()
            .find(|f| f.kind == kind)
            .map(|f| f.id)
            .expect("population has both kinds")
    }

    fn near(id: u32, now: f64) -> TickInput {
        TickInput {
            now,
            proximity: Proximity::new().with(id, 10.0),
        }
    }

    #[test]
    fn test_full_cycle_with_forced_catch() {
        // Zero rolls: every bite lands, every fish is the smallest size
        let mut state = GameState::with_rng(ConstRng(0), GameConfig::default());
        let yum = first_of_kind(&state, FishKind::Yum);

        tick(&mut state, &TickInput::at(0.0));
        state.cast();
        assert_eq!(state.phase(), GamePhase::Casting);

        tick(&mut state, &TickInput::at(1.0));
        state.release();
        assert_eq!(state.phase(), GamePhase::Fishing);

        tick(&mut state, &near(yum, 1.5));
        assert_eq!(state.phase(), GamePhase::ReelingIn);
        assert_eq!(state.caught().map(|f| f.id), Some(yum));
        assert!(state.fish().get(yum).is_none());

        tick(&mut state, &TickInput::at(30.0));
        assert_eq!(state.phase(), GamePhase::CollectingFish);
        assert_eq!(state.score(), 1);
        assert_eq!(state.hook().depth, 100.0);

        tick(&mut state, &TickInput::at(33.0));
        assert_eq!(state.phase(), GamePhase::ReadyToCast);
        assert!(state.caught().is_none());
        assert_eq!(state.fish().len(), 30);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::YumFish {
            points: 1,
            bonus: false
        }));
        assert!(events.contains(&GameEvent::ReelStarted { with_fish: true }));
    }

    #[test]
    fn test_cast_runs_out_to_full_depth() {
        let mut state = GameState::new(7, GameConfig::default());
        tick(&mut state, &TickInput::at(0.0));
        state.cast();
        tick(&mut state, &TickInput::at(3.0));
        assert_eq!(state.phase(), GamePhase::Casting);
        assert!(state.hook().depth > 100.0 && state.hook().depth < 3600.0);

        tick(&mut state, &TickInput::at(7.5));
        assert_eq!(state.phase(), GamePhase::Fishing);
        assert_eq!(state.hook().depth, 3600.0);
    }

    #[test]
    fn test_fishing_timeout_reels_in_empty() {
        let mut state = GameState::new(21, quiet_config());
        tick(&mut state, &TickInput::at(0.0));
        state.cast();
        tick(&mut state, &TickInput::at(1.0));
        state.release();

        tick(&mut state, &TickInput::at(5.9));
        assert_eq!(state.phase(), GamePhase::Fishing);
        tick(&mut state, &TickInput::at(6.1));
        assert_eq!(state.phase(), GamePhase::ReelingIn);
        assert!(state.caught().is_none());
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::ReelStarted { with_fish: false })
        );

        tick(&mut state, &TickInput::at(60.0));
        assert_eq!(state.phase(), GamePhase::ReadyToCast);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_nearby_fish_holds_deadline() {
        // Max rolls never bite
        let mut state = GameState::with_rng(ConstRng(u64::MAX), quiet_config());
        let id = first_of_kind(&state, FishKind::Piranha);
        tick(&mut state, &TickInput::at(0.0));
        state.cast();
        tick(&mut state, &TickInput::at(1.0));
        state.release();

        let mut now = 1.0;
        while now < 20.0 {
            now += 0.5;
            tick(&mut state, &near(id, now));
            assert_eq!(state.phase(), GamePhase::Fishing);
        }
        assert!(state.fish().get(id).is_some_and(|f| f.active));

        // Fish swims off, deadline runs again
        tick(&mut state, &TickInput::at(now + 5.5));
        assert_eq!(state.phase(), GamePhase::ReelingIn);
    }

    #[test]
    fn test_roll_waits_for_interval() {
        let mut state = GameState::with_rng(ConstRng(0), quiet_config());
        let id = first_of_kind(&state, FishKind::Yum);
        tick(&mut state, &TickInput::at(0.0));
        state.cast();
        tick(&mut state, &TickInput::at(0.5));
        state.release();

        tick(&mut state, &near(id, 0.9));
        assert_eq!(state.phase(), GamePhase::Fishing);
        tick(&mut state, &near(id, 1.1));
        assert_eq!(state.phase(), GamePhase::ReelingIn);
    }

    #[test]
    fn test_fish_outside_radius_ignored() {
        let mut state = GameState::with_rng(ConstRng(0), quiet_config());
        let id = first_of_kind(&state, FishKind::Yum);
        tick(&mut state, &TickInput::at(0.0));
        state.cast();
        tick(&mut state, &TickInput::at(1.0));
        state.release();

        let far = TickInput {
            now: 2.0,
            proximity: Proximity::new().with(id, 100.0),
        };
        tick(&mut state, &far);
        assert_eq!(state.phase(), GamePhase::Fishing);
        assert!(state.caught().is_none());
    }

    #[test]
    fn test_piranha_catch_ends_single_life_game() {
        let mut state = GameState::with_rng(ConstRng(0), quiet_config());
        let id = first_of_kind(&state, FishKind::Piranha);
        tick(&mut state, &TickInput::at(0.0));
        state.apply(Intent::Primary);
        tick(&mut state, &TickInput::at(1.0));
        state.apply(Intent::Primary);
        tick(&mut state, &near(id, 2.0));
        assert_eq!(state.phase(), GamePhase::ReelingIn);

        tick(&mut state, &TickInput::at(40.0));
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.lives(), 0);

        tick(&mut state, &TickInput::at(50.0));
        state.apply(Intent::Cast);
        assert_eq!(state.phase(), GamePhase::GameOver);

        state.apply(Intent::Primary);
        assert_eq!(state.phase(), GamePhase::ReadyToCast);
        assert_eq!(state.lives(), 1);
    }

    #[test]
    fn test_piranha_survives_bash_and_turns_zombie() {
        let config = GameConfig {
            initial_lives: 3,
            ..GameConfig::default()
        };
        let mut state = GameState::with_rng(ConstRng(0), config);
        let id = first_of_kind(&state, FishKind::Piranha);

        tick(&mut state, &TickInput::at(0.0));
        state.cast();
        tick(&mut state, &TickInput::at(1.0));
        state.release();
        tick(&mut state, &near(id, 2.0));
        assert_eq!(state.phase(), GamePhase::ReelingIn);
        // Smallest piranha: 2.0 * 0.4 life, minimum bash takes 0.25
        state.bash();
        let life = state.caught().map(|f| f.life).expect("still hooked");
        assert!((life - 0.55).abs() < 1e-6);
        state.drain_events();

        tick(&mut state, &TickInput::at(40.0));
        assert_eq!(state.phase(), GamePhase::CollectingFish);
        assert_eq!(state.lives(), 2);
        assert_eq!(state.zombies(), 1);
        assert_eq!(state.score(), 0);
        assert_eq!(state.caught().map(|f| f.id), Some(id));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ZombiePiranha { lives: 2 }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        tick(&mut state, &TickInput::at(42.0));
        assert_eq!(state.phase(), GamePhase::CollectingFish);

        tick(&mut state, &TickInput::at(43.5));
        assert_eq!(state.phase(), GamePhase::ReadyToCast);
        assert!(state.caught().is_none());
        assert_eq!(state.fish().len(), 30);
        assert_eq!(state.lives(), 2);
    }

    #[test]
    fn test_bash_piranha_off_while_reeling() {
        let mut state = GameState::with_rng(ConstRng(0), quiet_config());
        let id = first_of_kind(&state, FishKind::Piranha);
        tick(&mut state, &TickInput::at(0.0));
        state.cast();
        tick(&mut state, &TickInput::at(1.0));
        state.release();
        tick(&mut state, &near(id, 2.0));

        // Smallest piranha: life 2.0 * 0.4, minimum damage 0.25
        let mut bashes = 0;
        while state.caught().is_some() {
            state.apply(Intent::Bash);
            bashes += 1;
            assert!(bashes <= 4);
        }
        assert_eq!(bashes, 4);
        assert_eq!(state.phase(), GamePhase::ReelingIn);

        tick(&mut state, &TickInput::at(40.0));
        assert_eq!(state.phase(), GamePhase::ReadyToCast);
        assert_eq!(state.lives(), 1);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_reel_ticks_while_line_moves() {
        let mut state = GameState::new(3, GameConfig::default());
        tick(&mut state, &TickInput::at(0.0));
        state.cast();
        state.drain_events();

        tick(&mut state, &TickInput::at(0.05));
        assert!(!state.drain_events().contains(&GameEvent::ReelTick));
        tick(&mut state, &TickInput::at(0.2));
        assert!(state.drain_events().contains(&GameEvent::ReelTick));
    }

    #[test]
    fn test_crown_reel_settles_into_fishing() {
        let mut state = GameState::new(5, GameConfig::from_platform(Platform::Watch));
        tick(&mut state, &TickInput::at(0.0));
        state.apply(Intent::CrownTurn {
            rotation_speed: -2.0,
        });
        assert_eq!(state.phase(), GamePhase::Casting);

        let mut now = 0.0;
        for _ in 0..200 {
            now += 1.0 / 60.0;
            tick(&mut state, &TickInput::at(now));
            if state.phase() == GamePhase::Fishing {
                break;
            }
        }
        assert_eq!(state.phase(), GamePhase::Fishing);
        assert!(state.hook().depth > 50.0 && state.hook().depth <= 1350.0);
        assert!(!state.hook().is_moving());
    }

    #[test]
    fn test_crown_reel_surfaces_to_ready() {
        let mut state = GameState::new(5, GameConfig::from_platform(Platform::Watch));
        tick(&mut state, &TickInput::at(0.0));
        state.crown_turn(-2.0);
        for frame in 1..=5 {
            tick(&mut state, &TickInput::at(frame as f64 / 60.0));
        }
        assert!(state.hook().depth > 50.0);

        state.crown_turn(2.0);
        for frame in 6..=200 {
            tick(&mut state, &TickInput::at(frame as f64 / 60.0));
            if state.phase() == GamePhase::ReadyToCast {
                break;
            }
        }
        assert_eq!(state.phase(), GamePhase::ReadyToCast);
        assert_eq!(state.hook().depth, 50.0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, GameConfig::default());
        let mut state2 = GameState::new(99999, GameConfig::default());
        let id = first_of_kind(&state1, FishKind::Yum);

        for frame in 0..2000 {
            let now = frame as f64 / 60.0;
            let input = if frame % 3 == 0 {
                near(id, now)
            } else {
                TickInput::at(now)
            };
            for state in [&mut state1, &mut state2] {
                if frame % 90 == 0 {
                    state.apply(Intent::Primary);
                }
                tick(state, &input);
            }
        }

        assert_eq!(state1.snapshot(), state2.snapshot());
        assert_eq!(state1.drain_events(), state2.drain_events());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Intent(Intent),
        Tick { dt: f64, near_all: bool },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Intent(Intent::Cast)),
            Just(Op::Intent(Intent::Release)),
            Just(Op::Intent(Intent::Reel)),
            Just(Op::Intent(Intent::Bash)),
            Just(Op::Intent(Intent::Swipe)),
            Just(Op::Intent(Intent::Primary)),
            Just(Op::Intent(Intent::AcknowledgeGameOver)),
            (-3.0f32..3.0).prop_map(|rotation_speed| Op::Intent(Intent::CrownTurn {
                rotation_speed
            })),
            (0.0f64..4.0, any::<bool>()).prop_map(|(dt, near_all)| Op::Tick { dt, near_all }),
        ]
    }

    proptest! {
        #[test]
        fn prop_counters_stay_in_bounds(
            seed in any::<u64>(),
            lives in 1u32..4,
            ops in prop::collection::vec(op_strategy(), 1..300),
        ) {
            let config = GameConfig { initial_lives: lives, ..GameConfig::default() };
            let mut state = GameState::new(seed, config);
            let mut now = 0.0;
            let mut last_score = 0;

            for op in ops {
                let before = state.phase();
                match op {
                    Op::Intent(Intent::Cast) => {
                        state.apply(Intent::Cast);
                        if before != GamePhase::ReadyToCast {
                            prop_assert_eq!(state.phase(), before);
                        }
                    }
                    Op::Intent(intent) => state.apply(intent),
                    Op::Tick { dt, near_all } => {
                        now += dt;
                        let mut input = TickInput::at(now);
                        if near_all {
                            for fish in state.fish().iter() {
                                input.proximity.set(fish.id, 0.0);
                            }
                        }
                        tick(&mut state, &input);
                    }
                }

                prop_assert!(state.lives() <= lives);
                if state.phase() == GamePhase::GameOver {
                    prop_assert_eq!(state.lives(), 0);
                } else {
                    prop_assert!(state.lives() > 0);
                }
                // Only a new game may lower the score
                if before != GamePhase::GameOver {
                    prop_assert!(state.score() >= last_score);
                }
                if state.caught().is_some() {
                    prop_assert!(matches!(
                        state.phase(),
                        GamePhase::ReelingIn | GamePhase::CollectingFish
                    ));
                }
                let depth = state.hook().depth;
                prop_assert!(depth >= state.config().reel_target_depth - 1e-3);
                prop_assert!(depth <= state.config().cast_depth + 1e-3);
                last_score = state.score();
            }
        }
    }
}
