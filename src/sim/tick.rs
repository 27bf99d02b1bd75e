//! Fixed timestep simulation tick
//!
//! Phase controller. Each call advances the game by exactly one tick:
//! quit first, then the current phase's event handling and entity updates.

use serde::Serialize;

use super::autopilot::Autopilot;
use super::state::{GamePhase, GameState, PlayerMode};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Tap / click / space
    pub activate: bool,
    /// Window closed or escape pressed
    pub quit: bool,
}

impl TickInput {
    pub fn activate() -> Self {
        Self {
            activate: true,
            ..Default::default()
        }
    }

    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Default::default()
        }
    }
}

/// A phase transition taken during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseChange {
    pub from: GamePhase,
    pub to: GamePhase,
}

/// What the caller should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Continue,
    /// Keep running; the phase changed this tick
    Transition(PhaseChange),
    /// Stop the loop, nothing was updated
    Quit,
}

/// Advance the game state by one fixed timestep
///
/// With an autopilot, Play-phase flaps come from the fuzzy controller and
/// activations during Play are ignored. Splash and GameOver still wait for an
/// activation.
pub fn tick(state: &mut GameState, input: &TickInput, autopilot: Option<&mut Autopilot>) -> TickStatus {
    if input.quit {
        log::info!("Quit requested during {:?}", state.phase);
        return TickStatus::Quit;
    }

    let from = state.phase;
    match state.phase {
        GamePhase::Splash => tick_splash(state, input),
        GamePhase::Play => tick_play(state, input, autopilot),
        GamePhase::GameOver => tick_game_over(state, input),
    }
    state.time_ticks += 1;

    if state.phase == from {
        TickStatus::Continue
    } else {
        TickStatus::Transition(PhaseChange {
            from,
            to: state.phase,
        })
    }
}

fn tick_splash(state: &mut GameState, input: &TickInput) {
    if input.activate {
        state.score.reset();
        state.player.set_mode(PlayerMode::Normal);
        state.phase = GamePhase::Play;
        log::info!("Run {} started", state.cycle + 1);
        return;
    }

    state.floor.tick();
    state.player.tick();
    state.welcome.tick();
}

fn tick_play(state: &mut GameState, input: &TickInput, autopilot: Option<&mut Autopilot>) {
    // Decide against the pre-physics state, then commit
    let wants_flap = match autopilot {
        Some(pilot) => pilot.decide(state),
        None => input.activate,
    };
    if wants_flap {
        state.player.flap();
    }

    state.floor.tick();
    state.pipes.tick();
    state.player.tick();

    for pipe in state.pipes.iter_mut() {
        if state.player.crossed(pipe) {
            state.score.add();
            log::debug!("Scored: {}", state.score.value);
        }
    }

    if state.player.collided(&state.pipes, &state.floor) {
        state.player.set_mode(PlayerMode::Crashed);
        state.pipes.stop();
        state.floor.stop();
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over: score {} (best {})",
            state.score.value,
            state.score.best
        );
    }
}

fn tick_game_over(state: &mut GameState, input: &TickInput) {
    if input.activate && state.player.landed(&state.floor) {
        state.begin_cycle();
        log::info!("Back to splash (cycle {})", state.cycle);
        return;
    }

    state.floor.tick();
    state.pipes.tick();
    state.player.tick();
    state.game_over.tick();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::pipes::PipePair;

    fn new_state() -> GameState {
        GameState::new(Settings::default()).unwrap()
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    /// Play until the bird hits something, with no flaps
    fn crash(state: &mut GameState) {
        for _ in 0..500 {
            if state.phase == GamePhase::GameOver {
                return;
            }
            tick(state, &idle(), None);
        }
        panic!("never crashed");
    }

    #[test]
    fn test_tick_splash_to_play() {
        let mut state = new_state();
        assert_eq!(state.phase, GamePhase::Splash);

        // Tick without activation - should stay in Splash
        assert_eq!(tick(&mut state, &idle(), None), TickStatus::Continue);
        assert_eq!(state.phase, GamePhase::Splash);

        let status = tick(&mut state, &TickInput::activate(), None);
        assert_eq!(
            status,
            TickStatus::Transition(PhaseChange {
                from: GamePhase::Splash,
                to: GamePhase::Play,
            })
        );
        assert_eq!(state.player.mode, PlayerMode::Normal);
        assert_eq!(state.player.vel_y, -state.settings.physics.flap_impulse);
    }

    #[test]
    fn test_quit_stops_before_updates() {
        let mut state = new_state();
        let y = state.player.y();
        let floor_x = state.floor.x;
        assert_eq!(tick(&mut state, &TickInput::quit(), None), TickStatus::Quit);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.y(), y);
        assert_eq!(state.floor.x, floor_x);

        // Quit wins over activate
        let both = TickInput {
            activate: true,
            quit: true,
        };
        assert_eq!(tick(&mut state, &both, None), TickStatus::Quit);
        assert_eq!(state.phase, GamePhase::Splash);
    }

    #[test]
    fn test_splash_keeps_pipes_still() {
        let mut state = new_state();
        let xs: Vec<f32> = state.pipes.iter().map(|p| p.x).collect();
        for _ in 0..30 {
            tick(&mut state, &idle(), None);
        }
        let after: Vec<f32> = state.pipes.iter().map(|p| p.x).collect();
        assert_eq!(xs, after);
        assert_eq!(state.welcome.ticks, 30);
    }

    #[test]
    fn test_unflapped_run_crashes_into_floor() {
        let mut state = new_state();
        tick(&mut state, &TickInput::activate(), None);
        crash(&mut state);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.mode, PlayerMode::Crashed);
        assert!(state.player.crashed);
        assert!(state.pipes.is_stopped());
        assert!(state.floor.is_stopped());
        assert_eq!(state.score.value, 0);
    }

    #[test]
    fn test_game_over_ignores_airborne_activate() {
        let mut state = new_state();
        tick(&mut state, &TickInput::activate(), None);
        // Put the bird in the upper pipe so it crashes mid-air
        state.pipes.clear_for_test();
        state.pipes.push_for_test(PipePair {
            x: state.player.x(),
            w: 52.0,
            gap_top: 300.0,
            gap: 120.0,
            pipe_h: 320.0,
            scored: false,
        });
        tick(&mut state, &idle(), None);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.player.landed(&state.floor));

        tick(&mut state, &TickInput::activate(), None);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Falls to the floor, then a tap restarts
        for _ in 0..100 {
            tick(&mut state, &idle(), None);
        }
        assert!(state.player.landed(&state.floor));
        tick(&mut state, &TickInput::activate(), None);
        assert_eq!(state.phase, GamePhase::Splash);
        assert_eq!(state.cycle, 1);
        assert_eq!(state.player.mode, PlayerMode::ShowMeHow);
    }

    #[test]
    fn test_crossing_scores_once() {
        let mut state = new_state();
        tick(&mut state, &TickInput::activate(), None);
        state.pipes.clear_for_test();
        // Gap around the bird, trailing edge just behind its x after one scroll
        let speed = state.settings.pipes.speed;
        state.pipes.push_for_test(PipePair {
            x: state.player.x() - 52.0 + speed - 1.0,
            w: 52.0,
            gap_top: state.player.y() - 60.0,
            gap: 200.0,
            pipe_h: 320.0,
            scored: false,
        });
        tick(&mut state, &idle(), None);
        assert_eq!(state.phase, GamePhase::Play);
        assert_eq!(state.score.value, 1);
        tick(&mut state, &idle(), None);
        assert_eq!(state.score.value, 1);
        assert_eq!(state.score.best, 1);
    }

    #[test]
    fn test_manual_flap_only_in_play() {
        let mut state = new_state();
        tick(&mut state, &TickInput::activate(), None);
        for _ in 0..5 {
            tick(&mut state, &idle(), None);
        }
        let y = state.player.y();
        tick(&mut state, &TickInput::activate(), None);
        assert_eq!(state.player.y(), y - state.settings.physics.flap_impulse);
    }

    #[test]
    fn test_autopilot_drives_play() {
        let mut state = new_state();
        let mut pilot = Autopilot::new(&state.settings.autopilot).unwrap();
        tick(&mut state, &TickInput::activate(), Some(&mut pilot));
        for _ in 0..20 {
            tick(&mut state, &idle(), Some(&mut pilot));
        }
        assert!(pilot.stats().queries > 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = new_state();
        let mut state2 = new_state();

        let inputs = [
            idle(),
            TickInput::activate(),
            idle(),
            idle(),
            TickInput::activate(),
            idle(),
        ];

        for _ in 0..20 {
            for input in &inputs {
                tick(&mut state1, input, None);
                tick(&mut state2, input, None);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.score, state2.score);
        let g1: Vec<f32> = state1.pipes.iter().map(|p| p.gap_top).collect();
        let g2: Vec<f32> = state2.pipes.iter().map(|p| p.gap_top).collect();
        assert_eq!(g1, g2);
    }
}
