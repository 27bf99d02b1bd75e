//! Autonomous control: reads the bird's sensors and asks the fuzzy controller
//! whether to flap
//!
//! Runs inline once per Play tick, before physics. A decision that blows its
//! wall-clock budget, or an inference with no crisp output, is discarded in
//! favour of not flapping.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::state::GameState;
use crate::consts::NO_PIPE_DISTANCE;
use crate::error::ConfigError;
use crate::fuzzy::{BirdController, FLAP_THRESHOLD, Sensors};
use crate::settings::AutopilotSettings;

/// Decision counters, for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecisionStats {
    pub queries: u64,
    pub flaps: u64,
    /// Inferences with no crisp output (no rule fired, NaN input)
    pub degenerate: u64,
    /// Decisions discarded for exceeding the budget
    pub over_budget: u64,
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    controller: BirdController,
    budget: Duration,
    stats: DecisionStats,
}

impl Autopilot {
    pub fn new(settings: &AutopilotSettings) -> Result<Self, ConfigError> {
        let budget = settings.budget()?;
        let controller = BirdController::configure()?;
        Ok(Self::with_controller(controller, budget))
    }

    pub fn with_controller(controller: BirdController, budget: Duration) -> Self {
        Self {
            controller,
            budget,
            stats: DecisionStats::default(),
        }
    }

    pub fn stats(&self) -> DecisionStats {
        self.stats
    }

    pub fn controller(&self) -> &BirdController {
        &self.controller
    }

    /// Current measurements: bird height and velocity, distance to the next
    /// pipe ahead, and gap centre minus bird height
    pub fn sensors(state: &GameState) -> Sensors {
        let player = &state.player;
        let (distance, gap_center) = match state.pipes.next_ahead(player.x()) {
            Some(pipe) => ((pipe.x - player.x()) as f64, pipe.gap_center() as f64),
            None => (NO_PIPE_DISTANCE, state.settings.window.height as f64 / 2.0),
        };
        let bird_y = player.y() as f64;
        Sensors {
            bird_y,
            bird_vel_y: player.vel_y as f64,
            distance_to_pipe: distance,
            height_difference: gap_center - bird_y,
        }
    }

    /// Decide whether to flap this tick
    pub fn decide(&mut self, state: &GameState) -> bool {
        let sensors = Self::sensors(state);
        self.stats.queries += 1;

        let started = Instant::now();
        let inference = self.controller.infer(&sensors);
        let elapsed = started.elapsed();

        if elapsed > self.budget {
            self.stats.over_budget += 1;
            log::warn!(
                "Decision took {:?} (budget {:?}), not flapping",
                elapsed,
                self.budget
            );
            return false;
        }

        if let Err(reason) = &inference.outcome {
            self.stats.degenerate += 1;
            log::debug!("No crisp decision ({:?}) for {:?}, not flapping", reason, sensors);
            return false;
        }

        let flap = inference.exceeds(FLAP_THRESHOLD);
        if flap {
            self.stats.flaps += 1;
        }
        log::debug!(
            "bird_y: {:.1}, bird_vel_y: {:.1}, distance_to_pipe: {:.1}, height_difference: {:.1}, should_flap: {}",
            sensors.bird_y,
            sensors.bird_vel_y,
            sensors.distance_to_pipe,
            sensors.height_difference,
            flap
        );
        flap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::pipes::PipePair;

    fn state() -> GameState {
        GameState::new(Settings::default()).unwrap()
    }

    fn autopilot() -> Autopilot {
        Autopilot::new(&AutopilotSettings::default()).unwrap()
    }

    #[test]
    fn test_sensors_track_next_pipe() {
        let s = state();
        let sensors = Autopilot::sensors(&s);
        let first = s.pipes.iter().next().unwrap();
        assert_eq!(sensors.bird_y, 244.0);
        assert_eq!(sensors.distance_to_pipe, (first.x - 57.0) as f64);
        assert_eq!(
            sensors.height_difference,
            first.gap_center() as f64 - 244.0
        );
    }

    #[test]
    fn test_sensors_without_pipes_fall_back() {
        let mut s = state();
        s.pipes.clear_for_test();
        let sensors = Autopilot::sensors(&s);
        assert_eq!(sensors.distance_to_pipe, NO_PIPE_DISTANCE);
        assert_eq!(sensors.height_difference, 256.0 - 244.0);
    }

    #[test]
    fn test_sensors_skip_passed_pipes() {
        let mut s = state();
        s.pipes.clear_for_test();
        let passed = PipePair {
            x: 0.0,
            w: 52.0,
            gap_top: 100.0,
            gap: 120.0,
            pipe_h: 320.0,
            scored: true,
        };
        let ahead = PipePair {
            x: 200.0,
            gap_top: 180.0,
            scored: false,
            ..passed.clone()
        };
        s.pipes.push_for_test(passed);
        s.pipes.push_for_test(ahead);
        let sensors = Autopilot::sensors(&s);
        assert_eq!(sensors.distance_to_pipe, 143.0);
        assert_eq!(sensors.height_difference, 240.0 - 244.0);
    }

    #[test]
    fn test_decide_counts_queries_and_flaps() {
        let mut s = state();
        s.pipes.clear_for_test();
        // Gap far above the bird
        s.pipes.push_for_test(PipePair {
            x: 150.0,
            w: 52.0,
            gap_top: 20.0,
            gap: 120.0,
            pipe_h: 320.0,
            scored: false,
        });
        s.player.pos.y = 350.0;
        s.player.vel_y = 3.0;

        let mut pilot = autopilot();
        assert!(pilot.decide(&s));
        let stats = pilot.stats();
        assert_eq!(stats.queries, 1);
        assert_eq!(stats.flaps, 1);
        assert_eq!(stats.degenerate, 0);
    }

    #[test]
    fn test_degenerate_decision_is_counted() {
        let mut s = state();
        s.pipes.clear_for_test();
        // Level with the gap, mid distance, high and slowly sinking: no rule fires
        s.pipes.push_for_test(PipePair {
            x: 257.0,
            w: 52.0,
            gap_top: -10.0,
            gap: 120.0,
            pipe_h: 320.0,
            scored: false,
        });
        s.player.pos.y = 50.0;
        s.player.vel_y = 3.0;

        let mut pilot = autopilot();
        assert!(!pilot.decide(&s));
        assert_eq!(pilot.stats().degenerate, 1);
    }

    #[test]
    fn test_unusable_budget_is_a_config_error() {
        for budget_ms in [1e300, f64::NAN, -5.0] {
            let settings = AutopilotSettings {
                budget_ms,
                ..AutopilotSettings::default()
            };
            let err = Autopilot::new(&settings).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::NonPositive {
                    field: "autopilot.budget_ms",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_over_budget_falls_back() {
        let s = state();
        let controller = BirdController::configure().unwrap();
        let mut pilot = Autopilot::with_controller(controller, Duration::ZERO);
        assert!(!pilot.decide(&s));
        assert_eq!(pilot.stats().over_budget, 1);
    }
}
