//! Game settings
//!
//! All tunable constants the simulation consumes. Every field falls back to
//! its default in [`crate::consts`], so a JSON file only needs the overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Window/playfield dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
    /// Fraction of the height above the floor
    pub viewport_ratio: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            viewport_ratio: VIEWPORT_RATIO,
        }
    }
}

impl WindowSettings {
    /// Height of the playfield above the floor
    pub fn viewport_height(&self) -> f32 {
        self.height * self.viewport_ratio
    }
}

/// Player box and placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub width: f32,
    pub height: f32,
    /// Horizontal position as a fraction of window width
    pub x_ratio: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            x_ratio: PLAYER_X_RATIO,
        }
    }
}

/// Vertical physics, in pixels per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: f32,
    /// Magnitude of the upward flap velocity
    pub flap_impulse: f32,
    pub max_fall_speed: f32,
    pub crash_gravity: f32,
    pub crash_max_fall_speed: f32,
    pub crash_initial_vel: f32,
    pub idle_amplitude: f32,
    pub idle_speed: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            max_fall_speed: MAX_FALL_SPEED,
            crash_gravity: CRASH_GRAVITY,
            crash_max_fall_speed: CRASH_MAX_FALL_SPEED,
            crash_initial_vel: CRASH_INITIAL_VEL,
            idle_amplitude: IDLE_AMPLITUDE,
            idle_speed: IDLE_SPEED,
        }
    }
}

/// Obstacle geometry and motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeSettings {
    pub width: f32,
    pub height: f32,
    pub gap: f32,
    pub speed: f32,
    pub spacing: f32,
    pub spawn_offset: f32,
}

impl Default for PipeSettings {
    fn default() -> Self {
        Self {
            width: PIPE_WIDTH,
            height: PIPE_HEIGHT,
            gap: PIPE_GAP,
            speed: PIPE_SPEED,
            spacing: PIPE_SPACING,
            spawn_offset: PIPE_SPAWN_OFFSET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorSettings {
    pub speed: f32,
    pub wrap: f32,
}

impl Default for FloorSettings {
    fn default() -> Self {
        Self {
            speed: FLOOR_SPEED,
            wrap: FLOOR_WRAP,
        }
    }
}

/// Autonomous control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotSettings {
    pub enabled: bool,
    /// Wall-clock budget for one decision; slower decisions fall back to no flap
    pub budget_ms: f64,
}

impl AutopilotSettings {
    /// Decision budget as a [`Duration`]; rejects values that are not
    /// positive or do not fit one
    pub fn budget(&self) -> Result<Duration, ConfigError> {
        let invalid = ConfigError::NonPositive {
            field: "autopilot.budget_ms",
            value: self.budget_ms,
        };
        if !(self.budget_ms.is_finite() && self.budget_ms > 0.0) {
            return Err(invalid);
        }
        Duration::try_from_secs_f64(self.budget_ms / 1000.0).map_err(|_| invalid)
    }
}

impl Default for AutopilotSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            budget_ms: DECISION_BUDGET_MS,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for pipe gap placement
    pub seed: u64,
    pub tick_rate: u32,
    pub window: WindowSettings,
    pub player: PlayerSettings,
    pub physics: PhysicsSettings,
    pub pipes: PipeSettings,
    pub floor: FloorSettings,
    pub autopilot: AutopilotSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            tick_rate: TICK_RATE,
            window: WindowSettings::default(),
            player: PlayerSettings::default(),
            physics: PhysicsSettings::default(),
            pipes: PipeSettings::default(),
            floor: FloorSettings::default(),
            autopilot: AutopilotSettings::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::NonPositive {
                field: "tick_rate",
                value: 0.0,
            });
        }

        let positive: [(&'static str, f32); 14] = [
            ("window.width", self.window.width),
            ("window.height", self.window.height),
            ("window.viewport_ratio", self.window.viewport_ratio),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("physics.gravity", self.physics.gravity),
            ("physics.flap_impulse", self.physics.flap_impulse),
            ("physics.max_fall_speed", self.physics.max_fall_speed),
            ("physics.crash_gravity", self.physics.crash_gravity),
            ("physics.crash_max_fall_speed", self.physics.crash_max_fall_speed),
            ("pipes.width", self.pipes.width),
            ("pipes.height", self.pipes.height),
            ("pipes.gap", self.pipes.gap),
            ("pipes.speed", self.pipes.speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive {
                    field,
                    value: value as f64,
                });
            }
        }

        let finite: [(&'static str, f32); 7] = [
            ("player.x_ratio", self.player.x_ratio),
            ("physics.crash_initial_vel", self.physics.crash_initial_vel),
            ("physics.idle_amplitude", self.physics.idle_amplitude),
            ("physics.idle_speed", self.physics.idle_speed),
            ("pipes.spacing", self.pipes.spacing),
            ("pipes.spawn_offset", self.pipes.spawn_offset),
            ("floor.speed", self.floor.speed),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    field,
                    value: value as f64,
                });
            }
        }

        if !(self.floor.wrap.is_finite() && self.floor.wrap > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "floor.wrap",
                value: self.floor.wrap as f64,
            });
        }
        self.autopilot.budget()?;

        // Gaps are placed within the middle 60% of the viewport
        let band = self.window.viewport_height() * 0.6;
        if band - self.pipes.gap < 1.0 {
            return Err(ConfigError::GapTooLarge {
                gap: self.pipes.gap,
                band,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.tick_rate, 30);
        assert!((settings.window.viewport_height() - 404.48).abs() < 0.01);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "seed": 7, "pipes": { "gap": 100.0 } }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.pipes.gap, 100.0);
        assert_eq!(settings.pipes.width, PIPE_WIDTH);
        assert_eq!(settings.physics, PhysicsSettings::default());
    }

    #[test]
    fn test_rejects_oversized_gap() {
        let err = Settings::from_json(r#"{ "pipes": { "gap": 400.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::GapTooLarge { .. }));
    }

    #[test]
    fn test_rejects_non_positive_gravity() {
        let mut settings = Settings::default();
        settings.physics.gravity = 0.0;
        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive {
                field: "physics.gravity",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let err = Settings::from_json(r#"{ "tick_rate": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "tick_rate", .. }));
    }

    #[test]
    fn test_rejects_budget_too_large_for_duration() {
        let err = Settings::from_json(r#"{ "autopilot": { "budget_ms": 1e300 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive {
                field: "autopilot.budget_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_budget_converts_to_duration() {
        let autopilot = AutopilotSettings::default();
        assert_eq!(autopilot.budget().unwrap(), Duration::from_millis(5));
        for budget_ms in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e300] {
            let autopilot = AutopilotSettings {
                budget_ms,
                ..AutopilotSettings::default()
            };
            assert!(autopilot.budget().is_err(), "{budget_ms}");
        }
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
