//! Fuzzy Bird - a side-scrolling flappy simulation with a fuzzy-logic autopilot
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, obstacles, collisions, phase machine)
//! - `fuzzy`: Mamdani inference engine and the bird controller rule base
//! - `runner`: Fixed-tick scheduler and the input/render/pacer seams
//! - `settings`: Data-driven configuration loaded from JSON

pub mod error;
pub mod fuzzy;
pub mod runner;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, RunError};
pub use settings::Settings;

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 30;
    /// Seed for pipe placement when none is configured
    pub const DEFAULT_SEED: u64 = 0x5EED_B12D;

    /// Window dimensions
    pub const WINDOW_WIDTH: f32 = 288.0;
    pub const WINDOW_HEIGHT: f32 = 512.0;
    /// Fraction of the window above the floor
    pub const VIEWPORT_RATIO: f32 = 0.79;

    /// Player box (bird sprite size)
    pub const PLAYER_WIDTH: f32 = 34.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;
    /// Player x as a fraction of window width
    pub const PLAYER_X_RATIO: f32 = 0.2;

    /// Normal-mode physics (pixels per tick)
    pub const GRAVITY: f32 = 1.0;
    pub const FLAP_IMPULSE: f32 = 9.0;
    pub const MAX_FALL_SPEED: f32 = 10.0;

    /// Crash-mode physics (tumbling to the floor)
    pub const CRASH_GRAVITY: f32 = 2.0;
    pub const CRASH_MAX_FALL_SPEED: f32 = 15.0;
    pub const CRASH_INITIAL_VEL: f32 = 7.0;

    /// Idle bobbing on the splash screen
    pub const IDLE_AMPLITUDE: f32 = 8.0;
    /// Phase advance per tick (radians)
    pub const IDLE_SPEED: f32 = 0.2;

    /// Rotation (degrees) - cosmetic only
    pub const FLAP_ROTATION: f32 = 80.0;
    pub const ROTATION_MIN: f32 = -90.0;
    pub const ROTATION_MAX: f32 = 20.0;
    pub const NORMAL_ROTATION_SPEED: f32 = -3.0;
    pub const CRASH_ROTATION_SPEED: f32 = -8.0;

    /// Pipe geometry
    pub const PIPE_WIDTH: f32 = 52.0;
    pub const PIPE_HEIGHT: f32 = 320.0;
    pub const PIPE_GAP: f32 = 120.0;
    /// Leftward scroll per tick
    pub const PIPE_SPEED: f32 = 5.0;
    /// Free space past the trailing pair before the next one spawns
    pub const PIPE_SPACING: f32 = PIPE_WIDTH * 2.5;
    /// Spawn offset past the right window edge
    pub const PIPE_SPAWN_OFFSET: f32 = 10.0;

    /// Floor scroll per tick and the wrap span of its texture
    pub const FLOOR_SPEED: f32 = 4.0;
    pub const FLOOR_WRAP: f32 = 48.0;
    /// Grace margin for "landed on the floor" detection
    pub const LANDED_MARGIN: f32 = 1.0;

    /// Sensor fallback when no pipe is ahead
    pub const NO_PIPE_DISTANCE: f64 = 300.0;

    /// Decision budget per tick (milliseconds)
    pub const DECISION_BUDGET_MS: f64 = 5.0;
}
