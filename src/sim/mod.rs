//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The autopilot is the one exception to purity: it measures its own
//! decision time against a wall-clock budget.

pub mod autopilot;
pub mod collision;
pub mod geometry;
pub mod pipes;
pub mod state;
pub mod tick;

pub use autopilot::{Autopilot, DecisionStats};
pub use collision::{hits_floor, hits_pipe, is_landed};
pub use geometry::Rect;
pub use pipes::{PipePair, Pipes};
pub use state::{
    Floor, GamePhase, GameState, Overlay, OverlayKind, Player, PlayerMode, Score,
};
pub use tick::{PhaseChange, TickInput, TickStatus, tick};
