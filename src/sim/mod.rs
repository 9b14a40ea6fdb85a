//! Deterministic simulation module
//!
//! All formation logic lives here. This module must be pure and deterministic:
//! - Time comes in from the host, never read from a clock
//! - Stable iteration order (formation order)
//! - No rendering or platform dependencies

pub mod error;
pub mod formation;
pub mod state;
pub mod tick;

pub use error::{ConfigError, TickError};
pub use formation::{Formation, Invader, InvaderKind};
pub use state::{ActorBounds, ActorId, Direction, MoverState, PlayfieldBounds};
pub use tick::{FormationMover, TickOutcome};
