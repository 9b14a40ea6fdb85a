//! Error types for formation construction and ticking

use thiserror::Error;

use super::state::ActorId;

/// Invalid formation configuration. Raised at construction, never per tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("move interval must be a positive, finite number of seconds (got {0})")]
    NonPositiveInterval(f64),
    #[error("{axis} step must be positive and finite (got {value})")]
    NonPositiveStep { axis: &'static str, value: f32 },
    #[error("wall epsilon must be non-negative and finite (got {0})")]
    NegativeEpsilon(f32),
    #[error("playfield must have positive, finite dimensions (got {width}x{height})")]
    InvalidPlayfield { width: f32, height: f32 },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
}

/// Caller contract violation detected during a tick.
#[derive(Debug, Error, PartialEq)]
pub enum TickError {
    #[error("clock went backwards: now={now} is earlier than last move at {last_move}")]
    TemporalOrdering { now: f64, last_move: f64 },
    #[error("tick time must be finite (got {0})")]
    NonFiniteTime(f64),
    #[error("state carries move interval {state} but the mover was built with {configured}")]
    IntervalMismatch { state: f64, configured: f64 },
    #[error("actor {id:?} has min_x {min_x} greater than max_x {max_x}")]
    MalformedBounds { id: ActorId, min_x: f32, max_x: f32 },
}
