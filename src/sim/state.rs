//! Formation state and core simulation types
//!
//! Everything the mover needs between two ticks lives in `MoverState`, which the
//! host owns and threads through every call.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Current movement phase of the formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    /// Marching towards the right wall
    #[default]
    Right,
    /// Marching towards the left wall
    Left,
    /// One down-step, then a left run
    DownThenLeft,
    /// One down-step, then a right run
    DownThenRight,
    /// Paused; only the host can leave this state
    Idle,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Right => "Right",
            Direction::Left => "Left",
            Direction::DownThenLeft => "DownThenLeft",
            Direction::DownThenRight => "DownThenRight",
            Direction::Idle => "Idle",
        }
    }

    /// Mirror image under reflection of the playfield about its vertical axis
    pub fn mirrored(&self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::DownThenLeft => Direction::DownThenRight,
            Direction::DownThenRight => Direction::DownThenLeft,
            Direction::Idle => Direction::Idle,
        }
    }
}

/// Opaque handle of one formation member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Horizontal extent and row of one formation member (screen space, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorBounds {
    pub id: ActorId,
    pub min_x: f32,
    pub max_x: f32,
    pub y: f32,
}

impl ActorBounds {
    pub fn new(id: ActorId, min_x: f32, max_x: f32, y: f32) -> Self {
        Self { id, min_x, max_x, y }
    }

    pub fn is_well_formed(&self) -> bool {
        self.min_x <= self.max_x
    }
}

/// Playfield extent. Walls sit at x = 0 and x = width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayfieldBounds {
    width: f32,
    height: f32,
}

impl PlayfieldBounds {
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ConfigError::InvalidPlayfield { width, height });
        }
        Ok(Self { width, height })
    }

    /// Right wall x-coordinate
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

/// Movement state threaded through `FormationMover::tick`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoverState {
    pub direction: Direction,
    /// Time (seconds) of the last tick that passed the cadence gate
    pub last_move_time: f64,
    /// Seconds between moves, fixed for the wave
    pub move_interval: f64,
}

impl MoverState {
    /// Seconds elapsed since the last move
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.last_move_time
    }

    /// Whether a tick at `now` passes the cadence gate
    pub fn is_due(&self, now: f64) -> bool {
        self.elapsed(now) >= self.move_interval
    }
}
