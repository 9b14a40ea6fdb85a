//! Formation march tick
//!
//! Decides, frame by frame, whether the invader grid moves, by how much, and
//! which way it heads next. Pure: the host passes in a snapshot of the live
//! actors plus the previous `MoverState` and gets a fresh state back.

use glam::Vec2;

use super::error::{ConfigError, TickError};
use super::state::{ActorBounds, Direction, MoverState, PlayfieldBounds};
use crate::settings::FormationSettings;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// True when a non-zero displacement was produced
    pub moved: bool,
    /// Displacement to add to every live actor this tick
    pub delta: Vec2,
    /// State to hand back on the next tick
    pub next: MoverState,
}

impl TickOutcome {
    fn unchanged(state: &MoverState) -> Self {
        Self {
            moved: false,
            delta: Vec2::ZERO,
            next: *state,
        }
    }
}

/// Formation movement state machine
#[derive(Debug, Clone, PartialEq)]
pub struct FormationMover {
    move_interval: f64,
    step: Vec2,
    wall_epsilon: f32,
}

impl FormationMover {
    /// Build a mover from validated settings. Fails fast on bad configuration.
    pub fn new(settings: &FormationSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        log::info!(
            "Formation mover: interval={}s step=({}, {}) epsilon={}",
            settings.move_interval,
            settings.step_x,
            settings.step_y,
            settings.wall_epsilon
        );
        Ok(Self {
            move_interval: settings.move_interval,
            step: Vec2::new(settings.step_x, settings.step_y),
            wall_epsilon: settings.wall_epsilon,
        })
    }

    /// State at the start of a wave: heading right, never moved
    pub fn initial_state(&self) -> MoverState {
        MoverState {
            direction: Direction::Right,
            last_move_time: 0.0,
            move_interval: self.move_interval,
        }
    }

    pub fn move_interval(&self) -> f64 {
        self.move_interval
    }

    pub fn step(&self) -> Vec2 {
        self.step
    }

    pub fn wall_epsilon(&self) -> f32 {
        self.wall_epsilon
    }

    /// Displacement applied to every actor while heading `direction` (y up)
    pub fn displacement(&self, direction: Direction) -> Vec2 {
        match direction {
            Direction::Right => Vec2::new(self.step.x, 0.0),
            Direction::Left => Vec2::new(-self.step.x, 0.0),
            Direction::DownThenLeft | Direction::DownThenRight => Vec2::new(0.0, -self.step.y),
            Direction::Idle => Vec2::ZERO,
        }
    }

    /// Advance the formation by one frame.
    ///
    /// Below the cadence the state comes back untouched. Once the gate passes,
    /// `last_move_time` becomes `now` (also while `Idle`) and the wall test runs
    /// against each actor's bounds shifted by this tick's displacement, so the
    /// grid may overshoot a wall by up to one step before it drops.
    pub fn tick(
        &self,
        now: f64,
        actors: &[ActorBounds],
        playfield: &PlayfieldBounds,
        state: &MoverState,
    ) -> Result<TickOutcome, TickError> {
        if !now.is_finite() {
            return Err(TickError::NonFiniteTime(now));
        }
        if now < state.last_move_time {
            return Err(TickError::TemporalOrdering {
                now,
                last_move: state.last_move_time,
            });
        }
        // Also rejects a NaN interval smuggled in through a deserialized state
        if state.move_interval != self.move_interval {
            return Err(TickError::IntervalMismatch {
                state: state.move_interval,
                configured: self.move_interval,
            });
        }
        if !state.is_due(now) {
            return Ok(TickOutcome::unchanged(state));
        }
        if let Some(bad) = actors.iter().find(|a| !a.is_well_formed()) {
            return Err(TickError::MalformedBounds {
                id: bad.id,
                min_x: bad.min_x,
                max_x: bad.max_x,
            });
        }

        let delta = self.displacement(state.direction);
        log::trace!(
            "t={:.3} {} delta=({}, {}) actors={}",
            now,
            state.direction.as_str(),
            delta.x,
            delta.y,
            actors.len()
        );

        let mut next = *state;
        next.last_move_time = now;

        let proposed = self.propose_direction(state.direction, actors, delta, playfield.width());
        if proposed != state.direction {
            log::debug!(
                "t={:.3} formation turns {} -> {}",
                now,
                state.direction.as_str(),
                proposed.as_str()
            );
            next.direction = proposed;
        }

        Ok(TickOutcome {
            moved: delta != Vec2::ZERO,
            delta,
            next,
        })
    }

    /// Boundary detection. First actor touching the relevant wall decides.
    fn propose_direction(
        &self,
        current: Direction,
        actors: &[ActorBounds],
        delta: Vec2,
        wall: f32,
    ) -> Direction {
        // Nothing left to scan, nothing to turn
        if actors.is_empty() {
            return current;
        }
        match current {
            Direction::Right => {
                let limit = wall - self.wall_epsilon;
                if actors.iter().any(|a| a.max_x + delta.x >= limit) {
                    Direction::DownThenLeft
                } else {
                    Direction::Right
                }
            }
            Direction::Left => {
                if actors.iter().any(|a| a.min_x + delta.x <= self.wall_epsilon) {
                    Direction::DownThenRight
                } else {
                    Direction::Left
                }
            }
            // A down-step is always exactly one move long
            Direction::DownThenLeft => Direction::Left,
            Direction::DownThenRight => Direction::Right,
            Direction::Idle => Direction::Idle,
        }
    }
}
