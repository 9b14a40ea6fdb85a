//! Invader formation controller
//!
//! Host side of the march: owns the live invaders and the `MoverState`, asks
//! the `FormationMover` what to do each frame and applies the answer. Whether
//! an invader dies is decided elsewhere; this type only forgets it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::{ConfigError, TickError};
use super::state::{ActorBounds, ActorId, Direction, MoverState, PlayfieldBounds};
use super::tick::FormationMover;
use crate::consts::*;
use crate::settings::FormationSettings;

/// Invader variants, assigned per row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvaderKind {
    A,
    B,
    C,
}

impl InvaderKind {
    /// Kind used for a 1-based grid row
    pub fn for_row(row: u32) -> Self {
        match row % 3 {
            0 => InvaderKind::A,
            1 => InvaderKind::B,
            _ => InvaderKind::C,
        }
    }
}

/// A formation member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invader {
    pub id: ActorId,
    pub kind: InvaderKind,
    /// Sprite centre
    pub pos: Vec2,
    pub size: Vec2,
}

impl Invader {
    pub fn bounds(&self) -> ActorBounds {
        let half = self.size.x / 2.0;
        ActorBounds::new(self.id, self.pos.x - half, self.pos.x + half, self.pos.y)
    }

    /// Lowest screen-space edge (y grows upwards)
    pub fn bottom(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }
}

/// Live formation plus the movement state threaded through the mover
#[derive(Debug, Clone)]
pub struct Formation {
    mover: FormationMover,
    playfield: PlayfieldBounds,
    state: MoverState,
    /// Formation order, stable for the whole wave
    invaders: Vec<Invader>,
    /// Direction to restore when leaving a pause
    paused_from: Option<Direction>,
    moves: u64,
}

impl Formation {
    /// Start a wave with the given invaders
    pub fn new(settings: &FormationSettings, invaders: Vec<Invader>) -> Result<Self, ConfigError> {
        let mover = FormationMover::new(settings)?;
        let playfield = settings.playfield()?;
        let state = mover.initial_state();
        Ok(Self {
            mover,
            playfield,
            state,
            invaders,
            paused_from: None,
            moves: 0,
        })
    }

    /// Default grid origin for a playfield: a third of the way in, 180 up
    pub fn reference_origin(width: f32) -> Vec2 {
        Vec2::new(width / 3.0, GRID_BASE_Y)
    }

    /// Classic `INVADER_ROWS` x `INVADER_COLS` grid. Row `r` (1-based) sits at
    /// `origin.y + r * 2 * INVADER_HEIGHT`; columns start at `origin.x`.
    pub fn reference_grid(settings: &FormationSettings, origin: Vec2) -> Result<Self, ConfigError> {
        let size = Vec2::new(INVADER_WIDTH, INVADER_HEIGHT);
        let stride = INVADER_WIDTH + INVADER_SPACING_X;
        let mut invaders = Vec::with_capacity((INVADER_ROWS * INVADER_COLS) as usize);
        let mut next_id = 0;

        for row in 1..=INVADER_ROWS {
            let y = row as f32 * (INVADER_HEIGHT * 2.0) + origin.y;
            let kind = InvaderKind::for_row(row);
            for col in 0..INVADER_COLS {
                invaders.push(Invader {
                    id: ActorId(next_id),
                    kind,
                    pos: Vec2::new(origin.x + col as f32 * stride, y),
                    size,
                });
                next_id += 1;
            }
        }

        log::info!(
            "Formation of {} invaders at ({}, {}) on a {}x{} playfield",
            invaders.len(),
            origin.x,
            origin.y,
            settings.playfield_width,
            settings.playfield_height
        );
        Self::new(settings, invaders)
    }

    /// Ordered bounds of every live invader
    pub fn snapshot(&self) -> Vec<ActorBounds> {
        self.invaders.iter().map(Invader::bounds).collect()
    }

    /// Run one frame of the march. Returns true when the grid moved.
    pub fn advance(&mut self, now: f64) -> Result<bool, TickError> {
        let snapshot = self.snapshot();
        let outcome = self.mover.tick(now, &snapshot, &self.playfield, &self.state)?;

        if outcome.moved {
            for invader in &mut self.invaders {
                invader.pos += outcome.delta;
            }
            self.moves += 1;
        }
        self.state = outcome.next;
        Ok(outcome.moved)
    }

    /// Forget a destroyed invader. Returns false if it was already gone.
    pub fn destroy(&mut self, id: ActorId) -> bool {
        let before = self.invaders.len();
        self.invaders.retain(|i| i.id != id);
        self.invaders.len() != before
    }

    /// Freeze the march. The cadence keeps ticking while idle.
    pub fn pause(&mut self) {
        if self.state.direction != Direction::Idle {
            self.paused_from = Some(self.state.direction);
            self.state.direction = Direction::Idle;
            log::debug!("Formation paused");
        }
    }

    /// Leave a pause started with `pause`
    pub fn resume(&mut self) {
        if let Some(direction) = self.paused_from.take() {
            self.state.direction = direction;
            log::debug!("Formation resumed heading {}", direction.as_str());
        }
    }

    pub fn state(&self) -> &MoverState {
        &self.state
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    pub fn invaders(&self) -> &[Invader] {
        &self.invaders
    }

    pub fn playfield(&self) -> &PlayfieldBounds {
        &self.playfield
    }

    /// Number of ticks that displaced the grid
    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn is_cleared(&self) -> bool {
        self.invaders.is_empty()
    }

    /// Bottom edge of the lowest live invader
    pub fn lowest_edge(&self) -> Option<f32> {
        self.invaders.iter().map(Invader::bottom).reduce(f32::min)
    }

    /// Whether any invader has reached `floor`
    pub fn has_landed(&self, floor: f32) -> bool {
        self.lowest_edge().is_some_and(|edge| edge <= floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> FormationSettings {
        FormationSettings {
            playfield_width: 320.0,
            ..Default::default()
        }
    }

    fn extent(formation: &Formation) -> (f32, f32) {
        let snapshot = formation.snapshot();
        let min_x = snapshot.iter().map(|a| a.min_x).fold(f32::INFINITY, f32::min);
        let max_x = snapshot.iter().map(|a| a.max_x).fold(f32::NEG_INFINITY, f32::max);
        (min_x, max_x)
    }

    /// Ticks once per second and records (now, direction after the tick)
    fn run(formation: &mut Formation, seconds: u32) -> Vec<(u32, Direction)> {
        (0..=seconds)
            .map(|now| {
                formation.advance(now as f64).unwrap();
                (now, formation.direction())
            })
            .collect()
    }

    #[test]
    fn test_reference_grid_layout() {
        let formation = Formation::reference_grid(&settings(), Vec2::new(100.0, 180.0)).unwrap();
        let invaders = formation.invaders();
        assert_eq!(invaders.len(), 36);

        // Row 1, column 0
        assert_eq!(invaders[0].id, ActorId(0));
        assert_eq!(invaders[0].pos, Vec2::new(100.0, 212.0));
        assert_eq!(invaders[0].kind, InvaderKind::B);
        // Row 1, last column
        assert_eq!(invaders[5].pos, Vec2::new(280.0, 212.0));
        // Row 2 is kind C, rows 3 and 6 are kind A
        assert_eq!(invaders[6].kind, InvaderKind::C);
        assert_eq!(invaders[12].kind, InvaderKind::A);
        assert_eq!(invaders[35].kind, InvaderKind::A);
        assert_eq!(invaders[35].pos.y, 6.0 * 32.0 + 180.0);

        assert_eq!(extent(&formation), (88.0, 292.0));
        assert_eq!(formation.lowest_edge(), Some(204.0));
        assert_eq!(formation.direction(), Direction::Right);
        assert_eq!(formation.playfield().width(), 320.0);
        assert_eq!(formation.playfield().height(), PLAYFIELD_HEIGHT);
    }

    #[test]
    fn test_reference_origin() {
        let origin = Formation::reference_origin(300.0);
        assert_eq!(origin, Vec2::new(100.0, 180.0));
    }

    #[test]
    fn test_zigzag_turn_times() {
        let mut formation =
            Formation::reference_grid(&settings(), Vec2::new(100.0, 180.0)).unwrap();
        let trace = run(&mut formation, 31);

        let turns: Vec<(u32, Direction)> = trace
            .windows(2)
            .filter(|w| w[0].1 != w[1].1)
            .map(|w| w[1])
            .collect();
        assert_eq!(
            turns,
            vec![
                (3, Direction::DownThenLeft),
                (4, Direction::Left),
                (16, Direction::DownThenRight),
                (17, Direction::Right),
                (29, Direction::DownThenLeft),
                (30, Direction::Left),
            ]
        );

        // Three down-steps so far
        assert_eq!(formation.lowest_edge(), Some(204.0 - 30.0));
        // now=0 is gated, every later second moved
        assert_eq!(formation.moves(), 31);
    }

    #[test]
    fn test_six_by_six_reference_scenario() {
        let mut formation =
            Formation::reference_grid(&settings(), Formation::reference_origin(320.0)).unwrap();
        let mut down_steps = 0;
        let mut turns = Vec::new();

        for now in 0..=120u32 {
            let before = formation.direction();
            let edge_before = formation.lowest_edge().unwrap();
            formation.advance(now as f64).unwrap();
            let after = formation.direction();
            let (min_x, max_x) = extent(&formation);

            if now == 0 {
                assert_eq!(after, Direction::Right);
                continue;
            }
            match before {
                Direction::Right if max_x >= 319.0 => assert_eq!(after, Direction::DownThenLeft),
                Direction::Right => assert_eq!(after, Direction::Right),
                Direction::Left if min_x <= 1.0 => assert_eq!(after, Direction::DownThenRight),
                Direction::Left => assert_eq!(after, Direction::Left),
                Direction::DownThenLeft => {
                    assert_eq!(after, Direction::Left);
                    assert_eq!(formation.lowest_edge().unwrap(), edge_before - 10.0);
                    down_steps += 1;
                }
                Direction::DownThenRight => {
                    assert_eq!(after, Direction::Right);
                    assert_eq!(formation.lowest_edge().unwrap(), edge_before - 10.0);
                    down_steps += 1;
                }
                Direction::Idle => unreachable!("never entered without a pause"),
            }
            if after != before {
                turns.push(after);
            }
        }

        assert!(down_steps >= 4);
        let expected = [
            Direction::DownThenLeft,
            Direction::Left,
            Direction::DownThenRight,
            Direction::Right,
        ];
        for (i, turn) in turns.iter().enumerate() {
            assert_eq!(*turn, expected[i % expected.len()]);
        }
    }

    #[test]
    fn test_scenario_is_reproducible() {
        let make = || {
            Formation::reference_grid(&settings(), Formation::reference_origin(320.0)).unwrap()
        };
        let mut a = make();
        let mut b = make();
        assert_eq!(run(&mut a, 90), run(&mut b, 90));
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_destroyed_invaders_stop_counting_for_walls() {
        let mut formation =
            Formation::reference_grid(&settings(), Vec2::new(100.0, 180.0)).unwrap();
        // Drop the rightmost column: max_x becomes 256
        for row in 0..6 {
            assert!(formation.destroy(ActorId(row * 6 + 5)));
        }
        assert!(!formation.destroy(ActorId(5)));
        assert_eq!(formation.invaders().len(), 30);

        // 256 + 10k >= 319 first at k = 7
        let trace = run(&mut formation, 7);
        assert_eq!(trace[6].1, Direction::Right);
        assert_eq!(trace[7].1, Direction::DownThenLeft);
    }

    #[test]
    fn test_cleared_formation_keeps_direction() {
        // (last second marched before the wipe-out, pause first, heading at wipe-out)
        let cases = [
            (0, false, Direction::Right),
            (3, false, Direction::DownThenLeft),
            (4, false, Direction::Left),
            (16, false, Direction::DownThenRight),
            (2, true, Direction::Idle),
        ];
        for (until, paused, heading) in cases {
            let mut formation =
                Formation::reference_grid(&settings(), Vec2::new(100.0, 180.0)).unwrap();
            run(&mut formation, until);
            if paused {
                formation.pause();
            }
            assert_eq!(formation.direction(), heading);

            for id in 0..36 {
                formation.destroy(ActorId(id));
            }
            assert!(formation.is_cleared());
            assert_eq!(formation.lowest_edge(), None);
            assert!(!formation.has_landed(0.0));

            for now in until + 1..until + 50 {
                formation.advance(now as f64).unwrap();
                assert_eq!(formation.direction(), heading);
            }
        }
    }

    #[test]
    fn test_pause_and_resume() {
        let mut formation =
            Formation::reference_grid(&settings(), Vec2::new(100.0, 180.0)).unwrap();
        formation.advance(1.0).unwrap();
        let before = formation.snapshot();

        formation.pause();
        assert_eq!(formation.direction(), Direction::Idle);
        for now in 2..10 {
            assert!(!formation.advance(now as f64).unwrap());
            assert_eq!(formation.direction(), Direction::Idle);
        }
        assert_eq!(formation.snapshot(), before);
        assert_eq!(formation.state().last_move_time, 9.0);

        formation.resume();
        assert_eq!(formation.direction(), Direction::Right);
        assert!(formation.advance(10.0).unwrap());

        // Resuming twice is harmless
        formation.resume();
        assert_eq!(formation.direction(), Direction::Right);
    }

    #[test]
    fn test_backwards_clock_leaves_state_intact() {
        let mut formation =
            Formation::reference_grid(&settings(), Vec2::new(100.0, 180.0)).unwrap();
        formation.advance(3.0).unwrap();
        let state = *formation.state();
        let snapshot = formation.snapshot();

        let err = formation.advance(2.0).unwrap_err();
        assert!(matches!(err, TickError::TemporalOrdering { .. }));
        assert_eq!(*formation.state(), state);
        assert_eq!(formation.snapshot(), snapshot);
    }

    #[test]
    fn test_has_landed() {
        let mut formation =
            Formation::reference_grid(&settings(), Vec2::new(100.0, 180.0)).unwrap();
        assert!(formation.has_landed(204.0));
        assert!(!formation.has_landed(203.0));

        // Walk until the grid has dropped once
        for now in 0..=4 {
            formation.advance(now as f64).unwrap();
        }
        assert!(formation.has_landed(194.0));
    }
}
