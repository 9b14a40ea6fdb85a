//! SK Invaders - formation march for a Space Invaders style wave
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation state machine, host controller)
//! - `settings`: Formation constants, validated at construction

pub mod settings;
pub mod sim;

pub use settings::FormationSettings;

/// Game configuration constants (reference values)
pub mod consts {
    /// Fixed simulation timestep for the host loop (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Seconds between two formation moves
    pub const MOVE_INTERVAL: f64 = 1.0;
    /// Horizontal step per move
    pub const STEP_X: f32 = 10.0;
    /// Vertical step per down move
    pub const STEP_Y: f32 = 10.0;
    /// Wall tolerance absorbing pixel rounding
    pub const WALL_EPSILON: f32 = 1.0;

    /// Playfield defaults
    pub const PLAYFIELD_WIDTH: f32 = 320.0;
    pub const PLAYFIELD_HEIGHT: f32 = 568.0;

    /// Invader sprite size
    pub const INVADER_WIDTH: f32 = 24.0;
    pub const INVADER_HEIGHT: f32 = 16.0;
    /// Horizontal gap between neighbouring invaders
    pub const INVADER_SPACING_X: f32 = 12.0;
    /// Grid dimensions
    pub const INVADER_ROWS: u32 = 6;
    pub const INVADER_COLS: u32 = 6;
    /// Vertical origin of the reference layout (rows stack upwards from here)
    pub const GRID_BASE_Y: f32 = 180.0;
}
