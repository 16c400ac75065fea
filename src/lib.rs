//! Road Hopper - An endless lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Simulation (terrain generation, obstacles, player, game loop)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard persistence for the host

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreError, HighScores};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Screen dimensions the default grid is laid out for (pixels)
    pub const SCREEN_WIDTH: u32 = 800;
    pub const SCREEN_HEIGHT: u32 = 600;
    /// Tile edge length (pixels). Everything in `sim` is in lane units.
    pub const TILE_SIZE: u32 = 40;

    /// Lanes across (x axis)
    pub const GRID_WIDTH: u32 = SCREEN_WIDTH / TILE_SIZE;
    /// Lanes visible top to bottom (y axis)
    pub const GRID_HEIGHT: u32 = SCREEN_HEIGHT / TILE_SIZE;

    /// Typical host frame time
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}

/// Lane index containing a (possibly fractional) y position
#[inline]
pub fn lane_of(y: f32) -> i32 {
    y.floor() as i32
}

/// Convert a length in pixels to lane units
#[inline]
pub fn px_to_lanes(px: f32) -> f32 {
    px / consts::TILE_SIZE as f32
}
