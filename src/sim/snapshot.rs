//! Read-only view of a world for renderers
//!
//! Everything is in lane units; colours and pixels are the renderer's job.

use glam::Vec2;
use serde::Serialize;

use super::lane::Lane;
use super::obstacle::Obstacle;
use super::player::{PlayerState, Step};
use super::state::{GamePhase, World};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub state: PlayerState,
    /// Hop in flight, for facing
    pub step: Option<Step>,
    /// Vertical hop offset (render units)
    pub hop_height: f32,
    /// 1 standing, 0.3 fully squished
    pub squish_factor: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    /// Lane the camera is centred on
    pub camera_lane: i32,
    /// Lane index shown at the top edge of the screen (fractional while hopping)
    pub top_lane: f32,
    /// Lanes on screen, forward-most first
    pub lanes: Vec<Lane>,
    /// Obstacles on the visible lanes
    pub obstacles: Vec<Obstacle>,
    pub player: PlayerView,
}

impl World {
    /// Lanes a `grid_height`-tall screen centred on the camera shows,
    /// plus one lane of slack at each edge
    pub fn visible_lanes(&self) -> (i32, i32) {
        let half = (self.tuning.grid_height / 2) as i32;
        let camera = self.camera_lane();
        (camera - half - 1, camera + half + 1)
    }

    pub fn snapshot(&self) -> Snapshot {
        let (from, to) = self.visible_lanes();
        let lanes: Vec<Lane> = self.terrain.lanes_between(from, to).copied().collect();
        let obstacles = self
            .obstacles
            .obstacles()
            .iter()
            .filter(|o| (from..=to).contains(&o.lane()))
            .cloned()
            .collect();

        Snapshot {
            phase: self.phase,
            score: self.score,
            camera_lane: self.camera_lane(),
            top_lane: self.player.pos.y - (self.tuning.grid_height / 2) as f32,
            lanes,
            obstacles,
            player: PlayerView {
                pos: self.player.pos,
                state: self.player.state(),
                step: self.player.step(),
                hop_height: self.player.hop_height(&self.tuning),
                squish_factor: self.player.squish_factor(&self.tuning),
            },
        }
    }
}
