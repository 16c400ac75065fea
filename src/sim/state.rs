//! Game state and core simulation types
//!
//! `World` owns every simulation component. Restarting a run means building a
//! new `World`; there is no partial reset.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lane::LaneKind;
use super::obstacle::ObstacleField;
use super::player::{Player, Step};
use super::terrain::TerrainField;
use crate::tuning::Tuning;

/// RNG stream ids, one per component
const TERRAIN_STREAM: u64 = 0x7e44_a1e5;
const OBSTACLE_STREAM: u64 = 0x0b57_ac1e;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player is dead; ticks are no-ops
    GameOver,
}

/// What killed the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitCause {
    /// Run over by a car or train
    Vehicle,
    /// Stood on open water
    Drowned,
    /// Carried off the side of the field by a log
    SweptAway,
}

/// Things that happened during the last tick (for sound, HUD, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A hop started
    Hopped(Step),
    /// Player got hit
    Hit(HitCause),
    /// Squish finished, run over
    Died,
    /// Forward progress scored
    Scored { gained: u64, total: u64 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    /// Balance values, fixed for the whole run
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Simulated seconds
    pub time: f32,
    /// Simulation tick counter
    pub ticks: u64,
    /// Lanes of net-new forward progress
    pub score: u64,
    /// Forward-most lane reached so far
    pub(crate) best_lane: i32,
    /// Seconds until the next move is accepted
    pub(crate) move_cooldown: f32,
    pub player: Player,
    pub terrain: TerrainField,
    pub obstacles: ObstacleField,
    /// Events raised by the last tick
    pub events: Vec<GameEvent>,
}

impl World {
    /// Start a run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Start a run. The tuning must already pass `Tuning::validate`.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        debug_assert!(tuning.validate().is_ok(), "unvalidated tuning: {:?}", tuning.validate());

        let mut terrain = TerrainField::new(Pcg32::new(seed, TERRAIN_STREAM), &tuning);
        let lanes = terrain.initialize(
            tuning.initial_window_start,
            tuning.initial_window_size(),
            &tuning,
        );

        let start_lane = find_start_lane(&terrain, &tuning);
        let player = Player::new(Vec2::new((tuning.grid_width / 2) as f32, start_lane as f32));

        let mut obstacles = ObstacleField::new(Pcg32::new(seed, OBSTACLE_STREAM));
        for lane in &lanes {
            obstacles.register_lane(lane.index, lane.kind, &tuning);
        }

        log::info!(
            "New run (seed {seed}): start lane {start_lane}, {} lanes, {} obstacles",
            terrain.len(),
            obstacles.len()
        );

        Self {
            tuning,
            seed,
            phase: GamePhase::Playing,
            time: 0.0,
            ticks: 0,
            score: 0,
            best_lane: start_lane,
            move_cooldown: 0.0,
            player,
            terrain,
            obstacles,
            events: Vec::new(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Lane the camera follows
    pub fn camera_lane(&self) -> i32 {
        self.player.lane()
    }

    /// Forward-most lane reached so far
    pub fn best_lane(&self) -> i32 {
        self.best_lane
    }

    /// Terrain under the player
    pub fn lane_kind_under_player(&self) -> Option<LaneKind> {
        self.terrain.lane_kind_at(self.player.lane())
    }
}

/// First grass or sidewalk lane around the middle of the screen
fn find_start_lane(terrain: &TerrainField, tuning: &Tuning) -> i32 {
    let middle = (tuning.grid_height / 2) as i32;
    let radius = tuning.start_search_radius;
    (middle - radius..middle + radius)
        .find(|&index| {
            terrain
                .lane_kind_at(index)
                .is_some_and(|kind| kind.is_safe_ground())
        })
        .unwrap_or(middle)
}
