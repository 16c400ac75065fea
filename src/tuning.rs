//! Data-driven game balance
//!
//! One immutable value built at startup and passed by reference to every
//! simulation component. Defaults reproduce the classic 20x15 grid balance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{GRID_HEIGHT, GRID_WIDTH};
use crate::px_to_lanes;
use crate::sim::LaneKind;

/// Reasons a tuning value is rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid must be at least 1x1 lanes, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },
    #[error("section profile for {kind:?} is invalid: {reason}")]
    Section { kind: LaneKind, reason: &'static str },
    #[error("all section weights are zero")]
    NoWeight,
    #[error("spawn profile for {kind:?} is invalid: {reason}")]
    Spawn { kind: LaneKind, reason: &'static str },
    #[error("{0} must be positive")]
    NonPositive(&'static str),
}

/// How often a terrain kind is chosen and how long its sections run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProfile {
    /// Base selection weight (normalized against the other kinds)
    pub weight: f32,
    /// Shortest section, in lanes (inclusive)
    pub min_len: u32,
    /// Longest section, in lanes (inclusive)
    pub max_len: u32,
}

impl SectionProfile {
    pub const fn new(weight: f32, min_len: u32, max_len: u32) -> Self {
        Self {
            weight,
            min_len,
            max_len,
        }
    }
}

/// Section profile per lane kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTable {
    pub grass: SectionProfile,
    pub road: SectionProfile,
    pub water: SectionProfile,
    pub tracks: SectionProfile,
    pub sidewalk: SectionProfile,
}

impl Default for SectionTable {
    fn default() -> Self {
        Self {
            grass: SectionProfile::new(0.35, 3, 6),
            road: SectionProfile::new(0.25, 2, 5),
            water: SectionProfile::new(0.15, 2, 4),
            tracks: SectionProfile::new(0.15, 1, 3),
            sidewalk: SectionProfile::new(0.10, 2, 4),
        }
    }
}

impl SectionTable {
    pub fn get(&self, kind: LaneKind) -> &SectionProfile {
        match kind {
            LaneKind::Grass => &self.grass,
            LaneKind::Road => &self.road,
            LaneKind::Water => &self.water,
            LaneKind::Tracks => &self.tracks,
            LaneKind::Sidewalk => &self.sidewalk,
        }
    }
}

/// Obstacle batch parameters for one lane kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnProfile {
    /// Obstacles per batch (inclusive range)
    pub count: (u32, u32),
    /// Speed in lanes/second (uniform range)
    pub speed: (f32, f32),
    /// Delay between batches in seconds (uniform range)
    pub interval: (f32, f32),
    /// Distance between consecutive obstacle starts within a batch
    pub spacing: f32,
    /// Start x of the first `Forward` obstacle (left of the field)
    pub forward_entry: f32,
    /// Start x of the first `Backward` obstacle, as an offset past the right edge
    pub backward_entry: f32,
    /// Whether each obstacle of a batch rolls its own direction and speed
    pub independent: bool,
}

/// Spawn profiles for the lane kinds that carry obstacles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTable {
    pub road: SpawnProfile,
    pub tracks: SpawnProfile,
    pub water: SpawnProfile,
}

impl Default for SpawnTable {
    fn default() -> Self {
        Self {
            road: SpawnProfile {
                count: (1, 2),
                speed: (2.0, 3.5),
                interval: (3.0, 5.0),
                spacing: 4.0,
                forward_entry: -2.0,
                backward_entry: 1.0,
                independent: false,
            },
            tracks: SpawnProfile {
                count: (1, 1),
                speed: (3.5, 5.0),
                interval: (4.0, 7.0),
                spacing: 0.0,
                forward_entry: -4.0,
                backward_entry: 2.0,
                independent: true,
            },
            // Logs are 1.5 lanes long; 3.5 spacing keeps a log within hopping reach
            water: SpawnProfile {
                count: (4, 5),
                speed: (1.0, 2.0),
                interval: (3.0, 5.0),
                spacing: 3.5,
                forward_entry: -3.0,
                backward_entry: 1.0,
                independent: false,
            },
        }
    }
}

impl SpawnTable {
    /// Profile for a lane kind, `None` for kinds that never spawn obstacles
    pub fn get(&self, kind: LaneKind) -> Option<&SpawnProfile> {
        match kind {
            LaneKind::Road => Some(&self.road),
            LaneKind::Tracks => Some(&self.tracks),
            LaneKind::Water => Some(&self.water),
            LaneKind::Grass | LaneKind::Sidewalk => None,
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Grid ===
    /// Lanes across
    pub grid_width: u32,
    /// Lanes on screen; also the rear bound for player moves
    pub grid_height: u32,

    // === Terrain window ===
    /// First lane index generated at startup
    pub initial_window_start: i32,
    /// Lanes generated at startup beyond one screen
    pub initial_window_extra: u32,
    /// Lanes kept generated ahead of the camera
    pub forward_margin: i32,
    /// Lanes kept behind the camera beyond one screen
    pub rear_margin_extra: i32,
    /// How far (in lanes) to search for a safe start lane
    pub start_search_radius: i32,

    // === Section planner ===
    pub sections: SectionTable,
    /// Weight multiplier for recently used kinds
    pub repeat_penalty: f32,
    /// How many recent sections count as "recent" for the penalty
    pub repeat_window: usize,
    /// Recent section kinds remembered
    pub history_len: usize,

    // === Obstacles ===
    pub spawns: SpawnTable,
    /// Delay before the second batch on a freshly registered lane
    pub initial_spawn_delay: f32,
    /// Obstacles are pruned this far past the field edge
    pub field_margin: f32,

    // === Collision (lane units) ===
    /// Inset applied to obstacle footprints
    pub obstacle_padding: f32,
    /// Inset applied to the player footprint
    pub player_padding: f32,
    /// Inset of the probe used to find a log under the player
    pub log_probe_inset: f32,
    /// Max lane distance between the player and a log it stands on
    pub log_lane_tolerance: f32,

    // === Player ===
    /// Move progress per second (10 = one lane in 0.1 s)
    pub move_rate: f32,
    /// Minimum time between accepted moves
    pub move_cooldown: f32,
    /// Time from being hit to being dead
    pub squish_duration: f32,
    /// Peak hop offset (render units)
    pub hop_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,

            initial_window_start: -15,
            initial_window_extra: 30,
            forward_margin: 10,
            rear_margin_extra: 10,
            start_search_radius: 5,

            sections: SectionTable::default(),
            repeat_penalty: 0.3,
            repeat_window: 2,
            history_len: 5,

            spawns: SpawnTable::default(),
            initial_spawn_delay: 0.5,
            field_margin: 2.0,

            // 3px, 5px and 5px at a 40px tile
            obstacle_padding: px_to_lanes(3.0),
            player_padding: px_to_lanes(5.0),
            log_probe_inset: px_to_lanes(5.0),
            log_lane_tolerance: 0.5,

            move_rate: 10.0,
            move_cooldown: 0.15,
            squish_duration: 0.5,
            hop_height: 15.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning value; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Field width in lanes
    #[inline]
    pub fn width(&self) -> f32 {
        self.grid_width as f32
    }

    /// Lanes kept behind the camera
    #[inline]
    pub fn rear_margin(&self) -> i32 {
        self.grid_height as i32 + self.rear_margin_extra
    }

    /// Lanes generated at startup
    #[inline]
    pub fn initial_window_size(&self) -> u32 {
        self.grid_height + self.initial_window_extra
    }

    /// Check every range and rate is usable
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(TuningError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        let mut total_weight = 0.0;
        for kind in LaneKind::ALL {
            let profile = self.sections.get(kind);
            if !(profile.weight >= 0.0 && profile.weight.is_finite()) {
                return Err(TuningError::Section {
                    kind,
                    reason: "weight must be finite and non-negative",
                });
            }
            if profile.min_len == 0 || profile.min_len > profile.max_len {
                return Err(TuningError::Section {
                    kind,
                    reason: "length range must satisfy 1 <= min <= max",
                });
            }
            total_weight += profile.weight;
        }
        if total_weight <= 0.0 {
            return Err(TuningError::NoWeight);
        }

        for kind in LaneKind::ALL {
            let Some(spawn) = self.spawns.get(kind) else {
                continue;
            };
            if spawn.count.0 > spawn.count.1 {
                return Err(TuningError::Spawn {
                    kind,
                    reason: "count range is reversed",
                });
            }
            if !(spawn.speed.0 > 0.0 && spawn.speed.0 <= spawn.speed.1) {
                return Err(TuningError::Spawn {
                    kind,
                    reason: "speed range must be positive and ordered",
                });
            }
            if !(spawn.interval.0 > 0.0 && spawn.interval.0 <= spawn.interval.1) {
                return Err(TuningError::Spawn {
                    kind,
                    reason: "interval range must be positive and ordered",
                });
            }
        }

        if self.move_rate <= 0.0 {
            return Err(TuningError::NonPositive("move_rate"));
        }
        if self.squish_duration <= 0.0 {
            return Err(TuningError::NonPositive("squish_duration"));
        }
        if self.forward_margin <= 0 {
            return Err(TuningError::NonPositive("forward_margin"));
        }
        if self.history_len == 0 {
            return Err(TuningError::NonPositive("history_len"));
        }

        Ok(())
    }
}
