//! Terrain lanes

use serde::{Deserialize, Serialize};

/// Terrain kind of one lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LaneKind {
    Grass,
    Road,
    Water,
    Tracks,
    Sidewalk,
}

impl LaneKind {
    /// Every kind, in planner order
    pub const ALL: [LaneKind; 5] = [
        LaneKind::Grass,
        LaneKind::Road,
        LaneKind::Water,
        LaneKind::Tracks,
        LaneKind::Sidewalk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LaneKind::Grass => "grass",
            LaneKind::Road => "road",
            LaneKind::Water => "water",
            LaneKind::Tracks => "tracks",
            LaneKind::Sidewalk => "sidewalk",
        }
    }

    /// Lanes that get a spawn timer (and obstacles)
    pub fn spawns_obstacles(&self) -> bool {
        matches!(self, LaneKind::Road | LaneKind::Tracks | LaneKind::Water)
    }

    /// Lanes a player can stand on without help
    pub fn is_safe_ground(&self) -> bool {
        matches!(self, LaneKind::Grass | LaneKind::Sidewalk)
    }
}

/// One generated terrain row. Never changes after generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    /// Lane index (smaller = further forward)
    pub index: i32,
    pub kind: LaneKind,
}

impl Lane {
    pub fn new(index: i32, kind: LaneKind) -> Self {
        Self { index, kind }
    }
}
