//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only (one `Pcg32` stream per component)
//! - Stable iteration order (lanes by index, obstacles by id)
//! - No rendering, input devices or storage

pub mod collision;
pub mod lane;
pub mod obstacle;
pub mod planner;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{Rect, padded_overlap};
pub use lane::{Lane, LaneKind};
pub use obstacle::{Direction, Obstacle, ObstacleField, ObstacleKind, SpawnSchedule};
pub use planner::{SectionPlanner, choose_section, section_weights};
pub use player::{Player, PlayerState, Step};
pub use snapshot::{PlayerView, Snapshot};
pub use state::{GameEvent, GamePhase, HitCause, World};
pub use terrain::{TerrainField, WindowChange};
pub use tick::{TickInput, tick};
