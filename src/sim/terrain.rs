//! Terrain field: the rolling window of generated lanes
//!
//! Lanes are generated one at a time at the forward edge (smaller indices)
//! as the camera advances, and evicted at the rear edge once they fall far
//! enough behind. Lanes in between are never touched again.

use std::collections::BTreeMap;

use rand_pcg::Pcg32;
use serde::Serialize;

use super::lane::{Lane, LaneKind};
use super::planner::SectionPlanner;
use crate::tuning::Tuning;

/// Lanes that entered and left the window during one `advance`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WindowChange {
    /// New lanes, in generation order (forward-most last)
    pub generated: Vec<Lane>,
    /// Evicted lane indices, rear-most last
    pub evicted: Vec<i32>,
}

/// Section currently being laid down
#[derive(Debug, Clone, Copy)]
struct Section {
    kind: LaneKind,
    remaining: u32,
}

#[derive(Debug, Clone)]
pub struct TerrainField {
    lanes: BTreeMap<i32, Lane>,
    /// Forward-most generated index
    highest_lane: i32,
    /// Rear-most generated index
    lowest_lane: i32,
    planner: SectionPlanner,
    section: Option<Section>,
    forward_margin: i32,
    rear_margin: i32,
}

impl TerrainField {
    /// Empty field; call `initialize` before use
    pub fn new(rng: Pcg32, tuning: &Tuning) -> Self {
        Self {
            lanes: BTreeMap::new(),
            highest_lane: 0,
            lowest_lane: 0,
            planner: SectionPlanner::new(rng, tuning),
            section: None,
            forward_margin: tuning.forward_margin,
            rear_margin: tuning.rear_margin(),
        }
    }

    /// Generate `window_size` lanes from `window_start` rearward.
    /// Returns the new lanes in index order.
    pub fn initialize(&mut self, window_start: i32, window_size: u32, tuning: &Tuning) -> Vec<Lane> {
        debug_assert!(self.lanes.is_empty(), "terrain initialized twice");

        let lanes: Vec<Lane> = (0..window_size as i32)
            .map(|offset| self.generate_lane(window_start + offset, tuning))
            .collect();

        self.highest_lane = window_start;
        self.lowest_lane = window_start + window_size as i32 - 1;

        log::debug!(
            "Terrain initialized with {} lanes [{}, {}]",
            lanes.len(),
            self.highest_lane,
            self.lowest_lane
        );
        lanes
    }

    /// Move the window to follow the camera lane
    pub fn advance(&mut self, camera_index: i32, tuning: &Tuning) -> WindowChange {
        let mut change = WindowChange::default();

        // Catch up however many lanes the camera moved
        let forward_edge = camera_index - self.forward_margin;
        while self.highest_lane > forward_edge {
            let index = self.highest_lane - 1;
            change.generated.push(self.generate_lane(index, tuning));
            self.highest_lane = index;
        }

        let rear_edge = camera_index + self.rear_margin;
        if self.lowest_lane > rear_edge {
            let evicted = self.lanes.split_off(&(rear_edge + 1));
            change.evicted.extend(evicted.keys().copied());
            self.lowest_lane = self
                .lanes
                .last_key_value()
                .map(|(&index, _)| index)
                .unwrap_or(self.highest_lane);
        }

        if !change.generated.is_empty() || !change.evicted.is_empty() {
            log::debug!(
                "Terrain window at camera {camera_index}: +{} lanes, -{} lanes, now [{}, {}]",
                change.generated.len(),
                change.evicted.len(),
                self.highest_lane,
                self.lowest_lane
            );
        }

        change
    }

    /// Terrain kind of a lane, if it is inside the window
    pub fn lane_kind_at(&self, index: i32) -> Option<LaneKind> {
        self.lanes.get(&index).map(|lane| lane.kind)
    }

    pub fn lane(&self, index: i32) -> Option<&Lane> {
        self.lanes.get(&index)
    }

    /// Generated lanes with index in `[from, to]`, forward-most first
    pub fn lanes_between(&self, from: i32, to: i32) -> impl Iterator<Item = &Lane> {
        let (from, to) = (from.min(to), from.max(to));
        self.lanes.range(from..=to).map(|(_, lane)| lane)
    }

    /// All generated lanes, forward-most first
    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.values()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn highest_lane(&self) -> i32 {
        self.highest_lane
    }

    pub fn lowest_lane(&self) -> i32 {
        self.lowest_lane
    }

    fn generate_lane(&mut self, index: i32, tuning: &Tuning) -> Lane {
        let kind = self.next_kind(tuning);
        let lane = Lane::new(index, kind);
        let previous = self.lanes.insert(index, lane);
        assert!(
            previous.is_none(),
            "lane {index} generated twice (window [{}, {}])",
            self.highest_lane,
            self.lowest_lane
        );
        lane
    }

    fn next_kind(&mut self, tuning: &Tuning) -> LaneKind {
        match self.section.as_mut() {
            Some(section) if section.remaining > 0 => {
                section.remaining -= 1;
                section.kind
            }
            _ => {
                let (kind, length) = self.planner.next_section(tuning);
                // This lane is the first of the section
                self.section = Some(Section {
                    kind,
                    remaining: length.saturating_sub(1),
                });
                kind
            }
        }
    }
}
