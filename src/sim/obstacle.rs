//! Obstacles and their per-lane spawn schedules
//!
//! Cars drive on roads, trains run on tracks, logs float on water. Cars and
//! trains are lethal on contact. Logs never collide with the player; they
//! carry it instead.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, padded_overlap};
use super::lane::LaneKind;
use crate::tuning::{SpawnProfile, Tuning};

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Car,
    Train,
    Log,
}

impl ObstacleKind {
    /// Width x height in lane units
    pub fn footprint(&self) -> Vec2 {
        match self {
            ObstacleKind::Car => Vec2::new(0.9, 0.6),
            ObstacleKind::Train => Vec2::new(2.0, 0.7),
            ObstacleKind::Log => Vec2::new(1.5, 0.5),
        }
    }

    /// Whether touching it kills the player
    pub fn is_lethal(&self) -> bool {
        !matches!(self, ObstacleKind::Log)
    }

    /// What spawns on a lane kind
    pub fn for_lane(kind: LaneKind) -> Option<Self> {
        match kind {
            LaneKind::Road => Some(ObstacleKind::Car),
            LaneKind::Tracks => Some(ObstacleKind::Train),
            LaneKind::Water => Some(ObstacleKind::Log),
            LaneKind::Grass | LaneKind::Sidewalk => None,
        }
    }
}

/// Travel direction along x
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Toward +x (left to right on screen)
    Forward,
    /// Toward -x
    Backward,
}

impl Direction {
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// A moving obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// x is continuous, y is the lane index
    pub pos: Vec2,
    pub direction: Direction,
    /// Lanes per second
    pub speed: f32,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, lane: i32, x: f32, direction: Direction, speed: f32) -> Self {
        Self {
            id,
            kind,
            pos: Vec2::new(x, lane as f32),
            direction,
            speed,
        }
    }

    pub fn lane(&self) -> i32 {
        self.pos.y as i32
    }

    /// Signed x velocity
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.speed * self.direction.sign()
    }

    /// Unpadded footprint
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.kind.footprint())
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos.x += self.velocity() * dt;
    }

    /// True once it has driven past the exit edge of the field
    pub fn has_exited(&self, width: f32, margin: f32) -> bool {
        match self.direction {
            Direction::Forward => self.pos.x > width + margin,
            Direction::Backward => self.pos.x < -margin,
        }
    }
}

/// Spawn bookkeeping for one registered lane
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpawnSchedule {
    pub kind: LaneKind,
    /// Seconds until the next batch; `None` on lanes that never spawn
    pub countdown: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct ObstacleField {
    /// Live obstacles, ordered by id
    obstacles: Vec<Obstacle>,
    /// Registered lanes
    schedules: BTreeMap<i32, SpawnSchedule>,
    rng: Pcg32,
    next_id: u32,
}

impl ObstacleField {
    pub fn new(rng: Pcg32) -> Self {
        Self {
            obstacles: Vec::new(),
            schedules: BTreeMap::new(),
            rng,
            next_id: 1,
        }
    }

    /// Start spawning on a lane. Returns false if it was already registered.
    pub fn register_lane(&mut self, index: i32, kind: LaneKind, tuning: &Tuning) -> bool {
        if self.schedules.contains_key(&index) {
            return false;
        }

        let countdown = kind.spawns_obstacles().then_some(tuning.initial_spawn_delay);
        self.schedules.insert(index, SpawnSchedule { kind, countdown });

        if countdown.is_some() {
            self.spawn_batch(index, kind, tuning);
        }
        true
    }

    /// Stop spawning on a lane. Obstacles already on it drive on.
    pub fn unregister_lane(&mut self, index: i32) -> bool {
        self.schedules.remove(&index).is_some()
    }

    pub fn is_registered(&self, index: i32) -> bool {
        self.schedules.contains_key(&index)
    }

    pub fn schedule(&self, index: i32) -> Option<&SpawnSchedule> {
        self.schedules.get(&index)
    }

    /// Spawn one batch of obstacles entering a registered lane
    pub fn spawn_batch(&mut self, index: i32, kind: LaneKind, tuning: &Tuning) {
        debug_assert!(
            self.schedules.contains_key(&index),
            "spawn on unregistered lane {index}"
        );

        let (Some(obstacle_kind), Some(profile)) =
            (ObstacleKind::for_lane(kind), tuning.spawns.get(kind))
        else {
            return;
        };
        let profile = *profile;

        let count = self.rng.random_range(profile.count.0..=profile.count.1);
        let (mut direction, mut speed) = self.roll_motion(&profile);
        for i in 0..count {
            if profile.independent && i > 0 {
                (direction, speed) = self.roll_motion(&profile);
            }
            let x = entry_x(&profile, direction, i, tuning.width());
            let id = self.next_id();
            self.obstacles
                .push(Obstacle::new(id, obstacle_kind, index, x, direction, speed));
        }

        log::debug!(
            "Spawned {count} {obstacle_kind:?} on lane {index} heading {direction:?} at {speed:.2}"
        );
    }

    /// Run spawn timers, move obstacles, prune the ones that left the field
    pub fn tick(&mut self, dt: f32, tuning: &Tuning) {
        let due: Vec<(i32, LaneKind)> = self
            .schedules
            .iter_mut()
            .filter_map(|(&index, schedule)| {
                let countdown = schedule.countdown.as_mut()?;
                *countdown -= dt;
                (*countdown <= 0.0).then_some((index, schedule.kind))
            })
            .collect();

        for (index, kind) in due {
            self.spawn_batch(index, kind, tuning);
            let Some(profile) = tuning.spawns.get(kind) else {
                continue;
            };
            let next = self.rng.random_range(profile.interval.0..=profile.interval.1);
            if let Some(schedule) = self.schedules.get_mut(&index) {
                schedule.countdown = Some(next);
            }
        }

        for obstacle in &mut self.obstacles {
            obstacle.advance(dt);
        }

        let (width, margin) = (tuning.width(), tuning.field_margin);
        self.obstacles.retain(|o| !o.has_exited(width, margin));
    }

    /// Add an obstacle directly (assigns a fresh id)
    pub fn insert(&mut self, mut obstacle: Obstacle) -> u32 {
        obstacle.id = self.next_id();
        let id = obstacle.id;
        self.obstacles.push(obstacle);
        id
    }

    /// Does the player's cell touch any lethal obstacle? Both footprints are
    /// padded before the overlap test.
    pub fn is_colliding(&self, player: &Rect, tuning: &Tuning) -> bool {
        self.obstacles.iter().filter(|o| o.kind.is_lethal()).any(|o| {
            padded_overlap(&o.rect(), tuning.obstacle_padding, player, tuning.player_padding)
        })
    }

    /// Log under a player standing at grid position `(x, y)`
    pub fn log_at(&self, x: f32, y: f32, tuning: &Tuning) -> Option<&Obstacle> {
        let cell = Rect::cell(Vec2::new(x, y));
        self.obstacles.iter().find(|o| {
            o.kind == ObstacleKind::Log
                && (o.pos.y - y).abs() < tuning.log_lane_tolerance
                && padded_overlap(&o.rect(), tuning.obstacle_padding, &cell, tuning.log_probe_inset)
        })
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Obstacles on one lane
    pub fn on_lane(&self, index: i32) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(move |o| o.lane() == index)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    fn roll_motion(&mut self, profile: &SpawnProfile) -> (Direction, f32) {
        let direction = if self.rng.random_bool(0.5) {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let speed = self.rng.random_range(profile.speed.0..=profile.speed.1);
        (direction, speed)
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Start x of the `i`-th obstacle of a batch: outside the field on the side
/// it enters from, further out for later obstacles
fn entry_x(profile: &SpawnProfile, direction: Direction, i: u32, width: f32) -> f32 {
    let stagger = i as f32 * profile.spacing;
    match direction {
        Direction::Forward => profile.forward_entry - stagger,
        Direction::Backward => width + profile.backward_entry + stagger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn field() -> (ObstacleField, Tuning) {
        (ObstacleField::new(Pcg32::seed_from_u64(11)), Tuning::default())
    }

    fn car(lane: i32, x: f32, direction: Direction, speed: f32) -> Obstacle {
        Obstacle::new(0, ObstacleKind::Car, lane, x, direction, speed)
    }

    fn log(lane: i32, x: f32, direction: Direction, speed: f32) -> Obstacle {
        Obstacle::new(0, ObstacleKind::Log, lane, x, direction, speed)
    }

    #[test]
    fn test_register_spawns_immediately() {
        let (mut field, tuning) = field();
        assert!(field.register_lane(3, LaneKind::Road, &tuning));
        let cars = field.on_lane(3).count();
        assert!((1..=2).contains(&cars));
        assert_eq!(field.schedule(3).unwrap().countdown, Some(0.5));
    }

    #[test]
    fn test_register_is_idempotent() {
        let (mut field, tuning) = field();
        assert!(field.register_lane(3, LaneKind::Water, &tuning));
        let count = field.len();
        assert!(!field.register_lane(3, LaneKind::Water, &tuning));
        assert_eq!(field.len(), count);
    }

    #[test]
    fn test_safe_lanes_never_spawn() {
        let (mut field, tuning) = field();
        field.register_lane(0, LaneKind::Grass, &tuning);
        field.register_lane(1, LaneKind::Sidewalk, &tuning);
        assert!(field.is_empty());
        assert_eq!(field.schedule(0).unwrap().countdown, None);
        field.tick(100.0, &tuning);
        assert!(field.is_empty());
    }

    #[test]
    fn test_cars_share_motion_and_enter_outside() {
        let (mut field, tuning) = field();
        for lane in 0..50 {
            field.register_lane(lane, LaneKind::Road, &tuning);
            let cars: Vec<_> = field.on_lane(lane).collect();
            let first = cars[0];
            assert!(first.speed >= 2.0 && first.speed <= 3.5);
            for car in &cars {
                assert_eq!(car.direction, first.direction);
                assert_eq!(car.speed, first.speed);
                assert!(car.pos.x <= -2.0 || car.pos.x >= tuning.width() + 1.0);
            }
            if cars.len() == 2 {
                assert!(((cars[1].pos.x - cars[0].pos.x).abs() - 4.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_one_train_per_batch() {
        let (mut field, tuning) = field();
        for lane in 0..20 {
            field.register_lane(lane, LaneKind::Tracks, &tuning);
            let trains: Vec<_> = field.on_lane(lane).collect();
            assert_eq!(trains.len(), 1);
            let train = trains[0];
            assert_eq!(train.kind, ObstacleKind::Train);
            assert!(train.speed >= 3.5 && train.speed <= 5.0);
            match train.direction {
                Direction::Forward => assert_eq!(train.pos.x, -4.0),
                Direction::Backward => assert_eq!(train.pos.x, tuning.width() + 2.0),
            }
        }
    }

    #[test]
    fn test_logs_are_staggered() {
        let (mut field, tuning) = field();
        for lane in 0..20 {
            field.register_lane(lane, LaneKind::Water, &tuning);
            let mut xs: Vec<f32> = field.on_lane(lane).map(|o| o.pos.x).collect();
            assert!((4..=5).contains(&xs.len()));
            xs.sort_by(f32::total_cmp);
            for pair in xs.windows(2) {
                assert!((pair[1] - pair[0] - 3.5).abs() < 1e-4);
                // Gap between consecutive logs stays within two hops
                let gap = pair[1] - pair[0] - ObstacleKind::Log.footprint().x;
                assert!(gap <= 2.0 + 1e-4);
            }
        }
    }

    #[test]
    fn test_timer_respawns() {
        let (mut field, tuning) = field();
        field.register_lane(0, LaneKind::Tracks, &tuning);
        assert_eq!(field.len(), 1);
        field.tick(0.5, &tuning);
        assert_eq!(field.len(), 2);
        let countdown = field.schedule(0).unwrap().countdown.unwrap();
        assert!((4.0..=7.0).contains(&countdown));
    }

    #[test]
    fn test_unregister_keeps_obstacles() {
        let (mut field, tuning) = field();
        field.register_lane(0, LaneKind::Road, &tuning);
        let count = field.len();
        assert!(field.unregister_lane(0));
        assert!(!field.unregister_lane(0));
        assert!(!field.is_registered(0));
        field.tick(0.6, &tuning);
        // No respawn after unregistering
        assert!(field.len() <= count);
    }

    #[test]
    fn test_car_crossing_field_is_pruned() {
        let (mut field, tuning) = field();
        field.insert(car(0, -2.0, Direction::Forward, 3.0));

        // Still on the field right at the far edge
        let t = (tuning.width() + 2.0) / 3.0;
        field.tick(t, &tuning);
        assert_eq!(field.len(), 1);

        // Past the margin: gone
        field.tick(1.0, &tuning);
        assert!(field.is_empty());
    }

    #[test]
    fn test_incoming_obstacles_are_not_pruned() {
        let (mut field, tuning) = field();
        field.insert(car(0, -6.0, Direction::Forward, 3.0));
        field.insert(log(1, tuning.width() + 8.0, Direction::Backward, 1.0));
        field.tick(0.016, &tuning);
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_backward_car_is_pruned_left() {
        let (mut field, tuning) = field();
        field.insert(car(0, 1.0, Direction::Backward, 2.0));
        field.tick(1.0, &tuning);
        assert_eq!(field.len(), 1);
        field.tick(1.0, &tuning);
        assert!(field.is_empty());
    }

    #[test]
    fn test_collision_ignores_logs() {
        let (mut field, tuning) = field();
        let player = Rect::cell(Vec2::new(5.0, 2.0));

        field.insert(log(2, 5.0, Direction::Forward, 1.0));
        assert!(!field.is_colliding(&player, &tuning));

        field.insert(car(2, 5.2, Direction::Forward, 1.0));
        assert!(field.is_colliding(&player, &tuning));
    }

    #[test]
    fn test_grazing_contact_is_forgiven() {
        let (mut field, tuning) = field();
        let player = Rect::cell(Vec2::new(5.0, 2.0));

        // Raw footprints overlap by 0.1, padded ones do not
        field.insert(car(2, 5.9, Direction::Forward, 1.0));
        assert!(field.obstacles()[0].rect().overlaps(&player));
        assert!(!field.is_colliding(&player, &tuning));

        field.insert(car(2, 5.5, Direction::Forward, 1.0));
        assert!(field.is_colliding(&player, &tuning));
    }

    #[test]
    fn test_collision_needs_same_lane() {
        let (mut field, tuning) = field();
        let player = Rect::cell(Vec2::new(5.0, 2.0));
        field.insert(car(3, 5.0, Direction::Forward, 1.0));
        field.insert(car(1, 5.0, Direction::Forward, 1.0));
        assert!(!field.is_colliding(&player, &tuning));
    }

    #[test]
    fn test_log_at_position() {
        let (mut field, tuning) = field();
        let id = field.insert(log(4, 3.0, Direction::Backward, 1.5));

        assert_eq!(field.log_at(3.0, 4.0, &tuning).map(|o| o.id), Some(id));
        assert_eq!(field.log_at(3.5, 4.0, &tuning).map(|o| o.id), Some(id));
        // Wrong lane
        assert!(field.log_at(3.0, 5.0, &tuning).is_none());
        // Beyond the log's end
        assert!(field.log_at(4.5, 4.0, &tuning).is_none());
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let (mut field, tuning) = field();
        for lane in 0..10 {
            field.register_lane(lane, LaneKind::Water, &tuning);
        }
        let ids: Vec<u32> = field.obstacles().iter().map(|o| o.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
