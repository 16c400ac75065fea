//! Property tests for terrain generation, scoring and movement rules

use std::collections::BTreeMap;

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use road_hopper::Tuning;
use road_hopper::sim::{
    LaneKind, Player, Step, TerrainField, TickInput, World, choose_section, tick,
};

fn lane_kind() -> impl Strategy<Value = LaneKind> {
    prop::sample::select(LaneKind::ALL.to_vec())
}

fn step() -> impl Strategy<Value = Step> {
    prop::sample::select(Step::PRIORITY.to_vec())
}

fn input() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(up, down, left, right)| TickInput {
            up,
            down,
            left,
            right,
        },
    )
}

fn initialized_terrain(seed: u64, tuning: &Tuning) -> TerrainField {
    let mut terrain = TerrainField::new(Pcg32::seed_from_u64(seed), tuning);
    terrain.initialize(
        tuning.initial_window_start,
        tuning.initial_window_size(),
        tuning,
    );
    terrain
}

proptest! {
    #[test]
    fn prop_section_length_in_range(
        seed in any::<u64>(),
        recent in prop::collection::vec(lane_kind(), 0..6),
    ) {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let (kind, length) = choose_section(&recent, &tuning, &mut rng);
        let profile = tuning.sections.get(kind);
        prop_assert!(length >= profile.min_len && length <= profile.max_len);
    }

    #[test]
    fn prop_terrain_window_follows_camera(
        seed in any::<u64>(),
        moves in prop::collection::vec(-3i32..=8, 1..60),
    ) {
        let tuning = Tuning::default();
        let mut terrain = initialized_terrain(seed, &tuning);
        let mut camera = tuning.grid_height as i32 / 2;

        for delta in moves {
            // Mostly forward, sometimes back
            camera -= delta;
            terrain.advance(camera, &tuning);

            let indices: Vec<i32> = terrain.lanes().map(|lane| lane.index).collect();
            prop_assert!(!indices.is_empty());
            prop_assert!(indices.windows(2).all(|w| w[0] + 1 == w[1]));
            prop_assert_eq!(indices[0], terrain.highest_lane());
            prop_assert_eq!(*indices.last().unwrap(), terrain.lowest_lane());
            prop_assert!(terrain.highest_lane() <= camera - tuning.forward_margin);
            prop_assert!(terrain.lowest_lane() <= camera + tuning.rear_margin());
        }
    }

    #[test]
    fn prop_lane_kinds_never_change(
        seed in any::<u64>(),
        moves in prop::collection::vec(0i32..=5, 1..40),
    ) {
        let tuning = Tuning::default();
        let mut terrain = initialized_terrain(seed, &tuning);
        let mut seen: BTreeMap<i32, LaneKind> = BTreeMap::new();
        let mut camera = tuning.grid_height as i32 / 2;

        for delta in moves {
            camera -= delta;
            terrain.advance(camera, &tuning);
            for lane in terrain.lanes() {
                let kind = *seen.entry(lane.index).or_insert(lane.kind);
                prop_assert_eq!(kind, lane.kind);
            }
        }
    }

    #[test]
    fn prop_score_never_decreases(
        seed in any::<u64>(),
        inputs in prop::collection::vec((input(), 0.0f32..0.2), 1..200),
    ) {
        let mut world = World::new(seed);
        let start_lane = world.best_lane();
        let mut last = world.score;
        for (input, dt) in inputs {
            tick(&mut world, &input, dt);
            prop_assert!(world.score >= last);
            prop_assert_eq!(world.score, (start_lane - world.best_lane()) as u64);
            last = world.score;
        }
    }

    #[test]
    fn prop_out_of_bounds_moves_rejected(
        x in 0u32..20,
        y in -50i32..15,
        step in step(),
    ) {
        let tuning = Tuning::default();
        let mut player = Player::new(Vec2::new(x as f32, y as f32));
        let target = player.pos + step.delta();
        let in_bounds = target.x >= 0.0
            && target.x < tuning.width()
            && target.y < tuning.grid_height as f32;

        prop_assert_eq!(player.try_move(step, &tuning), in_bounds);
        if !in_bounds {
            prop_assert!(player.is_idle());
            prop_assert_eq!(player.pos, Vec2::new(x as f32, y as f32));
        }
    }
}
