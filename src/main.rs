//! Road Hopper entry point
//!
//! Headless runner: plays one run with a simple autopilot at a fixed frame
//! rate and records the result on the leaderboard.
//!
//! Usage: `road-hopper [seed] [tuning.json]`

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use road_hopper::consts::FRAME_DT;
use road_hopper::sim::{Direction, LaneKind, Step, TickInput, World, tick};
use road_hopper::{HighScores, Tuning};

const SCORES_FILE: &str = "road_hopper_scores.json";

/// Give up after this much simulated time
const MAX_RUN_SECS: f32 = 300.0;

/// Seconds of clearance the autopilot wants before hopping into a lane
const LOOKAHEAD: f32 = 0.4;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse()?,
        None => unix_time(),
    };
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    log::info!("Road Hopper (headless) starting with seed {seed}");
    let mut world = World::with_tuning(seed, tuning);

    while !world.is_over() && world.time < MAX_RUN_SECS {
        let input = autopilot(&world);
        tick(&mut world, &input, FRAME_DT);
    }

    if world.is_over() {
        println!("Game over after {:.1}s, score {}", world.time, world.score);
    } else {
        println!("Survived {MAX_RUN_SECS}s, score {}", world.score);
    }

    record_score(Path::new(SCORES_FILE), &world)
}

fn record_score(path: &Path, world: &World) -> Result<(), Box<dyn std::error::Error>> {
    let mut scores = match HighScores::load(path) {
        Ok(scores) => scores,
        Err(e) => {
            log::warn!("Ignoring unreadable high scores: {e}");
            HighScores::new()
        }
    };

    match scores.add_score(world.score, world.seed, unix_time()) {
        Some(rank) => {
            println!("New high score! Rank #{rank}");
            scores.save(path)?;
        }
        None => {
            if let Some(top) = scores.top_score() {
                println!("Best so far: {top}");
            }
        }
    }
    Ok(())
}

fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Hop forward when the next lane looks safe, otherwise keep away from the
/// field edges while riding logs and wait.
fn autopilot(world: &World) -> TickInput {
    let player = &world.player;
    if !player.is_idle() {
        return TickInput::default();
    }

    let ahead = player.lane() - 1;
    if lane_is_safe(world, ahead, player.pos.x) {
        return TickInput::holding(Step::Up);
    }

    // Riding a log toward an edge: shuffle back toward the middle if the log allows it
    if world.lane_kind_under_player() == Some(LaneKind::Water) {
        let middle = world.tuning.width() / 2.0;
        let step = if player.pos.x < middle { Step::Right } else { Step::Left };
        let x = player.pos.x + step.delta().x;
        if world
            .obstacles
            .log_at(x, player.pos.y, &world.tuning)
            .is_some()
        {
            return TickInput::holding(step);
        }
    }

    TickInput::default()
}

fn lane_is_safe(world: &World, lane: i32, x: f32) -> bool {
    match world.terrain.lane_kind_at(lane) {
        None => false,
        Some(LaneKind::Water) => world
            .obstacles
            .log_at(x, lane as f32, &world.tuning)
            .is_some(),
        Some(kind) if kind.spawns_obstacles() => world.obstacles.on_lane(lane).all(|o| {
            // Distance the obstacle still has to cover to reach the cell
            let gap = match o.direction {
                Direction::Forward => x - (o.pos.x + o.kind.footprint().x),
                Direction::Backward => o.pos.x - (x + 1.0),
            };
            gap > o.speed * LOOKAHEAD || gap < -o.kind.footprint().x - 1.0
        }),
        Some(_) => true,
    }
}
