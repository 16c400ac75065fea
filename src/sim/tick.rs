//! Variable timestep simulation tick
//!
//! Core game loop: one call per frame advances every subsystem in a fixed
//! order. Any non-negative `dt` is accepted, lag spikes included.

use serde::{Deserialize, Serialize};

use super::lane::LaneKind;
use super::player::{Player, Step};
use super::state::{GameEvent, GamePhase, HitCause, World};

/// Directions currently held by the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl TickInput {
    /// Input holding a single direction
    pub fn holding(step: Step) -> Self {
        let mut input = Self::default();
        match step {
            Step::Up => input.up = true,
            Step::Down => input.down = true,
            Step::Left => input.left = true,
            Step::Right => input.right = true,
        }
        input
    }

    pub fn is_held(&self, step: Step) -> bool {
        match step {
            Step::Up => self.up,
            Step::Down => self.down,
            Step::Left => self.left,
            Step::Right => self.right,
        }
    }

    /// Highest-priority held direction (up > down > left > right)
    pub fn preferred(&self) -> Option<Step> {
        Step::PRIORITY.into_iter().find(|&step| self.is_held(step))
    }
}

/// Advance the world by `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    world.events.clear();

    if world.phase == GamePhase::GameOver {
        return;
    }

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    world.time += dt;
    world.ticks += 1;

    let tuning = &world.tuning;

    // 1. At most one new hop, rate limited
    world.move_cooldown = (world.move_cooldown - dt).max(0.0);
    if world.move_cooldown <= 0.0 {
        if let Some(step) = input.preferred() {
            if world.player.try_move(step, tuning) {
                world.move_cooldown = tuning.move_cooldown;
                world.events.push(GameEvent::Hopped(step));
            }
        }
    }

    // 2. Hop interpolation / squish timer
    world.player.update(dt, tuning);

    // 3. Ride the log under an idle player
    if world.player.is_idle() {
        let pos = world.player.pos;
        let carry = world
            .obstacles
            .log_at(pos.x, pos.y, tuning)
            .map(|log| log.velocity());
        if let Some(velocity) = carry {
            world.player.drift(velocity * dt);
            if !world.player.is_on_field(tuning) {
                hit(&mut world.player, &mut world.events, HitCause::SweptAway);
            }
        }
    }

    // 4. Terrain window follows the player
    let change = world.terrain.advance(world.player.lane(), tuning);
    for lane in &change.generated {
        world.obstacles.register_lane(lane.index, lane.kind, tuning);
    }
    for &index in &change.evicted {
        world.obstacles.unregister_lane(index);
    }

    // 5. Spawn, move and prune obstacles
    world.obstacles.tick(dt, tuning);

    // 6. Open water
    if world.player.is_idle() {
        let pos = world.player.pos;
        let on_water = world.terrain.lane_kind_at(world.player.lane()) == Some(LaneKind::Water);
        if on_water && world.obstacles.log_at(pos.x, pos.y, tuning).is_none() {
            hit(&mut world.player, &mut world.events, HitCause::Drowned);
        }
    }

    // 7. Cars and trains
    if !world.player.is_down() && world.obstacles.is_colliding(&world.player.footprint(), tuning) {
        hit(&mut world.player, &mut world.events, HitCause::Vehicle);
    }

    // 8. Freeze once the squish is over
    if world.player.is_dead() {
        world.phase = GamePhase::GameOver;
        world.events.push(GameEvent::Died);
        log::info!(
            "Run over after {:.1}s: score {}, lane {}",
            world.time,
            world.score,
            world.best_lane
        );
    }

    // 9. Score only net-new forward progress
    record_progress(world);
}

/// Credit lanes beyond the forward-most lane reached so far
fn record_progress(world: &mut World) {
    let lane = world.player.lane();
    if lane < world.best_lane {
        let gained = (world.best_lane - lane) as u64;
        world.score += gained;
        world.best_lane = lane;
        world.events.push(GameEvent::Scored {
            gained,
            total: world.score,
        });
    }
}

fn hit(player: &mut Player, events: &mut Vec<GameEvent>, cause: HitCause) {
    if player.take_hit() {
        log::debug!("Player hit ({cause:?}) at {}", player.pos);
        events.push(GameEvent::Hit(cause));
    }
}
