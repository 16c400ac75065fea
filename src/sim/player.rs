//! The player character
//!
//! Moves one grid cell per hop. A hop takes ~0.1 s during which the position
//! interpolates from the origin cell to the target cell. While standing still
//! on a log the position drifts continuously with it (see `tick`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// One discrete hop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Forward (toward smaller lane indices)
    Up,
    Down,
    Left,
    Right,
}

impl Step {
    /// Priority order when several directions are held
    pub const PRIORITY: [Step; 4] = [Step::Up, Step::Down, Step::Left, Step::Right];

    /// Grid offset of this hop
    pub fn delta(&self) -> Vec2 {
        match self {
            Step::Up => Vec2::new(0.0, -1.0),
            Step::Down => Vec2::new(0.0, 1.0),
            Step::Left => Vec2::new(-1.0, 0.0),
            Step::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Player life/motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Standing on a cell (possibly riding a log)
    Idle,
    /// Mid-hop
    Moving,
    /// Squished, waiting out the squish animation
    Hit,
    /// Terminal
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Grid position, top-left of the occupied cell
    pub pos: Vec2,
    /// Where the current hop started
    origin: Vec2,
    /// Where the current hop lands
    target: Vec2,
    /// Hop progress in [0, 1]
    progress: f32,
    state: PlayerState,
    /// Time spent squished
    squish_timer: f32,
    /// Direction of the hop in flight
    step: Option<Step>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            origin: pos,
            target: pos,
            progress: 0.0,
            state: PlayerState::Idle,
            squish_timer: 0.0,
            step: None,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == PlayerState::Idle
    }

    pub fn is_moving(&self) -> bool {
        self.state == PlayerState::Moving
    }

    /// Hit or dead
    pub fn is_down(&self) -> bool {
        matches!(self.state, PlayerState::Hit | PlayerState::Dead)
    }

    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    /// Cell the current hop lands on (current cell when idle)
    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Hop in flight, if any
    pub fn step(&self) -> Option<Step> {
        self.step
    }

    /// Current lane (camera index)
    pub fn lane(&self) -> i32 {
        crate::lane_of(self.pos.y)
    }

    /// Start a hop. Rejected while not idle or when the target is off-grid
    /// (left/right edges and the rear edge bound moves; forward is unbounded).
    pub fn try_move(&mut self, step: Step, tuning: &Tuning) -> bool {
        if self.state != PlayerState::Idle {
            return false;
        }

        let target = self.pos + step.delta();
        if target.x < 0.0 || target.x >= tuning.width() {
            return false;
        }
        if target.y >= tuning.grid_height as f32 {
            return false;
        }

        self.origin = self.pos;
        self.target = target;
        self.progress = 0.0;
        self.step = Some(step);
        self.state = PlayerState::Moving;
        true
    }

    /// Advance hop interpolation or the squish timer
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        match self.state {
            PlayerState::Moving => {
                self.progress += tuning.move_rate * dt;
                if self.progress >= 1.0 {
                    self.pos = self.target;
                    self.progress = 0.0;
                    self.step = None;
                    self.state = PlayerState::Idle;
                } else {
                    self.pos = self.origin.lerp(self.target, self.progress);
                }
            }
            PlayerState::Hit => {
                self.squish_timer += dt;
                if self.squish_timer >= tuning.squish_duration {
                    self.state = PlayerState::Dead;
                }
            }
            PlayerState::Idle | PlayerState::Dead => {}
        }
    }

    /// Get squished. Returns false if already hit or dead.
    pub fn take_hit(&mut self) -> bool {
        if self.is_down() {
            return false;
        }
        self.state = PlayerState::Hit;
        self.squish_timer = 0.0;
        true
    }

    /// Continuous sideways carry (log riding); only applies while idle
    pub fn drift(&mut self, dx: f32) {
        if self.state == PlayerState::Idle {
            self.pos.x += dx;
            self.origin = self.pos;
            self.target = self.pos;
        }
    }

    /// Whether x is still over the field
    pub fn is_on_field(&self, tuning: &Tuning) -> bool {
        self.pos.x >= 0.0 && self.pos.x < tuning.width()
    }

    /// Occupied cell; collision checks pad it
    pub fn footprint(&self) -> Rect {
        Rect::cell(self.pos)
    }

    /// Render-only vertical hop offset
    pub fn hop_height(&self, tuning: &Tuning) -> f32 {
        if self.state == PlayerState::Moving {
            (self.progress * std::f32::consts::PI).sin() * tuning.hop_height
        } else {
            0.0
        }
    }

    /// Render-only squash scale: 1 standing, down to 0.3 when fully squished
    pub fn squish_factor(&self, tuning: &Tuning) -> f32 {
        if self.is_down() {
            let t = (self.squish_timer / tuning.squish_duration).min(1.0);
            1.0 - t * 0.7
        } else {
            1.0
        }
    }
}
