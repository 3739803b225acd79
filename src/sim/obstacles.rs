//! Obstacle field - spawning, motion, removal, collision
//!
//! Obstacles enter at the top edge with randomized position, size, fall
//! speed and horizontal drift, and leave once they are fully below the
//! viewport. The field only ever changes while a round is live; on game
//! over it freezes in place so the terminal frame keeps its obstacles.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GameState, draw_spawn_delay};
use crate::consts::*;

/// A falling obstacle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    /// Fall speed, pixels/second
    pub speed: f32,
    /// Diameter, pixels
    pub size: f32,
    /// Signed horizontal drift, pixels/second
    pub drift: f32,
}

impl Obstacle {
    /// Spawn just above the top edge at a random horizontal position
    pub fn spawn(rng: &mut Pcg32, width: f32) -> Self {
        let size = rng.random_range(OBSTACLE_SIZE_MIN..OBSTACLE_SIZE_MAX);
        let half = size / 2.0;
        let max_x = (width - half).max(half);
        let x = if max_x > half {
            rng.random_range(half..max_x)
        } else {
            width / 2.0
        };
        Self {
            pos: Vec2::new(x, -half),
            speed: rng.random_range(OBSTACLE_SPEED_MIN..OBSTACLE_SPEED_MAX),
            size,
            drift: rng.random_range(-OBSTACLE_DRIFT_MAX..OBSTACLE_DRIFT_MAX),
        }
    }

    /// Collision radius derived from the visual size
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// True once the whole obstacle has passed the bottom of the viewport
    /// by at least [`DESPAWN_MARGIN`]
    pub fn is_gone(&self, height: f32) -> bool {
        self.pos.y - self.size / 2.0 > height + DESPAWN_MARGIN
    }
}

/// Advance spawn timing, motion and removal for one tick.
///
/// Callers gate this on the Playing phase; Intro never spawns and GameOver
/// keeps the field frozen.
pub(super) fn advance_field(state: &mut GameState, dt: f32) {
    state.spawn_clock_ms += dt * 1000.0;
    if state.spawn_clock_ms >= state.spawn_deadline_ms {
        let obstacle = Obstacle::spawn(&mut state.rng, state.viewport.x);
        state.obstacles.push(obstacle);
        state.spawn_clock_ms = 0.0;
        state.spawn_deadline_ms = draw_spawn_delay(&mut state.rng);
    }

    for o in &mut state.obstacles {
        o.pos.y += o.speed * dt;
        o.pos.x += o.drift * dt;
    }

    let height = state.viewport.y;
    state.obstacles.retain(|o| !o.is_gone(height));
}

/// Index of the first obstacle overlapping the chain head, if any.
/// Overlap is a plain circle test: head radius plus the obstacle radius.
pub fn find_collision(head: Vec2, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| head.distance(o.pos) < HEAD_RADIUS + o.radius())
}
