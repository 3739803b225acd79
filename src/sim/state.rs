//! Session state and core simulation types
//!
//! Everything the session controller mutates per frame lives here. The RNG is
//! owned by the state so a whole run is reproducible from its seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chain::FollowerChain;
use super::obstacles::Obstacle;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Intro overlay showing, field empty, nothing moves
    Intro,
    /// Active round, score running
    Playing,
    /// Round ended by collision, frozen until retry
    GameOver,
}

/// Externally observable display state, pushed to the host shell on change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    #[serde(rename = "gameOver")]
    pub game_over: bool,
    /// Elapsed seconds of the current (or final) round, one decimal
    pub score: f32,
    /// Session best, one decimal
    #[serde(rename = "bestScore")]
    pub best_score: f32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG for spawn randomness, owned by the state for determinism
    pub rng: Pcg32,
    /// Current phase (exactly one at any time)
    pub phase: GamePhase,
    /// Elapsed seconds in the current round
    pub elapsed: f32,
    /// Score in tenths of a second; exact freeze/compare/persist
    pub score_tenths: u32,
    /// Session best in tenths of a second
    pub best_tenths: u32,
    /// Milliseconds accumulated since the last spawn
    pub spawn_clock_ms: f32,
    /// Randomly drawn delay the spawn clock must reach
    pub spawn_deadline_ms: f32,
    /// The trailing body
    pub chain: FollowerChain,
    /// Falling obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Canvas dimensions in logical pixels
    pub viewport: Vec2,
    /// Set whenever a HUD-visible value changed this tick
    pub hud_dirty: bool,
}

impl GameState {
    /// Create a fresh session in the Intro phase
    pub fn new(seed: u64, viewport: Vec2) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawn_deadline_ms = draw_spawn_delay(&mut rng);
        Self {
            seed,
            rng,
            phase: GamePhase::Intro,
            elapsed: 0.0,
            score_tenths: 0,
            best_tenths: 0,
            spawn_clock_ms: 0.0,
            spawn_deadline_ms,
            chain: FollowerChain::centered(viewport),
            obstacles: Vec::new(),
            viewport,
            hud_dirty: true,
        }
    }

    /// Reset for a new round: empty field, fresh spawn delay, zero score,
    /// chain re-homed to the canvas center. Best score is untouched.
    pub fn reset_round(&mut self) {
        self.obstacles.clear();
        self.spawn_clock_ms = 0.0;
        self.spawn_deadline_ms = draw_spawn_delay(&mut self.rng);
        self.elapsed = 0.0;
        self.score_tenths = 0;
        self.chain.reset(self.viewport / 2.0);
        self.hud_dirty = true;
    }

    /// Update canvas dimensions and re-home the chain to the new center.
    /// Chain length is unaffected; obstacle spawn range and the removal
    /// bound pick up the new size on the next tick.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.chain.reset(viewport / 2.0);
    }

    /// Current score in 1-decimal seconds
    pub fn score(&self) -> f32 {
        self.score_tenths as f32 / 10.0
    }

    /// Session best in 1-decimal seconds
    pub fn best_score(&self) -> f32 {
        self.best_tenths as f32 / 10.0
    }

    /// Snapshot of the externally observable display state
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            game_over: self.phase == GamePhase::GameOver,
            score: self.score(),
            best_score: self.best_score(),
        }
    }
}

/// Draw the next obstacle spawn delay (uniform, milliseconds)
pub fn draw_spawn_delay(rng: &mut Pcg32) -> f32 {
    rng.random_range(SPAWN_DELAY_MIN_MS..SPAWN_DELAY_MAX_MS)
}
