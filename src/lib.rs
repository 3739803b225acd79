//! Gyro Serpent - a trailing-serpent dodge game for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (follower chain, obstacle field, session state machine)
//! - `input`: Pointer/tilt samples normalized into a single canvas target
//! - `control`: Explicit control seam between the host shell and the game
//! - `bestscore`: Session-scoped best score persistence
//! - `platform`: Browser glue - scoped event subscriptions, storage, clock
//! - `render`: Canvas-2d presentation

pub mod bestscore;
pub mod control;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod sim;

pub use bestscore::BestScore;
pub use control::{GameControl, SensorOutcome};
pub use input::InputSource;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one frame at nominal refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to bound catch-up after tab-hidden gaps
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Canvas width on desktop (mobile uses the full viewport width)
    pub const DESKTOP_WIDTH: f32 = 900.0;

    /// Follower chain length (head + 4 trailing segments)
    pub const CHAIN_LENGTH: usize = 5;
    /// Easing factor of the head segment
    pub const HEAD_EASE: f32 = 0.35;
    /// Easing falloff per segment (trailing segments lag more)
    pub const EASE_STEP: f32 = 0.05;
    /// Collision radius of the chain head
    pub const HEAD_RADIUS: f32 = 10.0;

    /// Obstacle spawn delay range (milliseconds, uniform)
    pub const SPAWN_DELAY_MIN_MS: f32 = 900.0;
    pub const SPAWN_DELAY_MAX_MS: f32 = 1600.0;

    /// Obstacle diameter range (pixels)
    pub const OBSTACLE_SIZE_MIN: f32 = 14.0;
    pub const OBSTACLE_SIZE_MAX: f32 = 44.0;
    /// Obstacle fall speed range (pixels/second)
    pub const OBSTACLE_SPEED_MIN: f32 = 110.0;
    pub const OBSTACLE_SPEED_MAX: f32 = 300.0;
    /// Maximum horizontal drift magnitude (pixels/second)
    pub const OBSTACLE_DRIFT_MAX: f32 = 45.0;
    /// How far below the viewport an obstacle must be before removal
    pub const DESPAWN_MARGIN: f32 = 24.0;
}
