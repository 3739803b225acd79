//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the state
//! - No rendering or platform dependencies

pub mod chain;
pub mod obstacles;
pub mod state;
pub mod tick;

pub use chain::{FollowerChain, FollowerSegment};
pub use obstacles::{Obstacle, find_collision};
pub use state::{GamePhase, GameState, HudSnapshot};
pub use tick::{TickInput, tick};
