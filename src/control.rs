//! Control seam between the host shell and the game
//!
//! The host shell issues commands exclusively through [`GameControl`]
//! instead of reaching into game internals, and the sensor handshake
//! reports its outcome as a plain value rather than a callback.

use crate::sim::{GamePhase, GameState};

/// Result of attempting to bring the orientation sensor online
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorOutcome {
    /// Listener registered; tilt samples will flow
    Activated,
    /// A permission request is in flight; activation may land frames later
    Pending,
    /// No sensor, or permission denied; pointer input stays in charge
    PointerFallback,
}

/// Commands the host shell may issue
pub trait GameControl {
    /// Reset the session for a fresh round
    fn reset(&mut self);
    /// Enter or leave the intro state
    fn set_intro_active(&mut self, active: bool);
    /// Try to activate the orientation sensor; never blocks, never fails hard
    fn activate_sensor(&mut self) -> SensorOutcome;
}

impl GameControl for GameState {
    fn reset(&mut self) {
        self.reset_round();
    }

    fn set_intro_active(&mut self, active: bool) {
        if active {
            // Entering Intro forcibly empties the obstacle field
            self.reset_round();
            self.phase = GamePhase::Intro;
        } else if self.phase == GamePhase::Intro {
            self.reset_round();
            self.phase = GamePhase::Playing;
        }
        self.hud_dirty = true;
    }

    /// Headless state has no sensor; the wasm shell overrides this with the
    /// real permission handshake.
    fn activate_sensor(&mut self) -> SensorOutcome {
        SensorOutcome::PointerFallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_intro_toggle_clears_field_and_switches_phase() {
        let mut state = GameState::new(11, Vec2::new(800.0, 600.0));
        state.set_intro_active(false);
        assert_eq!(state.phase, GamePhase::Playing);

        state.obstacles.push(crate::sim::Obstacle {
            pos: Vec2::new(100.0, 100.0),
            speed: 150.0,
            size: 20.0,
            drift: 0.0,
        });
        state.set_intro_active(true);
        assert_eq!(state.phase, GamePhase::Intro);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_headless_sensor_activation_falls_back() {
        let mut state = GameState::new(11, Vec2::new(800.0, 600.0));
        assert_eq!(state.activate_sensor(), SensorOutcome::PointerFallback);
    }
}
