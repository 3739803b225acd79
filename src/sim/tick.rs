//! Fixed timestep session tick
//!
//! The session controller: one `tick` advances the chain, the obstacle
//! field and the score, and drives the Intro -> Playing -> GameOver -> retry
//! state machine deterministically.

use glam::Vec2;

use super::obstacles;
use super::state::{GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Target the chain head chases; None until any input has arrived
    pub target: Option<Vec2>,
    /// Start command from the intro overlay
    pub start: bool,
    /// Retry command from the game-over overlay
    pub retry: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Intro => {
            // Field stays empty and nothing moves until the start command
            if input.start {
                state.reset_round();
                state.phase = GamePhase::Playing;
            }
        }

        GamePhase::Playing => {
            let target = input.target.unwrap_or(state.viewport / 2.0);
            state.chain.advance(target);
            obstacles::advance_field(state, dt);

            // First overlap ends the round with the score frozen at its
            // current rounded value; remaining obstacles go untested
            if obstacles::find_collision(state.chain.head(), &state.obstacles).is_some() {
                state.phase = GamePhase::GameOver;
                if state.score_tenths > state.best_tenths {
                    state.best_tenths = state.score_tenths;
                }
                state.hud_dirty = true;
                return;
            }

            // Score is elapsed seconds rounded to one decimal; the HUD is
            // only notified when the visible value actually changes
            state.elapsed += dt;
            let tenths = (state.elapsed * 10.0).round() as u32;
            if tenths != state.score_tenths {
                state.score_tenths = tenths;
                state.hud_dirty = true;
            }
        }

        GamePhase::GameOver => {
            // Obstacles stay frozen for the terminal frame. The chain keeps
            // following input so the serpent idles under the overlay.
            if let Some(target) = input.target {
                state.chain.advance(target);
            }
            if input.retry {
                state.reset_round();
                state.phase = GamePhase::Playing;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CHAIN_LENGTH, SIM_DT};
    use crate::sim::Obstacle;

    /// Viewport large enough that naturally spawned obstacles cannot reach
    /// the centered chain within a few simulated seconds
    fn big_state(seed: u64) -> GameState {
        GameState::new(seed, Vec2::new(10_000.0, 10_000.0))
    }

    /// Drop an obstacle directly onto the chain head
    fn inject_collision(state: &mut GameState) {
        state.obstacles.push(Obstacle {
            pos: state.chain.head(),
            speed: 100.0,
            size: 40.0,
            drift: 0.0,
        });
    }

    fn run(state: &mut GameState, input: &TickInput, seconds: f32) {
        let steps = (seconds / 0.1).round() as u32;
        for _ in 0..steps {
            tick(state, input, 0.1);
        }
    }

    #[test]
    fn test_intro_ignores_time_and_keeps_field_empty() {
        let mut state = big_state(1);
        run(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.phase, GamePhase::Intro);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score_tenths, 0);
    }

    #[test]
    fn test_start_enters_playing_with_fresh_round() {
        let mut state = big_state(1);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score_tenths, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.chain.len(), CHAIN_LENGTH);
    }

    #[test]
    fn test_score_runs_then_freezes_on_collision() {
        let mut state = big_state(2);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );

        // 3.4 seconds of play, no collision
        run(&mut state, &TickInput::default(), 3.4);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score_tenths, 34);
        assert_eq!(state.best_tenths, 0);

        // Inject a collision: round ends, score freezes, best is folded in
        inject_collision(&mut state);
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score_tenths, 34);
        assert_eq!(state.best_tenths, 34);

        // Frozen: more time changes nothing
        run(&mut state, &TickInput::default(), 2.0);
        assert_eq!(state.score_tenths, 34);

        // Retry starts a fresh round with the best preserved
        tick(
            &mut state,
            &TickInput {
                retry: true,
                ..Default::default()
            },
            0.1,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score_tenths, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.best_tenths, 34);
    }

    #[test]
    fn test_best_is_monotonic_across_rounds() {
        let mut state = big_state(3);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );

        // Round one: 5.0 seconds
        run(&mut state, &TickInput::default(), 5.0);
        inject_collision(&mut state);
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.best_tenths, 50);

        // Round two: only 2.0 seconds, best must not regress
        tick(
            &mut state,
            &TickInput {
                retry: true,
                ..Default::default()
            },
            0.1,
        );
        run(&mut state, &TickInput::default(), 2.0);
        inject_collision(&mut state);
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.best_tenths, 50);
    }

    #[test]
    fn test_retry_is_idempotent() {
        let mut state = big_state(4);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        inject_collision(&mut state);
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.phase, GamePhase::GameOver);

        let retry = TickInput {
            retry: true,
            ..Default::default()
        };
        for _ in 0..3 {
            tick(&mut state, &retry, 0.1);
            assert_eq!(state.phase, GamePhase::Playing);
            assert_eq!(state.score_tenths, 0);
            assert!(state.obstacles.is_empty());
            // Force back to game over for the next iteration
            inject_collision(&mut state);
            tick(&mut state, &TickInput::default(), 0.1);
            assert_eq!(state.phase, GamePhase::GameOver);
        }
    }

    #[test]
    fn test_game_over_freezes_obstacle_field() {
        let mut state = big_state(5);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        run(&mut state, &TickInput::default(), 3.0);
        assert!(!state.obstacles.is_empty());

        inject_collision(&mut state);
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.phase, GamePhase::GameOver);

        let frozen: Vec<Vec2> = state.obstacles.iter().map(|o| o.pos).collect();
        run(&mut state, &TickInput::default(), 5.0);
        let after: Vec<Vec2> = state.obstacles.iter().map(|o| o.pos).collect();
        assert_eq!(frozen, after);
    }

    #[test]
    fn test_spawning_follows_drawn_delays() {
        let mut state = big_state(6);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );

        // Nothing can spawn before the minimum delay
        run(&mut state, &TickInput::default(), 0.8);
        assert!(state.obstacles.is_empty());

        // By the maximum delay the first obstacle must be out
        run(&mut state, &TickInput::default(), 0.9);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_hud_dirty_only_on_tenth_boundaries() {
        let mut state = big_state(7);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        state.hud_dirty = false;

        // 0.04s: rounded score still 0.0
        tick(&mut state, &TickInput::default(), 0.04);
        assert!(!state.hud_dirty);

        // Crossing 0.1s flips the flag
        tick(&mut state, &TickInput::default(), 0.08);
        assert!(state.hud_dirty);
    }

    #[test]
    fn test_determinism_for_equal_seeds() {
        let mut a = big_state(99);
        let mut b = big_state(99);
        let inputs = [
            TickInput {
                start: true,
                ..Default::default()
            },
            TickInput {
                target: Some(Vec2::new(300.0, 200.0)),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for input in &inputs {
            for _ in 0..120 {
                tick(&mut a, input, SIM_DT);
                tick(&mut b, input, SIM_DT);
            }
        }

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score_tenths, b.score_tenths);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (oa, ob) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(oa.pos, ob.pos);
        }
        assert_eq!(a.chain.head(), b.chain.head());
    }
}
