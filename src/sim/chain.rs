//! Follower chain - the trailing serpent body
//!
//! A fixed-length sequence of points with chained exponential easing: the
//! head eases toward the input target, every later segment eases toward its
//! predecessor's position from the previous frame. Trailing segments use a
//! smaller easing factor, which is what produces the whip-like lag.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CHAIN_LENGTH, EASE_STEP, HEAD_EASE};

/// One point of the trailing body
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FollowerSegment {
    pub pos: Vec2,
    /// Per-frame interpolation coefficient toward this segment's target
    pub ease: f32,
}

/// Fixed-length chain of follower segments, head first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowerChain {
    segments: [FollowerSegment; CHAIN_LENGTH],
}

impl FollowerChain {
    /// Create a chain with all segments at `center`
    pub fn centered(viewport: Vec2) -> Self {
        let center = viewport / 2.0;
        let segments = std::array::from_fn(|i| FollowerSegment {
            pos: center,
            ease: HEAD_EASE - i as f32 * EASE_STEP,
        });
        Self { segments }
    }

    /// Move every segment back to `home`. Ease factors are untouched.
    pub fn reset(&mut self, home: Vec2) {
        for seg in &mut self.segments {
            seg.pos = home;
        }
    }

    /// Advance the chain one step toward `target`.
    ///
    /// Each segment captures its predecessor's position *before* that
    /// predecessor moves, so the whole chain shifts by exactly one link per
    /// step.
    pub fn advance(&mut self, target: Vec2) {
        let mut chase = target;
        for seg in &mut self.segments {
            let before = seg.pos;
            seg.pos += (chase - seg.pos) * seg.ease;
            chase = before;
        }
    }

    /// Head position (collision anchor)
    pub fn head(&self) -> Vec2 {
        self.segments[0].pos
    }

    /// Orientation of the head visual: angle of the neck-to-head vector.
    /// Pure derived query; falls back to 0 while the chain is collapsed.
    pub fn head_angle(&self) -> f32 {
        let v = self.segments[0].pos - self.segments[1].pos;
        if v.length_squared() < 1e-6 {
            return 0.0;
        }
        v.y.atan2(v.x)
    }

    pub fn segments(&self) -> &[FollowerSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_chain_length_is_fixed() {
        let mut chain = FollowerChain::centered(Vec2::new(800.0, 600.0));
        assert_eq!(chain.len(), CHAIN_LENGTH);
        chain.reset(Vec2::ZERO);
        chain.advance(Vec2::new(100.0, 100.0));
        assert_eq!(chain.len(), CHAIN_LENGTH);
    }

    #[test]
    fn test_ease_decreases_along_chain() {
        let chain = FollowerChain::centered(Vec2::new(800.0, 600.0));
        for pair in chain.segments().windows(2) {
            assert!(pair[1].ease < pair[0].ease);
            assert!(pair[1].ease > 0.0);
        }
    }

    #[test]
    fn test_head_chases_target_trailing_segments_lag() {
        let mut chain = FollowerChain::centered(Vec2::new(800.0, 600.0));
        let target = Vec2::new(700.0, 100.0);
        chain.advance(target);

        let segs = chain.segments();
        let head_dist = segs[0].pos.distance(target);
        let tail_dist = segs[CHAIN_LENGTH - 1].pos.distance(target);
        assert!(head_dist < tail_dist);
        // After one step only the head has moved off center
        assert_eq!(segs[1].pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_chain_converges_on_stationary_target() {
        let mut chain = FollowerChain::centered(Vec2::new(800.0, 600.0));
        let target = Vec2::new(120.0, 80.0);
        for _ in 0..600 {
            chain.advance(target);
        }
        for seg in chain.segments() {
            assert!(seg.pos.distance(target) < 1.0);
        }
    }

    proptest! {
        /// Easing is a convex blend, so a chain that starts on the canvas
        /// and only ever chases on-canvas targets can never leave it.
        #[test]
        fn prop_chain_never_escapes_canvas(
            targets in proptest::collection::vec((0.0f32..800.0, 0.0f32..600.0), 1..60),
        ) {
            let mut chain = FollowerChain::centered(Vec2::new(800.0, 600.0));
            for (x, y) in targets {
                chain.advance(Vec2::new(x, y));
                for seg in chain.segments() {
                    prop_assert!(seg.pos.x >= 0.0 && seg.pos.x <= 800.0);
                    prop_assert!(seg.pos.y >= 0.0 && seg.pos.y <= 600.0);
                }
            }
        }
    }

    #[test]
    fn test_head_angle_tracks_motion_direction() {
        let mut chain = FollowerChain::centered(Vec2::new(800.0, 600.0));
        // Collapsed chain reports a neutral angle
        assert_eq!(chain.head_angle(), 0.0);

        // Pull the head straight right: neck-to-head vector points along +x
        chain.advance(Vec2::new(800.0, 300.0));
        assert!(chain.head_angle().abs() < 1e-4);

        // Pull straight down (+y in canvas coordinates)
        chain.reset(Vec2::new(400.0, 300.0));
        chain.advance(Vec2::new(400.0, 600.0));
        assert!((chain.head_angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
    }
}
