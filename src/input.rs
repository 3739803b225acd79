//! Input source - one (x, y) target per frame
//!
//! Pointer positions and device-orientation samples are normalized into a
//! single canvas-space target. An active orientation sensor wins; otherwise
//! the last known pointer position; before any input at all, the canvas
//! center. Samples are latest-value-wins: event callbacks overwrite the
//! slots out-of-band and the frame loop reads whatever is current.

use glam::Vec2;

/// One device-orientation sample, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    /// Front-back tilt (rotation about the device x-axis)
    pub beta: f32,
    /// Left-right tilt (rotation about the device y-axis)
    pub gamma: f32,
}

impl Tilt {
    /// Map clamped tilt angles linearly onto the canvas.
    ///
    /// Gamma spans the width, beta the height, each clamped to [-90, 90]
    /// so extreme holds pin the target to the canvas edge.
    pub fn to_canvas(self, viewport: Vec2) -> Vec2 {
        let x = (self.gamma.clamp(-90.0, 90.0) + 90.0) / 180.0 * viewport.x;
        let y = (self.beta.clamp(-90.0, 90.0) + 90.0) / 180.0 * viewport.y;
        Vec2::new(x, y)
    }
}

/// Normalized input state feeding the session controller
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSource {
    pointer: Option<Vec2>,
    tilt: Option<Tilt>,
    sensor_active: bool,
}

impl InputSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer position in canvas coordinates
    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    /// Record an orientation sample (overwrites the previous one)
    pub fn set_tilt(&mut self, tilt: Tilt) {
        self.tilt = Some(tilt);
    }

    /// Flip the sensor on once permission is granted and the listener is
    /// registered, or back off at teardown
    pub fn set_sensor_active(&mut self, active: bool) {
        self.sensor_active = active;
    }

    pub fn sensor_active(&self) -> bool {
        self.sensor_active
    }

    /// The chase target for this frame
    pub fn target(&self, viewport: Vec2) -> Vec2 {
        if self.sensor_active {
            if let Some(tilt) = self.tilt {
                return tilt.to_canvas(viewport);
            }
        }
        self.pointer.unwrap_or(viewport / 2.0)
    }
}
