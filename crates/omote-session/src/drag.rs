//! Drag smoothing - eased pointer-follow for head/gaze parameters
//!
//! Raw drag positions jump with every pointer sample; feeding them into
//! the face parameters directly makes the head snap. The easer moves the
//! published value toward the target exponentially so the face turns with
//! a short, constant-feeling lag regardless of frame rate.

use omote_core::Vec2;

/// Smoothed drag point in normalized view coordinates ([-1, 1] per axis)
#[derive(Debug, Clone)]
pub struct DragEaser {
    target: Vec2,
    value: Vec2,
    /// Seconds to close ~63% of the remaining distance
    time_constant: f32,
}

impl DragEaser {
    pub const DEFAULT_TIME_CONSTANT: f32 = 0.15;

    pub fn new(time_constant: f32) -> Self {
        DragEaser {
            target: Vec2::ZERO,
            value: Vec2::ZERO,
            time_constant: time_constant.max(f32::EPSILON),
        }
    }

    /// Set the follow target; clamped to the normalized view square
    pub fn set_target(&mut self, x: f32, y: f32) {
        self.target = Vec2::new(x, y).clamp(-1.0, 1.0);
    }

    /// Advance the eased value by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let alpha = 1.0 - (-dt / self.time_constant).exp();
        self.value = self.value + (self.target - self.value) * alpha;
    }

    /// Current eased position
    pub fn value(&self) -> Vec2 {
        self.value
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Drop both target and value back to center immediately
    pub fn reset(&mut self) {
        self.target = Vec2::ZERO;
        self.value = Vec2::ZERO;
    }
}

impl Default for DragEaser {
    fn default() -> Self {
        DragEaser::new(Self::DEFAULT_TIME_CONSTANT)
    }
}
