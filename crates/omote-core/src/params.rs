//! Standard animation parameter and motion constants
//!
//! These mirror the conventional parameter ids of 2D avatar models.
//! The model handle is free to ignore ids it does not carry; pushing a
//! value for an absent parameter is a no-op by contract.

/// Head yaw, driven by the horizontal drag position (scaled to ±30)
pub const PARAM_ANGLE_X: &str = "ParamAngleX";
/// Head pitch, driven by the vertical drag position (scaled to ±30)
pub const PARAM_ANGLE_Y: &str = "ParamAngleY";
/// Head roll, driven by the drag cross term (scaled to ±30)
pub const PARAM_ANGLE_Z: &str = "ParamAngleZ";
/// Body lean, driven by the horizontal drag position (scaled to ±10)
pub const PARAM_BODY_ANGLE_X: &str = "ParamBodyAngleX";
/// Gaze, driven by the drag position directly (±1)
pub const PARAM_EYE_BALL_X: &str = "ParamEyeBallX";
pub const PARAM_EYE_BALL_Y: &str = "ParamEyeBallY";
/// Mouth openness, driven by the lip-sync envelope
pub const PARAM_MOUTH_OPEN_Y: &str = "ParamMouthOpenY";

/// Named motion groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionGroup {
    /// Played at random whenever no other motion runs
    Idle,
    /// Played when the body hit area is tapped
    TapBody,
}

impl MotionGroup {
    pub fn id(self) -> &'static str {
        match self {
            MotionGroup::Idle => "Idle",
            MotionGroup::TapBody => "TapBody",
        }
    }
}

/// Named hit areas for tap dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitArea {
    Head,
    Body,
}

impl HitArea {
    pub fn id(self) -> &'static str {
        match self {
            HitArea::Head => "Head",
            HitArea::Body => "Body",
        }
    }
}

/// Motion priorities - a running motion is only preempted by a strictly
/// higher priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MotionPriority {
    None,
    Idle,
    Normal,
    Force,
}

impl MotionPriority {
    pub fn value(self) -> i32 {
        match self {
            MotionPriority::None => 0,
            MotionPriority::Idle => 1,
            MotionPriority::Normal => 2,
            MotionPriority::Force => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(MotionPriority::Force > MotionPriority::Normal);
        assert!(MotionPriority::Normal > MotionPriority::Idle);
        assert_eq!(MotionPriority::None.value(), 0);
        assert_eq!(MotionPriority::Force.value(), 3);
    }
}
