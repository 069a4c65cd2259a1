// First-person camera rig: head pitch, head/eyes roll and eye height

use crate::core::math::{approx_equal, lerp, CMP_EPSILON};

/// How fast roll approaches its target, per second
const ROLL_EASE_SPEED: f32 = 8.0;

/// How fast the eyes follow a stance change, per second
const HEAD_HEIGHT_EASE_SPEED: f32 = 10.0;

/// The head and eyes nodes of a first-person character.
///
/// Pitch follows the mouse directly. Roll and eye height have targets that
/// states set and that are eased toward once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// Rotation around the local X axis, in radians
    pub head_pitch: f32,
    head_roll: f32,
    head_roll_target: f32,
    eyes_roll: f32,
    eyes_roll_target: f32,
    head_height: f32,
    head_height_target: f32,
}

impl CameraRig {
    pub fn new(head_height: f32) -> Self {
        Self {
            head_pitch: 0.0,
            head_roll: 0.0,
            head_roll_target: 0.0,
            eyes_roll: 0.0,
            eyes_roll_target: 0.0,
            head_height,
            head_height_target: head_height,
        }
    }

    pub fn head_roll(&self) -> f32 {
        self.head_roll
    }

    pub fn head_roll_target(&self) -> f32 {
        self.head_roll_target
    }

    pub fn eyes_roll(&self) -> f32 {
        self.eyes_roll
    }

    pub fn eyes_roll_target(&self) -> f32 {
        self.eyes_roll_target
    }

    pub fn head_height(&self) -> f32 {
        self.head_height
    }

    pub fn head_height_target(&self) -> f32 {
        self.head_height_target
    }

    pub fn set_head_roll_target(&mut self, radians: f32) {
        self.head_roll_target = radians;
    }

    pub fn set_eyes_roll_target(&mut self, radians: f32) {
        self.eyes_roll_target = radians;
    }

    pub fn set_head_height_target(&mut self, height: f32) {
        self.head_height_target = height;
    }

    /// Move the head roll part of the way to `radians` right now
    pub fn blend_head_roll(&mut self, radians: f32, weight: f32) {
        self.head_roll = lerp(self.head_roll, radians, weight.clamp(0.0, 1.0));
        self.head_roll_target = radians;
    }

    /// Jump straight to a head roll, skipping the easing
    pub fn snap_head_roll(&mut self, radians: f32) {
        self.head_roll = radians;
        self.head_roll_target = radians;
    }

    /// Check if every eased value has reached its target
    pub fn is_settled(&self) -> bool {
        approx_equal(self.head_roll, self.head_roll_target, CMP_EPSILON)
            && approx_equal(self.eyes_roll, self.eyes_roll_target, CMP_EPSILON)
            && approx_equal(self.head_height, self.head_height_target, CMP_EPSILON)
    }

    /// Ease roll and eye height toward their targets
    pub fn update(&mut self, delta: f32) {
        let roll_weight = (delta * ROLL_EASE_SPEED).min(1.0);
        self.head_roll = lerp(self.head_roll, self.head_roll_target, roll_weight);
        self.eyes_roll = lerp(self.eyes_roll, self.eyes_roll_target, roll_weight);

        let height_weight = (delta * HEAD_HEIGHT_EASE_SPEED).min(1.0);
        self.head_height = lerp(self.head_height, self.head_height_target, height_weight);
    }
}
