// Detectors: the ray and shape probes a first-person character carries

use glam::{Quat, Vec3};

use super::settings::BodySettings;
use crate::engine::physics::{CollisionShape, PhysicsSpace, RayProbe, ShapeProbe};

/// How far the wall detectors reach from the body axis
const WALL_REACH: f32 = 0.8;

/// Height of the side wall detectors
const SIDE_HEIGHT: f32 = 1.0;

/// Smallest sweep the ceiling check ever does
const MIN_CEILING_CLEARANCE: f32 = 0.1;

/// Probes attached to the character, in body-local space (-Z is forward).
///
/// The ledge probe is positioned by the movement code from the front hit
/// point, so `refresh` leaves it alone.
#[derive(Debug, Clone)]
pub struct Detectors {
    pub front: RayProbe,
    /// Upper front probe; a wall must reach it to be run up
    pub top_front: RayProbe,
    pub right: RayProbe,
    pub left: RayProbe,
    pub back_left: RayProbe,
    pub back_right: RayProbe,
    /// Cast down from above a wall to find its top
    pub ledge: RayProbe,
    /// Surface under the feet, used for footsteps
    pub floor: RayProbe,
    /// Sweeps the current capsule upward to see if standing up is possible
    pub ceiling: ShapeProbe,
}

impl Detectors {
    pub fn new(settings: &BodySettings) -> Self {
        let diagonal = WALL_REACH * std::f32::consts::FRAC_1_SQRT_2;
        let side = Vec3::new(0.0, SIDE_HEIGHT, 0.0);

        Self {
            front: RayProbe::new("front", Vec3::new(0.0, 0.6, 0.0), Vec3::new(0.0, 0.6, -1.0)),
            top_front: RayProbe::new(
                "top_front",
                Vec3::new(0.0, settings.stand_head_height, 0.0),
                Vec3::new(0.0, settings.stand_head_height, -1.0),
            ),
            right: RayProbe::new("right", side, side + Vec3::X * WALL_REACH),
            left: RayProbe::new("left", side, side - Vec3::X * WALL_REACH),
            back_left: RayProbe::new("back_left", side, side + Vec3::new(-diagonal, 0.0, diagonal))
                .disabled(),
            back_right: RayProbe::new("back_right", side, side + Vec3::new(diagonal, 0.0, diagonal))
                .disabled(),
            ledge: RayProbe::new("ledge", Vec3::ZERO, Vec3::new(0.0, -3.0, 0.0)).disabled(),
            floor: RayProbe::new("floor", Vec3::new(0.0, 0.1, 0.0), Vec3::new(0.0, -0.3, 0.0))
                .disabled(),
            ceiling: ShapeProbe::new(
                "ceiling",
                standing_shape(settings),
                Vec3::Y * MIN_CEILING_CLEARANCE,
            ),
        }
    }

    /// Re-cast every body-attached probe from the body's current transform
    pub fn refresh(&mut self, space: &dyn PhysicsSpace, position: Vec3, basis: Quat) {
        for probe in [
            &mut self.front,
            &mut self.top_front,
            &mut self.right,
            &mut self.left,
            &mut self.back_left,
            &mut self.back_right,
            &mut self.floor,
        ] {
            probe.force_update(space, position, basis);
        }
        self.ceiling.force_update(space, position);
    }

    /// Sweep `shape` up by whatever it lacks to reach standing height
    pub fn fit_ceiling_check(&mut self, shape: CollisionShape, stand_height: f32, up: Vec3) {
        let clearance = (stand_height - shape.height()).max(MIN_CEILING_CLEARANCE);
        self.ceiling.shape = shape;
        self.ceiling.motion = up * clearance;
    }

    /// Check if something overhead prevents standing up
    pub fn ceiling_blocked(&self) -> bool {
        self.ceiling.is_colliding()
    }

    pub fn set_back_detectors_enabled(&mut self, enabled: bool) {
        self.back_left.enabled = enabled;
        self.back_right.enabled = enabled;
    }
}

/// Capsule of a standing character
pub fn standing_shape(settings: &BodySettings) -> CollisionShape {
    CollisionShape::Capsule {
        radius: settings.radius,
        height: settings.stand_height,
    }
}
