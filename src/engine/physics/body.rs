use super::collision::{CollisionShape, PhysicsSpace};
use crate::core::math::{angle_to, is_zero_approx, project_on_plane};
use glam::{Quat, Vec3};

/// Maximum number of slide iterations per `move_and_slide`
const MAX_SLIDES: usize = 4;

/// Extra tolerance when classifying a contact as floor
const FLOOR_ANGLE_THRESHOLD: f32 = 0.01;

/// Probe distance used to keep floor contact while resting
const FLOOR_PROBE_DISTANCE: f32 = 0.01;

/// A character body moved by code and stopped by collisions.
///
/// The position is the bottom of the collision shape. Rotation is limited to
/// `yaw` around the world up axis.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Rotation around the vertical axis, in radians
    pub yaw: f32,
    pub up_direction: Vec3,
    /// Steepest slope still treated as floor, in radians
    pub floor_max_angle: f32,
    pub floor_snap_length: f32,
    pub shape: CollisionShape,

    on_floor: bool,
    on_wall: bool,
    on_ceiling: bool,
    floor_normal: Vec3,
    wall_normal: Vec3,
}

impl KinematicBody {
    /// Orientation of the body
    pub fn basis(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Forward direction of the body (-Z rotated by yaw)
    pub fn forward(&self) -> Vec3 {
        self.basis() * Vec3::NEG_Z
    }

    /// Check if the last move ended on a floor
    pub fn is_on_floor(&self) -> bool {
        self.on_floor
    }

    /// Check if the last move touched a wall
    pub fn is_on_wall(&self) -> bool {
        self.on_wall
    }

    /// Check if the last move touched a ceiling
    pub fn is_on_ceiling(&self) -> bool {
        self.on_ceiling
    }

    pub fn floor_normal(&self) -> Vec3 {
        self.floor_normal
    }

    pub fn wall_normal(&self) -> Vec3 {
        self.wall_normal
    }

    /// Move along `velocity * delta`, sliding along whatever is hit.
    ///
    /// Contacts are classified as floor, wall or ceiling against
    /// `up_direction`. Velocity loses its component into every surface hit.
    pub fn move_and_slide(&mut self, space: &dyn PhysicsSpace, delta: f32) {
        let was_on_floor = self.on_floor;
        self.on_floor = false;
        self.on_wall = false;
        self.on_ceiling = false;
        self.floor_normal = Vec3::ZERO;
        self.wall_normal = Vec3::ZERO;

        let mut motion = self.velocity * delta;

        for _ in 0..MAX_SLIDES {
            if is_zero_approx(motion) {
                break;
            }

            let result = space.test_motion(&self.shape, self.position, motion);
            self.position += result.travel;

            let Some(contact) = result.collision else {
                break;
            };

            self.classify_contact(contact.normal);
            motion = project_on_plane(result.remainder, contact.normal);

            // Drop the velocity component pointing into the surface
            if self.velocity.dot(contact.normal) < 0.0 {
                self.velocity = project_on_plane(self.velocity, contact.normal);
            }
        }

        // Moving away from the floor never snaps back onto it
        if self.velocity.dot(self.up_direction) > 0.0 {
            return;
        }

        let probe = if was_on_floor {
            self.floor_snap_length.max(FLOOR_PROBE_DISTANCE)
        } else {
            FLOOR_PROBE_DISTANCE
        };
        self.probe_floor(space, probe, was_on_floor);
    }

    /// Snap down onto a floor within `floor_snap_length`
    pub fn apply_floor_snap(&mut self, space: &dyn PhysicsSpace) {
        self.probe_floor(space, self.floor_snap_length, true);
    }

    fn probe_floor(&mut self, space: &dyn PhysicsSpace, distance: f32, snap: bool) {
        let down = -self.up_direction * distance;
        let result = space.test_motion(&self.shape, self.position, down);

        if let Some(contact) = &result.collision {
            if self.is_floor(contact.normal) {
                self.on_floor = true;
                self.floor_normal = contact.normal;
                if snap {
                    self.position += result.travel;
                }
            }
        }
    }

    fn is_floor(&self, normal: Vec3) -> bool {
        angle_to(normal, self.up_direction) <= self.floor_max_angle + FLOOR_ANGLE_THRESHOLD
    }

    fn classify_contact(&mut self, normal: Vec3) {
        if self.is_floor(normal) {
            self.on_floor = true;
            self.floor_normal = normal;
        } else if angle_to(normal, -self.up_direction) <= self.floor_max_angle + FLOOR_ANGLE_THRESHOLD
        {
            self.on_ceiling = true;
        } else {
            self.on_wall = true;
            self.wall_normal = normal;
        }
    }
}

/// Builder for kinematic character bodies
pub struct BodyBuilder {
    position: Vec3,
    yaw: f32,
    up_direction: Vec3,
    floor_max_angle: f32,
    floor_snap_length: f32,
    shape: CollisionShape,
}

impl BodyBuilder {
    /// Create a builder for an upright capsule
    pub fn capsule(radius: f32, height: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            up_direction: Vec3::Y,
            floor_max_angle: 45f32.to_radians(),
            floor_snap_length: 0.1,
            shape: CollisionShape::Capsule { radius, height },
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the initial facing (radians around the vertical axis)
    pub fn yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Set which direction counts as up
    pub fn up_direction(mut self, up: Vec3) -> Self {
        self.up_direction = up.normalize_or_zero();
        self
    }

    /// Set the steepest walkable slope
    pub fn floor_max_angle(mut self, radians: f32) -> Self {
        self.floor_max_angle = radians;
        self
    }

    /// Set how far the body reaches down to stay glued to the floor
    pub fn floor_snap_length(mut self, length: f32) -> Self {
        self.floor_snap_length = length.max(0.0);
        self
    }

    /// Build the body
    pub fn build(self) -> KinematicBody {
        KinematicBody {
            position: self.position,
            velocity: Vec3::ZERO,
            yaw: self.yaw,
            up_direction: self.up_direction,
            floor_max_angle: self.floor_max_angle,
            floor_snap_length: self.floor_snap_length,
            shape: self.shape,
            on_floor: false,
            on_wall: false,
            on_ceiling: false,
            floor_normal: Vec3::ZERO,
            wall_normal: Vec3::ZERO,
        }
    }
}
