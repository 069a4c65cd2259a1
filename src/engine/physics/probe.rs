// Ray and shape probes attached to a body (wall, ledge, floor and ceiling detectors)

use super::collision::{ColliderInfo, CollisionShape, PhysicsSpace, RayHit};
use glam::{Quat, Vec3};

/// A ray fixed to a body, expressed in the body's local space
#[derive(Debug, Clone)]
pub struct RayProbe {
    pub name: &'static str,
    /// Local start of the ray
    pub origin: Vec3,
    /// Local end of the ray
    pub target: Vec3,
    pub enabled: bool,
    hit: Option<RayHit>,
}

impl RayProbe {
    pub fn new(name: &'static str, origin: Vec3, target: Vec3) -> Self {
        Self {
            name,
            origin,
            target,
            enabled: true,
            hit: None,
        }
    }

    /// Start disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Re-cast the ray from the body's current transform
    pub fn force_update(&mut self, space: &dyn PhysicsSpace, position: Vec3, basis: Quat) {
        let from = position + basis * self.origin;
        let to = position + basis * self.target;
        self.cast(space, from, to);
    }

    /// Re-cast the ray from an arbitrary world origin, keeping its local offset
    pub fn force_update_at(&mut self, space: &dyn PhysicsSpace, world_origin: Vec3, basis: Quat) {
        let from = world_origin + basis * self.origin;
        let to = world_origin + basis * self.target;
        self.cast(space, from, to);
    }

    fn cast(&mut self, space: &dyn PhysicsSpace, from: Vec3, to: Vec3) {
        self.hit = if self.enabled {
            space.cast_ray(from, to)
        } else {
            None
        };
    }

    pub fn is_colliding(&self) -> bool {
        self.hit.is_some()
    }

    /// Hit normal, zero when nothing was hit
    pub fn collision_normal(&self) -> Vec3 {
        self.hit.as_ref().map(|hit| hit.normal).unwrap_or(Vec3::ZERO)
    }

    /// Hit point, zero when nothing was hit
    pub fn collision_point(&self) -> Vec3 {
        self.hit.as_ref().map(|hit| hit.point).unwrap_or(Vec3::ZERO)
    }

    pub fn collider(&self) -> Option<&ColliderInfo> {
        self.hit.as_ref().map(|hit| &hit.collider)
    }

    /// Forget the last result
    pub fn clear(&mut self) {
        self.hit = None;
    }
}

/// A shape swept from a body along a fixed motion
#[derive(Debug, Clone)]
pub struct ShapeProbe {
    pub name: &'static str,
    pub shape: CollisionShape,
    /// Local motion of the sweep
    pub motion: Vec3,
    pub enabled: bool,
    colliding: bool,
}

impl ShapeProbe {
    pub fn new(name: &'static str, shape: CollisionShape, motion: Vec3) -> Self {
        Self {
            name,
            shape,
            motion,
            enabled: true,
            colliding: false,
        }
    }

    /// Re-run the sweep from `position`
    pub fn force_update(&mut self, space: &dyn PhysicsSpace, position: Vec3) {
        self.colliding = self.enabled && space.test_motion(&self.shape, position, self.motion).collided();
    }

    pub fn is_colliding(&self) -> bool {
        self.colliding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FlatGround;

    #[test]
    fn test_ray_probe_hits_ground() {
        let ground = FlatGround::new();
        let mut probe = RayProbe::new("floor", Vec3::new(0.0, 0.1, 0.0), Vec3::new(0.0, -0.3, 0.0));

        probe.force_update(&ground, Vec3::ZERO, Quat::IDENTITY);

        assert!(probe.is_colliding());
        assert_eq!(probe.collision_normal(), Vec3::Y);
        assert_eq!(probe.collision_point().y, 0.0);
    }

    #[test]
    fn test_disabled_probe_never_collides() {
        let ground = FlatGround::new();
        let mut probe =
            RayProbe::new("floor", Vec3::new(0.0, 0.1, 0.0), Vec3::new(0.0, -0.3, 0.0)).disabled();

        probe.force_update(&ground, Vec3::ZERO, Quat::IDENTITY);

        assert!(!probe.is_colliding());
        assert_eq!(probe.collision_normal(), Vec3::ZERO);
        assert!(probe.collider().is_none());
    }

    #[test]
    fn test_probe_follows_basis() {
        let ground = FlatGround::new();
        // Pointing up in local space, flipped upside down it points at the ground
        let mut probe = RayProbe::new("flipped", Vec3::new(0.0, -0.1, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let upside_down = Quat::from_rotation_x(std::f32::consts::PI);

        probe.force_update(&ground, Vec3::new(0.0, 0.5, 0.0), upside_down);

        assert!(probe.is_colliding());
    }

    #[test]
    fn test_shape_probe() {
        let ground = FlatGround::new();
        let shape = CollisionShape::Capsule {
            radius: 0.4,
            height: 1.0,
        };
        let mut probe = ShapeProbe::new("down", shape, Vec3::new(0.0, -1.0, 0.0));

        probe.force_update(&ground, Vec3::new(0.0, 0.5, 0.0));
        assert!(probe.is_colliding());

        probe.force_update(&ground, Vec3::new(0.0, 2.0, 0.0));
        assert!(!probe.is_colliding());
    }
}
