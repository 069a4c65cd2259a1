// Collision queries: the boundary between locomotion code and the physics backend

use glam::Vec3;

/// Identifies a collider inside a physics space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

/// How the body owning a collider moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves (level geometry)
    Static,
    /// Moved by code, not by forces
    Kinematic,
    /// Simulated by a solver
    Rigid,
}

impl BodyKind {
    /// Check if the body is part of the static level geometry
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static)
    }
}

/// Shape of an obstacle as seen by gameplay code
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleShape {
    /// Axis-aligned box with full extents `size`
    Cuboid { size: Vec3 },
    /// Any shape gameplay code does not reason about
    Other,
}

/// Gameplay-facing metadata of the collider that was hit
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderInfo {
    pub id: ColliderId,
    pub name: String,
    pub body: BodyKind,
    pub shape: ObstacleShape,
    /// Surface group (e.g. "dirt"), used to pick footstep sounds
    pub group: Option<String>,
}

impl ColliderInfo {
    /// Create metadata for a static box
    pub fn static_box(id: ColliderId, name: &str, size: Vec3) -> Self {
        Self {
            id,
            name: name.to_string(),
            body: BodyKind::Static,
            shape: ObstacleShape::Cuboid { size },
            group: None,
        }
    }

    /// Full extents of the obstacle when it is a box
    pub fn box_size(&self) -> Option<Vec3> {
        match self.shape {
            ObstacleShape::Cuboid { size } => Some(size),
            ObstacleShape::Other => None,
        }
    }
}

/// Shape swept by a body during motion tests.
///
/// A body's position is the bottom of its shape; the shape's center sits
/// `center_offset()` above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    /// Upright capsule, `height` includes both caps
    Capsule { radius: f32, height: f32 },
    /// Box given by its half extents
    Cuboid { half_extents: Vec3 },
}

impl CollisionShape {
    /// Total height of the shape
    pub fn height(&self) -> f32 {
        match *self {
            Self::Capsule { radius, height } => height.max(radius * 2.0),
            Self::Cuboid { half_extents } => half_extents.y * 2.0,
        }
    }

    /// Horizontal radius of the shape
    pub fn radius(&self) -> f32 {
        match *self {
            Self::Capsule { radius, .. } => radius,
            Self::Cuboid { half_extents } => half_extents.x.max(half_extents.z),
        }
    }

    /// Offset from the body position to the shape's center
    pub fn center_offset(&self) -> Vec3 {
        Vec3::Y * (self.height() * 0.5)
    }
}

/// Result of a ray query
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub collider: ColliderInfo,
}

/// First contact found by a swept motion test
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub point: Vec3,
    /// Surface normal, pointing away from the obstacle
    pub normal: Vec3,
    pub collider: ColliderInfo,
}

/// Result of sweeping a shape along a motion vector
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MotionResult {
    /// Safe motion before the first contact
    pub travel: Vec3,
    /// Part of the motion that was blocked
    pub remainder: Vec3,
    pub collision: Option<Contact>,
}

impl MotionResult {
    /// A motion that was not blocked at all
    pub fn free(motion: Vec3) -> Self {
        Self {
            travel: motion,
            remainder: Vec3::ZERO,
            collision: None,
        }
    }

    /// Check if the motion hit something
    pub fn collided(&self) -> bool {
        self.collision.is_some()
    }

    /// Normal of the contact, zero when nothing was hit
    pub fn normal(&self) -> Vec3 {
        self.collision
            .as_ref()
            .map(|contact| contact.normal)
            .unwrap_or(Vec3::ZERO)
    }
}

/// Synchronous collision queries against the current physics snapshot.
///
/// Locomotion code never steps a simulation; it only asks where a ray lands
/// and how far a shape can travel before touching something.
pub trait PhysicsSpace {
    /// Cast a ray from `from` to `to` and return the closest hit
    fn cast_ray(&self, from: Vec3, to: Vec3) -> Option<RayHit>;

    /// Sweep `shape`, placed with its bottom at `from`, along `motion`
    fn test_motion(&self, shape: &CollisionShape, from: Vec3, motion: Vec3) -> MotionResult;
}
