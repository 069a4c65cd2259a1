// Physics collaborators: collision queries, kinematic body and probes, backed by parry3d

pub mod body;
pub mod collision;
pub mod probe;
mod world;

pub use body::{BodyBuilder, KinematicBody};
pub use collision::{
    BodyKind, ColliderId, ColliderInfo, CollisionShape, Contact, MotionResult, ObstacleShape,
    PhysicsSpace, RayHit,
};
pub use probe::{RayProbe, ShapeProbe};
pub use world::{ColliderBuilder, PhysicsWorld};
