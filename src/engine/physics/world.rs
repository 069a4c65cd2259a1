use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{self, Ray};
use parry3d::shape::SharedShape;

use super::collision::{
    BodyKind, ColliderId, ColliderInfo, CollisionShape, Contact, MotionResult, ObstacleShape,
    PhysicsSpace, RayHit,
};
use crate::core::math::CMP_EPSILON;

/// Gap kept between a swept shape and whatever stops it
const SAFE_MARGIN: Real = 0.001;

/// A collider placed in the world
struct StaticCollider {
    position: Isometry<Real>,
    shape: SharedShape,
    info: ColliderInfo,
}

/// Builder for static level colliders
pub struct ColliderBuilder {
    name: String,
    center: Vec3,
    size: Vec3,
    group: Option<String>,
}

impl ColliderBuilder {
    /// Create an axis-aligned box with full extents `size`
    pub fn cuboid(size: Vec3) -> Self {
        Self {
            name: String::from("box"),
            center: Vec3::ZERO,
            size: size.abs(),
            group: None,
        }
    }

    /// Set the center of the box
    pub fn center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Place the box so that its top face sits at `top` and its center at `x`/`z`
    pub fn resting_on(mut self, x: f32, top: f32, z: f32) -> Self {
        self.center = Vec3::new(x, top - self.size.y * 0.5, z);
        self
    }

    /// Set a debug name
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the surface group (e.g. "dirt")
    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }
}

/// Static collision world answering ray casts and shape sweeps.
///
/// Nothing here is simulated: the character is kinematic and the level never
/// moves, so the world is only a set of shapes queried through
/// [`PhysicsSpace`].
#[derive(Default)]
pub struct PhysicsWorld {
    colliders: Vec<StaticCollider>,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a static collider, returning its id
    pub fn add_collider(&mut self, builder: ColliderBuilder) -> ColliderId {
        let id = ColliderId(self.colliders.len() as u32);
        let half = builder.size * 0.5;

        self.colliders.push(StaticCollider {
            position: Isometry::translation(builder.center.x, builder.center.y, builder.center.z),
            shape: SharedShape::cuboid(half.x, half.y, half.z),
            info: ColliderInfo {
                id,
                name: builder.name,
                body: BodyKind::Static,
                shape: ObstacleShape::Cuboid { size: builder.size },
                group: builder.group,
            },
        });

        log::debug!(
            "Added collider {:?} '{}' at {:?}",
            id,
            self.colliders[id.0 as usize].info.name,
            builder.center
        );
        id
    }

    /// Metadata of a collider
    pub fn collider(&self, id: ColliderId) -> Option<&ColliderInfo> {
        self.colliders.get(id.0 as usize).map(|collider| &collider.info)
    }

    /// Number of colliders in the world
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl PhysicsSpace for PhysicsWorld {
    fn cast_ray(&self, from: Vec3, to: Vec3) -> Option<RayHit> {
        let offset = to - from;
        let length = offset.length();
        if length < CMP_EPSILON {
            return None;
        }

        let direction = offset / length;
        let ray = Ray::new(to_point(from), to_vector(direction));

        self.colliders
            .iter()
            .filter_map(|collider| {
                collider
                    .shape
                    .cast_ray_and_get_normal(&collider.position, &ray, length, true)
                    .map(|hit| (hit, collider))
            })
            .min_by(|(a, _), (b, _)| a.toi.total_cmp(&b.toi))
            .map(|(hit, collider)| RayHit {
                point: from + direction * hit.toi,
                normal: to_vec3(&hit.normal),
                collider: collider.info.clone(),
            })
    }

    fn test_motion(&self, shape: &CollisionShape, from: Vec3, motion: Vec3) -> MotionResult {
        let length = motion.length();
        if length < CMP_EPSILON {
            return MotionResult::free(motion);
        }

        let body_shape = to_shared_shape(shape);
        let center = from + shape.center_offset();
        let body_position = Isometry::translation(center.x, center.y, center.z);
        let velocity = to_vector(motion);

        let mut closest: Option<(Real, Contact)> = None;

        for collider in &self.colliders {
            let hit = match query::time_of_impact(
                &body_position,
                &velocity,
                &*body_shape,
                &collider.position,
                &Vector::zeros(),
                &*collider.shape,
                1.0,
                false,
            ) {
                Ok(hit) => hit,
                Err(err) => {
                    log::warn!(
                        "Shape sweep against '{}' unsupported: {:?}",
                        collider.info.name,
                        err
                    );
                    continue;
                }
            };

            let Some(toi) = hit else {
                continue;
            };

            let normal = collider.position.rotation * toi.normal2.into_inner();

            // Already touching, but moving along or away from the surface
            if toi.toi <= 0.0 && velocity.dot(&normal) >= -CMP_EPSILON {
                continue;
            }

            if closest.as_ref().map_or(true, |(best, _)| toi.toi < *best) {
                let point = collider.position * toi.witness2;
                closest = Some((
                    toi.toi,
                    Contact {
                        point: to_vec3(&point.coords),
                        normal: to_vec3(&normal),
                        collider: collider.info.clone(),
                    },
                ));
            }
        }

        match closest {
            None => MotionResult::free(motion),
            Some((toi, contact)) => {
                // May back off slightly to restore the margin after touching
                let fraction = (toi - SAFE_MARGIN / length).clamp(-SAFE_MARGIN / length, 1.0);
                let travel = motion * fraction;
                MotionResult {
                    travel,
                    remainder: motion - travel,
                    collision: Some(contact),
                }
            }
        }
    }
}

fn to_shared_shape(shape: &CollisionShape) -> SharedShape {
    match *shape {
        CollisionShape::Capsule { radius, .. } => {
            let half_segment = (shape.height() * 0.5 - radius).max(0.0);
            SharedShape::capsule_y(half_segment, radius)
        }
        CollisionShape::Cuboid { half_extents } => {
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
    }
}

fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}
