// Math utilities and helper functions

use glam::{Vec2, Vec3};

/// Tolerance used by the approximate comparisons below
pub const CMP_EPSILON: f32 = 0.00001;

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate between two angles (radians) along the shortest arc
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    let tau = std::f32::consts::TAU;
    let difference = (to - from) % tau;
    let distance = (2.0 * difference) % tau - difference;
    from + distance * t
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Round `value` to the nearest multiple of `step`
pub fn snapped(value: f32, step: f32) -> f32 {
    if step == 0.0 {
        return value;
    }
    (value / step + 0.5).floor() * step
}

/// Check if every component of a vector is approximately zero
pub fn is_zero_approx(v: Vec3) -> bool {
    v.x.abs() < CMP_EPSILON && v.y.abs() < CMP_EPSILON && v.z.abs() < CMP_EPSILON
}

/// 2D counterpart of [`is_zero_approx`]
pub fn is_zero_approx_2d(v: Vec2) -> bool {
    v.x.abs() < CMP_EPSILON && v.y.abs() < CMP_EPSILON
}

/// Check if two vectors are approximately equal component-wise
pub fn is_equal_approx(a: Vec3, b: Vec3) -> bool {
    is_zero_approx(a - b)
}

/// Move `from` towards `to` by at most `delta`, never overshooting
pub fn move_toward(from: Vec3, to: Vec3, delta: f32) -> Vec3 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= delta || distance < CMP_EPSILON {
        to
    } else {
        from + offset / distance * delta
    }
}

/// Unsigned angle in radians between two vectors (0 when either is zero)
pub fn angle_to(a: Vec3, b: Vec3) -> f32 {
    if is_zero_approx(a) || is_zero_approx(b) {
        return 0.0;
    }
    a.angle_between(b)
}

/// Remove the component of `v` along `normal`
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let len_sq = normal.length_squared();
    if len_sq < CMP_EPSILON {
        return v;
    }
    v - normal * (v.dot(normal) / len_sq)
}

/// Horizontal (XZ) part of a vector
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Opposite of a character's up direction, i.e. where gravity pulls it.
///
/// Only the six axis-aligned directions are supported; anything else has no
/// well-defined gravity and yields zero.
pub fn opposite_of_up(up: Vec3) -> Vec3 {
    const OPPOSITES: [(Vec3, Vec3); 6] = [
        (Vec3::Y, Vec3::NEG_Y),
        (Vec3::NEG_Y, Vec3::Y),
        (Vec3::X, Vec3::NEG_X),
        (Vec3::NEG_X, Vec3::X),
        (Vec3::NEG_Z, Vec3::Z),
        (Vec3::Z, Vec3::NEG_Z),
    ];

    OPPOSITES
        .iter()
        .find(|(dir, _)| is_equal_approx(*dir, up))
        .map(|(_, opposite)| *opposite)
        .unwrap_or(Vec3::ZERO)
}
