//! Pure geometry helpers shared by placement and offset computation.

use glam::{Quat, Vec3};

/// Projects a vector onto the ground plane by zeroing its vertical
/// component. Used to keep orientations level regardless of device tilt.
pub fn project_to_ground(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Converts the tracker's flat float triple into a vector.
///
/// The hit-test ray API speaks flat arrays; conversion happens at that
/// boundary and nowhere else.
pub fn vec3_from_array(a: [f32; 3]) -> Vec3 {
    Vec3::from_array(a)
}

/// Converts a vector into the flat float triple the hit-test API speaks.
pub fn array_from_vec3(v: Vec3) -> [f32; 3] {
    v.to_array()
}

/// Euclidean distance between two world positions ignoring the vertical
/// axis.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    ((a.x - b.x).powi(2) + (a.z - b.z).powi(2)).sqrt()
}

/// Horizontal distance from `section` to `item`, negated when the item lies
/// on the section's non-positive-x side. Left of the section reads
/// negative.
pub fn signed_x_offset(section: Vec3, item: Vec3) -> f32 {
    let mut offset = planar_distance(section, item);
    if section.x - item.x >= 0.0 {
        offset = -offset;
    }
    offset
}

/// Rotation taking a node's forward axis (-Z) onto `forward`.
/// Returns identity when `forward` is degenerate.
pub fn look_rotation(forward: Vec3) -> Quat {
    let dir = forward.normalize_or_zero();
    if dir == Vec3::ZERO {
        Quat::IDENTITY
    } else {
        Quat::from_rotation_arc(Vec3::NEG_Z, dir)
    }
}

/// Rotation of `degrees` about the world-up axis.
pub fn yaw_rotation(degrees: f32) -> Quat {
    Quat::from_rotation_y(degrees.to_radians())
}
