//! World-space pose snapshots handed out by the tracking subsystem.

use glam::{Quat, Vec3};

/// Position plus orientation captured at a single tick.
///
/// A pose is an immutable snapshot; the tracker may report a different one
/// next tick, but a value in hand never changes underneath the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation as a unit quaternion.
    pub rotation: Quat,
}

impl Pose {
    /// Identity pose at the world origin.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Pose with the given position and orientation.
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` with identity orientation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Rotated local X basis vector.
    pub fn x_axis(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Rotated local Y basis vector.
    pub fn y_axis(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotated local Z basis vector.
    pub fn z_axis(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Camera lateral axis (+X in device space).
    pub fn right(&self) -> Vec3 {
        self.x_axis()
    }

    /// Camera up axis (+Y in device space).
    pub fn up(&self) -> Vec3 {
        self.y_axis()
    }

    /// Camera view direction (-Z in device space).
    pub fn forward(&self) -> Vec3 {
        -self.z_axis()
    }

    /// Transform a point from this pose's local frame into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Transform a world-space point into this pose's local frame.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }
}
