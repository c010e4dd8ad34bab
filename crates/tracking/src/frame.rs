//! Per-tick frame interface to the external tracker.

use glam::Vec3;

use shelfmark_core::Pose;

use crate::trackable::Trackable;

/// One ray or screen-point intersection with tracked geometry.
#[derive(Debug, Clone)]
pub struct Hit {
    /// Distance from the query origin to the hit point, metres.
    pub distance: f32,
    /// World pose of the hit point.
    pub pose: Pose,
    /// Geometry that was hit, classified once at hit-test time.
    pub trackable: Trackable,
}

impl Hit {
    /// Capture this hit's pose as a one-shot anchor.
    pub fn anchor(&self) -> Anchor {
        Anchor::capture(&self.pose)
    }
}

/// One-shot world pose capture from a hit result.
///
/// Created, read for its position, and discarded; never retained across
/// ticks. Converting a transient hit into a stable world-space point is its
/// only job.
#[derive(Debug)]
pub struct Anchor {
    pose: Pose,
}

impl Anchor {
    /// Capture the hit pose as a detached anchor.
    pub fn capture(pose: &Pose) -> Self {
        Self { pose: *pose }
    }

    /// World position of the captured pose.
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }
}

/// A tracker frame able to answer hit-test queries.
///
/// Screen-point queries take normalized viewport coordinates. Ray queries
/// speak the tracker's native flat-array form; convert at the boundary with
/// the `shelfmark-scene` math helpers. Results come back ordered exactly as
/// the tracker produced them.
pub trait Frame {
    /// Camera pose at this frame.
    fn camera(&self) -> Pose;

    /// Hit-test at normalized screen coordinates (`0..=1` on both axes).
    fn hit_test(&self, u: f32, v: f32) -> Vec<Hit>;

    /// Hit-test along an arbitrary world-space ray.
    fn hit_test_ray(&self, origin: [f32; 3], direction: [f32; 3]) -> Vec<Hit>;
}
