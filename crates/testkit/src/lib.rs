#![warn(missing_docs)]
//! Deterministic testing surfaces (scripted frames + tracking feeds).

use std::cell::Cell;

use glam::{Quat, Vec3};

use shelfmark_core::{Pose, TrackingState};
use shelfmark_tracking::{Frame, Hit, PlaneOrientation, Trackable, TrackedPlane};

/// Scripted frame returning canned hits, for driving the engine without a
/// real tracker.
#[derive(Debug, Default)]
pub struct FakeFrame {
    /// Camera pose reported to callers.
    pub camera: Pose,
    screen_hits: Vec<Hit>,
    ray_hits: Vec<Hit>,
    screen_queries: Cell<usize>,
    ray_queries: Cell<usize>,
    last_ray: Cell<Option<([f32; 3], [f32; 3])>>,
}

impl FakeFrame {
    /// Frame with an identity camera and no hits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame with the given camera pose and no hits.
    pub fn with_camera(camera: Pose) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    /// Queue a hit returned from screen-point queries.
    pub fn push_screen_hit(&mut self, hit: Hit) {
        self.screen_hits.push(hit);
    }

    /// Queue a hit returned from ray queries.
    pub fn push_ray_hit(&mut self, hit: Hit) {
        self.ray_hits.push(hit);
    }

    /// Number of screen-point queries answered so far.
    pub fn screen_queries(&self) -> usize {
        self.screen_queries.get()
    }

    /// Number of ray queries answered so far.
    pub fn ray_queries(&self) -> usize {
        self.ray_queries.get()
    }

    /// Origin and direction of the most recent ray query.
    pub fn last_ray(&self) -> Option<([f32; 3], [f32; 3])> {
        self.last_ray.get()
    }
}

impl Frame for FakeFrame {
    fn camera(&self) -> Pose {
        self.camera
    }

    fn hit_test(&self, _u: f32, _v: f32) -> Vec<Hit> {
        self.screen_queries.set(self.screen_queries.get() + 1);
        self.screen_hits.clone()
    }

    fn hit_test_ray(&self, origin: [f32; 3], direction: [f32; 3]) -> Vec<Hit> {
        self.ray_queries.set(self.ray_queries.get() + 1);
        self.last_ray.set(Some((origin, direction)));
        self.ray_hits.clone()
    }
}

/// Camera pose typical of a worker facing a shelf: standing height, a
/// little over a metre back, looking toward -Z.
pub fn shelf_camera() -> Pose {
    Pose::from_position(Vec3::new(0.0, 1.4, 1.2))
}

/// Vertical plane centered at `center` whose surface normal faces
/// `normal`, with a square boundary of the given half-extent.
pub fn vertical_plane_facing(center: Vec3, normal: Vec3, half_extent: f32) -> TrackedPlane {
    TrackedPlane {
        orientation: PlaneOrientation::Vertical,
        center_pose: Pose::new(center, Quat::from_rotation_arc(Vec3::Y, normal.normalize())),
        boundary: TrackedPlane::rect_boundary(half_extent, half_extent),
    }
}

/// Horizontal plane centered at `center` with a square boundary.
pub fn horizontal_plane_at(center: Vec3, half_extent: f32) -> TrackedPlane {
    TrackedPlane {
        orientation: PlaneOrientation::Horizontal,
        center_pose: Pose::from_position(center),
        boundary: TrackedPlane::rect_boundary(half_extent, half_extent),
    }
}

/// Hit on a tracked plane at the given distance and world position.
pub fn plane_hit(distance: f32, position: Vec3, plane: TrackedPlane) -> Hit {
    Hit {
        distance,
        pose: Pose::from_position(position),
        trackable: Trackable::Plane(plane),
    }
}

/// Hit on a non-plane trackable.
pub fn point_hit(distance: f32, position: Vec3) -> Hit {
    Hit {
        distance,
        pose: Pose::from_position(position),
        trackable: Trackable::Other,
    }
}

/// Replays a canned sequence of tracking states, holding the last one once
/// the script runs out.
#[derive(Debug)]
pub struct ScriptedTracking {
    states: Vec<TrackingState>,
    cursor: usize,
}

impl ScriptedTracking {
    /// Script from a state sequence. Must not be empty.
    pub fn new(states: Vec<TrackingState>) -> Self {
        assert!(!states.is_empty(), "tracking script needs at least one state");
        Self { states, cursor: 0 }
    }

    /// Next state in the script; repeats the final state indefinitely.
    pub fn next_state(&mut self) -> TrackingState {
        let state = self.states[self.cursor.min(self.states.len() - 1)];
        self.cursor += 1;
        state
    }
}

/// Asserts two vectors agree within 1e-5 per component.
pub fn assert_vec3_close(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).abs().max_element() < 1e-5,
        "{actual} is not close to {expected}"
    );
}
