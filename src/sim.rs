//! Synthetic shelf environment driving the engine without a tracker.

use std::cell::{Cell, RefCell};

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shelfmark_core::Pose;
use shelfmark_scene::math;
use shelfmark_tracking::{Frame, Hit, PlaneOrientation, Trackable, TrackedPlane};

/// A fixed vertical shelf face plus a camera, with seeded jitter on
/// simulated hit positions to mimic tracker noise. Runs are reproducible
/// for a given seed.
pub struct ShelfSim {
    camera: Pose,
    plane: TrackedPlane,
    aim: Cell<Option<Vec3>>,
    rng: RefCell<StdRng>,
    jitter: f32,
}

impl ShelfSim {
    /// Shelf face at the world origin area, camera a step back from it.
    pub fn new(seed: u64, jitter: f32) -> Self {
        let camera = Pose::from_position(Vec3::new(0.0, 1.4, 1.2));
        let plane = TrackedPlane {
            orientation: PlaneOrientation::Vertical,
            center_pose: Pose::new(
                Vec3::new(0.0, 1.5, 0.0),
                Quat::from_rotation_arc(Vec3::Y, Vec3::Z),
            ),
            boundary: TrackedPlane::rect_boundary(1.5, 1.5),
        };
        Self {
            camera,
            plane,
            aim: Cell::new(None),
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            jitter,
        }
    }

    /// Point the scanner so its next ray lands at `target` on the shelf.
    pub fn aim(&self, target: Vec3) {
        self.aim.set(Some(target));
    }

    fn jittered(&self, target: Vec3) -> Vec3 {
        if self.jitter <= 0.0 {
            return target;
        }
        let mut rng = self.rng.borrow_mut();
        let j = self.jitter;
        // Jitter within the shelf face only.
        target + Vec3::new(rng.gen_range(-j..=j), rng.gen_range(-j..=j), 0.0)
    }
}

impl Frame for ShelfSim {
    fn camera(&self) -> Pose {
        self.camera
    }

    fn hit_test(&self, _u: f32, _v: f32) -> Vec<Hit> {
        // The viewport center always sees the shelf face.
        let center = self.plane.center_pose.position;
        vec![Hit {
            distance: (center - self.camera.position).length(),
            pose: Pose::from_position(center),
            trackable: Trackable::Plane(self.plane.clone()),
        }]
    }

    fn hit_test_ray(&self, origin: [f32; 3], _direction: [f32; 3]) -> Vec<Hit> {
        // One-shot: each scan consumes the current aim.
        let Some(target) = self.aim.take() else {
            return Vec::new();
        };
        let origin = math::vec3_from_array(origin);
        let position = self.jittered(target);
        vec![Hit {
            distance: (position - origin).length(),
            pose: Pose::from_position(position),
            trackable: Trackable::Plane(self.plane.clone()),
        }]
    }
}
