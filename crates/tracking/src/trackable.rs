//! Tagged trackable classification resolved once at hit-test time.

use glam::{Vec2, Vec3};
use thiserror::Error;

use shelfmark_core::Pose;

/// Geometry inspection failure for a single hit candidate.
///
/// Resolution catches these and skips the candidate; they never abort a
/// whole scan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// The plane's observed boundary has fewer than three vertices.
    #[error("plane boundary polygon is degenerate ({vertices} vertices)")]
    DegeneratePolygon {
        /// Vertex count that was observed.
        vertices: usize,
    },
    /// The boundary contains NaN or infinite coordinates.
    #[error("plane boundary polygon contains non-finite coordinates")]
    NonFinitePolygon,
}

/// Plane orientation as classified by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneOrientation {
    /// Floor- or ceiling-like surface.
    Horizontal,
    /// Wall- or shelf-upright-like surface.
    Vertical,
}

/// A tracked planar surface with its observed boundary.
#[derive(Debug, Clone)]
pub struct TrackedPlane {
    /// Horizontal or vertical, per the tracker's classification.
    pub orientation: PlaneOrientation,
    /// Pose of the plane's center; local +Y is the surface normal.
    pub center_pose: Pose,
    /// Observed boundary polygon in plane-local (x, z) coordinates.
    pub boundary: Vec<Vec2>,
}

impl TrackedPlane {
    /// Surface normal in world space.
    pub fn normal(&self) -> Vec3 {
        self.center_pose.y_axis()
    }

    /// Whether `pose` lies within the observed boundary polygon, not just
    /// the plane's infinite mathematical extension.
    pub fn contains(&self, pose: &Pose) -> Result<bool, GeometryError> {
        if self.boundary.len() < 3 {
            return Err(GeometryError::DegeneratePolygon {
                vertices: self.boundary.len(),
            });
        }
        if self.boundary.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinitePolygon);
        }

        let local = self.center_pose.inverse_transform_point(pose.position);
        let point = Vec2::new(local.x, local.z);

        // Even-odd crossing test over the boundary loop.
        let mut inside = false;
        let mut j = self.boundary.len() - 1;
        for i in 0..self.boundary.len() {
            let a = self.boundary[i];
            let b = self.boundary[j];
            if (a.y > point.y) != (b.y > point.y) {
                let t = (point.y - a.y) / (b.y - a.y);
                if point.x < a.x + t * (b.x - a.x) {
                    inside = !inside;
                }
            }
            j = i;
        }
        Ok(inside)
    }

    /// Axis-aligned rectangular boundary around the plane center.
    pub fn rect_boundary(half_width: f32, half_depth: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(-half_width, -half_depth),
            Vec2::new(half_width, -half_depth),
            Vec2::new(half_width, half_depth),
            Vec2::new(-half_width, half_depth),
        ]
    }
}

/// Classification of the geometry behind a hit.
#[derive(Debug, Clone)]
pub enum Trackable {
    /// A tracked plane with orientation and boundary.
    Plane(TrackedPlane),
    /// Any other trackable (feature point, depth point, ...).
    Other,
}

impl Trackable {
    /// The plane behind this trackable, if it is one.
    pub fn as_plane(&self) -> Option<&TrackedPlane> {
        match self {
            Self::Plane(plane) => Some(plane),
            Self::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn horizontal_plane_at_origin() -> TrackedPlane {
        TrackedPlane {
            orientation: PlaneOrientation::Horizontal,
            center_pose: Pose::IDENTITY,
            boundary: TrackedPlane::rect_boundary(1.0, 1.0),
        }
    }

    #[test]
    fn contains_accepts_interior_point() {
        let plane = horizontal_plane_at_origin();
        let pose = Pose::from_position(Vec3::new(0.5, 0.0, -0.5));
        assert_eq!(plane.contains(&pose), Ok(true));
    }

    #[test]
    fn contains_rejects_point_beyond_boundary() {
        // On the infinite plane, but outside the observed polygon.
        let plane = horizontal_plane_at_origin();
        let pose = Pose::from_position(Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(plane.contains(&pose), Ok(false));
    }

    #[test]
    fn contains_works_for_rotated_vertical_plane() {
        // Vertical plane whose normal faces world +Z.
        let plane = TrackedPlane {
            orientation: PlaneOrientation::Vertical,
            center_pose: Pose::new(
                Vec3::new(0.0, 1.5, 0.0),
                Quat::from_rotation_arc(Vec3::Y, Vec3::Z),
            ),
            boundary: TrackedPlane::rect_boundary(1.0, 1.0),
        };
        let inside = Pose::from_position(Vec3::new(0.25, 1.75, 0.0));
        let outside = Pose::from_position(Vec3::new(0.25, 4.0, 0.0));
        assert_eq!(plane.contains(&inside), Ok(true));
        assert_eq!(plane.contains(&outside), Ok(false));
    }

    #[test]
    fn as_plane_distinguishes_trackable_kinds() {
        let plane = Trackable::Plane(horizontal_plane_at_origin());
        assert!(plane.as_plane().is_some());
        assert!(Trackable::Other.as_plane().is_none());
    }

    #[test]
    fn degenerate_polygon_is_an_error() {
        let plane = TrackedPlane {
            orientation: PlaneOrientation::Vertical,
            center_pose: Pose::IDENTITY,
            boundary: vec![Vec2::ZERO, Vec2::X],
        };
        assert_eq!(
            plane.contains(&Pose::IDENTITY),
            Err(GeometryError::DegeneratePolygon { vertices: 2 })
        );
    }

    #[test]
    fn non_finite_polygon_is_an_error() {
        let plane = TrackedPlane {
            orientation: PlaneOrientation::Vertical,
            center_pose: Pose::IDENTITY,
            boundary: vec![Vec2::ZERO, Vec2::X, Vec2::new(f32::NAN, 1.0)],
        };
        assert_eq!(
            plane.contains(&Pose::IDENTITY),
            Err(GeometryError::NonFinitePolygon)
        );
    }
}
