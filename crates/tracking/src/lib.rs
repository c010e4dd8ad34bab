#![warn(missing_docs)]
//! Tracking-subsystem boundary: frames, trackables, and hit resolution.

pub mod frame;
pub mod resolver;
pub mod trackable;

pub use frame::{Anchor, Frame, Hit};
pub use resolver::{nearest_vertical_plane_hit, TrackingMonitor, TrackingTransition};
pub use trackable::{GeometryError, PlaneOrientation, Trackable, TrackedPlane};
