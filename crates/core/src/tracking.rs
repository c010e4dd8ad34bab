//! Tracking-subsystem state reported once per tick.

use serde::{Deserialize, Serialize};

/// Whether the external tracker currently has a world lock.
///
/// Drives the hit-test gate: nothing queries a frame unless the tracker
/// reports `Tracking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// Pose estimates are valid; hit-testing is allowed.
    Tracking,
    /// Tracking is temporarily lost, with the tracker's reason when known.
    Paused(Option<TrackingFailureReason>),
    /// The tracker has shut down for this session.
    Stopped,
}

impl TrackingState {
    /// True when hit-testing may be attempted this tick.
    pub fn is_tracking(&self) -> bool {
        matches!(self, Self::Tracking)
    }
}

/// Why the tracker paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingFailureReason {
    /// Internal tracker state is inconsistent.
    BadState,
    /// Scene too dark to extract features.
    InsufficientLight,
    /// Device moving too fast for stable tracking.
    ExcessiveMotion,
    /// Not enough visual features in view.
    InsufficientFeatures,
    /// The camera feed is unavailable.
    CameraUnavailable,
}

/// Plane detection restriction requested from the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneFindingMode {
    /// Detect horizontal planes only.
    Horizontal,
    /// Detect vertical planes only.
    Vertical,
    /// Detect both orientations.
    HorizontalAndVertical,
    /// Plane detection off.
    Disabled,
}

/// Camera focus request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusMode {
    /// Continuous autofocus.
    Auto,
    /// Fixed focus.
    Fixed,
}

/// Session configuration handed to the external tracker on startup.
///
/// Shelf uprights are vertical surfaces, so the default profile restricts
/// plane finding accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingProfile {
    /// Which plane orientations the tracker should detect.
    pub plane_finding: PlaneFindingMode,
    /// Camera focus behavior.
    pub focus: FocusMode,
}

impl Default for TrackingProfile {
    fn default() -> Self {
        Self {
            plane_finding: PlaneFindingMode::Vertical,
            focus: FocusMode::Auto,
        }
    }
}
