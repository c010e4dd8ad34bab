//! Per-tick resolution of the best vertical-plane hit.

use tracing::debug;

use shelfmark_core::TrackingState;

use crate::frame::{Frame, Hit};
use crate::trackable::{PlaneOrientation, Trackable};

/// Center of the viewport in normalized coordinates.
const VIEWPORT_CENTER: (f32, f32) = (0.5, 0.5);

/// Finds the nearest in-polygon vertical-plane hit at the viewport center.
///
/// Returns `None` without touching the frame when the tracker is not in
/// `Tracking` state. Candidates are filtered to vertical planes whose
/// observed polygon contains the hit point; a candidate whose geometry
/// inspection fails is skipped, not fatal. Ties on distance keep the first
/// candidate in the tracker's order.
pub fn nearest_vertical_plane_hit(state: TrackingState, frame: &dyn Frame) -> Option<Hit> {
    if !state.is_tracking() {
        debug!(?state, "tracker not tracking, skipping hit test");
        return None;
    }

    let mut best: Option<Hit> = None;
    for hit in frame.hit_test(VIEWPORT_CENTER.0, VIEWPORT_CENTER.1) {
        let Trackable::Plane(plane) = &hit.trackable else {
            continue;
        };
        if plane.orientation != PlaneOrientation::Vertical {
            continue;
        }
        match plane.contains(&hit.pose) {
            Ok(true) => {
                if best
                    .as_ref()
                    .map_or(true, |current| hit.distance < current.distance)
                {
                    best = Some(hit);
                }
            }
            Ok(false) => {}
            Err(err) => debug!(%err, "skipping hit candidate"),
        }
    }
    best
}

/// A change in tracking state observed between consecutive ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingTransition {
    /// State at the previous tick, if one was seen.
    pub from: Option<TrackingState>,
    /// State at this tick.
    pub to: TrackingState,
}

/// Reports tracking-state transitions between ticks.
#[derive(Debug, Default)]
pub struct TrackingMonitor {
    last: Option<TrackingState>,
}

impl TrackingMonitor {
    /// Monitor that has seen no ticks yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's state; returns a transition when it changed.
    pub fn observe(&mut self, state: TrackingState) -> Option<TrackingTransition> {
        let from = self.last;
        self.last = Some(state);
        (from != Some(state)).then_some(TrackingTransition { from, to: state })
    }
}
