//! Section/item authoring state machine.
//!
//! Binds a section scan to a world anchor, records item scans as offsets
//! relative to it, and resets on clear. Scan handlers run to completion
//! synchronously; the `&mut self` receivers make them non-reentrant.

use glam::{Quat, Vec3};
use thiserror::Error;
use tracing::{debug, info};

use shelfmark_core::{Item, ItemDefaults, Pose, TrackingState};
use shelfmark_scene::{math, Banner, NodeId, Parent, SceneGraph};
use shelfmark_tracking::{
    nearest_vertical_plane_hit, Frame, Hit, PlaneOrientation, Trackable, TrackingMonitor,
};

/// Lateral offset of the scanner exit window from the camera, metres.
///
/// Device calibration: the beam leaves slightly left of the camera lens and
/// fires along the device's up axis. Do not derive this from camera optics.
pub const SCANNER_LATERAL_OFFSET_M: f32 = -0.02;

/// Recoverable session failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No hit-test target along the scanner ray; re-aim and rescan.
    #[error("no placement surface along the scanner ray")]
    PlacementFailed,
    /// A section is already being authored; clear before starting another.
    #[error("a section is already active")]
    SectionAlreadyActive,
    /// Item scans need an active section first.
    #[error("no active section")]
    NoActiveSection,
}

/// Authoring state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No active section; the next section scan establishes one.
    Idle,
    /// A section anchor is placed and item scans attach to it.
    SectionActive,
}

/// Per-tick surface feedback for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceFeedback {
    /// A usable vertical surface is in view.
    SurfaceFound,
    /// Tracking degraded; previously found surfaces are stale.
    TrackingLost(TrackingState),
}

#[derive(Debug)]
struct ActiveSection {
    node: NodeId,
    key: String,
}

/// State machine binding a section scan to a world anchor and recording
/// item offsets against it.
#[derive(Debug)]
pub struct AnchorSession {
    graph: SceneGraph,
    section: Option<ActiveSection>,
    item_nodes: Vec<NodeId>,
    pending: Vec<Item>,
    defaults: ItemDefaults,
    monitor: TrackingMonitor,
    surface_found: bool,
}

impl AnchorSession {
    /// New idle session stamping the given defaults onto scanned items.
    pub fn new(defaults: ItemDefaults) -> Self {
        Self {
            graph: SceneGraph::new(),
            section: None,
            item_nodes: Vec::new(),
            pending: Vec::new(),
            defaults,
            monitor: TrackingMonitor::new(),
            surface_found: false,
        }
    }

    /// Current authoring state.
    pub fn state(&self) -> SessionState {
        if self.section.is_some() {
            SessionState::SectionActive
        } else {
            SessionState::Idle
        }
    }

    /// Key of the active section, while one exists.
    pub fn section_key(&self) -> Option<&str> {
        self.section.as_ref().map(|s| s.key.as_str())
    }

    /// Node handle of the active section anchor, while one exists.
    pub fn section_node(&self) -> Option<NodeId> {
        self.section.as_ref().map(|s| s.node)
    }

    /// Items recorded since the last save or clear.
    pub fn pending_items(&self) -> &[Item] {
        &self.pending
    }

    /// Borrow the scene graph.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutably borrow the scene graph.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Scanner line of sight: origin sits `SCANNER_LATERAL_OFFSET_M` along
    /// the camera's lateral axis, direction is the camera's up vector.
    fn scanner_ray(camera: &Pose) -> (Vec3, Vec3) {
        let origin = camera.position + camera.right() * SCANNER_LATERAL_OFFSET_M;
        (origin, camera.up())
    }

    /// Nearest hit along the scanner line of sight.
    fn scanner_hit(frame: &dyn Frame) -> Option<Hit> {
        let camera = frame.camera();
        let (origin, direction) = Self::scanner_ray(&camera);
        frame
            .hit_test_ray(math::array_from_vec3(origin), math::array_from_vec3(direction))
            .into_iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Place a node at a hit's one-shot anchor position and orient it by
    /// the trackable classification.
    fn place_node(&mut self, frame: &dyn Frame, hit: &Hit) -> NodeId {
        let anchor = hit.anchor();
        let node = self
            .graph
            .spawn(Parent::Root, anchor.position(), Quat::IDENTITY)
            .expect("root spawn cannot fail");

        match &hit.trackable {
            Trackable::Plane(plane) => {
                if plane.orientation == PlaneOrientation::Vertical {
                    // Face out of the surface.
                    self.graph.set_look_direction(node, -plane.normal());
                } else {
                    // Keep the node level, facing the way the camera looks.
                    self.graph
                        .set_look_direction(node, math::project_to_ground(frame.camera().forward()));
                }
            }
            Trackable::Other => {}
        }
        node
    }

    /// Establish the section anchor from a scanned code.
    ///
    /// Only valid while idle. The banner shows the last digit of the code
    /// to stay narrow.
    pub fn on_section_scan(
        &mut self,
        frame: &dyn Frame,
        code: &str,
    ) -> Result<NodeId, SessionError> {
        if self.section.is_some() {
            return Err(SessionError::SectionAlreadyActive);
        }
        let hit = Self::scanner_hit(frame).ok_or(SessionError::PlacementFailed)?;
        let node = self.place_node(frame, &hit);

        let suffix: String = code
            .chars()
            .next_back()
            .map(String::from)
            .unwrap_or_default();
        self.graph
            .set_banner(node, Banner::section(format!("Section: {suffix}")));

        info!(section = %code, "section anchor placed");
        self.section = Some(ActiveSection {
            node,
            key: code.to_owned(),
        });
        Ok(node)
    }

    /// Record an item scan against the active section.
    ///
    /// Offsets are computed in the section's frame: signed horizontal
    /// distance plus vertical delta. Non-spatial fields come from the
    /// session defaults.
    pub fn on_item_scan(&mut self, frame: &dyn Frame, code: &str) -> Result<NodeId, SessionError> {
        let (section_node, section_key) = match &self.section {
            Some(section) => (section.node, section.key.clone()),
            None => return Err(SessionError::NoActiveSection),
        };
        let hit = Self::scanner_hit(frame).ok_or(SessionError::PlacementFailed)?;
        let node = self.place_node(frame, &hit);
        self.graph.set_banner(node, Banner::product(code));

        let section_pos = self
            .graph
            .world_position(section_node)
            .expect("active section node is attached");
        let item_pos = self
            .graph
            .world_position(node)
            .expect("item node was just spawned");
        let x_offset = math::signed_x_offset(section_pos, item_pos);
        let y_offset = item_pos.y - section_pos.y;

        debug!(upc = %code, x_offset, y_offset, "item recorded");
        self.pending.push(Item {
            upc: code.to_owned(),
            section_key,
            location_id: self.defaults.location_id,
            item_description: self.defaults.item_description.clone(),
            category: self.defaults.category.clone(),
            price: self.defaults.price,
            quantity_on_hand: self.defaults.quantity_on_hand,
            x_offset,
            y_offset,
        });
        self.item_nodes.push(node);
        Ok(node)
    }

    /// Attach a labeled child under `parent` at a local offset.
    /// Returns `None` when the parent handle is stale.
    pub fn create_child_at_offset(
        &mut self,
        parent: NodeId,
        offset: Vec3,
        label: &str,
    ) -> Option<NodeId> {
        let child = self.graph.spawn(Parent::Node(parent), offset, Quat::IDENTITY)?;
        self.graph.set_banner(child, Banner::product(label));
        Some(child)
    }

    /// Compose an extra yaw onto a node. No state transition.
    pub fn rotate_selected(&mut self, node: NodeId, degrees: f32) {
        self.graph.rotate_around_up(node, degrees);
    }

    /// Detach everything and return to idle. Safe to call repeatedly.
    pub fn clear(&mut self) {
        for node in self.item_nodes.drain(..) {
            self.graph.detach(node);
        }
        if let Some(section) = self.section.take() {
            self.graph.detach(section.node);
        }
        self.pending.clear();
    }

    /// Hand the pending items to the caller, leaving the list empty.
    pub fn take_pending(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.pending)
    }

    /// Per-tick poll of the resolver for UI feedback.
    ///
    /// Never mutates authoring state; it only tracks whether a usable
    /// surface is in view and reports changes.
    pub fn on_scene_update(
        &mut self,
        state: TrackingState,
        frame: &dyn Frame,
    ) -> Option<SurfaceFeedback> {
        let transition = self.monitor.observe(state);
        if state.is_tracking() {
            if nearest_vertical_plane_hit(state, frame).is_some() {
                let newly_found = !self.surface_found;
                self.surface_found = true;
                return newly_found.then_some(SurfaceFeedback::SurfaceFound);
            }
            None
        } else {
            self.surface_found = false;
            transition.map(|_| SurfaceFeedback::TrackingLost(state))
        }
    }
}
