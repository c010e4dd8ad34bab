//! Replays persisted offsets against a freshly found section anchor.

use std::collections::BTreeMap;

use glam::Vec3;
use tracing::info;

use shelfmark_core::Item;
use shelfmark_scene::NodeId;

use crate::session::AnchorSession;

/// Restored item set, grouped by owning section.
///
/// The fresh section anchor is the sole frame of reference; absolute world
/// coordinates from the recording session are never stored or consulted.
#[derive(Debug, Default)]
pub struct ReplayEngine {
    sections: BTreeMap<String, Vec<Item>>,
}

impl ReplayEngine {
    /// Group a restored item list by its section keys.
    pub fn new(items: Vec<Item>) -> Self {
        let mut sections: BTreeMap<String, Vec<Item>> = BTreeMap::new();
        for item in items {
            sections.entry(item.section_key.clone()).or_default().push(item);
        }
        Self { sections }
    }

    /// Total restored item count across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// True when nothing was restored.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section keys present in the restored record.
    pub fn section_keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Materialize one section's items as children of `anchor` at their
    /// stored `(x, y, 0)` offsets, labeled with their upcs.
    pub fn replay(
        &self,
        session: &mut AnchorSession,
        anchor: NodeId,
        section_key: &str,
    ) -> Vec<NodeId> {
        match self.sections.get(section_key) {
            Some(items) => Self::materialize(session, anchor, items),
            None => Vec::new(),
        }
    }

    /// Materialize every restored item against `anchor`, regardless of
    /// which section recorded it.
    pub fn replay_all(&self, session: &mut AnchorSession, anchor: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for items in self.sections.values() {
            nodes.extend(Self::materialize(session, anchor, items));
        }
        nodes
    }

    fn materialize(session: &mut AnchorSession, anchor: NodeId, items: &[Item]) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for item in items {
            let offset = Vec3::new(item.x_offset, item.y_offset, 0.0);
            if let Some(node) = session.create_child_at_offset(anchor, offset, &item.upc) {
                nodes.push(node);
            }
        }
        info!(count = nodes.len(), "replayed item placements");
        nodes
    }
}
