//! Arena-backed scene graph with stable node handles.
//!
//! Nodes are addressed by monotonically assigned ids in a `BTreeMap` for
//! deterministic iteration. Detaching a node unlinks it and removes its
//! whole subtree, so a stale handle resolves to `None` instead of dangling.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};

use crate::banner::Banner;
use crate::math;

/// Stable handle to a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

/// Where a node hangs in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// Attached directly under the scene root.
    Root,
    /// Attached under another node.
    Node(NodeId),
}

/// A placed object in world space.
///
/// Ownership is strictly tree-shaped: every node has exactly one parent,
/// and its world transform composes down the parent chain.
#[derive(Debug, Clone)]
pub struct SceneNode {
    parent: Parent,
    children: Vec<NodeId>,
    /// Position relative to the parent frame.
    pub local_position: Vec3,
    /// Rotation relative to the parent frame.
    pub local_rotation: Quat,
    /// Optional label payload.
    pub banner: Option<Banner>,
}

impl SceneNode {
    fn new(parent: Parent, local_position: Vec3, local_rotation: Quat) -> Self {
        Self {
            parent,
            children: Vec::new(),
            local_position,
            local_rotation,
            banner: None,
        }
    }

    /// The node's parent link.
    pub fn parent(&self) -> Parent {
        self.parent
    }

    /// Direct children, in spawn order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Scene graph arena.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u64,
}

impl SceneGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True while the handle refers to an attached node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Create a node under `parent` at the given local transform.
    /// Returns `None` when the parent handle is stale.
    pub fn spawn(
        &mut self,
        parent: Parent,
        local_position: Vec3,
        local_rotation: Quat,
    ) -> Option<NodeId> {
        if let Parent::Node(p) = parent {
            if !self.nodes.contains_key(&p) {
                return None;
            }
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes
            .insert(id, SceneNode::new(parent, local_position, local_rotation));
        if let Parent::Node(p) = parent {
            self.nodes
                .get_mut(&p)
                .expect("parent checked above")
                .children
                .push(id);
        }
        Some(id)
    }

    /// Borrow a node.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Mutably borrow a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Iterate attached nodes in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Attach a banner to a node. No-op for stale handles.
    pub fn set_banner(&mut self, id: NodeId, banner: Banner) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.banner = Some(banner);
        }
    }

    /// World-space position, or `None` once the node is detached.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_transform(id).map(|(position, _)| position)
    }

    /// World-space rotation, or `None` once the node is detached.
    pub fn world_rotation(&self, id: NodeId) -> Option<Quat> {
        self.world_transform(id).map(|(_, rotation)| rotation)
    }

    fn world_transform(&self, id: NodeId) -> Option<(Vec3, Quat)> {
        let node = self.nodes.get(&id)?;
        match node.parent {
            Parent::Root => Some((node.local_position, node.local_rotation)),
            Parent::Node(p) => {
                let (parent_pos, parent_rot) = self.world_transform(p)?;
                Some((
                    parent_pos + parent_rot * node.local_position,
                    parent_rot * node.local_rotation,
                ))
            }
        }
    }

    /// Point the node's forward axis (-Z) along `direction` in world space.
    pub fn set_look_direction(&mut self, id: NodeId, direction: Vec3) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let parent_rotation = match node.parent {
            Parent::Root => Quat::IDENTITY,
            Parent::Node(p) => match self.world_rotation(p) {
                Some(rotation) => rotation,
                None => return,
            },
        };
        let local = parent_rotation.inverse() * math::look_rotation(direction);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_rotation = local;
        }
    }

    /// Compose an additional yaw onto the node's current local rotation.
    /// Repeated calls accumulate; order matters, the new yaw is applied
    /// after the current rotation.
    pub fn rotate_around_up(&mut self, id: NodeId, degrees: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_rotation = node.local_rotation * math::yaw_rotation(degrees);
        }
    }

    /// Unlink a node and remove it and its whole subtree from the graph.
    /// Detaching an already-removed handle is a no-op.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        if let Parent::Node(p) = node.parent {
            if let Some(parent) = self.nodes.get_mut(&p) {
                parent.children.retain(|child| *child != id);
            }
        }
        let mut stack = node.children;
        while let Some(child) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&child) {
                stack.extend(removed.children);
            }
        }
    }
}
