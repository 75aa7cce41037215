//! Accessible tree queries
//!
//! The scheduler never owns or walks interface nodes. A source is an opaque
//! `NodeId`; every structural question goes through `AccessibleTree`, which
//! the host backs with whatever accessibility API it talks to.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque, identity-only handle to an interface node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Liveness and ancestry queries against the external tree
pub trait AccessibleTree {
    /// Whether the underlying element still exists
    fn is_alive(&self, node: NodeId) -> bool;

    /// Live marker of the node or of its nearest marked ancestor
    fn live_marker(&self, node: NodeId) -> Option<String>;

    /// Accessible name
    fn name(&self, node: NodeId) -> Option<String>;

    /// Full text of the enclosing atomic container, if the node is inside one
    fn atomic_text(&self, node: NodeId) -> Option<String>;

    /// Top-level document containing the node
    fn document_of(&self, node: NodeId) -> Option<NodeId>;

    /// Document the user is currently in
    fn active_document(&self) -> Option<NodeId>;

    /// Nearest alert ancestor (exclusive)
    fn alert_ancestor(&self, node: NodeId) -> Option<NodeId>;

    /// Locus of focus
    fn focused(&self) -> Option<NodeId>;
}

/// Node description for `StaticTree`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Live marker, e.g. "normal" or "most_urgent"
    #[serde(default)]
    pub live: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alert: bool,
    /// Set on the atomic container itself
    #[serde(default)]
    pub atomic_text: Option<String>,
    /// Set on document roots
    #[serde(default)]
    pub is_document: bool,
}

/// In-memory tree used by the replay harness and tests
#[derive(Debug, Default)]
pub struct StaticTree {
    nodes: HashMap<NodeId, NodeInfo>,
    focused: Option<NodeId>,
    active_document: Option<NodeId>,
}

impl StaticTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, info: NodeInfo) {
        self.nodes.insert(id, info);
    }

    /// Destroy a node; later queries treat it as dead
    pub fn destroy(&mut self, id: NodeId) {
        self.nodes.remove(&id);
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    pub fn set_focus(&mut self, id: Option<NodeId>) {
        self.focused = id;
    }

    pub fn set_active_document(&mut self, id: Option<NodeId>) {
        self.active_document = id;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inclusive walk to the root. Bounded by the node count so a
    /// malformed parent cycle terminates.
    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &NodeInfo)> + '_ {
        let mut current = Some(node);
        let mut remaining = self.nodes.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let id = current?;
            let info = self.nodes.get(&id)?;
            current = info.parent;
            Some((id, info))
        })
    }
}

impl AccessibleTree for StaticTree {
    fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn live_marker(&self, node: NodeId) -> Option<String> {
        self.ancestors(node).find_map(|(_, info)| info.live.clone())
    }

    fn name(&self, node: NodeId) -> Option<String> {
        self.nodes.get(&node).and_then(|info| info.name.clone())
    }

    fn atomic_text(&self, node: NodeId) -> Option<String> {
        self.ancestors(node).find_map(|(_, info)| info.atomic_text.clone())
    }

    fn document_of(&self, node: NodeId) -> Option<NodeId> {
        self.ancestors(node)
            .find(|(_, info)| info.is_document)
            .map(|(id, _)| id)
    }

    fn active_document(&self) -> Option<NodeId> {
        self.active_document
    }

    fn alert_ancestor(&self, node: NodeId) -> Option<NodeId> {
        self.ancestors(node)
            .skip(1)
            .find(|(_, info)| info.alert)
            .map(|(id, _)| id)
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused
    }
}
