//! Node storage and the hierarchical load payload.
//!
//! Nodes are built exactly once, in a single preorder pass over the
//! payload; depth, the ancestor-identifier chain and `has_children` are
//! all derived during that pass. After load the tree *shape* is
//! read-only — only `open`, `checked` and `indeterminate` ever mutate.

use serde::{Deserialize, Serialize};

use super::CheckState;

/// Stable node identifier as carried by the load payload.
pub type NodeId = String;

/// Index of a node in the model's preorder arena.
///
/// Cheap to copy and hash; valid only for the model that produced it.
/// A reload discards every index along with the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdx(u32);

impl NodeIdx {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "node arena exceeds u32 range");
        Self(index as u32)
    }

    /// Position of the node in preorder.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the hierarchical load input.
///
/// This is the wire shape the host hands to
/// [`TreeView::load`](crate::view::TreeView::load); nesting carries the
/// hierarchy, so the payload cannot express parent cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePayload {
    /// Unique, stable identifier.
    pub identifier: String,
    /// Display name.
    pub name: String,
    /// Icon reference (raw markup or asset key), deduplicated at load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Initial checked state for tri-state selection.
    #[serde(default)]
    pub checked: bool,
    /// Child nodes, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodePayload>,
}

impl NodePayload {
    /// Creates a leaf payload node.
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            icon: None,
            checked: false,
            children: Vec::new(),
        }
    }

    /// Sets the children.
    pub fn with_children(mut self, children: Vec<NodePayload>) -> Self {
        self.children = children;
        self
    }

    /// Sets the initial checked state.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Sets the icon reference.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// A node in the loaded tree.
#[derive(Debug)]
pub struct Node {
    identifier: NodeId,
    name: String,
    icon_hash: Option<u32>,
    parent: Option<NodeIdx>,
    children: Vec<NodeIdx>,
    /// Ancestor chain from the immediate parent up to the root.
    /// Computed at load, never mutated afterwards.
    ancestors: Vec<NodeIdx>,
    depth: usize,
    has_children: bool,
    open: bool,
    checked: bool,
    indeterminate: bool,
}

impl Node {
    pub(crate) fn new(
        identifier: NodeId,
        name: String,
        icon_hash: Option<u32>,
        parent: Option<NodeIdx>,
        ancestors: Vec<NodeIdx>,
        depth: usize,
        has_children: bool,
        checked: bool,
    ) -> Self {
        Self {
            identifier,
            name,
            icon_hash,
            parent,
            children: Vec::new(),
            ancestors,
            depth,
            has_children,
            open: true,
            checked,
            indeterminate: false,
        }
    }

    /// The payload identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hash of the deduplicated icon reference, if the node has one.
    pub fn icon_hash(&self) -> Option<u32> {
        self.icon_hash
    }

    /// The parent node, or `None` for roots.
    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    /// Direct children in display order.
    pub fn children(&self) -> &[NodeIdx] {
        &self.children
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self) -> &[NodeIdx] {
        &self.ancestors
    }

    /// Depth below the roots (roots are 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// `true` if the node has at least one child.
    pub fn has_children(&self) -> bool {
        self.has_children
    }

    /// `true` if the node's children are currently expanded.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// `true` if the node itself is checked.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// `true` if the node is unchecked but some descendant is checked.
    ///
    /// A checked node always reads as not indeterminate, whatever the
    /// cached flag says.
    pub fn is_indeterminate(&self) -> bool {
        !self.checked && self.indeterminate
    }

    /// The tri-state selection value derived from the two flags.
    pub fn check_state(&self) -> CheckState {
        if self.checked {
            CheckState::Checked
        } else if self.indeterminate {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    pub(crate) fn add_child(&mut self, child: NodeIdx) {
        self.children.push(child);
    }

    pub(crate) fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub(crate) fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub(crate) fn set_indeterminate(&mut self, indeterminate: bool) {
        self.indeterminate = indeterminate;
    }
}

/// Hashes an icon reference into the compact id used for deduplication.
///
/// Matches the classic 31-multiplier string hash over UTF-16 code units,
/// truncated to 32 bits and taken as an absolute value.
pub(crate) fn icon_hash(icon: &str) -> u32 {
    let mut acc: i32 = 0;
    for unit in icon.encode_utf16() {
        acc = acc
            .wrapping_shl(5)
            .wrapping_sub(acc)
            .wrapping_add(i32::from(unit));
    }
    acc.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_node_never_reads_indeterminate() {
        let mut node = Node::new("a".into(), "A".into(), None, None, Vec::new(), 0, false, true);
        node.set_indeterminate(true);
        assert!(node.is_checked());
        assert!(!node.is_indeterminate());
        assert_eq!(node.check_state(), CheckState::Checked);

        node.set_checked(false);
        assert!(node.is_indeterminate());
        assert_eq!(node.check_state(), CheckState::Indeterminate);
    }

    #[test]
    fn test_payload_defaults_from_json() {
        let payload: NodePayload =
            serde_json::from_str(r#"{"identifier": "n1", "name": "Node 1"}"#).unwrap();
        assert_eq!(payload.identifier, "n1");
        assert!(payload.icon.is_none());
        assert!(!payload.checked);
        assert!(payload.children.is_empty());
    }

    #[test]
    fn test_icon_hash_is_stable_and_deduplicates() {
        let a = icon_hash("<svg>folder</svg>");
        let b = icon_hash("<svg>folder</svg>");
        let c = icon_hash("<svg>file</svg>");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
