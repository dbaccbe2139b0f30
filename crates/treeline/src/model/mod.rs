//! Tree model: the hierarchical payload plus per-node derived state.
//!
//! [`TreeModel`] owns every node in a preorder arena. The arena is built
//! in one pass at load time and rebuilt wholesale on reload; there is no
//! incremental insertion. Views address nodes by [`NodeIdx`] (cheap
//! arena index) while the outside world uses the payload's stable string
//! identifiers.

mod node;
pub mod selection;

use std::collections::{HashMap, HashSet};

pub use node::{Node, NodeId, NodeIdx, NodePayload};
pub use selection::{CheckState, SelectionPropagator};

use treeline_core::logging::targets;

use crate::error::LoadError;

/// A deduplicated icon definition emitted once to the rendering backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDef {
    /// Compact hash of the icon markup; nodes reference `icon-{hash}`.
    pub hash: u32,
    /// The raw icon markup from the payload.
    pub markup: String,
}

/// The loaded tree.
///
/// Tree shape (parents, children, depths, ancestor chains) is immutable
/// after a successful load; only the `open` and selection flags mutate.
#[derive(Debug, Default)]
pub struct TreeModel {
    /// All nodes, in preorder.
    nodes: Vec<Node>,
    by_id: HashMap<NodeId, NodeIdx>,
    icons: Vec<IconDef>,
}

impl TreeModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a model from a hierarchical payload.
    ///
    /// Validation is fail-fast: an empty or duplicate identifier, or
    /// nesting beyond `max_depth`, aborts the load with no partial tree
    /// left behind.
    pub fn load(roots: &[NodePayload], max_depth: usize) -> Result<Self, LoadError> {
        let mut model = Self::new();

        // Preorder build: children pushed in reverse so they pop in
        // display order.
        let mut stack: Vec<(&NodePayload, Option<NodeIdx>)> = Vec::new();
        for root in roots.iter().rev() {
            stack.push((root, None));
        }

        let mut seen_icons: HashSet<u32> = HashSet::new();
        while let Some((payload, parent)) = stack.pop() {
            if payload.identifier.is_empty() {
                return Err(LoadError::EmptyIdentifier {
                    name: payload.name.clone(),
                });
            }

            let idx = NodeIdx::new(model.nodes.len());
            if model
                .by_id
                .insert(payload.identifier.clone(), idx)
                .is_some()
            {
                return Err(LoadError::DuplicateIdentifier {
                    identifier: payload.identifier.clone(),
                });
            }

            let (depth, ancestors) = match parent {
                None => (0, Vec::new()),
                Some(parent_idx) => {
                    let parent_node = &model.nodes[parent_idx.index()];
                    let mut chain = Vec::with_capacity(parent_node.ancestors().len() + 1);
                    chain.push(parent_idx);
                    chain.extend_from_slice(parent_node.ancestors());
                    (parent_node.depth() + 1, chain)
                }
            };
            if depth >= max_depth {
                return Err(LoadError::TooDeep {
                    identifier: payload.identifier.clone(),
                    max_depth,
                });
            }

            let icon_hash = payload.icon.as_deref().map(|markup| {
                let hash = node::icon_hash(markup);
                if seen_icons.insert(hash) {
                    model.icons.push(IconDef {
                        hash,
                        markup: markup.to_string(),
                    });
                }
                hash
            });

            model.nodes.push(Node::new(
                payload.identifier.clone(),
                payload.name.clone(),
                icon_hash,
                parent,
                ancestors,
                depth,
                !payload.children.is_empty(),
                payload.checked,
            ));
            if let Some(parent_idx) = parent {
                model.nodes[parent_idx.index()].add_child(idx);
            }

            for child in payload.children.iter().rev() {
                stack.push((child, Some(idx)));
            }
        }

        tracing::debug!(
            target: targets::MODEL,
            nodes = model.nodes.len(),
            icons = model.icons.len(),
            "tree model loaded"
        );
        Ok(model)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` if no tree is loaded.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrows a node by arena index.
    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.index()]
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIdx) -> &mut Node {
        &mut self.nodes[idx.index()]
    }

    /// Resolves a payload identifier to its arena index.
    pub fn lookup(&self, identifier: &str) -> Option<NodeIdx> {
        self.by_id.get(identifier).copied()
    }

    /// All node indices in preorder.
    pub fn preorder(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        (0..self.nodes.len()).map(NodeIdx::new)
    }

    /// The deduplicated icon table, in first-seen order.
    pub fn icons(&self) -> &[IconDef] {
        &self.icons
    }

    /// Flips a node's expanded state. Shape stays untouched.
    pub(crate) fn set_open(&mut self, idx: NodeIdx, open: bool) {
        self.nodes[idx.index()].set_open(open);
    }

    /// Identifiers of all currently checked nodes, in preorder.
    pub fn checked_identifiers(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.is_checked())
            .map(|n| n.identifier().to_string())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;

    /// `root -> (branch -> (leaf_a, leaf_b), leaf_c)`
    pub fn small_tree() -> Vec<NodePayload> {
        vec![
            NodePayload::new("root", "Root").with_children(vec![
                NodePayload::new("branch", "Branch").with_children(vec![
                    NodePayload::new("leaf-a", "Leaf A"),
                    NodePayload::new("leaf-b", "Leaf B"),
                ]),
                NodePayload::new("leaf-c", "Leaf C"),
            ]),
        ]
    }
}
