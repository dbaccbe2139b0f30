//! Tri-state selection propagation.
//!
//! Every node carries two flags: `checked` (the node itself is selected)
//! and `indeterminate` (the node is not checked but some descendant is).
//! [`SelectionPropagator::recompute`] derives the indeterminate flags for
//! the whole tree in one pass after a load; [`SelectionPropagator::set_checked`]
//! keeps them consistent incrementally, touching only the toggled node
//! and its ancestor chain.

use treeline_core::logging::targets;

use super::{NodeIdx, TreeModel};

/// Tri-state value of a node's checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckState {
    /// Neither the node nor any descendant is checked.
    Unchecked,
    /// The node itself is checked.
    Checked,
    /// The node is unchecked but at least one descendant is checked.
    Indeterminate,
}

/// Maintains the indeterminate flags of a [`TreeModel`].
///
/// Call [`recompute`](Self::recompute) once after every load, then
/// [`set_checked`](Self::set_checked) / [`toggle`](Self::toggle) for
/// individual changes. The incremental path assumes the flags are
/// already consistent; running it against an unprimed model is a logic
/// error and is reported (and recovered from) rather than propagated.
#[derive(Debug, Default)]
pub struct SelectionPropagator {
    /// Set once `recompute` has run against the current model.
    primed: bool,
}

impl SelectionPropagator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the primed flag, e.g. when the model is replaced.
    pub fn reset(&mut self) {
        self.primed = false;
    }

    /// Rederives every indeterminate flag from scratch.
    ///
    /// Walks the arena in reverse preorder so each node is visited after
    /// all of its descendants; a node marks its parent the moment it is
    /// checked or indeterminate itself.
    pub fn recompute(&mut self, model: &mut TreeModel) {
        for i in 0..model.len() {
            model.node_mut(NodeIdx::new(i)).set_indeterminate(false);
        }
        for i in (0..model.len()).rev() {
            let idx = NodeIdx::new(i);
            let node = model.node(idx);
            if node.is_checked() || node.is_indeterminate() {
                if let Some(parent) = node.parent() {
                    model.node_mut(parent).set_indeterminate(true);
                }
            }
        }
        self.primed = true;
        tracing::debug!(
            target: targets::SELECTION,
            nodes = model.len(),
            "selection state recomputed"
        );
    }

    /// Sets a node's checked flag and repairs the flags of its ancestor
    /// chain. No sibling subtree is visited.
    pub fn set_checked(&mut self, model: &mut TreeModel, idx: NodeIdx, checked: bool) {
        if !self.primed {
            // Incremental propagation against stale flags would leave
            // the tree inconsistent; fall back to a full pass.
            debug_assert!(self.primed, "set_checked before recompute");
            tracing::error!(
                target: targets::SELECTION,
                "incremental selection update before recompute; recomputing"
            );
            self.recompute(model);
        }

        model.node_mut(idx).set_checked(checked);
        if checked {
            model.node_mut(idx).set_indeterminate(false);
        } else {
            // Unchecking an internal node may leave it with checked
            // descendants; rederive its own flag from direct children.
            let own = Self::any_child_marked(model, idx);
            model.node_mut(idx).set_indeterminate(own);
        }

        self.propagate_upward(model, idx);

        tracing::trace!(
            target: targets::SELECTION,
            node = model.node(idx).identifier(),
            checked,
            "checked state changed"
        );
    }

    /// Flips a node's checked flag. Returns the new value.
    pub fn toggle(&mut self, model: &mut TreeModel, idx: NodeIdx) -> bool {
        let next = !model.node(idx).is_checked();
        self.set_checked(model, idx, next);
        next
    }

    /// Repairs the indeterminate flags on the ancestor chain of `from`.
    ///
    /// While the node below is checked or indeterminate the answer for
    /// each ancestor is `true` without looking further; only once the
    /// chain goes quiet does each ancestor consult its direct children.
    fn propagate_upward(&self, model: &mut TreeModel, from: NodeIdx) {
        let ancestors = model.node(from).ancestors().to_vec();
        let mut below = from;
        for ancestor in ancestors {
            let below_node = model.node(below);
            let marked = if below_node.is_checked() || below_node.is_indeterminate() {
                true
            } else {
                Self::any_child_marked(model, ancestor)
            };
            model.node_mut(ancestor).set_indeterminate(marked);
            below = ancestor;
        }
    }

    /// `true` if any direct child of `idx` is checked or indeterminate.
    fn any_child_marked(model: &TreeModel, idx: NodeIdx) -> bool {
        model
            .node(idx)
            .children()
            .iter()
            .any(|&child| {
                let node = model.node(child);
                node.is_checked() || node.is_indeterminate()
            })
    }
}
