//! Projection of the tree onto the ordered list of visible rows.
//!
//! A node is visible iff no ancestor is collapsed, so a single pass over
//! the preorder arena with the closed set in hand produces the flat row
//! list. The pass never recurses and allocates only the output vector.

use std::collections::HashSet;

use crate::model::{NodeIdx, TreeModel};

/// Flattens the expanded portion of `model` into preorder row indices.
///
/// The output is a pure function of tree shape and the open flags:
/// flattening twice without an intervening toggle yields the same rows.
pub fn flatten(model: &TreeModel) -> Vec<NodeIdx> {
    let closed: HashSet<NodeIdx> = model
        .preorder()
        .filter(|&idx| {
            let node = model.node(idx);
            node.has_children() && !node.is_open()
        })
        .collect();

    if closed.is_empty() {
        return model.preorder().collect();
    }

    model
        .preorder()
        .filter(|&idx| {
            model
                .node(idx)
                .ancestors()
                .iter()
                .all(|ancestor| !closed.contains(ancestor))
        })
        .collect()
}
