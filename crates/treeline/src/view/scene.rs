//! Scene diffing against a pluggable rendering backend.
//!
//! The view never draws. Each render pass it describes the windowed
//! rows as plain value objects, diffs them against the previous pass
//! keyed by node identifier, and hands the resulting [`ScenePatch`] to a
//! [`RenderBackend`]. Rows that stay in the window between passes are
//! updated in place; only rows entering or leaving the window cost the
//! backend an allocation or a teardown.

use std::collections::{HashMap, HashSet};

use tracing::trace;
use treeline_core::logging::targets;

use crate::model::{CheckState, IconDef, NodeId, NodeIdx, TreeModel};
use crate::settings::TreeSettings;
use crate::view::window::WindowSlice;

/// Everything a backend needs to draw one row.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    /// Stable identifier; the backend keys its elements by this.
    pub identifier: NodeId,
    /// Left edge of the row content, indented by depth.
    pub x: f32,
    /// Top of the row in absolute scene coordinates.
    pub y: f32,
    /// Display label.
    pub label: String,
    /// `true` if the row shows an expand/collapse toggle.
    pub toggle_visible: bool,
    /// Orientation of the toggle; meaningless when it is hidden.
    pub toggle_open: bool,
    /// Tri-state checkbox value, present only when checkboxes are on.
    pub check_state: Option<CheckState>,
    /// Reference into the icon table, present only when icons are on.
    pub icon_ref: Option<String>,
}

/// A connector from a parent row to one of its visible children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeVisual {
    /// Anchor at the parent row, `(x, y)` in scene coordinates.
    pub source: (f32, f32),
    /// Anchor at the child row.
    pub target: (f32, f32),
    /// `true` if the child is itself an inner node; leaf connectors
    /// are drawn slightly shorter.
    pub has_children_at_target: bool,
}

/// Live pointer position of an in-flight drag, substituted for the
/// dragged row's resting position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOverlay {
    /// The row being dragged.
    pub node: NodeIdx,
    /// Pointer y in scene coordinates.
    pub y: f32,
}

/// The output of one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenePatch {
    /// Rows that entered the window this pass.
    pub enter: Vec<NodeVisual>,
    /// Rows already present whose visuals may have changed.
    pub update: Vec<NodeVisual>,
    /// Identifiers of rows that left the window.
    pub exit: Vec<NodeId>,
    /// Replacement connector set, or `None` to keep the previous one.
    pub edges: Option<Vec<EdgeVisual>>,
    /// Icon definitions not yet sent to the backend.
    pub icons: Vec<IconDef>,
}

impl ScenePatch {
    /// `true` if applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty()
            && self.update.is_empty()
            && self.exit.is_empty()
            && self.edges.is_none()
            && self.icons.is_empty()
    }
}

/// Drawing-side receiver of scene patches.
///
/// Implementations own the mapping from identifiers to whatever scene
/// elements they manage; the view only guarantees that every `update`
/// and `exit` identifier was previously delivered through `enter`.
pub trait RenderBackend {
    /// Backend-specific failure, surfaced unchanged through
    /// [`TreeView::render`](crate::view::TreeView::render).
    type Error;

    /// Applies one patch to the live scene.
    fn apply(&mut self, patch: &ScenePatch) -> Result<(), Self::Error>;
}

/// Diffs successive window snapshots into [`ScenePatch`]es.
#[derive(Debug, Default)]
pub struct DiffRenderer {
    prev_slice: Option<(usize, usize, usize)>,
    prev_ids: Vec<NodeId>,
    icons_sent: bool,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the previous pass, e.g. after a reload. The next
    /// reconcile re-enters every windowed row and resends the icons.
    pub fn reset(&mut self) {
        self.prev_slice = None;
        self.prev_ids.clear();
        self.icons_sent = false;
    }

    /// Builds the patch that carries the scene from the previous pass to
    /// the current window.
    ///
    /// `band` is the `(top, bottom)` y interval that connectors must
    /// intersect to be worth emitting. When the slice triple and the
    /// window contents both match the previous pass the structural work
    /// is skipped and only row visuals are refreshed.
    pub fn reconcile(
        &mut self,
        model: &TreeModel,
        flat: &[NodeIdx],
        slice: WindowSlice,
        band: (f32, f32),
        drag: Option<DragOverlay>,
        settings: &TreeSettings,
    ) -> ScenePatch {
        let windowed = &flat[slice.range()];
        let ids: Vec<NodeId> = windowed
            .iter()
            .map(|&idx| model.node(idx).identifier().to_string())
            .collect();

        let triple = (slice.start, slice.rows, flat.len());
        let structural = self.prev_slice != Some(triple) || self.prev_ids != ids;

        let mut patch = ScenePatch::default();
        if !self.icons_sent && settings.show_icons {
            patch.icons = model.icons().to_vec();
            self.icons_sent = true;
        }

        let prev: HashSet<&str> = self.prev_ids.iter().map(String::as_str).collect();
        let current: HashSet<&str> = ids.iter().map(String::as_str).collect();

        for (offset, &idx) in windowed.iter().enumerate() {
            let visual = self.visual(model, idx, slice.start + offset, drag, settings);
            if prev.contains(visual.identifier.as_str()) {
                patch.update.push(visual);
            } else {
                patch.enter.push(visual);
            }
        }
        patch.exit = self
            .prev_ids
            .iter()
            .filter(|id| !current.contains(id.as_str()))
            .cloned()
            .collect();

        if structural || drag.is_some() {
            patch.edges = Some(self.edges(model, flat, slice, band, drag, settings));
        }

        trace!(
            target: targets::VIEW,
            enter = patch.enter.len(),
            update = patch.update.len(),
            exit = patch.exit.len(),
            structural,
            "scene reconciled"
        );

        self.prev_slice = Some(triple);
        self.prev_ids = ids;
        patch
    }

    fn visual(
        &self,
        model: &TreeModel,
        idx: NodeIdx,
        flat_row: usize,
        drag: Option<DragOverlay>,
        settings: &TreeSettings,
    ) -> NodeVisual {
        let node = model.node(idx);
        let y = match drag {
            Some(overlay) if overlay.node == idx => overlay.y,
            _ => flat_row as f32 * settings.row_height,
        };

        let mut label = node.name().to_string();
        let check_state = settings.show_checkboxes.then(|| node.check_state());
        match check_state {
            Some(CheckState::Checked) => label.push_str(" (checked)"),
            Some(CheckState::Indeterminate) => label.push_str(" (indeterminate)"),
            _ => {}
        }

        let icon_ref = if settings.show_icons {
            node.icon_hash().map(|hash| format!("icon-{hash}"))
        } else {
            None
        };

        NodeVisual {
            identifier: node.identifier().to_string(),
            x: node.depth() as f32 * settings.indent_width,
            y,
            label,
            toggle_visible: node.has_children(),
            toggle_open: node.is_open(),
            check_state,
            icon_ref,
        }
    }

    /// Connectors from each windowed row to its parent, restricted to
    /// the band around the viewport.
    fn edges(
        &self,
        model: &TreeModel,
        flat: &[NodeIdx],
        slice: WindowSlice,
        band: (f32, f32),
        drag: Option<DragOverlay>,
        settings: &TreeSettings,
    ) -> Vec<EdgeVisual> {
        let flat_row: HashMap<NodeIdx, usize> = flat
            .iter()
            .enumerate()
            .map(|(row, &idx)| (idx, row))
            .collect();

        let mut edges = Vec::new();
        for &idx in &flat[slice.range()] {
            let node = model.node(idx);
            let Some(parent) = node.parent() else {
                continue;
            };
            let Some(&parent_row) = flat_row.get(&parent) else {
                continue;
            };
            let Some(&row) = flat_row.get(&idx) else {
                continue;
            };

            let parent_node = model.node(parent);
            let source = (
                parent_node.depth() as f32 * settings.indent_width,
                parent_row as f32 * settings.row_height,
            );
            let mut target_x = node.depth() as f32 * settings.indent_width;
            if !node.has_children() {
                target_x -= settings.indent_width / 4.0;
            }
            let target_y = match drag {
                Some(overlay) if overlay.node == idx => overlay.y,
                _ => row as f32 * settings.row_height,
            };

            // Connectors entirely above or below the band are invisible
            // anyway; drop them before they reach the backend.
            if source.1 <= band.1 && band.0 <= target_y {
                edges.push(EdgeVisual {
                    source,
                    target: (target_x, target_y),
                    has_children_at_target: node.has_children(),
                });
            }
        }
        edges
    }
}
