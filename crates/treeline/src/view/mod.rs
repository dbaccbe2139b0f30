//! The tree view facade and its render pipeline.
//!
//! [`TreeView`] owns the model and every pipeline stage, and is the only
//! type a host needs to drive: feed it payloads, scroll positions and
//! gestures, then call [`render`](TreeView::render) with a backend. Each
//! pass runs flatten → window → diff and hands the resulting patch to
//! the backend; signals fire around the lifecycle points so hosts can
//! hook in without subclassing anything.

mod drag;
mod flatten;
mod scene;
mod window;

pub use drag::{DragIndicator, DragTracker, SnapPoint};
pub use scene::{DragOverlay, EdgeVisual, NodeVisual, RenderBackend, ScenePatch};
pub use window::{OVERSCAN, WindowSlice};

use std::time::Duration;

use tracing::debug;
use treeline_core::Signal;
use treeline_core::logging::targets;

use crate::error::LoadError;
use crate::model::{CheckState, NodeId, NodeIdx, NodePayload, SelectionPropagator, TreeModel};
use crate::settings::TreeSettings;

/// A virtualized, collapsible tree view.
///
/// All state lives on the UI thread; every method runs to completion
/// before returning and signals are emitted only after the triggering
/// mutation is fully applied.
pub struct TreeView {
    model: TreeModel,
    settings: TreeSettings,
    selection: SelectionPropagator,
    diff: scene::DiffRenderer,
    drag: DragTracker,
    /// Flat projection of the expanded tree, rebuilt on load and toggle.
    flat: Vec<NodeIdx>,
    /// Last successfully loaded payload, kept for [`reload`](Self::reload).
    last_payload: Vec<NodePayload>,
    scroll_position: f32,
    viewport: f32,

    /// Fires after a payload has been loaded and validated.
    pub after_load: Signal<()>,
    /// Fires at the start of every render pass, before diffing.
    pub before_update: Signal<()>,
    /// Fires once per row delivered to the backend in a pass.
    pub after_node_render: Signal<NodeId>,
    /// Fires with the full checked-identifier list after any selection
    /// change.
    pub after_selection_change: Signal<Vec<NodeId>>,
    /// Fires with the toggled node after an expand/collapse.
    pub toggle_changed: Signal<NodeId>,
}

impl TreeView {
    pub fn new(settings: TreeSettings) -> Self {
        let drag = DragTracker::new(Duration::from_millis(settings.drag_throttle_ms));
        Self {
            model: TreeModel::new(),
            settings,
            selection: SelectionPropagator::new(),
            diff: scene::DiffRenderer::new(),
            drag,
            flat: Vec::new(),
            last_payload: Vec::new(),
            scroll_position: 0.0,
            viewport: 0.0,
            after_load: Signal::new(),
            before_update: Signal::new(),
            after_node_render: Signal::new(),
            after_selection_change: Signal::new(),
            toggle_changed: Signal::new(),
        }
    }

    /// Replaces the tree with a new payload.
    ///
    /// The previous tree, scene diff state and any in-flight drag are
    /// discarded only once the payload has validated; on error the view
    /// keeps showing the old tree.
    pub fn load(&mut self, roots: &[NodePayload]) -> Result<(), LoadError> {
        let mut model = TreeModel::load(roots, self.settings.max_depth)?;
        self.selection.reset();
        self.selection.recompute(&mut model);
        self.model = model;
        self.flat = flatten::flatten(&self.model);
        self.diff.reset();
        self.drag.end(self.settings.row_height);
        self.last_payload = roots.to_vec();

        debug!(
            target: targets::VIEW,
            nodes = self.model.len(),
            rows = self.flat.len(),
            "tree loaded"
        );
        self.after_load.emit(());
        Ok(())
    }

    /// Parses a JSON array of payload nodes and loads it.
    pub fn load_json(&mut self, json: &str) -> Result<(), LoadError> {
        let roots: Vec<NodePayload> = serde_json::from_str(json)?;
        self.load(&roots)
    }

    /// Rebuilds the tree from the last loaded payload, discarding all
    /// expansion and selection state.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        let roots = std::mem::take(&mut self.last_payload);
        let result = self.load(&roots);
        if result.is_err() {
            self.last_payload = roots;
        }
        result
    }

    /// The loaded model.
    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    /// The view configuration.
    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    /// Sets the viewport height in scene units.
    pub fn set_viewport_size(&mut self, height: f32) {
        self.viewport = height.max(0.0);
    }

    /// Sets the host scroll offset in scene units.
    pub fn set_scroll_position(&mut self, offset: f32) {
        self.scroll_position = offset;
    }

    pub fn scroll_position(&self) -> f32 {
        self.scroll_position
    }

    /// Total height of the flattened tree in scene units.
    pub fn content_height(&self) -> f32 {
        self.flat.len() as f32 * self.settings.row_height
    }

    /// The `(top, bottom)` y band rendering is restricted to, centered
    /// on the viewport with overscan on both sides.
    pub fn band(&self) -> (f32, f32) {
        let top = (self.scroll_position - self.viewport / 2.0).max(0.0);
        (top, top + self.viewport * OVERSCAN)
    }

    fn slice(&self) -> WindowSlice {
        window::window(
            self.flat.len(),
            self.band().0,
            self.viewport,
            self.settings.row_height,
        )
    }

    /// Number of rows the current window covers.
    pub fn visible_row_count(&self) -> usize {
        self.slice().len
    }

    /// Identifiers of the rows in the current window, top to bottom.
    pub fn visible_identifiers(&self) -> Vec<NodeId> {
        self.flat[self.slice().range()]
            .iter()
            .map(|&idx| self.model.node(idx).identifier().to_string())
            .collect()
    }

    /// Expands or collapses a node, flipping its current state.
    ///
    /// Returns the new open state, or `None` when the identifier is
    /// unknown or names a leaf. The flat projection is rebuilt before
    /// the signal fires.
    pub fn toggle(&mut self, identifier: &str) -> Option<bool> {
        let idx = self.model.lookup(identifier)?;
        if !self.model.node(idx).has_children() {
            return None;
        }
        let open = !self.model.node(idx).is_open();
        self.model.set_open(idx, open);
        self.flat = flatten::flatten(&self.model);

        debug!(target: targets::VIEW, identifier, open, "node toggled");
        self.toggle_changed.emit(identifier.to_string());
        Some(open)
    }

    /// Sets a node's checked state and propagates along its ancestors.
    ///
    /// Returns `false` when the identifier is unknown.
    pub fn set_checked(&mut self, identifier: &str, checked: bool) -> bool {
        let Some(idx) = self.model.lookup(identifier) else {
            return false;
        };
        self.selection.set_checked(&mut self.model, idx, checked);
        self.after_selection_change
            .emit(self.model.checked_identifiers());
        true
    }

    /// Flips a node's checked state. Returns the new value.
    pub fn toggle_checked(&mut self, identifier: &str) -> Option<bool> {
        let idx = self.model.lookup(identifier)?;
        let checked = self.selection.toggle(&mut self.model, idx);
        self.after_selection_change
            .emit(self.model.checked_identifiers());
        Some(checked)
    }

    /// Identifiers of all checked nodes, in preorder.
    pub fn checked_identifiers(&self) -> Vec<NodeId> {
        self.model.checked_identifiers()
    }

    /// The tri-state value of a node's checkbox.
    pub fn check_state(&self, identifier: &str) -> Option<CheckState> {
        let idx = self.model.lookup(identifier)?;
        Some(self.model.node(idx).check_state())
    }

    /// Begins a drag gesture on a row. Returns `false` for unknown
    /// identifiers.
    pub fn drag_start(&mut self, identifier: &str, y: f32) -> bool {
        let Some(idx) = self.model.lookup(identifier) else {
            return false;
        };
        self.drag.start(idx, y);
        true
    }

    /// Feeds a pointer move into the drag throttle. Returns the
    /// feedback position, or `None` when the sample was coalesced or no
    /// gesture is in flight.
    pub fn drag_move(&mut self, y: f32) -> Option<f32> {
        self.drag.move_to(y)
    }

    /// The drop-position indicator for the gesture in flight.
    pub fn drag_indicator(&self) -> Option<DragIndicator> {
        self.drag.indicator(self.settings.row_height)
    }

    /// Ends the drag gesture, returning the final snapped position.
    pub fn drag_end(&mut self) -> Option<SnapPoint> {
        self.drag.end(self.settings.row_height)
    }

    /// Runs one render pass against `backend`.
    ///
    /// Emits `before_update`, diffs the current window against the
    /// previous pass, applies the patch, then emits `after_node_render`
    /// for every row the patch delivered. A backend error propagates
    /// unchanged; the diff state is left as if the patch had applied,
    /// so the host decides whether to reset and re-render.
    pub fn render<B: RenderBackend>(&mut self, backend: &mut B) -> Result<(), B::Error> {
        self.before_update.emit(());

        let slice = self.slice();
        let overlay = self
            .drag
            .dragged()
            .zip(self.drag.position())
            .map(|(node, y)| DragOverlay { node, y });
        let patch = self.diff.reconcile(
            &self.model,
            &self.flat,
            slice,
            self.band(),
            overlay,
            &self.settings,
        );
        backend.apply(&patch)?;

        for visual in patch.enter.iter().chain(&patch.update) {
            self.after_node_render.emit(visual.identifier.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_fixtures::small_tree;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn view_with_small_tree() -> TreeView {
        let mut view = TreeView::new(TreeSettings::default());
        view.load(&small_tree()).unwrap();
        view.set_viewport_size(200.0);
        view
    }

    #[test]
    fn test_load_emits_after_load_once() {
        let mut view = TreeView::new(TreeSettings::default());
        let fired = Rc::new(RefCell::new(0));
        let sink = fired.clone();
        view.after_load.connect(move |()| *sink.borrow_mut() += 1);

        view.load(&small_tree()).unwrap();
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_failed_load_keeps_previous_tree() {
        let mut view = view_with_small_tree();
        assert!(view.load_json("not json").is_err());
        assert_eq!(view.visible_row_count(), 5);
        assert!(view.model().lookup("root").is_some());
    }

    #[test]
    fn test_toggle_rebuilds_rows_and_fires_signal() {
        let mut view = view_with_small_tree();
        let toggled: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = toggled.clone();
        view.toggle_changed.connect(move |id| sink.borrow_mut().push(id.clone()));

        assert_eq!(view.toggle("branch"), Some(false));
        assert_eq!(view.visible_identifiers(), vec!["root", "branch", "leaf-c"]);
        assert_eq!(*toggled.borrow(), vec!["branch"]);

        assert_eq!(view.toggle("branch"), Some(true));
        assert_eq!(view.visible_row_count(), 5);
    }

    #[test]
    fn test_toggle_on_leaf_or_unknown_id_is_rejected() {
        let mut view = view_with_small_tree();
        assert_eq!(view.toggle("leaf-a"), None);
        assert_eq!(view.toggle("no-such-node"), None);
        assert_eq!(view.visible_row_count(), 5);
    }

    #[test]
    fn test_reload_discards_expansion_and_selection_state() {
        let mut view = view_with_small_tree();
        view.toggle("branch");
        view.set_checked("leaf-c", true);
        assert_eq!(view.visible_row_count(), 3);

        let fired = Rc::new(RefCell::new(0));
        let sink = fired.clone();
        view.after_load.connect(move |()| *sink.borrow_mut() += 1);

        view.reload().unwrap();
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(view.visible_row_count(), 5);
        assert!(view.checked_identifiers().is_empty());
    }

    #[test]
    fn test_selection_signal_carries_checked_identifiers() {
        let mut view = view_with_small_tree();
        let seen: Rc<RefCell<Vec<Vec<String>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        view.after_selection_change
            .connect(move |ids| sink.borrow_mut().push(ids.clone()));

        view.set_checked("leaf-a", true);
        view.set_checked("leaf-c", true);
        view.set_checked("leaf-a", false);

        let seen = seen.borrow();
        assert_eq!(seen[0], vec!["leaf-a"]);
        assert_eq!(seen[1], vec!["leaf-a", "leaf-c"]);
        assert_eq!(seen[2], vec!["leaf-c"]);
    }

    #[test]
    fn test_check_state_reflects_propagation() {
        let mut view = view_with_small_tree();
        view.set_checked("leaf-a", true);
        assert_eq!(view.check_state("branch"), Some(CheckState::Indeterminate));
        assert_eq!(view.check_state("root"), Some(CheckState::Indeterminate));
        assert_eq!(view.check_state("leaf-c"), Some(CheckState::Unchecked));
    }

    #[test]
    fn test_band_centers_on_viewport_and_clamps_at_top() {
        let mut view = view_with_small_tree();
        view.set_scroll_position(0.0);
        assert_eq!(view.band(), (0.0, 300.0));

        view.set_scroll_position(1000.0);
        assert_eq!(view.band(), (900.0, 1200.0));
    }

    #[test]
    fn test_drag_lifecycle_through_the_facade() {
        let mut view = view_with_small_tree();
        assert!(!view.drag_start("no-such-node", 0.0));

        assert!(view.drag_start("leaf-a", 40.0));
        assert_eq!(view.drag_move(52.0), Some(52.0));
        let indicator = view.drag_indicator().unwrap();
        assert_eq!(indicator.height, 1.0);

        let point = view.drag_end().unwrap();
        assert_eq!(point.row, 2.5);
        assert!(view.drag_indicator().is_none());
    }
}
