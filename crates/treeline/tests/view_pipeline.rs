//! End-to-end pipeline tests driving [`TreeView`] against a recording
//! backend, the way a host embedding the view would.

use std::collections::HashMap;

use treeline::model::{CheckState, NodePayload};
use treeline::view::{RenderBackend, ScenePatch, TreeView};
use treeline::TreeSettings;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Keeps a live element map keyed by identifier, as a real scene-graph
/// backend would, and records per-pass patch statistics.
#[derive(Default)]
struct RecordingBackend {
    live: HashMap<String, f32>,
    passes: Vec<(usize, usize, usize)>,
    fail_next: bool,
}

impl RecordingBackend {
    fn last_pass(&self) -> (usize, usize, usize) {
        *self.passes.last().expect("no render pass recorded")
    }
}

#[derive(Debug, PartialEq)]
struct BackendDown;

impl RenderBackend for RecordingBackend {
    type Error = BackendDown;

    fn apply(&mut self, patch: &ScenePatch) -> Result<(), Self::Error> {
        if self.fail_next {
            self.fail_next = false;
            return Err(BackendDown);
        }
        for visual in &patch.enter {
            assert!(
                !self.live.contains_key(&visual.identifier),
                "{} entered twice",
                visual.identifier
            );
            self.live.insert(visual.identifier.clone(), visual.y);
        }
        for visual in &patch.update {
            assert!(
                self.live.contains_key(&visual.identifier),
                "{} updated before entering",
                visual.identifier
            );
            self.live.insert(visual.identifier.clone(), visual.y);
        }
        for id in &patch.exit {
            assert!(
                self.live.remove(id).is_some(),
                "{id} exited without entering"
            );
        }
        self.passes
            .push((patch.enter.len(), patch.update.len(), patch.exit.len()));
        Ok(())
    }
}

/// A root with 999 leaf children: 1000 flat rows when expanded.
fn wide_tree() -> Vec<NodePayload> {
    let children = (0..999)
        .map(|i| NodePayload::new(format!("leaf-{i:03}"), format!("Leaf {i}")))
        .collect();
    vec![NodePayload::new("root", "Root").with_children(children)]
}

fn wide_view() -> TreeView {
    let mut view = TreeView::new(TreeSettings::default());
    view.load(&wide_tree()).unwrap();
    // A 200-unit viewport over 20-unit rows: 10 rows on screen.
    view.set_viewport_size(200.0);
    view
}

#[test]
fn live_element_count_is_bounded_by_overscan_not_tree_size() {
    init_tracing();
    let mut view = wide_view();
    let mut backend = RecordingBackend::default();

    for scroll in [0.0, 190.0, 5_000.0, 13_370.0, 19_999.0] {
        view.set_scroll_position(scroll);
        view.render(&mut backend).unwrap();
        assert!(
            backend.live.len() <= 16,
            "{} live elements at scroll {scroll}",
            backend.live.len()
        );
    }
}

#[test]
fn unchanged_window_renders_with_zero_enter_and_exit() {
    init_tracing();
    let mut view = wide_view();
    let mut backend = RecordingBackend::default();

    view.render(&mut backend).unwrap();
    let (enter, _, _) = backend.last_pass();
    assert_eq!(enter, 16);

    view.render(&mut backend).unwrap();
    let (enter, update, exit) = backend.last_pass();
    assert_eq!(enter, 0);
    assert_eq!(exit, 0);
    assert_eq!(update, 16);
}

#[test]
fn small_scroll_step_recycles_the_overlap() {
    init_tracing();
    let mut view = wide_view();
    let mut backend = RecordingBackend::default();

    view.set_scroll_position(400.0);
    view.render(&mut backend).unwrap();

    // One viewport height further: the band moves 10 rows, so 10 rows
    // leave, 10 enter and the overlapping 6 are updated in place.
    view.set_scroll_position(600.0);
    view.render(&mut backend).unwrap();
    assert_eq!(backend.last_pass(), (10, 6, 10));
}

#[test]
fn far_jump_replaces_the_window_wholesale() {
    init_tracing();
    let mut view = wide_view();
    let mut backend = RecordingBackend::default();

    view.render(&mut backend).unwrap();
    view.set_scroll_position(10_000.0);
    view.render(&mut backend).unwrap();
    assert_eq!(backend.last_pass(), (16, 0, 16));
}

#[test]
fn collapse_under_the_window_exits_hidden_rows() {
    init_tracing();
    let payload = vec![
        NodePayload::new("a", "A").with_children(vec![
            NodePayload::new("a1", "A1"),
            NodePayload::new("a2", "A2"),
        ]),
        NodePayload::new("b", "B").with_children(vec![NodePayload::new("b1", "B1")]),
    ];
    let mut view = TreeView::new(TreeSettings::default());
    view.load(&payload).unwrap();
    view.set_viewport_size(200.0);
    let mut backend = RecordingBackend::default();
    view.render(&mut backend).unwrap();
    assert_eq!(backend.live.len(), 5);

    view.toggle("a");
    view.render(&mut backend).unwrap();
    let (enter, update, exit) = backend.last_pass();
    assert_eq!((enter, exit), (0, 2));
    assert_eq!(update, 3);
    // Rows below the collapsed subtree moved up.
    assert_eq!(backend.live["b"], 1.0 * 20.0);
    assert_eq!(backend.live["b1"], 2.0 * 20.0);
}

#[test]
fn expand_scroll_and_collapse_round_trip() {
    init_tracing();
    let mut view = wide_view();
    let mut backend = RecordingBackend::default();

    view.render(&mut backend).unwrap();
    view.set_scroll_position(5_000.0);
    view.render(&mut backend).unwrap();

    // Collapsing the root from anywhere leaves a single live row.
    view.toggle("root");
    view.set_scroll_position(0.0);
    view.render(&mut backend).unwrap();
    assert_eq!(backend.live.len(), 1);
    assert!(backend.live.contains_key("root"));

    view.toggle("root");
    view.render(&mut backend).unwrap();
    assert_eq!(backend.live.len(), 16);
}

#[test]
fn selection_changes_flow_to_the_backend_as_updates() {
    init_tracing();
    let payload = vec![
        NodePayload::new("root", "Root").with_children(vec![
            NodePayload::new("a", "A"),
            NodePayload::new("b", "B"),
        ]),
    ];
    let settings = TreeSettings {
        show_checkboxes: true,
        ..TreeSettings::default()
    };
    let mut view = TreeView::new(settings);
    view.load(&payload).unwrap();
    view.set_viewport_size(200.0);
    let mut backend = RecordingBackend::default();
    view.render(&mut backend).unwrap();

    view.set_checked("a", true);
    view.render(&mut backend).unwrap();
    let (enter, update, exit) = backend.last_pass();
    assert_eq!((enter, exit), (0, 0));
    assert_eq!(update, 3);
    assert_eq!(view.checked_identifiers(), vec!["a"]);
}

#[test]
fn collapse_and_leaf_check_interact_independently() {
    init_tracing();
    let payload = vec![NodePayload::new("a", "A").with_children(vec![
        NodePayload::new("b", "B"),
        NodePayload::new("c", "C"),
    ])];
    let mut view = TreeView::new(TreeSettings::default());
    view.load(&payload).unwrap();
    view.set_viewport_size(60.0);
    assert_eq!(view.visible_identifiers(), ["a", "b", "c"]);

    view.toggle("a");
    assert_eq!(view.visible_identifiers(), ["a"]);
    view.toggle("a");

    view.set_checked("b", true);
    assert_eq!(view.check_state("a"), Some(CheckState::Indeterminate));
    assert_eq!(view.check_state("c"), Some(CheckState::Unchecked));
}

#[test]
fn backend_error_propagates_out_of_render() {
    init_tracing();
    let mut view = wide_view();
    let mut backend = RecordingBackend::default();
    backend.fail_next = true;
    assert_eq!(view.render(&mut backend), Err(BackendDown));
}

#[test]
fn render_signals_fire_in_lifecycle_order() {
    init_tracing();
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut view = TreeView::new(TreeSettings::default());
    let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let sink = log.clone();
    view.after_load.connect(move |()| sink.borrow_mut().push("load".into()));
    let sink = log.clone();
    view.before_update
        .connect(move |()| sink.borrow_mut().push("update".into()));
    let sink = log.clone();
    view.after_node_render
        .connect(move |id| sink.borrow_mut().push(format!("render:{id}")));

    view.load(&[NodePayload::new("only", "Only")]).unwrap();
    view.set_viewport_size(100.0);
    let mut backend = RecordingBackend::default();
    view.render(&mut backend).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["load", "update", "render:only"]
    );
}
