//! Treeline renders a large hierarchical dataset as a scrollable,
//! collapsible diagram while keeping the number of live on-screen
//! elements bounded, independent of total node count.
//!
//! The crate is the *core* of such a widget: it owns the tree model and
//! the pipeline that turns it into an incrementally-updated visible
//! window (flatten → window → diff), plus the tri-state selection
//! propagation algorithm and drag-gesture tracking. Drawing, input
//! capture and asset loading stay with the host: the core hands a
//! [`ScenePatch`](view::ScenePatch) of enter/update/exit operations to a
//! pluggable [`RenderBackend`](view::RenderBackend) and never touches
//! drawing primitives itself.
//!
//! # Example
//!
//! ```
//! use treeline::TreeSettings;
//! use treeline::view::TreeView;
//!
//! let mut view = TreeView::new(TreeSettings::default());
//! view.load_json(
//!     r#"[{"identifier": "root", "name": "Root", "children": [
//!         {"identifier": "a", "name": "A"},
//!         {"identifier": "b", "name": "B"}
//!     ]}]"#,
//! ).unwrap();
//!
//! view.set_viewport_size(200.0);
//! assert_eq!(view.visible_row_count(), 3);
//!
//! view.toggle("root");
//! assert_eq!(view.visible_row_count(), 1);
//! ```
//!
//! # Concurrency model
//!
//! Single-threaded, cooperative, event-driven. Every operation (load,
//! scroll, toggle, selection, drag) runs to completion on the UI thread
//! before the next event is handled; the one deliberate exception is
//! drag-move feedback, which is coalesced by a latest-wins throttle.

mod error;
pub mod model;
mod settings;
pub mod view;

pub use error::LoadError;
pub use settings::TreeSettings;
