//! Drag-to-reorder gesture tracking.
//!
//! The tracker follows a pointer through a drag, snapping it to
//! half-row granularity and coalescing move events through a
//! latest-wins throttle so feedback work stays bounded regardless of
//! pointer event rate. It produces positions only; applying a drop to
//! the tree is the host's concern.

use std::time::{Duration, Instant};

use tracing::trace;
use treeline_core::logging::targets;
use treeline_core::Throttle;

use crate::model::NodeIdx;

/// A pointer position snapped to half-row granularity.
///
/// Whole values sit *on* a row (drop into), `x.5` values sit between
/// two rows (drop between).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    /// Snapped flat-row position; may end in `.5`.
    pub row: f32,
}

impl SnapPoint {
    /// Snaps a scene y coordinate to the nearest half row.
    pub fn from_y(y: f32, row_height: f32) -> Self {
        Self {
            row: (y / row_height * 2.0).round() / 2.0,
        }
    }

    /// `true` if the point sits between two rows rather than on one.
    pub fn between_rows(&self) -> bool {
        self.row.fract() != 0.0
    }

    /// The indicator geometry for this snap position.
    ///
    /// Between rows the indicator is a hairline at the boundary; on a
    /// row it covers the full row height.
    pub fn indicator(&self, row_height: f32) -> DragIndicator {
        if self.between_rows() {
            DragIndicator {
                y: self.row * row_height + row_height / 2.0,
                height: 1.0,
            }
        } else {
            DragIndicator {
                y: self.row * row_height,
                height: row_height,
            }
        }
    }
}

/// Geometry of the drop-position indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragIndicator {
    /// Top of the indicator in scene coordinates.
    pub y: f32,
    /// Hairline (1.0) between rows, full row height on a row.
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragPhase {
    Idle,
    Dragging,
}

/// State machine for one drag gesture at a time.
#[derive(Debug)]
pub struct DragTracker {
    phase: DragPhase,
    dragged: Option<NodeIdx>,
    last_y: f32,
    throttle: Throttle<f32>,
}

impl DragTracker {
    pub fn new(throttle_interval: Duration) -> Self {
        Self {
            phase: DragPhase::Idle,
            dragged: None,
            last_y: 0.0,
            throttle: Throttle::new(throttle_interval),
        }
    }

    /// `true` while a gesture is in flight.
    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// The row being dragged, if any.
    pub fn dragged(&self) -> Option<NodeIdx> {
        self.dragged
    }

    /// The raw (unsnapped) pointer position of the gesture in flight.
    pub fn position(&self) -> Option<f32> {
        (self.phase == DragPhase::Dragging).then_some(self.last_y)
    }

    /// Begins a gesture on `node` at pointer position `y`.
    ///
    /// A start while another gesture is in flight replaces it; the
    /// previous gesture is abandoned without a drop position.
    pub fn start(&mut self, node: NodeIdx, y: f32) {
        self.phase = DragPhase::Dragging;
        self.dragged = Some(node);
        self.last_y = y;
        self.throttle.reset();
        trace!(target: targets::DRAG, y, "drag started");
    }

    /// Feeds a pointer move into the throttle.
    ///
    /// Returns the y to render feedback at, or `None` when the sample
    /// was coalesced (a later move or [`end`](Self::end) will pick the
    /// position up). Moves outside a gesture are ignored.
    pub fn move_to(&mut self, y: f32) -> Option<f32> {
        self.move_to_at(y, Instant::now())
    }

    pub(crate) fn move_to_at(&mut self, y: f32, now: Instant) -> Option<f32> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        self.last_y = y;
        self.throttle.submit_at(y, now)
    }

    /// The indicator for the pointer's current snapped position.
    pub fn indicator(&self, row_height: f32) -> Option<DragIndicator> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        Some(SnapPoint::from_y(self.last_y, row_height).indicator(row_height))
    }

    /// Ends the gesture and returns the final snapped position.
    ///
    /// State is cleared unconditionally, even if no move ever arrived;
    /// an end without a matching start returns `None`.
    pub fn end(&mut self, row_height: f32) -> Option<SnapPoint> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        let point = SnapPoint::from_y(self.last_y, row_height);
        self.phase = DragPhase::Idle;
        self.dragged = None;
        self.throttle.reset();
        trace!(target: targets::DRAG, row = point.row, "drag ended");
        Some(point)
    }
}
