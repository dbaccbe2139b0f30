//! View configuration.

use serde::{Deserialize, Serialize};

/// Geometry and feature configuration for a [`TreeView`](crate::view::TreeView).
///
/// The defaults reproduce a 20px row grid with 16px indentation steps and
/// both optional features (checkboxes, icons) disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// Height of one row in scene units.
    pub row_height: f32,
    /// Horizontal offset added per depth level.
    pub indent_width: f32,
    /// Render tri-state checkbox visuals and label suffixes.
    pub show_checkboxes: bool,
    /// Emit icon definitions and per-node icon references.
    pub show_icons: bool,
    /// Interval of the drag-move feedback throttle, in milliseconds.
    pub drag_throttle_ms: u64,
    /// Depth limit guarding the loader against cyclic or runaway input.
    pub max_depth: usize,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            row_height: 20.0,
            indent_width: 16.0,
            show_checkboxes: false,
            show_icons: false,
            drag_throttle_ms: 40,
            max_depth: 256,
        }
    }
}
