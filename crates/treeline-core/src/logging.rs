//! Logging facilities for Treeline.
//!
//! Treeline uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem, e.g.
/// `RUST_LOG=treeline::selection=trace`.
pub mod targets {
    /// Signal emission.
    pub const SIGNAL: &str = "treeline::signal";
    /// Model loading and validation.
    pub const MODEL: &str = "treeline::model";
    /// Tri-state selection propagation.
    pub const SELECTION: &str = "treeline::selection";
    /// Flatten/window/diff pipeline.
    pub const VIEW: &str = "treeline::view";
    /// Drag gesture tracking.
    pub const DRAG: &str = "treeline::drag";
}
