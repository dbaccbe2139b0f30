//! Error types for Treeline.

use thiserror::Error;

/// Errors raised while building a tree model from a load payload.
///
/// Any of these aborts the load before a single scene operation is
/// produced; a partially-built tree is never observable.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The payload could not be parsed.
    #[error("malformed tree payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// A node arrived without an identifier.
    #[error("node {name:?} has an empty identifier")]
    EmptyIdentifier {
        /// Display name of the offending node.
        name: String,
    },

    /// Two nodes share the same identifier.
    #[error("duplicate node identifier {identifier:?}")]
    DuplicateIdentifier {
        /// The identifier seen more than once.
        identifier: String,
    },

    /// The hierarchy nests deeper than the configured limit, which in
    /// practice means cyclic or adversarial input.
    #[error("node {identifier:?} exceeds the maximum depth of {max_depth}")]
    TooDeep {
        /// Identifier of the node at which the limit was hit.
        identifier: String,
        /// The configured depth limit.
        max_depth: usize,
    },
}
