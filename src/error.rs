//! Error types produced while normalizing output and driving render passes.

use thiserror::Error;

use crate::jsx::DevSource;

/// Boxed error returned by external collaborators.
///
/// Failures raised by the component executor, the diff engine or a rejected
/// pending value are carried through unchanged as the `source` of a
/// [`RenderError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the normalizer.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A descriptor's type was neither a tag, the fragment marker nor a component.
    #[error("invalid node type `{found}`")]
    InvalidNodeType {
        /// Debug rendering of the rejected type.
        found: String,
        /// Where the descriptor was created, when known.
        location: Option<DevSource>,
    },
    /// A pending value resolved to a failure.
    #[error("pending value was rejected: {0}")]
    Rejected(#[source] BoxError),
}

/// Errors that abort a render pass.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Normalization of the component output failed.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    /// The component executor failed.
    #[error("component execution failed: {0}")]
    Executor(#[source] BoxError),
    /// The diff/commit engine failed.
    #[error("diff/commit failed: {0}")]
    Commit(#[source] BoxError),
}

impl RenderError {
    /// Returns `true` if the pass failed on an invalid node type.
    #[must_use]
    pub const fn is_invalid_node_type(&self) -> bool {
        matches!(
            self,
            Self::Normalize(NormalizeError::InvalidNodeType { .. })
        )
    }
}
