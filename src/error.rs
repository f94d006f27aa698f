//! Error types for the resource graph builder.

use crate::fetch::FetchError;
use thiserror::Error;

/// Errors that can occur while building or navigating resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The node's `sys.type` is not one of the known resource kinds.
    #[error("Unparsable resource: {0}")]
    UnparsableResource(String),

    /// A `sys` date field could not be parsed as an ISO-8601 date-time.
    #[error("Malformed timestamp in sys.{field}: {value}")]
    MalformedTimestamp { field: String, value: String },

    /// A dynamic field lookup found no field with that name.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The fetch capability used by `resolve`/`reload` failed.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A user-registered constructor rejected the node.
    #[error("Custom constructor error: {0}")]
    Custom(String),
}

impl ResourceError {
    pub(crate) fn unknown_kind() -> Self {
        ResourceError::UnparsableResource("Item type is not known, could not parse".to_string())
    }
}

impl From<String> for ResourceError {
    fn from(msg: String) -> Self {
        ResourceError::Custom(msg)
    }
}
