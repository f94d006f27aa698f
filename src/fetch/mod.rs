//! # Fetch Capability
//!
//! The builder never talks to the network. When a caller wants to follow an
//! unresolved [`Link`](crate::Link) or reload a resource, it hands in a
//! [`ResourceFetcher`]: something that, given a kind and an id, returns the raw
//! JSON document for that resource. The crate then rebuilds it with the
//! options the original resource was built with.
//!
//! # Testing
//!
//! See [`mock`] for an in-memory fetcher with fluent expectations.

pub mod mock;

use crate::model::ResourceKind;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors reported by a fetch capability.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The remote side has no resource with that kind and id.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// The request could not be completed.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Issues the request for a single resource.
///
/// Kind-to-endpoint mapping is up to the implementor.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch the raw JSON of one resource.
    async fn fetch(&self, kind: ResourceKind, id: &str) -> Result<Value, FetchError>;
}
