//! # Mock Fetcher
//!
//! `MockFetcher` implements [`ResourceFetcher`] entirely in memory. Queue the
//! fetches you expect, in order, together with the raw document (or error) each
//! one should yield, then check that all of them were consumed.
//!
//! ## When to use the mock
//!
//! | Feature | MockFetcher | Real transport |
//! |---------|-------------|----------------|
//! | **Speed** | Instant (in-memory) | Network bound |
//! | **Determinism** | 100% Deterministic | Subject to the remote API |
//! | **Error Injection** | Easy (`return_err`) | Hard |
//!
//! ## Example
//!
//! ```rust
//! use content_graph::fetch::mock::MockFetcher;
//! use content_graph::fetch::FetchError;
//! use content_graph::model::ResourceKind;
//! use content_graph::{BuildConfig, ResourceBuilder};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockFetcher::new();
//!     mock.expect_fetch(ResourceKind::Space, "cfexampleapi")
//!         .return_ok(json!({"sys": {"type": "Space", "id": "cfexampleapi"}, "name": "Example"}));
//!
//!     let entry = ResourceBuilder::new(
//!         json!({"sys": {"type": "Entry", "id": "nyancat",
//!                "space": {"sys": {"type": "Link", "linkType": "Space", "id": "cfexampleapi"}}}}),
//!         BuildConfig::default(),
//!     )
//!     .run()
//!     .unwrap()
//!     .into_resource()
//!     .unwrap();
//!
//!     let space_link = entry.sys().space.clone().unwrap();
//!     let space = space_link.resolve(Some(&mock)).await.unwrap().unwrap();
//!     assert_eq!(space.id(), "cfexampleapi");
//!
//!     mock.verify();
//! }
//! ```

use crate::fetch::{FetchError, ResourceFetcher};
use crate::model::ResourceKind;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// An expected fetch and the response it should produce.
struct Expectation {
    kind: ResourceKind,
    id: String,
    response: Result<Value, FetchError>,
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

fn lock(expectations: &Expectations) -> MutexGuard<'_, VecDeque<Expectation>> {
    expectations.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A fetcher with expectation tracking for fluent testing.
#[derive(Clone, Default)]
pub struct MockFetcher {
    expectations: Expectations,
}

impl MockFetcher {
    /// Creates a new mock fetcher with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a fetch of `kind` with `id`.
    pub fn expect_fetch(&mut self, kind: ResourceKind, id: impl Into<String>) -> FetchExpectationBuilder {
        FetchExpectationBuilder {
            kind,
            id: id.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Number of expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.expectations).len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.remaining();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

#[async_trait]
impl ResourceFetcher for MockFetcher {
    async fn fetch(&self, kind: ResourceKind, id: &str) -> Result<Value, FetchError> {
        let expectation = lock(&self.expectations).pop_front();
        match expectation {
            Some(exp) if exp.kind == kind && exp.id == id => {
                debug!(entity_type = kind.as_str(), %id, "Mock fetch");
                exp.response
            }
            Some(exp) => Err(FetchError::Transport(format!(
                "unexpected fetch of {} {}, expected {} {}",
                kind, id, exp.kind, exp.id
            ))),
            None => Err(FetchError::Transport(format!("unexpected fetch of {} {}", kind, id))),
        }
    }
}

/// Builder for fetch expectations.
pub struct FetchExpectationBuilder {
    kind: ResourceKind,
    id: String,
    expectations: Expectations,
}

impl FetchExpectationBuilder {
    /// Sets the expectation to return this raw document.
    pub fn return_ok(self, raw: Value) {
        self.push(Ok(raw));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FetchError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Value, FetchError>) {
        lock(&self.expectations).push_back(Expectation {
            kind: self.kind,
            id: self.id,
            response,
        });
    }
}
