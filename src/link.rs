//! # Links
//!
//! A [`Link`] is what a nested reference degrades to when the builder cannot
//! (or may not) inline its target: the target was missing from the includes
//! pool, or the depth ceiling was reached. It keeps the build options so that
//! a later [`Link::resolve`] rebuilds the fetched target the same way the
//! surrounding graph was built.

use crate::builder;
use crate::config::BuildConfig;
use crate::error::ResourceError;
use crate::fetch::ResourceFetcher;
use crate::model::{Resource, ResourceKind};
use crate::support::sys_str;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// An unresolved reference to another resource.
#[derive(Clone)]
pub struct Link {
    pub id: String,
    /// The referenced kind name (`linkType`), e.g. `"Entry"` or `"Asset"`.
    pub link_type: String,
    options: Arc<BuildConfig>,
}

impl Link {
    /// Builds a link from a `{"sys": {"type": "Link", "linkType": .., "id": ..}}` node.
    pub fn from_node(node: &Value, options: Arc<BuildConfig>) -> Self {
        Self {
            id: sys_str(node, "id").unwrap_or_default().to_string(),
            link_type: sys_str(node, "linkType").unwrap_or_default().to_string(),
            options,
        }
    }

    pub fn new(id: impl Into<String>, link_type: impl Into<String>, options: Arc<BuildConfig>) -> Self {
        Self {
            id: id.into(),
            link_type: link_type.into(),
            options,
        }
    }

    /// The referenced kind, if it is one the builder knows.
    pub fn kind(&self) -> Option<ResourceKind> {
        self.link_type.parse().ok()
    }

    pub fn options(&self) -> &Arc<BuildConfig> {
        &self.options
    }

    /// Fetches the target and builds it.
    ///
    /// Returns `Ok(None)` when no fetcher is supplied, so a graph built offline
    /// stays usable for everything that was inlined.
    #[tracing::instrument(skip(self, fetcher), fields(id = %self.id, link_type = %self.link_type))]
    pub async fn resolve(&self, fetcher: Option<&dyn ResourceFetcher>) -> Result<Option<Resource>, ResourceError> {
        let Some(fetcher) = fetcher else {
            debug!("No fetcher, link stays unresolved");
            return Ok(None);
        };
        let kind = self.kind().ok_or_else(ResourceError::unknown_kind)?;
        let raw = fetcher.fetch(kind, &self.id).await?;
        builder::rebuild(raw, self.options.clone()).map(Some)
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.link_type == other.link_type
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("id", &self.id)
            .field("link_type", &self.link_type)
            .finish()
    }
}
