//! Tombstones delivered by sync pages for removed entries and assets.

use crate::config::BuildContext;
use crate::error::ResourceError;
use crate::model::BaseResource;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

/// A deleted entry: sys metadata only.
#[derive(Debug, Clone)]
pub struct DeletedEntry {
    base: BaseResource,
}

/// A deleted asset: sys metadata only.
#[derive(Debug, Clone)]
pub struct DeletedAsset {
    base: BaseResource,
}

impl DeletedEntry {
    pub fn build(node: &Value, ctx: &BuildContext<'_>) -> Result<Self, ResourceError> {
        Ok(Self {
            base: BaseResource::new(node, ctx)?,
        })
    }

    pub fn base(&self) -> &BaseResource {
        &self.base
    }

    pub fn deleted_at(&self) -> Option<DateTime<FixedOffset>> {
        self.base.sys().deleted_at
    }
}

impl DeletedAsset {
    pub fn build(node: &Value, ctx: &BuildContext<'_>) -> Result<Self, ResourceError> {
        Ok(Self {
            base: BaseResource::new(node, ctx)?,
        })
    }

    pub fn base(&self) -> &BaseResource {
        &self.base
    }

    pub fn deleted_at(&self) -> Option<DateTime<FixedOffset>> {
        self.base.sys().deleted_at
    }
}
