//! # Resource Model
//!
//! The typed representations a raw node is built into.
//!
//! - [`Resource`] is a closed enum over the six kinds the API delivers, plus a
//!   [`Resource::Custom`] variant for resources produced by user-registered
//!   constructors.
//! - Every variant embeds a [`BaseResource`]: the parsed [`Sys`] block, the raw
//!   node it was built from, and the options it was built with.
//! - Identity is `(kind, id)`: two resources compare equal when they have the
//!   same kind name and the same id, whatever their fields hold.

pub mod asset;
pub mod collection;
pub mod content_type;
pub mod deleted;
pub mod entry;
pub mod fields;
pub mod space;
pub mod sys;

pub use asset::*;
pub use collection::*;
pub use content_type::*;
pub use deleted::*;
pub use entry::*;
pub use fields::*;
pub use space::*;
pub use sys::*;

use crate::builder;
use crate::config::{BuildConfig, BuildContext};
use crate::error::ResourceError;
use crate::fetch::ResourceFetcher;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The kinds of resource the builder can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Entry,
    Asset,
    ContentType,
    Space,
    DeletedEntry,
    DeletedAsset,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Entry,
        ResourceKind::Asset,
        ResourceKind::ContentType,
        ResourceKind::Space,
        ResourceKind::DeletedEntry,
        ResourceKind::DeletedAsset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Entry => "Entry",
            ResourceKind::Asset => "Asset",
            ResourceKind::ContentType => "ContentType",
            ResourceKind::Space => "Space",
            ResourceKind::DeletedEntry => "DeletedEntry",
            ResourceKind::DeletedAsset => "DeletedAsset",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(ResourceError::unknown_kind)
    }
}

/// State common to every resource.
#[derive(Debug, Clone)]
pub struct BaseResource {
    sys: Sys,
    raw: Value,
    localized: bool,
    options: Arc<BuildConfig>,
}

impl BaseResource {
    /// Parses the `sys` block and keeps a copy of the raw node.
    pub fn new(node: &Value, ctx: &BuildContext<'_>) -> Result<Self, ResourceError> {
        Ok(Self {
            sys: Sys::parse(node, ctx.options())?,
            raw: node.clone(),
            localized: ctx.localized(),
            options: ctx.options().clone(),
        })
    }

    pub fn sys(&self) -> &Sys {
        &self.sys
    }

    pub fn id(&self) -> &str {
        &self.sys.id
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn options(&self) -> &Arc<BuildConfig> {
        &self.options
    }

    pub fn default_locale(&self) -> &str {
        self.options.default_locale()
    }

    /// The node's own locale, or the configured default.
    pub fn internal_locale(&self) -> &str {
        self.sys.locale.as_deref().unwrap_or_else(|| self.default_locale())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            raw: self.raw.clone(),
            default_locale: self.default_locale().to_string(),
            localized: self.localized,
        }
    }
}

/// Extension point for resources produced by user-registered constructors.
pub trait CustomResource: fmt::Debug + Send + Sync + 'static {
    /// Name used as the kind half of the resource identity.
    fn kind_name(&self) -> &str;

    fn base(&self) -> &BaseResource;

    fn as_any(&self) -> &dyn Any;
}

/// A built resource.
#[derive(Debug, Clone)]
pub enum Resource {
    Entry(Entry),
    Asset(Asset),
    ContentType(ContentType),
    Space(Space),
    DeletedEntry(DeletedEntry),
    DeletedAsset(DeletedAsset),
    Custom(Arc<dyn CustomResource>),
}

impl Resource {
    pub fn base(&self) -> &BaseResource {
        match self {
            Resource::Entry(r) => r.base(),
            Resource::Asset(r) => r.base(),
            Resource::ContentType(r) => r.base(),
            Resource::Space(r) => r.base(),
            Resource::DeletedEntry(r) => r.base(),
            Resource::DeletedAsset(r) => r.base(),
            Resource::Custom(r) => r.base(),
        }
    }

    /// The kind half of the identity.
    pub fn kind_name(&self) -> &str {
        match self {
            Resource::Entry(_) => ResourceKind::Entry.as_str(),
            Resource::Asset(_) => ResourceKind::Asset.as_str(),
            Resource::ContentType(_) => ResourceKind::ContentType.as_str(),
            Resource::Space(_) => ResourceKind::Space.as_str(),
            Resource::DeletedEntry(_) => ResourceKind::DeletedEntry.as_str(),
            Resource::DeletedAsset(_) => ResourceKind::DeletedAsset.as_str(),
            Resource::Custom(r) => r.kind_name(),
        }
    }

    pub fn id(&self) -> &str {
        self.base().id()
    }

    pub fn sys(&self) -> &Sys {
        self.base().sys()
    }

    pub fn raw(&self) -> &Value {
        self.base().raw()
    }

    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            Resource::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&Asset> {
        match self {
            Resource::Asset(asset) => Some(asset),
            _ => None,
        }
    }

    pub fn as_content_type(&self) -> Option<&ContentType> {
        match self {
            Resource::ContentType(content_type) => Some(content_type),
            _ => None,
        }
    }

    pub fn as_space(&self) -> Option<&Space> {
        match self {
            Resource::Space(space) => Some(space),
            _ => None,
        }
    }

    /// Downcasts a custom resource to its concrete type.
    pub fn as_custom<T: CustomResource>(&self) -> Option<&T> {
        match self {
            Resource::Custom(custom) => custom.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Field map of field-bearing resources, for the given or the internal locale.
    pub fn fields(&self, locale: Option<&str>) -> Option<&FieldMap> {
        match self {
            Resource::Entry(entry) => Some(entry.fields(locale)),
            Resource::Asset(asset) => Some(asset.fields(locale)),
            _ => None,
        }
    }

    /// Issues the request for this resource again and rebuilds it.
    ///
    /// Returns `Ok(None)` when no fetcher is supplied.
    #[tracing::instrument(skip(self, fetcher), fields(entity_type = %self.kind_name(), id = %self.id()))]
    pub async fn reload(&self, fetcher: Option<&dyn ResourceFetcher>) -> Result<Option<Resource>, ResourceError> {
        let Some(fetcher) = fetcher else {
            return Ok(None);
        };
        let kind: ResourceKind = self.sys().kind.parse()?;
        let raw = fetcher.fetch(kind, self.id()).await?;
        builder::rebuild(raw, self.base().options().clone()).map(Some)
    }

    /// Captures what is needed to rebuild this resource later.
    pub fn snapshot(&self) -> Snapshot {
        self.base().snapshot()
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.kind_name() == other.kind_name() && self.id() == other.id()
    }
}

/// Raw node plus the options needed to rebuild a resource.
///
/// Restoring runs a fresh build at depth 0 with an empty includes pool, so
/// links that were inlined through the original includes come back as
/// [`Link`](crate::Link)s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub raw: Value,
    pub default_locale: String,
    pub localized: bool,
}

impl Snapshot {
    /// Rebuilds with default mappings.
    pub fn restore(&self) -> Result<Resource, ResourceError> {
        self.restore_with(BuildConfig::default())
    }

    /// Rebuilds with the caller's mappings; locale and localization come from the snapshot.
    pub fn restore_with(&self, config: BuildConfig) -> Result<Resource, ResourceError> {
        let config = config.restored(&self.default_locale, self.localized);
        builder::rebuild(self.raw.clone(), Arc::new(config))
    }
}
