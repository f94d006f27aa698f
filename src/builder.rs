//! # Resource Builder
//!
//! Turns a raw document into a [`Resource`] or a [`Collection`].
//!
//! ## Flow
//!
//! 1. **Classify** the root: `sys.type == "Array"` is a collection, anything else a single item.
//! 2. **Collections** gather their includes pool once (`includes.Entry` then
//!    `includes.Asset`, source order) and build every item against it. Roots
//!    with `nextSyncUrl`/`nextPageUrl` become sync pages, whose items are
//!    always hydrated as localized.
//! 3. **Single items** are built against the caller's pool, plus the
//!    document's own `includes` section when it has one.
//! 4. **Each item** is dispatched on `sys.type` through the override tables of
//!    [`BuildConfig`], falling back to the default constructor of its kind.
//!
//! Entries call back into [`build_nested_resource`] for every link they meet.
//! Nested targets are built one level deeper; from [`MAX_INCLUDE_DEPTH`] on,
//! links are left as [`Link`]s. That ceiling is what stops cyclic graphs
//! (A -> B -> A) from recursing forever, so no visited-set is kept.

use crate::config::{BuildConfig, BuildContext, ResourceFactory};
use crate::error::ResourceError;
use crate::link::Link;
use crate::model::{
    Asset, Collection, CollectionKind, ContentType, DeletedAsset, DeletedEntry, Entry, FieldValue, Resource,
    ResourceKind, Space, Sys,
};
use crate::support::{resource_for_link, sys_str};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// Links nested this deep or deeper are never inlined.
pub const MAX_INCLUDE_DEPTH: usize = 10;

/// Result of a build: one resource or a collection of them.
#[derive(Debug, Clone)]
pub enum Built {
    Resource(Resource),
    Collection(Collection),
}

impl Built {
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Built::Resource(resource) => Some(resource),
            Built::Collection(_) => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Built::Collection(collection) => Some(collection),
            Built::Resource(_) => None,
        }
    }

    pub fn into_resource(self) -> Option<Resource> {
        match self {
            Built::Resource(resource) => Some(resource),
            Built::Collection(_) => None,
        }
    }

    pub fn into_collection(self) -> Option<Collection> {
        match self {
            Built::Collection(collection) => Some(collection),
            Built::Resource(_) => None,
        }
    }
}

/// Builds one raw document.
///
/// # Example
///
/// ```rust
/// use content_graph::{BuildConfig, ResourceBuilder};
/// use serde_json::json;
///
/// let raw = json!({
///     "sys": {"type": "Array"},
///     "items": [{"sys": {"type": "Entry", "id": "nyancat"}, "fields": {"name": "Nyan Cat"}}]
/// });
/// let collection = ResourceBuilder::new(raw, BuildConfig::default())
///     .run()
///     .unwrap()
///     .into_collection()
///     .unwrap();
/// assert_eq!(collection.len(), 1);
/// assert_eq!(collection.total(), None);
/// ```
pub struct ResourceBuilder {
    raw: Value,
    options: Arc<BuildConfig>,
    includes: Vec<Value>,
}

impl ResourceBuilder {
    pub fn new(raw: Value, options: impl Into<Arc<BuildConfig>>) -> Self {
        Self {
            raw,
            options: options.into(),
            includes: Vec::new(),
        }
    }

    /// Includes pool for a single-item document.
    pub fn with_includes(mut self, includes: Vec<Value>) -> Self {
        self.includes = includes;
        self
    }

    /// Starts the build.
    pub fn run(&self) -> Result<Built, ResourceError> {
        if self.is_array() {
            self.build_array().map(Built::Collection)
        } else {
            self.build_single().map(Built::Resource)
        }
    }

    fn is_array(&self) -> bool {
        sys_str(&self.raw, "type") == Some("Array")
    }

    fn sync_kind(&self) -> Option<CollectionKind> {
        let url = |key: &str| self.raw.get(key).and_then(Value::as_str).map(str::to_string);
        let (next_sync_url, next_page_url) = (url("nextSyncUrl"), url("nextPageUrl"));
        if next_sync_url.is_none() && next_page_url.is_none() {
            return None;
        }
        Some(CollectionKind::SyncPage {
            next_sync_url,
            next_page_url,
        })
    }

    fn build_array(&self) -> Result<Collection, ResourceError> {
        let includes = fetch_includes(&self.raw);
        let kind = self.sync_kind().unwrap_or(CollectionKind::Array);
        let localized = self.options.is_localized() || matches!(kind, CollectionKind::SyncPage { .. });
        let ctx = BuildContext::new(&self.options, &includes, self.options.start_depth(), localized);

        let raw_items = self.raw.get("items").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
        debug!(
            items = raw_items.len(),
            includes = includes.len(),
            sync = localized && !self.options.is_localized(),
            "Building collection"
        );

        let items = raw_items
            .iter()
            .map(|item| build_item(item, &ctx))
            .collect::<Result<Vec<_>, _>>()?;
        let sys = Sys::parse(&self.raw, &self.options)?;
        Ok(Collection::new(&self.raw, sys, kind, items))
    }

    fn build_single(&self) -> Result<Resource, ResourceError> {
        let mut includes = self.includes.clone();
        includes.extend(fetch_includes(&self.raw));
        let ctx = BuildContext::new(
            &self.options,
            &includes,
            self.options.start_depth(),
            self.options.is_localized(),
        );
        build_item(&self.raw, &ctx)
    }
}

/// Runs a fresh top-level build that must yield a single resource.
pub(crate) fn rebuild(raw: Value, options: Arc<BuildConfig>) -> Result<Resource, ResourceError> {
    match ResourceBuilder::new(raw, options).run()? {
        Built::Resource(resource) => Ok(resource),
        Built::Collection(_) => Err(ResourceError::UnparsableResource(
            "expected a single resource, got a collection".to_string(),
        )),
    }
}

/// Flattens `includes.Entry` and `includes.Asset`, in that order.
fn fetch_includes(raw: &Value) -> Vec<Value> {
    let Some(includes) = raw.get("includes") else {
        return Vec::new();
    };
    ["Entry", "Asset"]
        .iter()
        .filter_map(|kind| includes.get(*kind).and_then(Value::as_array))
        .flatten()
        .cloned()
        .collect()
}

/// Classifies one raw node and constructs it.
pub fn build_item(node: &Value, ctx: &BuildContext<'_>) -> Result<Resource, ResourceError> {
    let kind: ResourceKind = sys_str(node, "type").unwrap_or_default().parse()?;
    debug!(
        entity_type = kind.as_str(),
        id = sys_str(node, "id").unwrap_or_default(),
        depth = ctx.depth(),
        "Build"
    );

    if let Some(factory) = custom_factory(kind, node, ctx.options()) {
        return factory.build(node, ctx);
    }

    match kind {
        ResourceKind::Entry => Entry::build(node, ctx).map(Resource::Entry),
        ResourceKind::Asset => Asset::build(node, ctx).map(Resource::Asset),
        ResourceKind::ContentType => ContentType::build(node, ctx).map(Resource::ContentType),
        ResourceKind::Space => Space::build(node, ctx).map(Resource::Space),
        ResourceKind::DeletedEntry => DeletedEntry::build(node, ctx).map(Resource::DeletedEntry),
        ResourceKind::DeletedAsset => DeletedAsset::build(node, ctx).map(Resource::DeletedAsset),
    }
}

/// Looks up a user constructor: per content type first for entries, then per kind.
fn custom_factory(kind: ResourceKind, node: &Value, options: &BuildConfig) -> Option<Arc<dyn ResourceFactory>> {
    if kind == ResourceKind::Entry {
        let by_content_type = content_type_id(node)
            .and_then(|id| options.entry_mapping(id))
            .and_then(|mapping| mapping.factory_for(node));
        if by_content_type.is_some() {
            return by_content_type;
        }
    }
    options
        .resource_mapping(kind.as_str())
        .and_then(|mapping| mapping.factory_for(node))
}

fn content_type_id(node: &Value) -> Option<&str> {
    let sys = node.get("sys")?;
    let link = sys.get("contentType").or_else(|| sys.get("content_type"))?;
    sys_str(link, "id")
}

/// Inlines the target of a link found while hydrating a field.
///
/// Below [`MAX_INCLUDE_DEPTH`] the target is looked up in the includes pool and
/// built one level deeper; build failures of the target propagate. A missing
/// target, or reaching the ceiling, yields a [`Link`] instead.
pub fn build_nested_resource(link: &Value, ctx: &BuildContext<'_>) -> Result<FieldValue, ResourceError> {
    if ctx.depth() < MAX_INCLUDE_DEPTH {
        if let Some(target) = resource_for_link(link, ctx.includes()) {
            let resource = build_item(target, &ctx.deeper())?;
            return Ok(FieldValue::Resource(Box::new(resource)));
        }
        trace!(id = sys_str(link, "id").unwrap_or_default(), "Link target not included");
    } else {
        trace!(
            id = sys_str(link, "id").unwrap_or_default(),
            depth = ctx.depth(),
            "Include depth reached, keeping link"
        );
    }
    Ok(FieldValue::Link(Link::from_node(link, ctx.options().clone())))
}
