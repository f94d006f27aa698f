//! # Build Configuration
//!
//! Options threaded through every build: default locale, localization flag,
//! starting depth, and the override tables used to plug custom constructors
//! in place of the default ones.
//!
//! ## Override Tables
//!
//! - `resource_mapping` is keyed by kind name (`"Entry"`, `"Asset"`, `"Space"`, ...).
//! - `entry_mapping` is keyed by content type id and wins over `resource_mapping["Entry"]`.
//!
//! A [`ResourceMapping`] is either a fixed constructor or a selector that picks a
//! constructor by looking at the raw node. A selector that returns `None` falls
//! back to the default constructor for the kind.

use crate::error::ResourceError;
use crate::model::Resource;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Locale used when neither the node nor the caller names one.
pub const DEFAULT_LOCALE: &str = "en-US";

/// A constructor that turns a raw node into a [`Resource`].
///
/// Implemented for any `Fn(&Value, &BuildContext) -> Result<Resource, ResourceError>`.
pub trait ResourceFactory: Send + Sync {
    fn build(&self, node: &Value, ctx: &BuildContext<'_>) -> Result<Resource, ResourceError>;
}

impl<F> ResourceFactory for F
where
    F: Fn(&Value, &BuildContext<'_>) -> Result<Resource, ResourceError> + Send + Sync,
{
    fn build(&self, node: &Value, ctx: &BuildContext<'_>) -> Result<Resource, ResourceError> {
        self(node, ctx)
    }
}

type Selector = dyn Fn(&Value) -> Option<Arc<dyn ResourceFactory>> + Send + Sync;

/// An entry of an override table.
#[derive(Clone)]
pub enum ResourceMapping {
    /// Always use this constructor.
    Fixed(Arc<dyn ResourceFactory>),
    /// Pick a constructor per node.
    Select(Arc<Selector>),
}

impl ResourceMapping {
    /// Wraps a constructor closure.
    pub fn constructor<F>(f: F) -> Self
    where
        F: Fn(&Value, &BuildContext<'_>) -> Result<Resource, ResourceError> + Send + Sync + 'static,
    {
        ResourceMapping::Fixed(Arc::new(f))
    }

    /// Wraps a selector closure.
    pub fn select<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<Arc<dyn ResourceFactory>> + Send + Sync + 'static,
    {
        ResourceMapping::Select(Arc::new(f))
    }

    pub(crate) fn factory_for(&self, node: &Value) -> Option<Arc<dyn ResourceFactory>> {
        match self {
            ResourceMapping::Fixed(factory) => Some(factory.clone()),
            ResourceMapping::Select(select) => select(node),
        }
    }
}

impl fmt::Debug for ResourceMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceMapping::Fixed(_) => f.write_str("ResourceMapping::Fixed(..)"),
            ResourceMapping::Select(_) => f.write_str("ResourceMapping::Select(..)"),
        }
    }
}

/// Configuration for a build.
///
/// # Example
///
/// ```rust
/// use content_graph::{BuildConfig, ResourceMapping, Resource};
/// use content_graph::model::Entry;
///
/// let config = BuildConfig::new("en-US")
///     .localized(false)
///     .with_entry_mapping("cat", ResourceMapping::constructor(|node, ctx| {
///         Entry::build(node, ctx).map(Resource::Entry)
///     }));
/// assert_eq!(config.default_locale(), "en-US");
/// ```
#[derive(Debug, Clone)]
pub struct BuildConfig {
    default_locale: String,
    localized: bool,
    depth: usize,
    resource_mapping: HashMap<String, ResourceMapping>,
    entry_mapping: HashMap<String, ResourceMapping>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl BuildConfig {
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            localized: false,
            depth: 0,
            resource_mapping: HashMap::new(),
            entry_mapping: HashMap::new(),
        }
    }

    /// When set, raw `fields` blocks are expected as `field -> locale -> value`.
    pub fn localized(mut self, localized: bool) -> Self {
        self.localized = localized;
        self
    }

    /// Depth the top-level items are built at.
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Overrides the constructor for a kind (`"Entry"`, `"Asset"`, `"ContentType"`, ...).
    pub fn with_resource_mapping(mut self, kind: impl Into<String>, mapping: ResourceMapping) -> Self {
        self.resource_mapping.insert(kind.into(), mapping);
        self
    }

    /// Overrides the constructor for entries of one content type.
    pub fn with_entry_mapping(mut self, content_type_id: impl Into<String>, mapping: ResourceMapping) -> Self {
        self.entry_mapping.insert(content_type_id.into(), mapping);
        self
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn is_localized(&self) -> bool {
        self.localized
    }

    pub fn start_depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn resource_mapping(&self, kind: &str) -> Option<&ResourceMapping> {
        self.resource_mapping.get(kind)
    }

    pub(crate) fn entry_mapping(&self, content_type_id: &str) -> Option<&ResourceMapping> {
        self.entry_mapping.get(content_type_id)
    }

    pub(crate) fn restored(mut self, default_locale: &str, localized: bool) -> Self {
        self.default_locale = default_locale.to_string();
        self.localized = localized;
        self.depth = 0;
        self
    }
}

/// Per-item view of a running build, handed to every constructor.
///
/// Borrowed from the enclosing build call: the includes pool lives only as
/// long as that call.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    options: &'a Arc<BuildConfig>,
    includes: &'a [Value],
    depth: usize,
    localized: bool,
}

impl<'a> BuildContext<'a> {
    pub fn new(options: &'a Arc<BuildConfig>, includes: &'a [Value], depth: usize, localized: bool) -> Self {
        Self {
            options,
            includes,
            depth,
            localized,
        }
    }

    pub fn options(&self) -> &'a Arc<BuildConfig> {
        self.options
    }

    pub fn includes(&self) -> &'a [Value] {
        self.includes
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn localized(&self) -> bool {
        self.localized
    }

    pub fn default_locale(&self) -> &'a str {
        self.options.default_locale()
    }

    pub(crate) fn deeper(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }
}
