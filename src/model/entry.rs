//! Entries: field-bearing resources whose fields may link to other resources.
//!
//! While hydrating, every link (or array of links) is handed to
//! [`builder::build_nested_resource`](crate::builder::build_nested_resource),
//! which inlines the target from the includes pool or leaves a [`Link`](crate::Link).

use crate::builder;
use crate::config::BuildContext;
use crate::error::ResourceError;
use crate::model::{BaseResource, FieldMap, FieldValue, Fields};
use crate::support::{is_link, is_link_array};
use serde_json::Value;
use std::collections::BTreeMap;

/// A content entry.
#[derive(Debug, Clone)]
pub struct Entry {
    base: BaseResource,
    fields: Fields,
}

impl Entry {
    /// Default Entry constructor.
    pub fn build(node: &Value, ctx: &BuildContext<'_>) -> Result<Self, ResourceError> {
        let base = BaseResource::new(node, ctx)?;
        let fields = Fields::hydrate(node, ctx.localized(), base.internal_locale(), |_, value| coerce(value, ctx))?;
        Ok(Self { base, fields })
    }

    pub fn base(&self) -> &BaseResource {
        &self.base
    }

    pub fn id(&self) -> &str {
        self.base.id()
    }

    /// Id of the entry's content type, when the `sys` block links one.
    pub fn content_type_id(&self) -> Option<&str> {
        self.base.sys().content_type.as_ref().map(|link| link.id.as_str())
    }

    pub fn fields(&self, locale: Option<&str>) -> &FieldMap {
        self.fields.fields(locale)
    }

    pub fn fields_with_locales(&self) -> BTreeMap<&str, BTreeMap<&str, &FieldValue>> {
        self.fields.fields_with_locales()
    }

    pub fn locales(&self) -> Vec<&str> {
        self.fields.locales()
    }

    pub fn get_field(&self, name: &str) -> Result<&FieldValue, ResourceError> {
        self.fields.get(name)
    }

    pub fn get_field_in(&self, name: &str, locale: &str) -> Result<&FieldValue, ResourceError> {
        self.fields.get_in(name, Some(locale))
    }
}

fn coerce(value: &Value, ctx: &BuildContext<'_>) -> Result<FieldValue, ResourceError> {
    if is_link(value) {
        return builder::build_nested_resource(value, ctx);
    }
    if let Some(links) = value.as_array().filter(|_| is_link_array(value)) {
        // Homogeneous arrays: everything after a leading link is treated as a link.
        let items = links
            .iter()
            .map(|link| builder::build_nested_resource(link, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(FieldValue::List(items));
    }
    Ok(FieldValue::Json(value.clone()))
}
