//! # Field Hydration
//!
//! Field-bearing resources (entries and assets) keep their fields as
//! `locale -> field name -> value`. Raw documents come in two shapes:
//!
//! - **localized**: `{"fields": {"name": {"en-US": "Nyan", "tlh": "Nyan vIghro'"}}}`
//! - **flat**: `{"fields": {"name": "Nyan"}}`, all values in the node's own locale.
//!
//! [`Fields::hydrate`] turns either into the same per-locale layout, running
//! every leaf through a coercion hook. Field names are snake_cased so the same
//! logical field has the same key in every locale.

use crate::error::ResourceError;
use crate::link::Link;
use crate::model::{File, Resource};
use crate::support::snakify;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Field name -> value, for one locale.
pub type FieldMap = BTreeMap<String, FieldValue>;

static EMPTY_FIELDS: FieldMap = BTreeMap::new();

/// A hydrated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Anything that is neither a link nor a file, passed through as received.
    Json(Value),
    /// A link whose target was not inlined.
    Link(Link),
    /// A link whose target was found in the includes pool.
    Resource(Box<Resource>),
    /// An array of links, coerced element by element.
    List(Vec<FieldValue>),
    /// Asset file metadata.
    File(File),
}

impl FieldValue {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FieldValue::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Value::as_str)
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            FieldValue::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            FieldValue::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            FieldValue::File(file) => Some(file),
            _ => None,
        }
    }
}

/// Per-locale field storage of a field-bearing resource.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    locale: String,
    by_locale: BTreeMap<String, FieldMap>,
}

impl Fields {
    /// Builds the per-locale layout from a raw node.
    ///
    /// `locale` is where flat fields land and what [`Fields::fields`] answers
    /// for when no locale is asked for. `coerce` receives the snake_cased
    /// field name and the raw leaf value. In localized mode a value that is
    /// not grouped by locale is kept under `locale`.
    pub fn hydrate<C>(node: &Value, localized: bool, locale: &str, mut coerce: C) -> Result<Self, ResourceError>
    where
        C: FnMut(&str, &Value) -> Result<FieldValue, ResourceError>,
    {
        let mut fields = Fields {
            locale: locale.to_string(),
            by_locale: BTreeMap::new(),
        };
        let Some(raw) = node.get("fields").and_then(Value::as_object) else {
            return Ok(fields);
        };

        for (name, value) in raw {
            let name = snakify(name);
            if localized {
                let Some(per_locale) = value.as_object() else {
                    warn!(field = %name, %locale, "Localized field is not grouped by locale, keeping it as is");
                    let coerced = coerce(name.as_str(), value)?;
                    fields.insert(locale, &name, coerced);
                    continue;
                };
                for (field_locale, leaf) in per_locale {
                    let coerced = coerce(name.as_str(), leaf)?;
                    fields.insert(field_locale, &name, coerced);
                }
            } else {
                let coerced = coerce(name.as_str(), value)?;
                fields.insert(locale, &name, coerced);
            }
        }

        Ok(fields)
    }

    pub(crate) fn insert(&mut self, locale: &str, name: &str, value: FieldValue) {
        self.by_locale
            .entry(locale.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }

    /// Fields for `locale`, or for the resource's own locale when `None`.
    /// Unknown locales give an empty map.
    pub fn fields(&self, locale: Option<&str>) -> &FieldMap {
        let locale = locale.unwrap_or(&self.locale);
        self.by_locale.get(locale).unwrap_or(&EMPTY_FIELDS)
    }

    /// Fields regrouped as `field name -> locale -> value`.
    pub fn fields_with_locales(&self) -> BTreeMap<&str, BTreeMap<&str, &FieldValue>> {
        let mut remapped: BTreeMap<&str, BTreeMap<&str, &FieldValue>> = BTreeMap::new();
        for (locale, fields) in &self.by_locale {
            for (name, value) in fields {
                remapped.entry(name.as_str()).or_default().insert(locale.as_str(), value);
            }
        }
        remapped
    }

    /// Locales that hold at least one field.
    pub fn locales(&self) -> Vec<&str> {
        self.by_locale.keys().map(String::as_str).collect()
    }

    /// The locale used when none is asked for.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Looks a field up by name in the resource's own locale.
    pub fn get(&self, name: &str) -> Result<&FieldValue, ResourceError> {
        self.get_in(name, None)
    }

    /// Looks a field up by name in `locale`.
    ///
    /// The name is snake_cased first, so `"bestFriend"` and `"best_friend"` are the same field.
    pub fn get_in(&self, name: &str, locale: Option<&str>) -> Result<&FieldValue, ResourceError> {
        self.fields(locale)
            .get(&snakify(name))
            .ok_or_else(|| ResourceError::UnknownField(name.to_string()))
    }
}
