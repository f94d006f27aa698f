//! Spaces and the locales they define.

use crate::config::BuildContext;
use crate::error::ResourceError;
use crate::model::BaseResource;
use crate::support::sys_str;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A locale of a space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locale {
    pub code: String,
    pub name: String,
    pub default: bool,
}

impl Locale {
    /// Reads a locale attribute by attribute. Attributes of the wrong shape
    /// keep their default.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
        Self {
            code: text("code"),
            name: text("name"),
            default: value.get("default").and_then(Value::as_bool).unwrap_or_default(),
        }
    }
}

/// A space.
#[derive(Debug, Clone)]
pub struct Space {
    base: BaseResource,
    pub name: Option<String>,
    pub locales: Vec<Locale>,
}

impl Space {
    pub fn build(node: &Value, ctx: &BuildContext<'_>) -> Result<Self, ResourceError> {
        let locales = node
            .get("locales")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|locale| {
                let is_object = locale.is_object();
                if !is_object {
                    warn!(space = sys_str(node, "id").unwrap_or_default(), "Locale is not an object, skipping");
                }
                is_object
            })
            .map(Locale::from_value)
            .collect();

        Ok(Self {
            base: BaseResource::new(node, ctx)?,
            name: node.get("name").and_then(Value::as_str).map(str::to_string),
            locales,
        })
    }

    pub fn base(&self) -> &BaseResource {
        &self.base
    }

    pub fn id(&self) -> &str {
        self.base.id()
    }

    /// The locale flagged as default.
    pub fn default_locale(&self) -> Option<&Locale> {
        self.locales.iter().find(|locale| locale.default)
    }
}
