//! Content types: the field definitions entries are validated against remotely.

use crate::config::BuildContext;
use crate::error::ResourceError;
use crate::model::BaseResource;
use crate::support::{snakify, sys_str};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One field definition of a content type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub link_type: Option<String>,
    pub localized: bool,
    pub required: bool,
    pub disabled: bool,
    pub omitted: bool,
    /// Item definition of `Array` fields, kept as received.
    pub items: Option<Value>,
}

impl FieldDefinition {
    /// Reads a definition attribute by attribute. Attributes of the wrong
    /// shape keep their default.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str);
        let flag = |key: &str| value.get(key).and_then(Value::as_bool).unwrap_or_default();

        Self {
            id: text("id").unwrap_or_default().to_string(),
            name: text("name").unwrap_or_default().to_string(),
            field_type: text("type").unwrap_or_default().to_string(),
            link_type: text("linkType").map(str::to_string),
            localized: flag("localized"),
            required: flag("required"),
            disabled: flag("disabled"),
            omitted: flag("omitted"),
            items: value.get("items").filter(|items| !items.is_null()).cloned(),
        }
    }
}

/// A content type.
#[derive(Debug, Clone)]
pub struct ContentType {
    base: BaseResource,
    pub name: Option<String>,
    pub description: Option<String>,
    pub display_field: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

impl ContentType {
    pub fn build(node: &Value, ctx: &BuildContext<'_>) -> Result<Self, ResourceError> {
        let text = |key: &str| node.get(key).and_then(Value::as_str).map(str::to_string);
        let fields = node
            .get("fields")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|field| {
                let is_object = field.is_object();
                if !is_object {
                    warn!(
                        content_type = sys_str(node, "id").unwrap_or_default(),
                        "Field definition is not an object, skipping"
                    );
                }
                is_object
            })
            .map(FieldDefinition::from_value)
            .collect();

        Ok(Self {
            base: BaseResource::new(node, ctx)?,
            name: text("name"),
            description: text("description"),
            display_field: text("displayField"),
            fields,
        })
    }

    pub fn base(&self) -> &BaseResource {
        &self.base
    }

    pub fn id(&self) -> &str {
        self.base.id()
    }

    /// Field definition for `field_id`, comparing snake_cased ids.
    pub fn field_for(&self, field_id: &str) -> Option<&FieldDefinition> {
        let wanted = snakify(field_id);
        self.fields.iter().find(|field| snakify(&field.id) == wanted)
    }
}
