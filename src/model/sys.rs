//! System metadata (`sys` block) shared by every resource.

use crate::config::BuildConfig;
use crate::error::ResourceError;
use crate::link::Link;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde_json::Value;
use std::sync::Arc;

/// Parsed `sys` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sys {
    pub id: String,
    /// The declared `sys.type` (`"Entry"`, `"Asset"`, `"Array"`, ...).
    pub kind: String,
    pub revision: Option<u64>,
    pub locale: Option<String>,
    pub space: Option<Link>,
    pub content_type: Option<Link>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub updated_at: Option<DateTime<FixedOffset>>,
    pub deleted_at: Option<DateTime<FixedOffset>>,
}

impl Sys {
    /// Parses the `sys` block of a raw node. A missing block yields empty metadata.
    pub fn parse(node: &Value, options: &Arc<BuildConfig>) -> Result<Self, ResourceError> {
        let Some(sys) = node.get("sys") else {
            return Ok(Self::default());
        };

        let text = |key: &str| sys.get(key).and_then(Value::as_str).map(str::to_string);
        let link = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| sys.get(*key))
                .filter(|value| value.is_object())
                .map(|value| Link::from_node(value, options.clone()))
        };

        Ok(Self {
            id: text("id").unwrap_or_default(),
            kind: text("type").unwrap_or_default(),
            revision: sys.get("revision").and_then(Value::as_u64),
            locale: text("locale"),
            space: link(&["space"]),
            content_type: link(&["contentType", "content_type"]),
            created_at: parse_date(sys, "createdAt")?,
            updated_at: parse_date(sys, "updatedAt")?,
            deleted_at: parse_date(sys, "deletedAt")?,
        })
    }
}

fn parse_date(sys: &Value, field: &str) -> Result<Option<DateTime<FixedOffset>>, ResourceError> {
    let raw = match sys.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(raw) => raw,
    };
    let malformed = || ResourceError::MalformedTimestamp {
        field: field.to_string(),
        value: raw.to_string(),
    };

    let text = raw.as_str().ok_or_else(malformed)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(parsed));
    }
    // Offset-less date-times are taken as UTC.
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc().fixed_offset()))
        .map_err(|_| malformed())
}
