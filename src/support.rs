//! # Structural Helpers
//!
//! Pure predicates over raw JSON nodes plus the identifier casing transform
//! used for field names. Nothing in here allocates resources or logs.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid regex"));

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid regex"));

/// Transforms `camelCase`/`PascalCase` identifiers into `snake_case`.
///
/// Runs of capitals count as one word (`HTMLField` -> `html_field`), hyphens
/// become underscores. Applying it twice gives the same result as once.
pub fn snakify(name: &str) -> String {
    let word = name.replace("::", "/");
    let word = ACRONYM_BOUNDARY.replace_all(&word, "${1}_${2}");
    let word = CAMEL_BOUNDARY.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}

/// Reads `sys.<key>` as a string slice.
pub fn sys_str<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    node.get("sys")?.get(key)?.as_str()
}

/// Checks if the value is a link stub (`{"sys": {"type": "Link", ...}}`).
pub fn is_link(value: &Value) -> bool {
    value.is_object() && sys_str(value, "type") == Some("Link")
}

/// Checks if the value is a non-empty array whose first element is a link.
pub fn is_link_array(value: &Value) -> bool {
    match value.as_array().and_then(|items| items.first()) {
        Some(first) => is_link(first),
        None => false,
    }
}

/// Returns the first node of the includes pool the link points at.
///
/// A node matches when its `sys.id` equals the link's id and its `sys.type`
/// equals the link's `linkType`.
pub fn resource_for_link<'a>(link: &Value, includes: &'a [Value]) -> Option<&'a Value> {
    let id = sys_str(link, "id")?;
    let link_type = sys_str(link, "linkType")?;
    includes
        .iter()
        .find(|node| sys_str(node, "id") == Some(id) && sys_str(node, "type") == Some(link_type))
}
