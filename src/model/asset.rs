//! Assets: field-bearing resources describing an uploaded file.
//!
//! The raw `file` field is always turned into a [`File`] value, per locale when
//! the block is grouped by locale, otherwise once under the asset's own locale.
//! [`Asset::image_url`] derives image API URLs from the file URL.

use crate::config::BuildContext;
use crate::error::ResourceError;
use crate::model::{BaseResource, FieldMap, FieldValue, Fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Attribute names a non-localized `file` block is recognised by.
const FILE_ATTRIBUTES: [&str; 4] = ["fileName", "contentType", "details", "url"];

/// File metadata of an asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct File {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub url: Option<String>,
    pub details: FileDetails,
}

/// Size and, for images, dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDetails {
    pub size: Option<u64>,
    pub image: Option<ImageDimensions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl File {
    /// Builds a file from its raw block, one attribute at a time. An attribute
    /// that does not fit the expected shape is left unset; the others are kept.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        let details = value.get("details");
        let image = details.and_then(|details| details.get("image")).filter(|image| image.is_object());
        let dimension = |key: &str| {
            image
                .and_then(|image| image.get(key))
                .and_then(Value::as_u64)
                .and_then(|pixels| u32::try_from(pixels).ok())
        };

        Self {
            file_name: text("fileName"),
            content_type: text("contentType"),
            url: text("url"),
            details: FileDetails {
                size: details.and_then(|details| details.get("size")).and_then(Value::as_u64),
                image: image.map(|_| ImageDimensions {
                    width: dimension("width"),
                    height: dimension("height"),
                }),
            },
        }
    }

    pub fn width(&self) -> Option<u32> {
        self.details.image.as_ref().and_then(|image| image.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.details.image.as_ref().and_then(|image| image.height)
    }

    pub fn size(&self) -> Option<u64> {
        self.details.size
    }
}

/// Image API transformations.
///
/// Deserializes from either the long names or the query keys
/// (`width`/`w`, `format`/`fm`, ...); other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    #[serde(alias = "w")]
    pub width: Option<u32>,
    #[serde(alias = "h")]
    pub height: Option<u32>,
    #[serde(alias = "fm")]
    pub format: Option<String>,
    #[serde(alias = "q")]
    pub quality: Option<u32>,
    #[serde(alias = "f")]
    pub focus: Option<String>,
    pub fit: Option<String>,
    /// File layering, e.g. `"progressive"`.
    #[serde(alias = "fl")]
    pub layering: Option<String>,
}

impl ImageOptions {
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }

    pub fn fit(mut self, fit: impl Into<String>) -> Self {
        self.fit = Some(fit.into());
        self
    }

    pub fn layering(mut self, layering: impl Into<String>) -> Self {
        self.layering = Some(layering.into());
        self
    }

    /// Supplied options as query pairs, in the fixed order `w, h, fm, q, f, fit, fl`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("w", self.width.map(|v| v.to_string())),
            ("h", self.height.map(|v| v.to_string())),
            ("fm", self.format.clone()),
            ("q", self.quality.map(|v| v.to_string())),
            ("f", self.focus.clone()),
            ("fit", self.fit.clone()),
            ("fl", self.layering.clone()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
    }
}

/// A media asset.
#[derive(Debug, Clone)]
pub struct Asset {
    base: BaseResource,
    fields: Fields,
}

impl Asset {
    /// Default Asset constructor.
    pub fn build(node: &Value, ctx: &BuildContext<'_>) -> Result<Self, ResourceError> {
        let base = BaseResource::new(node, ctx)?;
        let fields = Fields::hydrate(node, ctx.localized(), base.internal_locale(), |_, value| {
            Ok(FieldValue::Json(value.clone()))
        })?;
        let mut asset = Self { base, fields };
        asset.create_files(node);
        Ok(asset)
    }

    fn create_files(&mut self, node: &Value) {
        let Some(file) = node
            .get("fields")
            .and_then(|fields| fields.get("file"))
            .and_then(Value::as_object)
        else {
            return;
        };

        let is_localized = !file.keys().any(|key| FILE_ATTRIBUTES.contains(&key.as_str()));
        if is_localized {
            let locales: Vec<String> = self.fields.locales().into_iter().map(str::to_string).collect();
            for locale in locales {
                let built = file.get(&locale).map(File::from_value).unwrap_or_default();
                self.fields.insert(&locale, "file", FieldValue::File(built));
            }
        } else {
            let locale = self.base.internal_locale().to_string();
            let built = File::from_value(&Value::Object(file.clone()));
            self.fields.insert(&locale, "file", FieldValue::File(built));
        }
    }

    pub fn base(&self) -> &BaseResource {
        &self.base
    }

    pub fn id(&self) -> &str {
        self.base.id()
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

    pub fn file(&self, locale: Option<&str>) -> Option<&File> {
        self.fields(locale).get("file").and_then(FieldValue::as_file)
    }

    pub fn title(&self) -> Option<&str> {
        self.fields(None).get("title").and_then(FieldValue::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.fields(None).get("description").and_then(FieldValue::as_str)
    }

    /// The bare file URL.
    pub fn url(&self) -> &str {
        self.file(None).and_then(|file| file.url.as_deref()).unwrap_or_default()
    }

    /// Image API URL for the file.
    ///
    /// Without options this is the bare file URL; otherwise the supplied
    /// options are appended as a query string.
    pub fn image_url(&self, options: &ImageOptions) -> String {
        let pairs = options.query_pairs();
        if pairs.is_empty() {
            return self.url().to_string();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        format!("{}?{}", self.url(), query)
    }
}
