#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Content Graph
//!
//! > **Typed, linked resource graphs from headless-CMS JSON.**
//!
//! Content delivery APIs answer with plain JSON: an item (or a page of items),
//! a `sys` metadata block on everything, and references to other items written
//! as `{"sys": {"type": "Link", ...}}` stubs. Referenced items ride along in a
//! side `includes` section. This crate turns such a document into typed
//! resources with the references replaced by the resources they point to.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### A closed set of kinds, an open set of constructors
//! [`Resource`] is an enum over the kinds the API delivers. Callers who want
//! their own types register constructors in [`BuildConfig`], per kind or per
//! content type, and return them through [`Resource::Custom`].
//!
//! ### Building never touches the network
//! Everything is resolved from the document itself. Links whose target was not
//! included stay [`Link`]s; following them later is an explicit, async call
//! that takes a [`ResourceFetcher`].
//!
//! ### Cycles end at a depth ceiling
//! Content graphs are allowed to be cyclic. The builder inlines nested links
//! up to [`MAX_INCLUDE_DEPTH`](builder::MAX_INCLUDE_DEPTH) levels and leaves
//! everything deeper as a [`Link`], so every build terminates.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Entry Point ([`builder`])
//! - **Role**: Classifies a document, gathers its includes, dispatches each item.
//! - **Key items**: [`ResourceBuilder`], [`Built`].
//!
//! ### 2. The Knobs ([`config`])
//! - **Role**: Locale, localization, starting depth, constructor overrides.
//! - **Key items**: [`BuildConfig`], [`ResourceMapping`], [`BuildContext`].
//!
//! ### 3. The Types ([`model`])
//! - **Role**: Entries, assets, content types, spaces, tombstones, collections.
//! - **Key items**: [`Resource`], [`model::Entry`], [`model::Asset`], [`model::Collection`], [`Snapshot`].
//!
//! ### 4. The Edges ([`link`], [`fetch`])
//! - **Role**: Unresolved references and the capability used to follow them.
//! - **Key items**: [`Link`], [`ResourceFetcher`], [`fetch::mock::MockFetcher`].
//!
//! ## 🚀 Quick Start
//!
//! ```rust
//! use content_graph::{BuildConfig, ResourceBuilder};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "sys": {"type": "Array"},
//!     "total": 1,
//!     "items": [{
//!         "sys": {"type": "Entry", "id": "nyancat"},
//!         "fields": {"name": "Nyan Cat", "image": {"sys": {"type": "Link", "linkType": "Asset", "id": "nyan"}}}
//!     }],
//!     "includes": {
//!         "Asset": [{
//!             "sys": {"type": "Asset", "id": "nyan"},
//!             "fields": {"title": "Nyan", "file": {"url": "//images.example.com/nyan.png"}}
//!         }]
//!     }
//! });
//!
//! let built = ResourceBuilder::new(raw, BuildConfig::default()).run().unwrap();
//! let cats = built.into_collection().unwrap();
//! let cat = cats.items()[0].as_entry().unwrap();
//!
//! assert_eq!(cat.get_field("name").unwrap().as_str(), Some("Nyan Cat"));
//! let image = cat.get_field("image").unwrap().as_resource().unwrap();
//! assert_eq!(image.as_asset().unwrap().url(), "//images.example.com/nyan.png");
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! RUST_LOG=debug cargo test
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod fetch;
pub mod link;
pub mod model;
pub mod support;
pub mod telemetry;

pub use builder::{Built, ResourceBuilder};
pub use config::{BuildConfig, BuildContext, ResourceFactory, ResourceMapping};
pub use error::ResourceError;
pub use fetch::{FetchError, ResourceFetcher};
pub use link::Link;
pub use model::{Resource, ResourceKind, Snapshot};
