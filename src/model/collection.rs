//! Collections: paginated search results and sync pages.

use crate::model::{Resource, Sys};
use serde_json::Value;

/// Which wrapper a collection document was built into.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionKind {
    /// A page of search results (`total`/`skip`/`limit`).
    Array,
    /// A page of the sync feed, carrying a continuation URL.
    SyncPage {
        next_sync_url: Option<String>,
        next_page_url: Option<String>,
    },
}

/// A built collection.
///
/// `items` has exactly one entry per element of the source `items` array,
/// in source order.
#[derive(Debug, Clone)]
pub struct Collection {
    sys: Sys,
    kind: CollectionKind,
    total: Option<u64>,
    limit: Option<u64>,
    skip: Option<u64>,
    items: Vec<Resource>,
}

impl Collection {
    pub(crate) fn new(raw: &Value, sys: Sys, kind: CollectionKind, items: Vec<Resource>) -> Self {
        let count = |key: &str| raw.get(key).and_then(Value::as_u64);
        Self {
            sys,
            kind,
            total: count("total"),
            limit: count("limit"),
            skip: count("skip"),
            items,
        }
    }

    pub fn sys(&self) -> &Sys {
        &self.sys
    }

    pub fn kind(&self) -> &CollectionKind {
        &self.kind
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn skip(&self) -> Option<u64> {
        self.skip
    }

    pub fn items(&self) -> &[Resource] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Resource> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_sync_page(&self) -> bool {
        matches!(self.kind, CollectionKind::SyncPage { .. })
    }

    pub fn next_sync_url(&self) -> Option<&str> {
        match &self.kind {
            CollectionKind::SyncPage { next_sync_url, .. } => next_sync_url.as_deref(),
            CollectionKind::Array => None,
        }
    }

    pub fn next_page_url(&self) -> Option<&str> {
        match &self.kind {
            CollectionKind::SyncPage { next_page_url, .. } => next_page_url.as_deref(),
            CollectionKind::Array => None,
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
