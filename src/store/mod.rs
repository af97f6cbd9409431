// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document and media store contracts.
//!
//! Stores are constructed explicitly and handed to the editing session;
//! there is no process-wide client.

pub mod file;
pub mod media;
pub mod memory;

pub use file::FileStore;
pub use media::{DirMediaStore, MediaKind, MediaStore};
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::models::{Document, Page, Status};
use std::collections::BTreeSet;

/// Persistence for whole documents.
///
/// `create` stamps `created_at` once; `update` refreshes `updated_at` and
/// never changes `created_at`.
pub trait DocumentStore {
    fn get(&self, id: &str) -> Result<Document, StoreError>;

    /// Store a new document and return its identifier.
    fn create(&mut self, document: &Document) -> Result<String, StoreError>;

    fn update(&mut self, id: &str, patch: &DocumentPatch) -> Result<(), StoreError>;

    fn delete(&mut self, id: &str) -> Result<(), StoreError>;

    fn list(&self, filter: &DocumentFilter) -> Result<Vec<Document>, StoreError>;
}

/// A partial document. `None` fields are left unchanged by an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub pages: Option<Vec<Page>>,
    pub author: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub status: Option<Status>,
}

impl DocumentPatch {
    /// Every mutable field of `document`.
    pub fn full(document: &Document) -> Self {
        Self {
            title: Some(document.title.clone()),
            description: Some(document.description.clone()),
            pages: Some(document.pages.clone()),
            author: Some(document.metadata.author.clone()),
            tags: Some(document.metadata.tags.clone()),
            status: Some(document.metadata.status),
        }
    }

    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Apply the present fields. Does not touch timestamps.
    pub fn apply(&self, document: &mut Document) {
        if let Some(title) = &self.title {
            document.title = title.clone();
        }
        if let Some(description) = &self.description {
            document.description = description.clone();
        }
        if let Some(pages) = &self.pages {
            document.pages = pages.clone();
        }
        if let Some(author) = &self.author {
            document.metadata.author = author.clone();
        }
        if let Some(tags) = &self.tags {
            document.metadata.tags = tags.clone();
        }
        if let Some(status) = self.status {
            document.metadata.status = status;
        }
    }
}

/// Listing filter. A document matches when its status equals `status`
/// (if given) and it carries every tag in `tags`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    pub status: Option<Status>,
    pub tags: Vec<String>,
}

impl DocumentFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: Status) -> Self {
        Self {
            status: Some(status),
            tags: Vec::new(),
        }
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        if let Some(status) = self.status {
            if document.metadata.status != status {
                return false;
            }
        }
        self.tags
            .iter()
            .all(|tag| document.metadata.tags.contains(tag))
    }
}

/// Ids become file names, so only accept the characters generated ids use.
pub(crate) fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LanguagePair;

    fn doc(status: Status, tags: &[&str]) -> Document {
        let mut document = Document::new(LanguagePair::new("fr", "lsf"), "test");
        document.metadata.status = status;
        for tag in tags {
            document.add_tag(tag);
        }
        document
    }

    #[test]
    fn test_filter_requires_status_and_all_tags() {
        let filter = DocumentFilter::with_status(Status::Published)
            .tagged("conte")
            .tagged("enfants");

        assert!(filter.matches(&doc(Status::Published, &["conte", "enfants", "animaux"])));
        assert!(!filter.matches(&doc(Status::Published, &["conte"])));
        assert!(!filter.matches(&doc(Status::Draft, &["conte", "enfants"])));
        assert!(DocumentFilter::all().matches(&doc(Status::Archived, &[])));
    }

    #[test]
    fn test_patch_applies_present_fields() {
        let mut document = doc(Status::Draft, &[]);
        let created = document.metadata.created_at;
        let patch = DocumentPatch {
            title: Some("Le petit prince".to_string()),
            ..DocumentPatch::status(Status::Archived)
        };

        patch.apply(&mut document);

        assert_eq!(document.title, "Le petit prince");
        assert_eq!(document.metadata.status, Status::Archived);
        assert_eq!(document.metadata.created_at, created);
        assert_eq!(document.page_count(), 1);
    }

    #[test]
    fn test_id_validation() {
        assert!(is_valid_id("0f8c2a1e-1b2c-4d3e-8f9a-123456789abc"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../etc/passwd"));
    }
}
