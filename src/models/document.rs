// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document state and editing operations.
//!
//! A document owns an ordered list of pages. Every operation that adds,
//! removes or reorders pages renumbers them so that `pages[i].page_number == i`.
//! A document always keeps at least one page.

use super::annotation::{Annotation, NewAnnotation};
use super::page::{Page, PagePatch};
use crate::error::EditError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Title given to documents that have not been named yet.
pub const UNTITLED: &str = "Untitled document";

/// The two languages of a bilingual document, e.g. `fr` and `lsf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub primary: String,
    pub secondary: String,
}

impl LanguagePair {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

/// Publication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Published,
    Archived,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Draft, Status::Published, Status::Archived];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Draft => "Draft",
            Status::Published => "Published",
            Status::Archived => "Archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub status: Status,
}

/// A bilingual multi-page document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store identifier; empty until the document is first saved.
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub language: LanguagePair,
    pub pages: Vec<Page>,
    pub metadata: Metadata,
}

impl Document {
    /// Create an unsaved draft with a single empty page.
    pub fn new(language: LanguagePair, author: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            title: UNTITLED.to_string(),
            description: String::new(),
            language,
            pages: vec![Page::empty(0)],
            metadata: Metadata {
                author: author.into(),
                created_at: now,
                updated_at: now,
                tags: BTreeSet::new(),
                status: Status::Draft,
            },
        }
    }

    pub fn is_saved(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Result<&Page, EditError> {
        let len = self.pages.len();
        self.pages
            .get(index)
            .ok_or(EditError::IndexOutOfRange { index, len })
    }

    fn page_mut(&mut self, index: usize) -> Result<&mut Page, EditError> {
        let len = self.pages.len();
        self.pages
            .get_mut(index)
            .ok_or(EditError::IndexOutOfRange { index, len })
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.pages.len() {
            Ok(())
        } else {
            Err(EditError::IndexOutOfRange {
                index,
                len: self.pages.len(),
            })
        }
    }

    fn renumber(&mut self) {
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.page_number = i;
        }
    }

    /// Append an empty page. Returns its index.
    pub fn add_page(&mut self) -> usize {
        let index = self.pages.len();
        self.pages.push(Page::empty(index));
        index
    }

    /// Remove the page at `index` and renumber the rest.
    pub fn remove_page(&mut self, index: usize) -> Result<Page, EditError> {
        self.check_index(index)?;
        if self.pages.len() == 1 {
            return Err(EditError::Precondition(
                "a document must keep at least one page".to_string(),
            ));
        }
        let removed = self.pages.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Shallow-merge `patch` into the page at `index`.
    ///
    /// A replacement annotation list must have unique ids and valid
    /// timestamps.
    pub fn update_page(&mut self, index: usize, patch: PagePatch) -> Result<(), EditError> {
        if let Some(annotations) = &patch.annotations {
            check_annotations(annotations)?;
        }
        let page = self.page_mut(index)?;
        patch.apply(page);
        Ok(())
    }

    /// Move the page at `from` to `to`. A `to` past the end appends.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        self.check_index(from)?;
        let page = self.pages.remove(from);
        let to = to.min(self.pages.len());
        self.pages.insert(to, page);
        self.renumber();
        Ok(())
    }

    /// Append an annotation to a page, assigning it a fresh id.
    pub fn add_annotation(
        &mut self,
        page_index: usize,
        annotation: NewAnnotation,
    ) -> Result<String, EditError> {
        check_timestamp(annotation.timestamp)?;
        let page = self.page_mut(page_index)?;
        let id = uuid::Uuid::new_v4().to_string();
        page.annotations.push(annotation.into_annotation(id.clone()));
        Ok(id)
    }

    /// Remove the annotation with `id` from a page. Returns `false` when no
    /// annotation matched, which is not an error.
    pub fn remove_annotation(&mut self, page_index: usize, id: &str) -> Result<bool, EditError> {
        let page = self.page_mut(page_index)?;
        match page.annotations.iter().position(|a| a.id == id) {
            Some(pos) => {
                page.annotations.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_status(&mut self, status: Status) {
        self.metadata.status = status;
        self.touch();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Returns `false` if the tag was already present or blank.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.metadata.tags.insert(tag.to_string())
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.metadata.tags.remove(tag)
    }

    /// Refresh `updated_at`.
    pub fn touch(&mut self) {
        self.metadata.updated_at = Utc::now();
    }

    /// Check the structural invariants of a document read from outside.
    pub fn validate(&self) -> Result<(), EditError> {
        if self.pages.is_empty() {
            return Err(EditError::Precondition(
                "document has no pages".to_string(),
            ));
        }
        let mut page_ids = HashSet::new();
        for (i, page) in self.pages.iter().enumerate() {
            if page.page_number != i {
                return Err(EditError::Precondition(format!(
                    "page at position {i} is numbered {}",
                    page.page_number
                )));
            }
            if !page_ids.insert(page.id.as_str()) {
                return Err(EditError::Precondition(format!(
                    "duplicate page id {}",
                    page.id
                )));
            }
            check_annotations(&page.annotations).map_err(|e| match e {
                EditError::Precondition(msg) => EditError::Precondition(format!("{msg} on page {i}")),
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Timestamps are non-negative, finite seconds.
fn check_timestamp(timestamp: Option<f64>) -> Result<(), EditError> {
    match timestamp {
        Some(t) if !t.is_finite() || t < 0.0 => Err(EditError::Precondition(format!(
            "annotation timestamp must be a non-negative number of seconds, got {t}"
        ))),
        _ => Ok(()),
    }
}

fn check_annotations(annotations: &[Annotation]) -> Result<(), EditError> {
    let mut ids = HashSet::new();
    for annotation in annotations {
        if !ids.insert(annotation.id.as_str()) {
            return Err(EditError::Precondition(format!(
                "duplicate annotation id {}",
                annotation.id
            )));
        }
        check_timestamp(annotation.timestamp)?;
    }
    Ok(())
}
