// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Page data structures.
//!
//! A page carries two parallel content channels (written text and
//! sign-language gloss), its media references, and its annotations.

use super::annotation::Annotation;
use serde::{Deserialize, Serialize};

/// The two parallel rich-text bodies of a page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageContent {
    pub primary: String,
    pub secondary: String,
}

/// Media references of a page. URLs are opaque external handles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_language_video: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl PageMedia {
    pub fn has_video(&self) -> bool {
        self.sign_language_video.is_some()
    }
}

/// Presentation hint. Does not affect stored content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    SideBySide,
    Stacked,
    Grid,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::SideBySide, Layout::Stacked, Layout::Grid];

    pub fn label(&self) -> &'static str {
        match self {
            Layout::SideBySide => "Side by side",
            Layout::Stacked => "Stacked",
            Layout::Grid => "Grid",
        }
    }
}

/// One page of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub page_number: usize,
    pub content: PageContent,
    pub media: PageMedia,
    pub layout: Layout,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Page {
    /// Create an empty page with a fresh id.
    pub fn empty(page_number: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            page_number,
            content: PageContent::default(),
            media: PageMedia::default(),
            layout: Layout::SideBySide,
            annotations: Vec::new(),
        }
    }

    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }
}

/// Fields to shallow-merge into a page. `None` leaves the field unchanged.
///
/// The page id and number are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePatch {
    pub content: Option<PageContent>,
    pub media: Option<PageMedia>,
    pub layout: Option<Layout>,
    pub annotations: Option<Vec<Annotation>>,
}

impl PagePatch {
    pub fn content(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            content: Some(PageContent {
                primary: primary.into(),
                secondary: secondary.into(),
            }),
            ..Default::default()
        }
    }

    pub fn media(media: PageMedia) -> Self {
        Self {
            media: Some(media),
            ..Default::default()
        }
    }

    pub fn layout(layout: Layout) -> Self {
        Self {
            layout: Some(layout),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.media.is_none()
            && self.layout.is_none()
            && self.annotations.is_none()
    }

    pub(crate) fn apply(self, page: &mut Page) {
        if let Some(content) = self.content {
            page.content = content;
        }
        if let Some(media) = self.media {
            page.media = media;
        }
        if let Some(layout) = self.layout {
            page.layout = layout;
        }
        if let Some(annotations) = self.annotations {
            page.annotations = annotations;
        }
    }
}
