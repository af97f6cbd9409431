// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document, page and annotation data model.

pub mod annotation;
pub mod document;
pub mod page;

pub use annotation::{Annotation, AnnotationType, NewAnnotation, Position};
pub use document::{Document, LanguagePair, Metadata, Status};
pub use page::{Layout, Page, PageContent, PageMedia, PagePatch};
