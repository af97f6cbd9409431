// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! Annotations are positioned over page content in percentage coordinates
//! and may carry a timestamp into the page's sign-language video.

use serde::{Deserialize, Serialize};

/// A position in percentage coordinates (0.0 to 100.0) over the page content.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Kind of annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    #[default]
    Note,
    Translation,
    Definition,
}

impl AnnotationType {
    pub const ALL: [AnnotationType; 3] = [
        AnnotationType::Note,
        AnnotationType::Translation,
        AnnotationType::Definition,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AnnotationType::Note => "Note",
            AnnotationType::Translation => "Translation",
            AnnotationType::Definition => "Definition",
        }
    }
}

/// An annotation attached to a page.
///
/// Annotations are never edited in place: they are added with a fresh id
/// and removed by id, or replaced wholesale through a page patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AnnotationType,
    pub content: String,
    pub position: Position,
    /// Seconds into the page's sign-language video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// An annotation that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewAnnotation {
    #[serde(rename = "type")]
    pub kind: AnnotationType,
    pub content: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl NewAnnotation {
    pub fn new(kind: AnnotationType, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            position: Position::default(),
            timestamp: None,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_timestamp(mut self, seconds: f64) -> Self {
        self.timestamp = Some(seconds);
        self
    }

    /// Attach an id, producing a stored annotation.
    pub fn into_annotation(self, id: String) -> Annotation {
        Annotation {
            id,
            kind: self.kind,
            content: self.content,
            position: self.position,
            timestamp: self.timestamp,
        }
    }
}

impl Annotation {
    /// Whether this annotation is tied to video playback.
    pub fn is_timed(&self) -> bool {
        self.timestamp.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untimed_annotation_omits_timestamp() {
        let annotation = NewAnnotation::new(AnnotationType::Definition, "gloss")
            .at(Position::new(10.0, 20.0))
            .into_annotation("a1".to_string());

        let json = serde_json::to_value(&annotation).unwrap();
        assert_eq!(json["type"], "definition");
        assert!(json.get("timestamp").is_none());
        assert!(!annotation.is_timed());
    }

    #[test]
    fn test_timed_annotation_wire_shape() {
        let json = r#"{"id":"b","type":"translation","content":"hello",
            "position":{"x":50.0,"y":25.5},"timestamp":12.0}"#;
        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(annotation.kind, AnnotationType::Translation);
        assert_eq!(annotation.timestamp, Some(12.0));
        assert_eq!(annotation.position, Position::new(50.0, 25.5));
    }
}
