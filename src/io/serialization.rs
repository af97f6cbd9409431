// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document serialization and deserialization.
//!
//! This module handles exporting and importing documents in YAML and JSON
//! formats. Imported documents are checked against the page invariants.

use crate::models::Document;
use anyhow::{bail, Context, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|s| s.to_str());
        match extension {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => bail!("Unsupported file extension: {:?}", extension),
        }
    }
}

/// Export a document to YAML format.
pub fn export_yaml(document: &Document, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(document)?;
    std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Export a document to JSON format.
pub fn export_json(document: &Document, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Import a document from YAML format.
pub fn import_yaml(path: &Path) -> Result<Document> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let document: Document = serde_yaml::from_str(&yaml)?;
    document.validate()?;
    Ok(document)
}

/// Import a document from JSON format.
pub fn import_json(path: &Path) -> Result<Document> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let document: Document = serde_json::from_str(&json)?;
    document.validate()?;
    Ok(document)
}

/// Export in the format implied by the file extension.
pub fn export(document: &Document, path: &Path) -> Result<()> {
    match Format::from_path(path)? {
        Format::Json => export_json(document, path),
        Format::Yaml => export_yaml(document, path),
    }
}

/// Import in the format implied by the file extension.
pub fn import(path: &Path) -> Result<Document> {
    match Format::from_path(path)? {
        Format::Json => import_json(path),
        Format::Yaml => import_yaml(path),
    }
}
