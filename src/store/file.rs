// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Directory-backed document store.
//!
//! Each document lives in `<root>/<id>.json` in the same JSON shape the
//! hosted store uses. Writes go to a temporary file first and are renamed
//! into place.

use super::{is_valid_id, DocumentFilter, DocumentPatch, DocumentStore};
use crate::error::StoreError;
use crate::models::Document;
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        log::info!("Document store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_id(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(self.root.join(format!("{id}.json")))
    }

    fn read(&self, path: &Path, id: &str) -> Result<Document, StoreError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let mut document: Document = serde_json::from_str(&json)?;
        document.id = id.to_string();
        document.validate().map_err(|source| StoreError::Corrupt {
            id: id.to_string(),
            source,
        })?;
        Ok(document)
    }

    /// Write `document` through a temporary file. Documents that would not
    /// load back are refused.
    fn write(&self, document: &Document) -> Result<(), StoreError> {
        let path = self.path_for(&document.id)?;
        document.validate().map_err(|source| StoreError::Corrupt {
            id: document.id.clone(),
            source,
        })?;
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(document)?;
        let written = fs::write(&tmp, json).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                log::warn!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn get(&self, id: &str) -> Result<Document, StoreError> {
        let path = self.path_for(id)?;
        self.read(&path, id)
    }

    fn create(&mut self, document: &Document) -> Result<String, StoreError> {
        let mut stored = document.clone();
        stored.id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        stored.metadata.created_at = now;
        stored.metadata.updated_at = now;
        self.write(&stored)?;
        log::info!("Created document {} ({})", stored.id, stored.title);
        Ok(stored.id)
    }

    fn update(&mut self, id: &str, patch: &DocumentPatch) -> Result<(), StoreError> {
        let mut stored = self.get(id)?;
        patch.apply(&mut stored);
        stored.touch();
        self.write(&stored)?;
        log::debug!("Updated document {id}");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Deleted document {id}");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, filter: &DocumentFilter) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.read(&path, id) {
                Ok(document) if filter.matches(&document) => documents.push(document),
                Ok(_) => {}
                Err(e) => log::warn!("Skipping unreadable document {}: {}", path.display(), e),
            }
        }
        documents.sort_by(|a, b| a.metadata.created_at.cmp(&b.metadata.created_at));
        Ok(documents)
    }
}
