// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory document store.

use super::{DocumentFilter, DocumentPatch, DocumentStore};
use crate::error::StoreError;
use crate::models::Document;
use chrono::Utc;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: HashMap<String, Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Document, StoreError> {
        self.documents
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn create(&mut self, document: &Document) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut stored = document.clone();
        stored.id = id.clone();
        stored.metadata.created_at = now;
        stored.metadata.updated_at = now;
        self.documents.insert(id.clone(), stored);
        Ok(id)
    }

    fn update(&mut self, id: &str, patch: &DocumentPatch) -> Result<(), StoreError> {
        let stored = self
            .documents
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply(stored);
        stored.touch();
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.documents
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list(&self, filter: &DocumentFilter) -> Result<Vec<Document>, StoreError> {
        let mut documents: Vec<Document> = self
            .documents
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        documents.sort_by(|a, b| a.metadata.created_at.cmp(&b.metadata.created_at));
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LanguagePair, Status};

    fn draft() -> Document {
        Document::new(LanguagePair::new("fr", "lsf"), "test")
    }

    #[test]
    fn test_create_assigns_id_and_timestamps() {
        let mut store = MemoryStore::new();
        let id = store.create(&draft()).unwrap();

        let stored = store.get(&id).unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.metadata.created_at, stored.metadata.updated_at);
    }

    #[test]
    fn test_update_keeps_created_at() {
        let mut store = MemoryStore::new();
        let id = store.create(&draft()).unwrap();
        let created = store.get(&id).unwrap().metadata.created_at;

        store
            .update(&id, &DocumentPatch::status(Status::Published))
            .unwrap();

        let stored = store.get(&id).unwrap();
        assert_eq!(stored.metadata.status, Status::Published);
        assert_eq!(stored.metadata.created_at, created);
        assert!(stored.metadata.updated_at >= created);
    }

    #[test]
    fn test_missing_documents() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.get("nope"), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update("nope", &DocumentPatch::default()),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_list_filters_by_status() {
        let mut store = MemoryStore::new();
        let published = store.create(&draft()).unwrap();
        store.create(&draft()).unwrap();
        store
            .update(&published, &DocumentPatch::status(Status::Published))
            .unwrap();

        let listed = store
            .list(&DocumentFilter::with_status(Status::Published))
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, published);
        assert_eq!(store.list(&DocumentFilter::all()).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_removes() {
        let mut store = MemoryStore::new();
        let id = store.create(&draft()).unwrap();
        store.delete(&id).unwrap();
        assert!(store.is_empty());
    }
}
