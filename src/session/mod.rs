// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing session.
//!
//! The session owns the document being edited, its undo history, the
//! injected document store and the autosave timer. Every successful mutation
//! bumps the revision counter and reschedules the autosave. A failed save
//! keeps the in-memory document untouched and leaves it dirty so the save can
//! be offered again.

pub mod autosave;
pub mod history;

use crate::error::{EditError, SessionError, StoreError};
use crate::models::{Document, NewAnnotation, PagePatch, Status};
use crate::store::{DocumentPatch, DocumentStore};
use autosave::Autosave;
use history::History;
use std::time::{Duration, Instant};

/// Media folder used before a document has a store id.
pub const UNSAVED_MEDIA_FOLDER: &str = "unsaved";

pub struct EditingSession {
    document: Document,
    store: Box<dyn DocumentStore>,
    history: History,
    autosave: Autosave,
    /// Incremented on every mutation.
    revision: u64,
    /// Highest revision known to be persisted.
    saved_revision: u64,
    last_error: Option<String>,
}

impl EditingSession {
    /// Start editing `document`, persisting through `store`.
    pub fn new(document: Document, store: Box<dyn DocumentStore>, autosave_delay: Duration) -> Self {
        Self {
            document,
            store,
            history: History::new(),
            autosave: Autosave::new(autosave_delay),
            revision: 0,
            saved_revision: 0,
            last_error: None,
        }
    }

    /// Load document `id` from `store` and start editing it.
    pub fn open(
        store: Box<dyn DocumentStore>,
        id: &str,
        autosave_delay: Duration,
    ) -> Result<Self, SessionError> {
        let document = store.get(id)?;
        log::info!("Opened document {} ({} pages)", id, document.page_count());
        Ok(Self::new(document, store, autosave_delay))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn DocumentStore {
        self.store.as_mut()
    }

    /// Replace the edited document, dropping history and any pending save.
    pub fn replace_document(&mut self, document: Document) {
        self.autosave.cancel();
        self.history.clear();
        self.document = document;
        self.revision = 0;
        self.saved_revision = 0;
        self.last_error = None;
    }

    /// Load another document from the store into this session.
    pub fn load(&mut self, id: &str) -> Result<(), SessionError> {
        let document = self.store.get(id)?;
        log::info!("Loaded document {} ({} pages)", id, document.page_count());
        self.replace_document(document);
        Ok(())
    }

    /// Folder name for media uploaded from this document.
    pub fn media_folder(&self) -> &str {
        if self.document.is_saved() {
            self.document.id.as_str()
        } else {
            UNSAVED_MEDIA_FOLDER
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn saved_revision(&self) -> u64 {
        self.saved_revision
    }

    /// Whether edits exist that have not been persisted.
    pub fn is_dirty(&self) -> bool {
        self.revision > self.saved_revision
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Apply a mutation. On success the prior state goes to the undo
    /// history and an autosave is scheduled.
    fn edit<T>(
        &mut self,
        now: Instant,
        f: impl FnOnce(&mut Document) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let snapshot = self.document.clone();
        match f(&mut self.document) {
            Ok(value) => {
                self.history.push(snapshot);
                self.mark_changed(now);
                Ok(value)
            }
            Err(e) => {
                log::warn!("Rejected edit: {}", e);
                Err(e)
            }
        }
    }

    /// Apply a mutation that cannot be rejected.
    fn record<T>(&mut self, now: Instant, f: impl FnOnce(&mut Document) -> T) -> T {
        self.history.push(self.document.clone());
        let value = f(&mut self.document);
        self.mark_changed(now);
        value
    }

    fn mark_changed(&mut self, now: Instant) {
        self.revision += 1;
        self.autosave.schedule(now, self.revision);
    }

    pub fn add_page(&mut self, now: Instant) -> usize {
        let index = self.record(now, Document::add_page);
        log::info!("Added page, total: {}", self.document.page_count());
        index
    }

    pub fn remove_page(&mut self, now: Instant, index: usize) -> Result<(), EditError> {
        self.edit(now, |doc| doc.remove_page(index).map(|_| ()))?;
        log::info!("Removed page {}, total: {}", index, self.document.page_count());
        Ok(())
    }

    pub fn update_page(&mut self, now: Instant, index: usize, patch: PagePatch) -> Result<(), EditError> {
        if patch.is_empty() {
            return self.document.page(index).map(|_| ());
        }
        self.edit(now, |doc| doc.update_page(index, patch))
    }

    pub fn move_page(&mut self, now: Instant, from: usize, to: usize) -> Result<(), EditError> {
        if from == to {
            return self.document.page(from).map(|_| ());
        }
        self.edit(now, |doc| doc.move_page(from, to))?;
        log::info!("Moved page {} to {}", from, to);
        Ok(())
    }

    pub fn add_annotation(
        &mut self,
        now: Instant,
        page_index: usize,
        annotation: NewAnnotation,
    ) -> Result<String, EditError> {
        let id = self.edit(now, |doc| doc.add_annotation(page_index, annotation))?;
        log::info!("Added annotation {} on page {}", id, page_index);
        Ok(id)
    }

    /// Remove an annotation by id. Unknown ids are a no-op and leave no
    /// history entry.
    pub fn remove_annotation(&mut self, now: Instant, page_index: usize, id: &str) -> Result<bool, EditError> {
        let page = self.document.page(page_index)?;
        if page.annotation(id).is_none() {
            return Ok(false);
        }
        self.edit(now, |doc| doc.remove_annotation(page_index, id))
    }

    pub fn set_title(&mut self, now: Instant, title: &str) {
        if self.document.title != title {
            self.record(now, |doc| doc.set_title(title));
        }
    }

    pub fn set_description(&mut self, now: Instant, description: &str) {
        if self.document.description != description {
            self.record(now, |doc| doc.set_description(description));
        }
    }

    pub fn add_tag(&mut self, now: Instant, tag: &str) -> bool {
        let trimmed = tag.trim();
        if trimmed.is_empty() || self.document.metadata.tags.contains(trimmed) {
            return false;
        }
        self.record(now, |doc| doc.add_tag(tag))
    }

    pub fn remove_tag(&mut self, now: Instant, tag: &str) -> bool {
        if !self.document.metadata.tags.contains(tag) {
            return false;
        }
        self.record(now, |doc| doc.remove_tag(tag))
    }

    /// Change the publication status and save immediately.
    pub fn set_status(&mut self, now: Instant, status: Status) -> Result<(), SessionError> {
        self.record(now, |doc| doc.set_status(status));
        log::info!("Status set to {:?}", status);
        self.save()
    }

    pub fn undo(&mut self, now: Instant) -> bool {
        match self.history.undo(self.document.clone()) {
            Some(previous) => {
                self.restore(previous);
                self.mark_changed(now);
                log::info!("Undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self, now: Instant) -> bool {
        match self.history.redo(self.document.clone()) {
            Some(next) => {
                self.restore(next);
                self.mark_changed(now);
                log::info!("Redo");
                true
            }
            None => false,
        }
    }

    /// Swap in a history snapshot. The store identity assigned since the
    /// snapshot was taken is kept.
    fn restore(&mut self, mut snapshot: Document) {
        if self.document.is_saved() {
            snapshot.id = self.document.id.clone();
            snapshot.metadata.created_at = self.document.metadata.created_at;
        }
        self.document = snapshot;
    }

    /// Run the autosave if its idle delay has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<Result<(), SessionError>> {
        let pending = self.autosave.due(now)?;
        log::debug!("Autosave firing for revision {}", pending.revision);
        Some(self.save())
    }

    /// Save a pending autosave right away. Returns `Ok(false)` if nothing
    /// was pending.
    pub fn flush(&mut self) -> Result<bool, SessionError> {
        match self.autosave.flush() {
            Some(_) => self.save().map(|_| true),
            None => Ok(false),
        }
    }

    /// Drop a pending autosave without saving.
    pub fn discard_pending(&mut self) -> bool {
        self.autosave.cancel().is_some()
    }

    /// Persist the current state. The first save creates the document in
    /// the store and records its id.
    pub fn save(&mut self) -> Result<(), SessionError> {
        self.autosave.cancel();
        let revision = self.revision;
        let previous_update = self.document.metadata.updated_at;
        self.document.touch();

        match self.persist() {
            Ok(()) => {
                self.complete_save(revision);
                self.last_error = None;
                log::info!("Saved document {} at revision {}", self.document.id, revision);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save document: {}", e);
                self.document.metadata.updated_at = previous_update;
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        if self.document.is_saved() {
            return self
                .store
                .update(&self.document.id, &DocumentPatch::full(&self.document));
        }
        let id = self.store.create(&self.document)?;
        self.document.id = id;
        if let Ok(stored) = self.store.get(&self.document.id) {
            self.document.metadata.created_at = stored.metadata.created_at;
            self.document.metadata.updated_at = stored.metadata.updated_at;
        }
        Ok(())
    }

    /// Record that `revision` reached the store. Completions for revisions
    /// older than one already recorded are ignored.
    pub fn complete_save(&mut self, revision: u64) {
        if revision > self.saved_revision {
            self.saved_revision = revision;
        } else {
            log::debug!(
                "Ignoring completion for superseded revision {} (saved {})",
                revision,
                self.saved_revision
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnotationType, LanguagePair, Layout};
    use crate::store::{DocumentFilter, MemoryStore};
    use std::cell::Cell;
    use std::rc::Rc;

    const DELAY: Duration = Duration::from_secs(2);

    /// Wraps a memory store and fails writes while `failing` is set.
    struct FlakyStore {
        inner: MemoryStore,
        failing: Rc<Cell<bool>>,
        writes: Rc<Cell<usize>>,
    }

    impl FlakyStore {
        fn check(&self) -> Result<(), StoreError> {
            self.writes.set(self.writes.get() + 1);
            if self.failing.get() {
                Err(StoreError::Io(std::io::Error::other("store offline")))
            } else {
                Ok(())
            }
        }
    }

    impl DocumentStore for FlakyStore {
        fn get(&self, id: &str) -> Result<Document, StoreError> {
            self.inner.get(id)
        }

        fn create(&mut self, document: &Document) -> Result<String, StoreError> {
            self.check()?;
            self.inner.create(document)
        }

        fn update(&mut self, id: &str, patch: &DocumentPatch) -> Result<(), StoreError> {
            self.check()?;
            self.inner.update(id, patch)
        }

        fn delete(&mut self, id: &str) -> Result<(), StoreError> {
            self.inner.delete(id)
        }

        fn list(&self, filter: &DocumentFilter) -> Result<Vec<Document>, StoreError> {
            self.inner.list(filter)
        }
    }

    fn flaky() -> (EditingSession, Rc<Cell<bool>>, Rc<Cell<usize>>) {
        let failing = Rc::new(Cell::new(false));
        let writes = Rc::new(Cell::new(0));
        let store = FlakyStore {
            inner: MemoryStore::new(),
            failing: failing.clone(),
            writes: writes.clone(),
        };
        let document = Document::new(LanguagePair::new("fr", "lsf"), "test");
        let session = EditingSession::new(document, Box::new(store), DELAY);
        (session, failing, writes)
    }

    #[test]
    fn test_mutations_schedule_one_debounced_save() {
        let (mut session, _, writes) = flaky();
        let start = Instant::now();

        session.add_page(start);
        session.set_title(start + Duration::from_secs(1), "Mon livre");
        session
            .update_page(start + Duration::from_millis(1500), 1, PagePatch::layout(Layout::Grid))
            .unwrap();

        assert!(session.tick(start + Duration::from_secs(3)).is_none());
        assert!(session.tick(start + Duration::from_millis(3500)).unwrap().is_ok());
        assert!(session.tick(start + Duration::from_secs(10)).is_none());
        assert_eq!(writes.get(), 1);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_first_save_creates_document() {
        let (mut session, _, _) = flaky();
        assert!(!session.document().is_saved());
        assert_eq!(session.media_folder(), UNSAVED_MEDIA_FOLDER);

        session.add_page(Instant::now());
        session.save().unwrap();

        let id = session.document().id.clone();
        assert!(!id.is_empty());
        assert_eq!(session.media_folder(), id);
        let stored = session.store().get(&id).unwrap();
        assert_eq!(stored.page_count(), 2);

        session.remove_page(Instant::now(), 0).unwrap();
        session.save().unwrap();
        assert_eq!(session.store().get(&id).unwrap().page_count(), 1);
        assert_eq!(session.store().list(&DocumentFilter::all()).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_edits() {
        let (mut session, failing, _) = flaky();
        let now = Instant::now();
        failing.set(true);

        session.add_page(now);
        let updated_at = session.document().metadata.updated_at;
        let result = session.tick(now + DELAY).unwrap();

        assert!(matches!(result, Err(SessionError::Store(_))));
        assert_eq!(session.document().page_count(), 2);
        assert_eq!(session.document().metadata.updated_at, updated_at);
        assert!(session.is_dirty());
        assert!(session.last_error().is_some());
        assert!(!session.document().is_saved());

        failing.set(false);
        session.save().unwrap();
        assert!(!session.is_dirty());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_rejected_edit_changes_nothing() {
        let (mut session, _, _) = flaky();
        let before = session.document().clone();

        let result = session.remove_page(Instant::now(), 0);

        assert!(matches!(result, Err(EditError::Precondition(_))));
        assert_eq!(session.document(), &before);
        assert_eq!(session.revision(), 0);
        assert!(!session.autosave_pending());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_annotations_through_session() {
        let (mut session, _, _) = flaky();
        let now = Instant::now();
        let id = session
            .add_annotation(
                now,
                0,
                NewAnnotation::new(AnnotationType::Translation, "merci").with_timestamp(2.0),
            )
            .unwrap();
        let revision = session.revision();

        assert_eq!(session.remove_annotation(now, 0, "missing"), Ok(false));
        assert_eq!(session.revision(), revision);

        assert_eq!(session.remove_annotation(now, 0, &id), Ok(true));
        assert!(session.document().pages[0].annotations.is_empty());
    }

    #[test]
    fn test_undo_redo() {
        let (mut session, _, _) = flaky();
        let now = Instant::now();
        session.add_page(now);
        session.add_page(now);
        assert_eq!(session.document().page_count(), 3);

        assert!(session.undo(now));
        assert_eq!(session.document().page_count(), 2);
        assert!(session.redo(now));
        assert_eq!(session.document().page_count(), 3);
        assert!(!session.redo(now));
        assert!(session.autosave_pending());
    }

    #[test]
    fn test_undo_past_first_save_keeps_identity() {
        let (mut session, _, writes) = flaky();
        let now = Instant::now();
        session.add_page(now);
        session.save().unwrap();
        let id = session.document().id.clone();

        assert!(session.undo(now));
        assert_eq!(session.document().id, id);
        assert_eq!(session.document().page_count(), 1);

        session.save().unwrap();
        assert_eq!(writes.get(), 2);
        assert_eq!(session.store().list(&DocumentFilter::all()).unwrap().len(), 1);
        assert_eq!(session.store().get(&id).unwrap().page_count(), 1);
    }

    #[test]
    fn test_set_status_saves_immediately() {
        let (mut session, _, writes) = flaky();
        session.set_status(Instant::now(), Status::Published).unwrap();

        assert_eq!(writes.get(), 1);
        assert!(!session.autosave_pending());
        let stored = session.store().get(&session.document().id).unwrap();
        assert_eq!(stored.metadata.status, Status::Published);
    }

    #[test]
    fn test_flush_and_discard() {
        let (mut session, _, writes) = flaky();
        let now = Instant::now();

        assert_eq!(session.flush().unwrap(), false);
        session.add_page(now);
        assert_eq!(session.flush().unwrap(), true);
        assert_eq!(writes.get(), 1);

        session.add_page(now);
        assert!(session.discard_pending());
        assert!(session.tick(now + DELAY * 2).is_none());
        assert_eq!(writes.get(), 1);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let (mut session, _, _) = flaky();
        let now = Instant::now();
        session.add_page(now);
        session.add_page(now);

        session.complete_save(2);
        session.complete_save(1);
        assert_eq!(session.saved_revision(), 2);
    }

    #[test]
    fn test_metadata_edits_are_undoable() {
        let (mut session, _, _) = flaky();
        let now = Instant::now();
        session.set_title(now, "Le petit lapin");
        session.set_title(now, "Le petit lapin");
        session.set_description(now, "Conte bilingue");
        assert_eq!(session.revision(), 2);

        assert!(session.undo(now));
        assert_eq!(session.document().description, "");
        assert!(session.undo(now));
        assert_eq!(session.document().title, crate::models::document::UNTITLED);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_tags_only_recorded_when_changed() {
        let (mut session, _, _) = flaky();
        let now = Instant::now();
        assert!(session.add_tag(now, "conte"));
        assert!(!session.add_tag(now, "conte"));
        assert_eq!(session.revision(), 1);
        assert!(session.remove_tag(now, "conte"));
        assert!(!session.remove_tag(now, "conte"));
        assert_eq!(session.revision(), 2);
    }

    #[test]
    fn test_open_and_load() {
        let mut store = MemoryStore::new();
        let document = Document::new(LanguagePair::new("en", "ase"), "test");
        let first = store.create(&document).unwrap();
        let second = store.create(&document).unwrap();

        let mut session = EditingSession::open(Box::new(store), &first, DELAY).unwrap();
        assert_eq!(session.document().id, first);
        session.add_page(Instant::now());

        session.load(&second).unwrap();
        assert_eq!(session.document().id, second);
        assert!(!session.can_undo());
        assert!(!session.autosave_pending());
        assert!(session.load("missing").is_err());
    }
}
