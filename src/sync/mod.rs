// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video/annotation synchronization.
//!
//! The [`Synchronizer`] owns the media handle of the displayed page and
//! derives which of the page's annotations are active at the current
//! playback position. An annotation stamped at `t0` is active for positions
//! in `[t0, t0 + ACTIVE_WINDOW]`.

pub mod media;

use crate::models::Annotation;
use media::MediaHandle;
use std::time::Instant;

/// Seconds an annotation stays active after its timestamp.
pub const ACTIVE_WINDOW: f64 = 3.0;

/// Whether `annotation` is active at playback position `position`.
pub fn is_active(annotation: &Annotation, position: f64) -> bool {
    match annotation.timestamp {
        Some(t0) => t0 <= position && position <= t0 + ACTIVE_WINDOW,
        None => false,
    }
}

/// Ids of the annotations active at `position`, in list order.
pub fn active_at(annotations: &[Annotation], position: f64) -> Vec<String> {
    annotations
        .iter()
        .filter(|a| is_active(a, position))
        .map(|a| a.id.clone())
        .collect()
}

/// Maps playback position to the active annotation set.
///
/// Without a media handle the synchronizer is inert: nothing is ever active
/// and jumps do nothing.
#[derive(Default)]
pub struct Synchronizer {
    handle: Option<Box<dyn MediaHandle>>,
    annotations: Vec<Annotation>,
    active: Vec<String>,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a new page: replace the media handle and annotation list.
    /// The previous handle is dropped along with its position signal.
    pub fn attach(&mut self, handle: Option<Box<dyn MediaHandle>>, annotations: Vec<Annotation>) {
        if let Some(old) = self.handle.as_mut() {
            old.pause();
        }
        self.handle = handle;
        self.annotations = annotations;
        self.active.clear();
        log::debug!(
            "Synchronizer attached ({} annotations, media: {})",
            self.annotations.len(),
            self.handle.is_some()
        );
    }

    pub fn detach(&mut self) {
        self.attach(None, Vec::new());
    }

    /// Replace the annotation list. Active state from the old list is
    /// dropped; the new set is derived at the next position update.
    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
        self.active.clear();
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn has_media(&self) -> bool {
        self.handle.is_some()
    }

    /// Drive the media clock and consume its position-changed signal.
    /// Returns `true` if the active set changed.
    pub fn update(&mut self, now: Instant) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };
        handle.advance(now);
        match handle.poll_position_change() {
            Some(position) => self.recompute(position),
            None => false,
        }
    }

    /// Recompute the active set at the handle's current position, without
    /// waiting for a position change.
    pub fn refresh(&mut self) -> bool {
        match self.handle.as_ref().map(|h| h.position()) {
            Some(position) => self.recompute(position),
            None => false,
        }
    }

    fn recompute(&mut self, position: f64) -> bool {
        let active = active_at(&self.annotations, position);
        if active == self.active {
            return false;
        }
        self.active = active;
        true
    }

    /// Ids of the currently active annotations.
    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn is_active_id(&self, id: &str) -> bool {
        self.active.iter().any(|a| a == id)
    }

    /// Seek to the annotation's timestamp and start playback. Unknown ids,
    /// untimed annotations and a missing handle are no-ops.
    pub fn jump_to_annotation(&mut self, id: &str) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };
        let Some(timestamp) = self
            .annotations
            .iter()
            .find(|a| a.id == id)
            .and_then(|a| a.timestamp)
        else {
            return false;
        };
        handle.seek(timestamp);
        handle.play();
        log::debug!("Jumped to annotation {id} at {timestamp:.2}s");
        true
    }

    pub fn position(&self) -> Option<f64> {
        self.handle.as_ref().map(|h| h.position())
    }

    pub fn is_playing(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_playing())
    }

    pub fn is_muted(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_muted())
    }

    pub fn play(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            handle.play();
        }
    }

    pub fn pause(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            handle.pause();
        }
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn toggle_mute(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let muted = handle.is_muted();
            handle.set_muted(!muted);
        }
    }

    pub fn seek(&mut self, seconds: f64) {
        if let Some(handle) = self.handle.as_mut() {
            handle.seek(seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnotationType, Position};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared view of a scripted media handle.
    #[derive(Default)]
    struct Script {
        position: f64,
        changed: bool,
        playing: bool,
        muted: bool,
        calls: Vec<String>,
    }

    struct ScriptedHandle(Rc<RefCell<Script>>);

    impl MediaHandle for ScriptedHandle {
        fn position(&self) -> f64 {
            self.0.borrow().position
        }

        fn poll_position_change(&mut self) -> Option<f64> {
            let mut s = self.0.borrow_mut();
            if s.changed {
                s.changed = false;
                Some(s.position)
            } else {
                None
            }
        }

        fn seek(&mut self, seconds: f64) {
            let mut s = self.0.borrow_mut();
            s.calls.push(format!("seek({seconds})"));
            s.position = seconds;
            s.changed = true;
        }

        fn play(&mut self) {
            let mut s = self.0.borrow_mut();
            s.calls.push("play".to_string());
            s.playing = true;
        }

        fn pause(&mut self) {
            let mut s = self.0.borrow_mut();
            s.calls.push("pause".to_string());
            s.playing = false;
        }

        fn is_playing(&self) -> bool {
            self.0.borrow().playing
        }

        fn is_muted(&self) -> bool {
            self.0.borrow().muted
        }

        fn set_muted(&mut self, muted: bool) {
            self.0.borrow_mut().muted = muted;
        }
    }

    fn annotation(id: &str, timestamp: Option<f64>) -> Annotation {
        Annotation {
            id: id.to_string(),
            kind: AnnotationType::Note,
            content: String::new(),
            position: Position::default(),
            timestamp,
        }
    }

    fn fixture() -> Vec<Annotation> {
        vec![annotation("a", Some(5.0)), annotation("b", Some(12.0))]
    }

    fn scripted(annotations: Vec<Annotation>) -> (Synchronizer, Rc<RefCell<Script>>) {
        let script = Rc::new(RefCell::new(Script::default()));
        let mut sync = Synchronizer::new();
        sync.attach(Some(Box::new(ScriptedHandle(script.clone()))), annotations);
        script.borrow_mut().calls.clear();
        (sync, script)
    }

    fn move_to(sync: &mut Synchronizer, script: &Rc<RefCell<Script>>, position: f64) {
        {
            let mut s = script.borrow_mut();
            s.position = position;
            s.changed = true;
        }
        sync.update(Instant::now());
    }

    #[test]
    fn test_active_window_boundaries() {
        let (mut sync, script) = scripted(fixture());

        move_to(&mut sync, &script, 4.9);
        assert!(sync.active().is_empty());

        move_to(&mut sync, &script, 5.0);
        assert_eq!(sync.active(), ["a"]);

        move_to(&mut sync, &script, 8.0);
        assert_eq!(sync.active(), ["a"]);

        move_to(&mut sync, &script, 8.1);
        assert!(sync.active().is_empty());

        move_to(&mut sync, &script, 12.0);
        assert_eq!(sync.active(), ["b"]);
    }

    #[test]
    fn test_untimed_annotations_never_active() {
        let annotations = vec![annotation("plain", None), annotation("zero", Some(0.0))];
        assert_eq!(active_at(&annotations, 0.0), vec!["zero".to_string()]);
        assert_eq!(active_at(&annotations, 1.0), vec!["zero".to_string()]);
        assert!(active_at(&annotations, 3.5).is_empty());
    }

    #[test]
    fn test_overlapping_windows() {
        let annotations = vec![annotation("a", Some(1.0)), annotation("b", Some(2.0))];
        assert_eq!(active_at(&annotations, 3.5), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_update_without_position_change_keeps_state() {
        let (mut sync, script) = scripted(fixture());
        move_to(&mut sync, &script, 6.0);
        assert!(!sync.update(Instant::now()));
        assert_eq!(sync.active(), ["a"]);
    }

    #[test]
    fn test_jump_seeks_then_plays() {
        let (mut sync, script) = scripted(fixture());

        assert!(sync.jump_to_annotation("b"));
        assert_eq!(script.borrow().calls, vec!["seek(12)", "play"]);

        sync.update(Instant::now());
        assert_eq!(sync.active(), ["b"]);
    }

    #[test]
    fn test_jump_to_missing_annotation_does_nothing() {
        let mut annotations = fixture();
        annotations.push(annotation("untimed", None));
        let (mut sync, script) = scripted(annotations);

        assert!(!sync.jump_to_annotation("missing"));
        assert!(!sync.jump_to_annotation("untimed"));
        assert!(script.borrow().calls.is_empty());
    }

    #[test]
    fn test_page_switch_drops_stale_active_state() {
        let (mut sync, script) = scripted(fixture());
        move_to(&mut sync, &script, 8.0);
        assert_eq!(sync.active(), ["a"]);

        sync.set_annotations(vec![annotation("c", Some(20.0))]);
        assert!(sync.active().is_empty());

        move_to(&mut sync, &script, 8.0);
        assert!(sync.active().is_empty());
        assert!(!sync.is_active_id("a"));
    }

    #[test]
    fn test_attach_new_page_resets() {
        let (mut sync, script) = scripted(fixture());
        move_to(&mut sync, &script, 5.5);
        assert_eq!(sync.active(), ["a"]);

        let next = Rc::new(RefCell::new(Script {
            position: 5.5,
            ..Default::default()
        }));
        sync.attach(
            Some(Box::new(ScriptedHandle(next.clone()))),
            vec![annotation("d", Some(5.0))],
        );
        assert!(sync.active().is_empty());
        assert!(script.borrow().calls.contains(&"pause".to_string()));

        assert!(sync.refresh());
        assert_eq!(sync.active(), ["d"]);
    }

    #[test]
    fn test_without_media_is_inert() {
        let mut sync = Synchronizer::new();
        sync.attach(None, fixture());

        assert!(!sync.update(Instant::now()));
        assert!(!sync.refresh());
        assert!(sync.active().is_empty());
        assert!(!sync.jump_to_annotation("a"));
        assert_eq!(sync.position(), None);
        sync.toggle_play();
        assert!(!sync.is_playing());
    }

    #[test]
    fn test_transport_routes_through_handle() {
        let (mut sync, script) = scripted(fixture());
        sync.toggle_play();
        assert!(sync.is_playing());
        sync.toggle_play();
        assert!(!sync.is_playing());
        sync.toggle_mute();
        assert!(sync.is_muted());
        sync.seek(3.0);
        assert_eq!(script.borrow().calls, vec!["play", "pause", "seek(3)"]);
    }
}
