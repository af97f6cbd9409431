// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Debounced autosave timer.
//!
//! A single pending slot: every mutation reschedules the save one idle delay
//! into the future, so at most one save fires per idle window.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSave {
    pub due: Instant,
    pub revision: u64,
}

#[derive(Debug, Clone)]
pub struct Autosave {
    delay: Duration,
    pending: Option<PendingSave>,
}

impl Autosave {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending save with one due `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, revision: u64) {
        self.pending = Some(PendingSave {
            due: now + self.delay,
            revision,
        });
    }

    /// Drop the pending save. Returns it if there was one.
    pub fn cancel(&mut self) -> Option<PendingSave> {
        self.pending.take()
    }

    /// Take the pending save regardless of its deadline.
    pub fn flush(&mut self) -> Option<PendingSave> {
        self.pending.take()
    }

    /// Take the pending save if its deadline has passed.
    pub fn due(&mut self, now: Instant) -> Option<PendingSave> {
        match self.pending {
            Some(pending) if now >= pending.due => self.pending.take(),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<PendingSave> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut autosave = Autosave::new(Duration::from_secs(2));
        autosave.schedule(start, 1);

        assert_eq!(autosave.due(start + Duration::from_millis(1999)), None);
        let fired = autosave.due(start + Duration::from_secs(2)).unwrap();
        assert_eq!(fired.revision, 1);
        assert!(!autosave.is_pending());
    }

    #[test]
    fn test_reschedule_debounces() {
        let start = Instant::now();
        let mut autosave = Autosave::new(Duration::from_secs(2));
        autosave.schedule(start, 1);
        autosave.schedule(start + Duration::from_secs(1), 2);

        assert_eq!(autosave.due(start + Duration::from_secs(2)), None);
        let fired = autosave.due(start + Duration::from_secs(3)).unwrap();
        assert_eq!(fired.revision, 2);
        assert_eq!(autosave.due(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_cancel_and_flush() {
        let start = Instant::now();
        let mut autosave = Autosave::new(Duration::from_secs(2));
        autosave.schedule(start, 1);
        assert!(autosave.cancel().is_some());
        assert_eq!(autosave.due(start + Duration::from_secs(5)), None);

        autosave.schedule(start, 2);
        assert_eq!(autosave.flush().map(|p| p.revision), Some(2));
        assert!(autosave.flush().is_none());
    }
}
