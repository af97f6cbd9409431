// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playable media handles.
//!
//! A [`MediaHandle`] is whatever plays a page's sign-language video. The
//! editor uses [`ClockPlayer`], which advances its position with wall-clock
//! time; the video frames themselves are rendered outside this crate.

use std::time::Instant;

/// A playable media timeline driven by the synchronizer.
pub trait MediaHandle {
    /// Current playback position in seconds.
    fn position(&self) -> f64;

    /// Drain the position-changed signal. Returns the new position if it
    /// changed since the last call.
    fn poll_position_change(&mut self) -> Option<f64>;

    fn seek(&mut self, seconds: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    fn is_muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);

    /// Called once per event-loop turn. Native players advance on their own.
    fn advance(&mut self, _now: Instant) {}
}

/// A media handle whose clock runs in real time while playing.
#[derive(Debug, Clone)]
pub struct ClockPlayer {
    source: String,
    position: f64,
    duration: Option<f64>,
    playing: bool,
    muted: bool,
    last_tick: Option<Instant>,
    changed: bool,
}

impl ClockPlayer {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            position: 0.0,
            duration: None,
            playing: false,
            muted: false,
            last_tick: None,
            changed: false,
        }
    }

    /// Stop at `seconds` instead of running forever.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds.max(0.0));
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn clamp(&self, seconds: f64) -> f64 {
        let seconds = seconds.max(0.0);
        match self.duration {
            Some(end) => seconds.min(end),
            None => seconds,
        }
    }
}

impl MediaHandle for ClockPlayer {
    fn position(&self) -> f64 {
        self.position
    }

    fn poll_position_change(&mut self) -> Option<f64> {
        if self.changed {
            self.changed = false;
            Some(self.position)
        } else {
            None
        }
    }

    fn seek(&mut self, seconds: f64) {
        self.position = self.clamp(seconds);
        self.changed = true;
        if self.playing {
            self.last_tick = None;
        }
    }

    fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            self.last_tick = None;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
        self.last_tick = None;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn advance(&mut self, now: Instant) {
        if !self.playing {
            return;
        }
        if let Some(last) = self.last_tick {
            let elapsed = now.saturating_duration_since(last).as_secs_f64();
            if elapsed > 0.0 {
                let next = self.clamp(self.position + elapsed);
                if next != self.position {
                    self.position = next;
                    self.changed = true;
                }
                if self.duration.is_some_and(|end| next >= end) {
                    self.playing = false;
                }
            }
        }
        self.last_tick = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_clock_advances_only_while_playing() {
        let start = Instant::now();
        let mut player = ClockPlayer::new("video.mp4");

        player.advance(start + Duration::from_secs(1));
        assert_eq!(player.position(), 0.0);
        assert_eq!(player.poll_position_change(), None);

        player.play();
        player.advance(start);
        player.advance(start + Duration::from_millis(1500));
        assert!((player.position() - 1.5).abs() < 1e-9);
        assert!(player.poll_position_change().is_some());
        assert_eq!(player.poll_position_change(), None);

        player.pause();
        player.advance(start + Duration::from_secs(5));
        assert!((player.position() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_seek_signals_target_position() {
        let mut player = ClockPlayer::new("video.mp4");
        player.seek(12.0);
        assert_eq!(player.poll_position_change(), Some(12.0));

        player.seek(-3.0);
        assert_eq!(player.poll_position_change(), Some(0.0));
    }

    #[test]
    fn test_playback_stops_at_duration() {
        let start = Instant::now();
        let mut player = ClockPlayer::new("video.mp4").with_duration(2.0);
        player.play();
        player.advance(start);
        player.advance(start + Duration::from_secs(10));

        assert_eq!(player.position(), 2.0);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_mute_state() {
        let mut player = ClockPlayer::new("video.mp4");
        assert!(!player.is_muted());
        player.set_muted(true);
        assert!(player.is_muted());
    }
}
