// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the signbook editor.

pub mod canvas;
pub mod images;
pub mod pages;
pub mod properties;
pub mod timeline;
pub mod toolbar;

/// `m:ss.s` for a playback position in seconds.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0);
    let minutes = (total / 60.0).floor() as u64;
    format!("{}:{:04.1}", minutes, total - minutes as f64 * 60.0)
}
