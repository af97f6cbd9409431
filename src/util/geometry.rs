// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Annotation positions are stored as percentages of the page content area.
//! These helpers convert between pixel offsets and percentages.

use crate::models::Position;

/// Convert a pixel offset inside a `width` x `height` area to percentages,
/// clamped to the area.
pub fn to_percent(pixel_x: f64, pixel_y: f64, width: f64, height: f64) -> Position {
    let pct = |value: f64, extent: f64| {
        if extent <= 0.0 {
            0.0
        } else {
            (value / extent * 100.0).clamp(0.0, 100.0)
        }
    };
    Position {
        x: pct(pixel_x, width),
        y: pct(pixel_y, height),
    }
}

/// Convert a percentage position to a pixel offset.
pub fn from_percent(position: &Position, width: f64, height: f64) -> (f64, f64) {
    (position.x / 100.0 * width, position.y / 100.0 * height)
}
