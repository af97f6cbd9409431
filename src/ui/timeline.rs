// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video timeline with transport controls.
//!
//! Timed annotations are drawn as markers with their active window; the
//! playhead follows the media clock. Clicking the strip seeks, clicking a
//! marker jumps to its annotation.

use super::format_time;
use signbook::models::Annotation;
use signbook::sync::ACTIVE_WINDOW;

pub enum TimelineAction {
    None,
    TogglePlay,
    ToggleMute,
    Seek(f64),
    Jump(String),
}

/// Seconds shown on the strip.
fn visible_span(annotations: &[Annotation], position: f64) -> f64 {
    let last = annotations
        .iter()
        .filter_map(|a| a.timestamp)
        .fold(0.0_f64, f64::max);
    (last + ACTIVE_WINDOW).max(position + 5.0).max(30.0)
}

pub fn show(
    ui: &mut egui::Ui,
    annotations: &[Annotation],
    active: &[String],
    position: Option<f64>,
    playing: bool,
    muted: bool,
    video: Option<&str>,
) -> TimelineAction {
    let mut action = TimelineAction::None;

    let Some(position) = position else {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("This page has no sign-language video")
                    .color(egui::Color32::from_gray(150)),
            );
        });
        return action;
    };

    ui.horizontal(|ui| {
        if ui.button(if playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
            action = TimelineAction::TogglePlay;
        }
        if ui.button(if muted { "🔇" } else { "🔊" }).clicked() {
            action = TimelineAction::ToggleMute;
        }
        ui.label(egui::RichText::new(format_time(position)).monospace());
        if let Some(video) = video {
            ui.separator();
            ui.label(egui::RichText::new(video).weak());
        }
    });

    let span = visible_span(annotations, position);
    let desired = egui::vec2(ui.available_width(), 48.0);
    let (rect, response) = ui.allocate_exact_size(desired, egui::Sense::click());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, egui::Color32::from_gray(35));

    let x_for = |t: f64| rect.min.x + (t / span) as f32 * rect.width();

    let mut markers = Vec::new();
    for annotation in annotations {
        let Some(t0) = annotation.timestamp else {
            continue;
        };
        let is_active = active.iter().any(|id| id == &annotation.id);
        let color = if is_active {
            egui::Color32::YELLOW
        } else {
            egui::Color32::LIGHT_BLUE
        };
        let window = egui::Rect::from_min_max(
            egui::pos2(x_for(t0), rect.center().y - 4.0),
            egui::pos2(x_for(t0 + ACTIVE_WINDOW), rect.center().y + 4.0),
        );
        painter.rect_filled(window, 2.0, color.gamma_multiply(0.35));

        let marker = egui::pos2(x_for(t0), rect.center().y);
        painter.circle_filled(marker, 5.0, color);
        painter.circle_stroke(marker, 5.0, egui::Stroke::new(1.0, egui::Color32::BLACK));
        markers.push((marker, annotation.id.clone()));
    }

    let playhead = x_for(position);
    painter.line_segment(
        [egui::pos2(playhead, rect.min.y), egui::pos2(playhead, rect.max.y)],
        egui::Stroke::new(2.0, egui::Color32::RED),
    );

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let hit = markers
                .iter()
                .find(|(marker, _)| marker.distance(pos) <= 7.0)
                .map(|(_, id)| id.clone());
            action = match hit {
                Some(id) => TimelineAction::Jump(id),
                None => {
                    let ratio = ((pos.x - rect.min.x) / rect.width()).clamp(0.0, 1.0);
                    TimelineAction::Seek(ratio as f64 * span)
                }
            };
        }
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use signbook::models::{AnnotationType, Position};

    fn at(timestamp: Option<f64>) -> Annotation {
        Annotation {
            id: "a".to_string(),
            kind: AnnotationType::Note,
            content: String::new(),
            position: Position::default(),
            timestamp,
        }
    }

    #[test]
    fn test_span_covers_annotations_and_playhead() {
        assert_eq!(visible_span(&[], 0.0), 30.0);
        assert_eq!(visible_span(&[at(Some(40.0)), at(None)], 0.0), 43.0);
        assert_eq!(visible_span(&[at(Some(1.0))], 60.0), 65.0);
    }
}
