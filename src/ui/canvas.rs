// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Page canvas.
//!
//! Shows the two content channels of the current page in the page's layout,
//! its media, and the annotation board where annotations sit at their
//! percentage positions.

use super::images::ImageCache;
use crate::app::Mode;
use signbook::models::{Layout, Page, PageContent, Position};
use signbook::util::geometry::{from_percent, to_percent};

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    EditContent(PageContent),
    PlaceAnnotation(Position),
    JumpToAnnotation(String),
    RemoveImage(usize),
}

const BOARD_HEIGHT: f32 = 180.0;

/// Display the current page and handle interactions.
#[allow(clippy::too_many_arguments)]
pub fn show(
    ui: &mut egui::Ui,
    page: &Page,
    mode: Mode,
    show_annotations: bool,
    active: &[String],
    draft_position: Option<Position>,
    languages: (&str, &str),
    images: &mut ImageCache,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    let editable = mode == Mode::Edit;

    egui::ScrollArea::vertical().show(ui, |ui| {
        let mut content = page.content.clone();
        let mut changed = false;

        match page.layout {
            Layout::SideBySide => {
                ui.columns(2, |columns| {
                    changed |= channel(&mut columns[0], languages.0, &mut content.primary, editable);
                    changed |= channel(&mut columns[1], languages.1, &mut content.secondary, editable);
                });
            }
            Layout::Stacked | Layout::Grid => {
                changed |= channel(ui, languages.0, &mut content.primary, editable);
                ui.add_space(8.0);
                changed |= channel(ui, languages.1, &mut content.secondary, editable);
            }
        }
        if changed {
            action = CanvasAction::EditContent(content);
        }

        ui.add_space(8.0);
        if let Some(removed) = media(ui, page, editable, images) {
            action = CanvasAction::RemoveImage(removed);
        }

        if show_annotations {
            ui.add_space(8.0);
            if let Some(board_action) = board(ui, page, editable, active, draft_position) {
                action = board_action;
            }
        }
    });

    action
}

/// One content channel. Returns `true` if the text was edited.
fn channel(ui: &mut egui::Ui, language: &str, text: &mut String, editable: bool) -> bool {
    ui.label(egui::RichText::new(language.to_uppercase()).strong());
    if editable {
        ui.add(
            egui::TextEdit::multiline(text)
                .desired_rows(8)
                .desired_width(f32::INFINITY),
        )
        .changed()
    } else {
        if text.is_empty() {
            ui.label(egui::RichText::new("(empty)").weak());
        } else {
            ui.label(text.as_str());
        }
        false
    }
}

/// Media row. Returns the index of an image the user removed.
fn media(ui: &mut egui::Ui, page: &Page, editable: bool, images: &mut ImageCache) -> Option<usize> {
    let mut removed = None;

    if let Some(video) = &page.media.sign_language_video {
        ui.label(format!("🎬 {video}"));
    }
    if let Some(audio) = &page.media.audio {
        ui.label(format!("🔈 {audio}"));
    }

    if page.media.images.is_empty() {
        return None;
    }

    let thumb = if page.layout == Layout::Grid { 140.0 } else { 220.0 };
    ui.horizontal_wrapped(|ui| {
        for (index, url) in page.media.images.iter().enumerate() {
            ui.vertical(|ui| {
                match images.texture(url) {
                    Some(texture) => {
                        let size = texture.size_vec2();
                        let scale = (thumb / size.x.max(size.y)).min(1.0);
                        ui.add(egui::Image::from_texture(egui::load::SizedTexture::new(
                            texture.id(),
                            size * scale,
                        )));
                    }
                    None => {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(thumb, thumb * 0.6), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 4.0, egui::Color32::from_gray(50));
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            "🖼",
                            egui::FontId::proportional(24.0),
                            egui::Color32::from_gray(160),
                        );
                    }
                }
                if editable && ui.small_button("Remove").clicked() {
                    removed = Some(index);
                }
            });
        }
    });

    removed
}

/// Annotation board. Markers sit at their percentage positions; active
/// annotations are highlighted.
fn board(
    ui: &mut egui::Ui,
    page: &Page,
    editable: bool,
    active: &[String],
    draft_position: Option<Position>,
) -> Option<CanvasAction> {
    let desired = egui::vec2(ui.available_width(), BOARD_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(desired, egui::Sense::click());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, egui::Color32::from_gray(40));

    let width = rect.width() as f64;
    let height = rect.height() as f64;
    let to_screen = |position: &Position| {
        let (x, y) = from_percent(position, width, height);
        rect.min + egui::vec2(x as f32, y as f32)
    };

    let mut markers = Vec::new();
    for annotation in &page.annotations {
        let point = to_screen(&annotation.position);
        let is_active = active.iter().any(|id| id == &annotation.id);
        let color = if is_active {
            egui::Color32::YELLOW
        } else {
            egui::Color32::from_gray(180)
        };
        let radius = if is_active { 8.0 } else { 6.0 };
        painter.circle_filled(point, radius, color);
        painter.circle_stroke(point, radius, egui::Stroke::new(1.0, egui::Color32::BLACK));
        painter.text(
            point + egui::vec2(10.0, 0.0),
            egui::Align2::LEFT_CENTER,
            &annotation.content,
            egui::FontId::proportional(13.0),
            color,
        );
        markers.push((point, annotation.id.clone()));
    }

    if let Some(position) = draft_position {
        let point = to_screen(&position);
        painter.circle_stroke(point, 7.0, egui::Stroke::new(2.0, egui::Color32::LIGHT_BLUE));
    }

    if !response.clicked() {
        return None;
    }
    let pos = response.interact_pointer_pos()?;
    if let Some((_, id)) = markers.iter().find(|(point, _)| point.distance(pos) <= 8.0) {
        return Some(CanvasAction::JumpToAnnotation(id.clone()));
    }
    if editable {
        let offset = pos - rect.min;
        return Some(CanvasAction::PlaceAnnotation(to_percent(
            offset.x as f64,
            offset.y as f64,
            width,
            height,
        )));
    }
    None
}
