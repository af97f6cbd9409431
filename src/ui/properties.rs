// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document properties and annotation panel.
//!
//! Shows the document metadata, the annotations of the current page with
//! their active state, and the form for adding a new annotation.

use super::format_time;
use signbook::models::{AnnotationType, Document, NewAnnotation, Page, Position, Status};

/// Annotation being composed in the panel.
#[derive(Debug, Clone, Default)]
pub struct AnnotationDraft {
    pub kind: AnnotationType,
    pub content: String,
    pub position: Option<Position>,
    pub timed: bool,
    pub timestamp: f64,
}

impl AnnotationDraft {
    pub fn to_new_annotation(&self) -> NewAnnotation {
        let annotation = NewAnnotation::new(self.kind, self.content.trim())
            .at(self.position.unwrap_or_default());
        if self.timed {
            annotation.with_timestamp(self.timestamp.max(0.0))
        } else {
            annotation
        }
    }

    pub fn reset(&mut self) {
        self.content.clear();
        self.position = None;
    }
}

pub enum PropertiesAction {
    None,
    SetTitle(String),
    SetDescription(String),
    AddTag(String),
    RemoveTag(String),
    SetStatus(Status),
    JumpToAnnotation(String),
    RemoveAnnotation(String),
    AddAnnotation(NewAnnotation),
    UsePlayhead,
}

#[allow(clippy::too_many_arguments)]
pub fn show(
    ui: &mut egui::Ui,
    document: &Document,
    page: &Page,
    active: &[String],
    editable: bool,
    has_media: bool,
    draft: &mut AnnotationDraft,
    tag_input: &mut String,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.heading("Document");
        ui.separator();

        if editable {
            let mut title = document.title.clone();
            ui.label("Title:");
            if ui.text_edit_singleline(&mut title).changed() {
                action = PropertiesAction::SetTitle(title);
            }
            let mut description = document.description.clone();
            ui.label("Description:");
            if ui.text_edit_multiline(&mut description).changed() {
                action = PropertiesAction::SetDescription(description);
            }
        } else {
            ui.label(egui::RichText::new(&document.title).strong());
            if !document.description.is_empty() {
                ui.label(&document.description);
            }
        }

        ui.label(format!(
            "Languages: {} / {}",
            document.language.primary, document.language.secondary
        ));
        ui.label(format!("Author: {}", document.metadata.author));
        ui.label(format!(
            "Updated: {}",
            document.metadata.updated_at.format("%Y-%m-%d %H:%M")
        ));

        ui.horizontal(|ui| {
            ui.label("Status:");
            for status in Status::ALL {
                let selected = document.metadata.status == status;
                let button = ui.add_enabled(editable, egui::SelectableLabel::new(selected, status.label()));
                if button.clicked() && !selected {
                    action = PropertiesAction::SetStatus(status);
                }
            }
        });

        ui.horizontal_wrapped(|ui| {
            ui.label("Tags:");
            for tag in &document.metadata.tags {
                if editable {
                    if ui.small_button(format!("{tag} ✖")).clicked() {
                        action = PropertiesAction::RemoveTag(tag.clone());
                    }
                } else {
                    ui.label(tag);
                }
            }
        });
        if editable {
            ui.horizontal(|ui| {
                let response = ui.text_edit_singleline(tag_input);
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if (ui.button("Add tag").clicked() || submitted) && !tag_input.trim().is_empty() {
                    action = PropertiesAction::AddTag(std::mem::take(tag_input));
                }
            });
        }

        ui.add_space(12.0);
        ui.heading(format!("Annotations ({})", page.annotations.len()));
        ui.separator();

        if page.annotations.is_empty() {
            ui.label(egui::RichText::new("No annotations on this page").weak());
        }

        for annotation in &page.annotations {
            let is_active = active.iter().any(|id| id == &annotation.id);
            let frame = if is_active {
                egui::Frame::group(ui.style()).fill(egui::Color32::from_rgb(70, 60, 20))
            } else {
                egui::Frame::group(ui.style())
            };
            frame.show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(annotation.kind.label()).strong());
                    match annotation.timestamp {
                        Some(t) => {
                            let jump = ui.add_enabled(
                                has_media,
                                egui::Button::new(format!("▶ {}", format_time(t))),
                            );
                            if jump.clicked() {
                                action = PropertiesAction::JumpToAnnotation(annotation.id.clone());
                            }
                        }
                        None => {
                            ui.label(egui::RichText::new("untimed").weak());
                        }
                    }
                    if editable && ui.small_button("🗑").clicked() {
                        action = PropertiesAction::RemoveAnnotation(annotation.id.clone());
                    }
                });
                ui.label(&annotation.content);
            });
        }

        if editable {
            ui.add_space(12.0);
            ui.heading("New annotation");
            ui.separator();

            egui::ComboBox::from_id_source("annotation_kind")
                .selected_text(draft.kind.label())
                .show_ui(ui, |ui| {
                    for kind in AnnotationType::ALL {
                        ui.selectable_value(&mut draft.kind, kind, kind.label());
                    }
                });
            ui.text_edit_multiline(&mut draft.content);

            match draft.position {
                Some(p) => ui.label(format!("Position: {:.0}% , {:.0}%", p.x, p.y)),
                None => ui.label(egui::RichText::new("Click the board to place it").weak()),
            };

            ui.horizontal(|ui| {
                ui.checkbox(&mut draft.timed, "Timed");
                ui.add_enabled(
                    draft.timed,
                    egui::DragValue::new(&mut draft.timestamp)
                        .speed(0.1)
                        .clamp_range(0.0..=f64::MAX)
                        .suffix(" s"),
                );
                if ui
                    .add_enabled(draft.timed && has_media, egui::Button::new("Use playhead"))
                    .clicked()
                {
                    action = PropertiesAction::UsePlayhead;
                }
            });

            let ready = !draft.content.trim().is_empty();
            if ui.add_enabled(ready, egui::Button::new("➕ Add annotation")).clicked() {
                action = PropertiesAction::AddAnnotation(draft.to_new_annotation());
            }
        }
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_to_annotation() {
        let mut draft = AnnotationDraft {
            kind: AnnotationType::Definition,
            content: "  lapin ".to_string(),
            position: Some(Position::new(25.0, 50.0)),
            timed: false,
            timestamp: 4.0,
        };

        let untimed = draft.to_new_annotation();
        assert_eq!(untimed.content, "lapin");
        assert_eq!(untimed.position, Position::new(25.0, 50.0));
        assert_eq!(untimed.timestamp, None);

        draft.timed = true;
        assert_eq!(draft.to_new_annotation().timestamp, Some(4.0));

        draft.reset();
        assert!(draft.content.is_empty());
        assert!(draft.position.is_none());
        assert_eq!(draft.kind, AnnotationType::Definition);
    }
}
