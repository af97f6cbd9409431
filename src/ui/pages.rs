// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Page list panel.
//!
//! Lists the pages in reading order and offers add, remove and reorder.

use signbook::models::Document;

pub enum PagesAction {
    None,
    Select(usize),
    Add,
    Remove(usize),
    Move { from: usize, to: usize },
}

/// First line of the page text, for the list.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.is_empty() {
        return "(empty)".to_string();
    }
    let mut short: String = line.chars().take(24).collect();
    if line.chars().count() > 24 {
        short.push('…');
    }
    short
}

pub fn show(ui: &mut egui::Ui, document: &Document, current_page: usize, editable: bool) -> PagesAction {
    let mut action = PagesAction::None;
    let total = document.page_count();

    ui.heading("Pages");
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, page) in document.pages.iter().enumerate() {
            ui.horizontal(|ui| {
                let label = format!("{}. {}", page.page_number + 1, preview(&page.content.primary));
                if ui.selectable_label(index == current_page, label).clicked() {
                    action = PagesAction::Select(index);
                }
                if page.media.has_video() {
                    ui.label("🎬");
                }
            });

            if editable && index == current_page {
                ui.horizontal(|ui| {
                    if ui.add_enabled(index > 0, egui::Button::new("⬆")).clicked() {
                        action = PagesAction::Move {
                            from: index,
                            to: index - 1,
                        };
                    }
                    if ui.add_enabled(index + 1 < total, egui::Button::new("⬇")).clicked() {
                        action = PagesAction::Move {
                            from: index,
                            to: index + 1,
                        };
                    }
                    // A document keeps at least one page
                    if ui.add_enabled(total > 1, egui::Button::new("🗑 Remove")).clicked() {
                        action = PagesAction::Remove(index);
                    }
                });
            }
        }
    });

    if editable {
        ui.separator();
        if ui.button("➕ Add page").clicked() {
            action = PagesAction::Add;
        }
    }

    action
}
