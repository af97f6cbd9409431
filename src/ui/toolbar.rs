// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with mode selection and page navigation.

use crate::app::Mode;
use signbook::models::Layout;

pub enum ToolbarAction {
    None,
    PreviousPage,
    NextPage,
    SetLayout(Layout),
}

/// Display the toolbar.
pub fn show(
    ui: &mut egui::Ui,
    mode: &mut Mode,
    show_annotations: &mut bool,
    current_page: usize,
    total_pages: usize,
    layout: Layout,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.selectable_label(*mode == Mode::Edit, "✏ Edit").clicked() {
            *mode = Mode::Edit;
        }
        if ui.selectable_label(*mode == Mode::View, "👁 Read").clicked() {
            *mode = Mode::View;
        }

        ui.separator();

        if ui
            .add_enabled(current_page > 0, egui::Button::new("◀"))
            .clicked()
        {
            action = ToolbarAction::PreviousPage;
        }
        ui.label(format!("Page {} / {}", current_page + 1, total_pages));
        if ui
            .add_enabled(current_page + 1 < total_pages, egui::Button::new("▶"))
            .clicked()
        {
            action = ToolbarAction::NextPage;
        }

        ui.separator();

        let mut selected = layout;
        egui::ComboBox::from_id_source("layout")
            .selected_text(selected.label())
            .show_ui(ui, |ui| {
                for option in Layout::ALL {
                    ui.selectable_value(&mut selected, option, option.label());
                }
            });
        if selected != layout {
            action = ToolbarAction::SetLayout(selected);
        }

        ui.checkbox(show_annotations, "Annotations");

        ui.separator();

        let hint = match mode {
            Mode::Edit => "Click the annotation board to place a new annotation",
            Mode::View => "Click an annotation to jump to it in the video",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
