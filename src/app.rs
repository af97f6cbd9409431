// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns one editing session and one synchronizer. Each frame it
//! polls both with the current instant, draws the panels, then applies the
//! actions the panels returned.

use crate::ui::{canvas, images::ImageCache, pages, properties, timeline, toolbar};
use signbook::config::AppConfig;
use signbook::io::serialization;
use signbook::models::{Document, PageMedia, PagePatch, Status};
use signbook::search::{search_document, Channel, SearchResult};
use signbook::session::EditingSession;
use signbook::store::media::upload_file;
use signbook::store::{DirMediaStore, DocumentFilter, FileStore, MediaKind};
use signbook::sync::media::{ClockPlayer, MediaHandle};
use signbook::sync::Synchronizer;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Instant;

/// Whether the document is being written or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Edit,
    View,
}

/// Document picker state.
struct Library {
    documents: Vec<Document>,
    status: Option<Status>,
    tag: String,
}

pub struct SignbookApp {
    config: AppConfig,
    session: EditingSession,
    media_store: DirMediaStore,
    sync: Synchronizer,

    mode: Mode,
    current_page: usize,
    show_annotations: bool,

    /// Page id and video URL the synchronizer was last attached for.
    synced_page: Option<String>,
    synced_video: Option<String>,

    draft: properties::AnnotationDraft,
    tag_input: String,
    images: ImageCache,

    library: Option<Library>,
    search_open: bool,
    search_query: String,
    search_results: Vec<SearchResult>,

    status_message: Option<String>,
}

impl SignbookApp {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let store = FileStore::open(&config.store_dir)?;
        log::info!("Documents stored in {}", store.root().display());

        let document = Document::new(config.default_language.clone(), &config.default_author);
        let session = EditingSession::new(document, Box::new(store), config.autosave_delay());
        let media_store = DirMediaStore::new(&config.media_dir);

        Ok(Self {
            config,
            session,
            media_store,
            sync: Synchronizer::new(),
            mode: Mode::Edit,
            current_page: 0,
            show_annotations: true,
            synced_page: None,
            synced_video: None,
            draft: properties::AnnotationDraft::default(),
            tag_input: String::new(),
            images: ImageCache::new(),
            library: None,
            search_open: false,
            search_query: String::new(),
            search_results: Vec::new(),
            status_message: None,
        })
    }

    fn report(&mut self, context: &str, error: impl Display) {
        log::warn!("{}: {}", context, error);
        self.status_message = Some(format!("{context}: {error}"));
    }

    fn clamp_page(&mut self) {
        let last = self.session.document().page_count().saturating_sub(1);
        self.current_page = self.current_page.min(last);
    }

    /// Keep the synchronizer attached to the current page. A page or video
    /// change reattaches; an annotation change alone re-derives the active set.
    fn sync_page(&mut self) {
        let Ok(page) = self.session.document().page(self.current_page) else {
            self.sync.detach();
            self.synced_page = None;
            self.synced_video = None;
            return;
        };

        let video = page.media.sign_language_video.clone();
        if self.synced_page.as_deref() != Some(page.id.as_str()) || self.synced_video != video {
            let handle = video
                .clone()
                .map(|url| Box::new(ClockPlayer::new(url)) as Box<dyn MediaHandle>);
            self.synced_page = Some(page.id.clone());
            self.synced_video = video;
            self.sync.attach(handle, page.annotations.clone());
        } else if self.sync.annotations() != page.annotations.as_slice() {
            self.sync.set_annotations(page.annotations.clone());
            self.sync.refresh();
        }
    }

    /// Save whatever is pending before the session switches documents.
    fn flush_session(&mut self) {
        if let Err(e) = self.session.flush() {
            self.report("Save failed", e);
        }
    }

    fn start_document(&mut self, document: Document) {
        self.flush_session();
        self.session.replace_document(document);
        self.current_page = 0;
        self.draft.reset();
        self.search_results.clear();
    }

    fn new_document(&mut self) {
        let document = Document::new(self.config.default_language.clone(), &self.config.default_author);
        self.start_document(document);
        log::info!("Started a new document");
    }

    fn refresh_library(&mut self) {
        let Some(library) = &self.library else {
            return;
        };
        let mut filter = DocumentFilter {
            status: library.status,
            ..DocumentFilter::all()
        };
        for tag in library.tag.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            filter = filter.tagged(tag);
        }
        match self.session.store().list(&filter) {
            Ok(documents) => {
                if let Some(library) = &mut self.library {
                    library.documents = documents;
                }
            }
            Err(e) => self.report("Could not list documents", e),
        }
    }

    fn open_document(&mut self, id: &str) {
        self.flush_session();
        match self.session.load(id) {
            Ok(()) => {
                self.current_page = 0;
                self.draft.reset();
                self.search_results.clear();
                self.library = None;
            }
            Err(e) => self.report("Could not open document", e),
        }
    }

    fn import_document(&mut self, path: PathBuf) {
        match serialization::import(&path) {
            Ok(mut document) => {
                // Imported documents are stored as new documents
                document.id.clear();
                self.start_document(document);
                if let Err(e) = self.session.save() {
                    self.report("Imported document could not be saved", e);
                }
                log::info!("Imported {}", path.display());
            }
            Err(e) => self.report("Import failed", e),
        }
    }

    fn export_document(&mut self, path: PathBuf) {
        match serialization::export(self.session.document(), &path) {
            Ok(()) => {
                log::info!("Exported document to {}", path.display());
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => self.report("Export failed", e),
        }
    }

    fn attach_media(&mut self, kind: MediaKind, now: Instant) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter(kind.as_str(), kind.extensions())
            .pick_file()
        else {
            return;
        };

        let folder = self.session.media_folder().to_string();
        let url = match upload_file(&mut self.media_store, &folder, kind, &path) {
            Ok(url) => url,
            Err(e) => return self.report("Upload failed", e),
        };

        let Ok(page) = self.session.document().page(self.current_page) else {
            return;
        };
        let mut media = page.media.clone();
        match kind {
            MediaKind::Video => media.sign_language_video = Some(url),
            MediaKind::Image => media.images.push(url),
            MediaKind::Audio => media.audio = Some(url),
        }
        if let Err(e) = self.session.update_page(now, self.current_page, PagePatch::media(media)) {
            self.report("Could not attach media", e);
        }
    }

    fn edit_media(&mut self, now: Instant, f: impl FnOnce(&mut PageMedia)) {
        let Ok(page) = self.session.document().page(self.current_page) else {
            return;
        };
        let mut media = page.media.clone();
        f(&mut media);
        if let Err(e) = self.session.update_page(now, self.current_page, PagePatch::media(media)) {
            self.report("Could not update media", e);
        }
    }

    fn undo(&mut self, now: Instant) {
        if self.session.undo(now) {
            self.clamp_page();
            log::info!("Undo");
        }
    }

    fn redo(&mut self, now: Instant) {
        if self.session.redo(now) {
            self.clamp_page();
            log::info!("Redo");
        }
    }

    fn run_search(&mut self) {
        self.search_results = search_document(self.session.document(), &self.search_query);
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui, now: Instant) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New Document").clicked() {
                    self.new_document();
                    ui.close_menu();
                }
                if ui.button("Open...").clicked() {
                    self.library = Some(Library {
                        documents: Vec::new(),
                        status: None,
                        tag: String::new(),
                    });
                    self.refresh_library();
                    ui.close_menu();
                }
                if ui.button("Import...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Documents", &["json", "yaml", "yml"])
                        .pick_file()
                    {
                        self.import_document(path);
                    }
                    ui.close_menu();
                }
                ui.menu_button("Export", |ui| {
                    if ui.button("Export as JSON...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_file_name("document.json")
                            .save_file()
                        {
                            self.export_document(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Export as YAML...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("YAML", &["yaml", "yml"])
                            .set_file_name("document.yaml")
                            .save_file()
                        {
                            self.export_document(path);
                        }
                        ui.close_menu();
                    }
                });
                ui.separator();
                if ui.button("Save").clicked() {
                    if let Err(e) = self.session.save() {
                        self.report("Save failed", e);
                    }
                    ui.close_menu();
                }
                if ui.button("Quit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui
                    .add_enabled(self.session.can_undo(), egui::Button::new("Undo (Ctrl+Z)"))
                    .clicked()
                {
                    self.undo(now);
                    ui.close_menu();
                }
                if ui
                    .add_enabled(self.session.can_redo(), egui::Button::new("Redo (Ctrl+Shift+Z)"))
                    .clicked()
                {
                    self.redo(now);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Search...").clicked() {
                    self.search_open = true;
                    ui.close_menu();
                }
            });

            let editable = self.mode == Mode::Edit;
            ui.add_enabled_ui(editable, |ui| {
                ui.menu_button("Page", |ui| {
                    if ui.button("Attach Sign-Language Video...").clicked() {
                        self.attach_media(MediaKind::Video, now);
                        ui.close_menu();
                    }
                    if ui.button("Attach Image...").clicked() {
                        self.attach_media(MediaKind::Image, now);
                        ui.close_menu();
                    }
                    if ui.button("Attach Audio...").clicked() {
                        self.attach_media(MediaKind::Audio, now);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Remove Video").clicked() {
                        self.edit_media(now, |media| media.sign_language_video = None);
                        ui.close_menu();
                    }
                    if ui.button("Remove Audio").clicked() {
                        self.edit_media(now, |media| media.audio = None);
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn library_window(&mut self, ctx: &egui::Context) {
        let Some(library) = &mut self.library else {
            return;
        };

        let mut open = true;
        let mut chosen = None;
        let mut refresh = false;
        egui::Window::new("Open Document")
            .open(&mut open)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Status:");
                    let text = library.status.map_or("Any", |s| s.label());
                    egui::ComboBox::from_id_source("library_status")
                        .selected_text(text)
                        .show_ui(ui, |ui| {
                            refresh |= ui.selectable_value(&mut library.status, None, "Any").changed();
                            for status in Status::ALL {
                                refresh |= ui
                                    .selectable_value(&mut library.status, Some(status), status.label())
                                    .changed();
                            }
                        });
                    ui.label("Tags:");
                    refresh |= ui.text_edit_singleline(&mut library.tag).lost_focus();
                });
                ui.separator();

                if library.documents.is_empty() {
                    ui.label(egui::RichText::new("No documents").weak());
                }
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for document in &library.documents {
                        let label = format!(
                            "{}  ({}, {} pages, {})",
                            document.title,
                            document.metadata.status.label(),
                            document.page_count(),
                            document.metadata.updated_at.format("%Y-%m-%d %H:%M")
                        );
                        if ui.selectable_label(false, label).clicked() {
                            chosen = Some(document.id.clone());
                        }
                    }
                });
            });

        if !open {
            self.library = None;
        } else if let Some(id) = chosen {
            self.open_document(&id);
        } else if refresh {
            self.refresh_library();
        }
    }

    fn search_window(&mut self, ctx: &egui::Context) {
        if !self.search_open {
            return;
        }

        let mut open = true;
        let mut go_to = None;
        let mut run = false;
        egui::Window::new("Search")
            .open(&mut open)
            .default_width(380.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let response = ui.text_edit_singleline(&mut self.search_query);
                    run = response.changed();
                });
                ui.separator();
                if !self.search_query.trim().is_empty() && self.search_results.is_empty() {
                    ui.label(egui::RichText::new("No matches").weak());
                }
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for result in &self.search_results {
                        let channel = match result.channel {
                            Channel::Primary => "text",
                            Channel::Secondary => "sign",
                        };
                        let label = format!("p.{} [{}] {}", result.page_number + 1, channel, result.excerpt);
                        if ui.selectable_label(false, label).clicked() {
                            go_to = Some(result.page_number);
                        }
                    }
                });
            });

        self.search_open = open;
        if run {
            self.run_search();
        }
        if let Some(page) = go_to {
            self.current_page = page;
            self.clamp_page();
        }
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let (text, color) = if let Some(error) = self.session.last_error() {
                (format!("Save failed: {error}"), egui::Color32::LIGHT_RED)
            } else if self.session.autosave_pending() {
                ("Saving soon...".to_string(), egui::Color32::from_gray(180))
            } else if self.session.is_dirty() {
                ("Unsaved changes".to_string(), egui::Color32::from_gray(180))
            } else {
                ("All changes saved".to_string(), egui::Color32::from_gray(140))
            };
            ui.label(egui::RichText::new(text).color(color));
            if let Some(message) = &self.status_message {
                ui.separator();
                ui.label(message);
            }
        });
    }

    fn handle_pages(&mut self, action: pages::PagesAction, now: Instant) {
        match action {
            pages::PagesAction::Select(index) => self.current_page = index,
            pages::PagesAction::Add => {
                self.current_page = self.session.add_page(now);
            }
            pages::PagesAction::Remove(index) => {
                if let Err(e) = self.session.remove_page(now, index) {
                    self.report("Could not remove page", e);
                }
                self.clamp_page();
            }
            pages::PagesAction::Move { from, to } => match self.session.move_page(now, from, to) {
                Ok(()) => self.current_page = to,
                Err(e) => self.report("Could not move page", e),
            },
            pages::PagesAction::None => {}
        }
    }

    fn handle_properties(&mut self, action: properties::PropertiesAction, now: Instant) {
        use properties::PropertiesAction;
        match action {
            PropertiesAction::SetTitle(title) => self.session.set_title(now, &title),
            PropertiesAction::SetDescription(description) => {
                self.session.set_description(now, &description)
            }
            PropertiesAction::AddTag(tag) => {
                self.session.add_tag(now, &tag);
            }
            PropertiesAction::RemoveTag(tag) => {
                self.session.remove_tag(now, &tag);
            }
            PropertiesAction::SetStatus(status) => {
                if let Err(e) = self.session.set_status(now, status) {
                    self.report("Could not change status", e);
                }
            }
            PropertiesAction::JumpToAnnotation(id) => {
                self.sync.jump_to_annotation(&id);
            }
            PropertiesAction::RemoveAnnotation(id) => {
                if let Err(e) = self.session.remove_annotation(now, self.current_page, &id) {
                    self.report("Could not remove annotation", e);
                }
            }
            PropertiesAction::AddAnnotation(annotation) => {
                match self.session.add_annotation(now, self.current_page, annotation) {
                    Ok(id) => {
                        log::info!("Added annotation {}", id);
                        self.draft.reset();
                    }
                    Err(e) => self.report("Could not add annotation", e),
                }
            }
            PropertiesAction::UsePlayhead => {
                self.draft.timestamp = self.sync.position().unwrap_or_default();
            }
            PropertiesAction::None => {}
        }
    }

    fn handle_canvas(&mut self, action: canvas::CanvasAction, now: Instant) {
        match action {
            canvas::CanvasAction::EditContent(content) => {
                let patch = PagePatch::content(content.primary, content.secondary);
                if let Err(e) = self.session.update_page(now, self.current_page, patch) {
                    self.report("Could not edit page", e);
                }
            }
            canvas::CanvasAction::PlaceAnnotation(position) => self.draft.position = Some(position),
            canvas::CanvasAction::JumpToAnnotation(id) => {
                self.sync.jump_to_annotation(&id);
            }
            canvas::CanvasAction::RemoveImage(index) => {
                self.edit_media(now, |media| {
                    if index < media.images.len() {
                        media.images.remove(index);
                    }
                });
            }
            canvas::CanvasAction::None => {}
        }
    }

    fn handle_timeline(&mut self, action: timeline::TimelineAction) {
        match action {
            timeline::TimelineAction::TogglePlay => self.sync.toggle_play(),
            timeline::TimelineAction::ToggleMute => self.sync.toggle_mute(),
            timeline::TimelineAction::Seek(seconds) => self.sync.seek(seconds),
            timeline::TimelineAction::Jump(id) => {
                self.sync.jump_to_annotation(&id);
            }
            timeline::TimelineAction::None => {}
        }
    }
}

impl eframe::App for SignbookApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.images.poll(ctx);
        if let Some(Err(e)) = self.session.tick(now) {
            self.report("Autosave failed", e);
        }
        self.clamp_page();
        self.sync_page();
        self.sync.update(now);

        if self.sync.is_playing() || self.images.is_loading() {
            ctx.request_repaint();
        } else if self.session.autosave_pending() {
            ctx.request_repaint_after(self.config.autosave_delay());
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            self.flush_session();
        }

        // Keyboard shortcuts, skipped while a text field has focus
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z)) {
                self.redo(now);
            } else if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z)) {
                self.undo(now);
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
                self.sync.toggle_play();
            }
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ui, now);
        });

        let layout = self
            .session
            .document()
            .page(self.current_page)
            .map(|p| p.layout)
            .unwrap_or_default();
        let total_pages = self.session.document().page_count();
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    &mut self.mode,
                    &mut self.show_annotations,
                    self.current_page,
                    total_pages,
                    layout,
                )
            })
            .inner;
        match toolbar_action {
            toolbar::ToolbarAction::PreviousPage => {
                self.current_page = self.current_page.saturating_sub(1);
            }
            toolbar::ToolbarAction::NextPage => {
                self.current_page += 1;
                self.clamp_page();
            }
            toolbar::ToolbarAction::SetLayout(layout) => {
                if let Err(e) = self.session.update_page(now, self.current_page, PagePatch::layout(layout)) {
                    self.report("Could not change layout", e);
                }
            }
            toolbar::ToolbarAction::None => {}
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        let video = self.synced_video.clone();
        let timeline_action = egui::TopBottomPanel::bottom("timeline")
            .min_height(90.0)
            .show(ctx, |ui| {
                timeline::show(
                    ui,
                    self.sync.annotations(),
                    self.sync.active(),
                    self.sync.position(),
                    self.sync.is_playing(),
                    self.sync.is_muted(),
                    video.as_deref(),
                )
            })
            .inner;
        self.handle_timeline(timeline_action);

        let editable = self.mode == Mode::Edit;
        let pages_action = egui::SidePanel::left("pages")
            .default_width(200.0)
            .show(ctx, |ui| pages::show(ui, self.session.document(), self.current_page, editable))
            .inner;
        self.handle_pages(pages_action, now);
        self.clamp_page();

        let current = self.current_page;
        let has_media = self.sync.has_media();
        let properties_action = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| {
                let document = self.session.document();
                match document.page(current) {
                    Ok(page) => properties::show(
                        ui,
                        document,
                        page,
                        self.sync.active(),
                        editable,
                        has_media,
                        &mut self.draft,
                        &mut self.tag_input,
                    ),
                    Err(_) => properties::PropertiesAction::None,
                }
            })
            .inner;
        self.handle_properties(properties_action, now);

        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let document = self.session.document();
                let languages = (
                    document.language.primary.as_str(),
                    document.language.secondary.as_str(),
                );
                match document.page(current) {
                    Ok(page) => canvas::show(
                        ui,
                        page,
                        self.mode,
                        self.show_annotations,
                        self.sync.active(),
                        self.draft.position,
                        languages,
                        &mut self.images,
                    ),
                    Err(_) => canvas::CanvasAction::None,
                }
            })
            .inner;
        self.handle_canvas(canvas_action, now);

        self.library_window(ctx);
        self.search_window(ctx);
    }
}
