// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the viewer that implements the egui::App trait. It
//! owns a [`Dispatcher`] painting into a [`Scene`], feeds it user input and
//! media clock ticks, and shows load errors inline.

use std::path::PathBuf;
use std::time::Instant;

use mars::config::ViewerConfig;
use mars::error::RenderError;
use mars::io::loader::Loader;
use mars::io::source::FsSource;
use mars::io::{media, serialization};
use mars::models::annotation::{Annotation, AnnotationKind, Position};
use mars::models::file::{FileClassification, MediaKind};
use mars::render::{Dispatcher, InputEvent, Lifecycle, LoadOutcome, PlaybackState};
use mars::surface::{Color, Scene};
use mars::util::geometry::Pos;

use crate::ui::{canvas, properties, timeline, toolbar};

/// How pointer input on the canvas is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Pan,
    Point,
    Rectangle,
}

/// Wall clock standing in for a media element while playback runs.
#[derive(Debug, Default)]
struct MediaClock {
    last_tick: Option<Instant>,
}

impl MediaClock {
    /// Event advancing the playhead by the time since the previous tick.
    fn tick(&mut self, state: PlaybackState, now: Instant) -> Option<InputEvent> {
        if !state.is_playing {
            self.last_tick = None;
            return None;
        }
        let last = self.last_tick.replace(now)?;
        let t = state.current_time_seconds + now.duration_since(last).as_secs_f64();
        if state.has_duration() && t >= state.duration_seconds {
            self.last_tick = None;
            Some(InputEvent::Ended)
        } else {
            Some(InputEvent::TimeUpdate(t))
        }
    }
}

/// Main application state.
pub struct MarsApp {
    config: ViewerConfig,
    dispatcher: Dispatcher<Scene>,
    current_tool: Tool,
    textures: canvas::TextureCache,
    canvas_state: canvas::CanvasState,
    clock: MediaClock,

    /// Annotation document to apply once a file is open.
    pending_annotations: Option<PathBuf>,

    /// Id of the annotation highlighted in the properties panel
    selected_annotation: Option<String>,

    /// Counter for generating annotation ids and labels
    annotation_counter: usize,

    /// Error that is not owned by a renderer, such as an unsupported file
    error: Option<String>,
}

impl MarsApp {
    /// Create the viewer, optionally opening a file straight away.
    pub fn new(config: ViewerConfig, file: Option<PathBuf>, annotations: Option<PathBuf>) -> Self {
        let loader = Loader::new(FsSource::new(config.probe_media));
        let dispatcher = Dispatcher::new(Scene::new(), config.renderer.clone(), loader);
        let mut app = Self {
            config,
            dispatcher,
            current_tool: Tool::Pan,
            textures: canvas::TextureCache::default(),
            canvas_state: canvas::CanvasState::default(),
            clock: MediaClock::default(),
            pending_annotations: annotations,
            selected_annotation: None,
            annotation_counter: 0,
            error: None,
        };
        if let Some(path) = file {
            app.open_file(path);
        }
        app
    }

    fn mark_color(&self) -> Color {
        Color::from_hex(&self.config.annotation_color).unwrap_or_else(|| {
            log::warn!("Ignoring invalid annotation color {:?}", self.config.annotation_color);
            Color::YELLOW
        })
    }

    /// Open a media file in the canvas.
    fn open_file(&mut self, path: PathBuf) {
        let file = match media::describe(&path) {
            Ok(file) => file,
            Err(classification) => {
                let err = RenderError::UnsupportedMediaKind(classification);
                log::warn!("Cannot open {}: {}", path.display(), err);
                self.error = Some(format!("{}: {}", path.display(), err));
                return;
            }
        };

        let classification = FileClassification::from(file.media_kind);
        match self.dispatcher.open(file, classification) {
            Ok(_) => {
                self.error = None;
                self.selected_annotation = None;
                self.textures.clear();
                self.clock = MediaClock::default();
                let color = self.mark_color();
                self.dispatcher.set_mark_color(color);
                if let Some(doc) = self.pending_annotations.take() {
                    self.load_annotations(doc);
                }
            }
            Err(e) => {
                log::error!("Failed to open {}: {}", path.display(), e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Reconcile the open file's annotations onto a document's.
    fn load_annotations(&mut self, path: PathBuf) {
        let Some(file_id) = self.dispatcher.renderer().and_then(|r| r.file()).map(|f| f.id.clone()) else {
            // Apply once something is open.
            self.pending_annotations = Some(path);
            return;
        };
        match serialization::import_annotations(&path) {
            Ok(doc) => {
                let target: Vec<Annotation> = doc.annotations_for(&file_id).cloned().collect();
                let report = self.dispatcher.reconcile(&target);
                log::info!(
                    "Applied {}: {} added, {} removed",
                    path.display(),
                    report.added.len(),
                    report.removed.len()
                );
                self.annotation_counter = self.annotation_counter.max(target.len());
            }
            Err(e) => {
                log::error!("Failed to import annotations: {:#}", e);
                self.error = Some(format!("Failed to import annotations: {:#}", e));
            }
        }
    }

    fn next_annotation(&mut self, kind: AnnotationKind, position: Position) -> Option<Annotation> {
        let file_id = self.dispatcher.renderer()?.file()?.id.clone();
        self.annotation_counter += 1;
        let n = self.annotation_counter;
        let name = match kind {
            AnnotationKind::Point => format!("point {}", n),
            AnnotationKind::Rectangle => format!("region {}", n),
            AnnotationKind::Timestamp => format!("marker {}", n),
            AnnotationKind::Polygon | AnnotationKind::Text => format!("annotation {}", n),
        };
        Some(Annotation::new(format!("local-{}", n), file_id, kind, position).with_label(name))
    }

    fn place_point(&mut self, screen: Pos) {
        let Some(p) = self.dispatcher.content_point(screen) else {
            return;
        };
        if let Some(annotation) = self.next_annotation(AnnotationKind::Point, Position::point(p.x, p.y)) {
            log::info!("Added {} at ({:.1}, {:.1})", annotation.label, p.x, p.y);
            self.dispatcher.add_annotation(annotation);
        }
    }

    fn place_rectangle(&mut self, a: Pos, b: Pos) {
        let (Some(a), Some(b)) = (self.dispatcher.content_point(a), self.dispatcher.content_point(b)) else {
            return;
        };
        let (x, y) = (a.x.min(b.x), a.y.min(b.y));
        let (w, h) = ((a.x - b.x).abs(), (a.y - b.y).abs());
        if w < 1.0 || h < 1.0 {
            return;
        }
        if let Some(annotation) = self.next_annotation(AnnotationKind::Rectangle, Position::rectangle(x, y, w, h)) {
            log::info!("Added {}", annotation.label);
            self.dispatcher.add_annotation(annotation);
        }
    }

    fn add_marker(&mut self, seconds: f64) {
        if let Some(annotation) = self.next_annotation(AnnotationKind::Timestamp, Position::timestamp(seconds)) {
            log::info!("Added {} at {:.2}s", annotation.label, seconds);
            self.dispatcher.add_annotation(annotation);
        }
    }

    fn delete_annotation(&mut self, id: &str) {
        if self.dispatcher.remove_annotation(id).is_some() {
            log::info!("Deleted annotation {}", id);
        }
        if self.selected_annotation.as_deref() == Some(id) {
            self.selected_annotation = None;
        }
    }

    fn is_ready(&self) -> bool {
        self.dispatcher.renderer().map(|r| r.lifecycle()) == Some(Lifecycle::Ready)
    }
}

impl eframe::App for MarsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed loading
        if let Some(result) = self.dispatcher.poll() {
            match result {
                Ok(LoadOutcome::Applied) => log::info!("File ready"),
                Ok(LoadOutcome::Discarded) => {}
                Err(e) => log::error!("Load failed: {}", e),
            }
        }
        if self.dispatcher.is_loading() {
            ctx.request_repaint();
        }

        let playback = self.dispatcher.renderer().and_then(|r| r.playback());
        if let Some(state) = playback {
            if let Some(event) = self.clock.tick(state, Instant::now()) {
                self.dispatcher.handle_input(event);
            }
            if state.is_playing {
                ctx.request_repaint();
            }
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Text", &["txt", "md", "json", "log", "yaml", "yml", "xml"])
                            .add_filter("Tables", &["csv", "tsv"])
                            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "gif", "webp", "tiff", "tif"])
                            .add_filter("Audio", &["mp3", "wav", "ogg", "flac", "m4a", "aac"])
                            .add_filter("Video", &["mp4", "webm", "mov", "mkv", "avi"])
                            .pick_file()
                        {
                            self.open_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Load Annotations...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Annotations", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.load_annotations(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Close").clicked() {
                        self.dispatcher.close();
                        self.textures.clear();
                        self.selected_annotation = None;
                        self.error = None;
                        ui.close_menu();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Reset View").clicked() {
                        self.dispatcher.handle_input(InputEvent::ResetView);
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let can_reset = self.dispatcher.renderer().is_some_and(|r| r.viewport().is_some());
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            if toolbar::show(ui, &mut self.current_tool, can_reset) {
                self.dispatcher.handle_input(InputEvent::ResetView);
            }
        });

        // Properties panel (right side)
        let annotations = self.dispatcher.annotations();
        let properties_action = egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| properties::show(ui, &annotations, self.selected_annotation.as_deref()))
            .inner;

        match properties_action {
            properties::PropertiesAction::Select(id) => self.selected_annotation = Some(id),
            properties::PropertiesAction::Delete(id) => self.delete_annotation(&id),
            properties::PropertiesAction::None => {}
        }

        // Timeline (bottom) for time-based media
        let timed = self
            .dispatcher
            .renderer()
            .is_some_and(|r| matches!(r.kind(), MediaKind::Audio | MediaKind::Video));
        if let Some(state) = playback.filter(|_| timed && self.is_ready()) {
            let (events, marker) = egui::TopBottomPanel::bottom("timeline")
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        let events = timeline::show(ui, state);
                        let marker = ui.button("⏱ Add Marker").clicked();
                        (events, marker)
                    })
                    .inner
                })
                .inner;
            for event in events {
                self.dispatcher.handle_input(event);
            }
            if marker {
                self.add_marker(state.current_time_seconds);
            }
        }

        // Keyboard shortcuts, unless a text field has focus
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
                self.dispatcher.handle_input(InputEvent::TogglePlayback);
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
                if let Some(id) = self.selected_annotation.clone() {
                    self.delete_annotation(&id);
                }
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.selected_annotation = None;
            }
        }

        // Main canvas (center)
        let canvas_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.error {
                    ui.colored_label(egui::Color32::from_rgb(255, 110, 110), message);
                }

                let Some(renderer) = self.dispatcher.renderer() else {
                    canvas::show_welcome(ui);
                    return Vec::new();
                };

                match renderer.lifecycle() {
                    Lifecycle::Loading => {
                        let name = renderer.file().map(|f| f.name.clone()).unwrap_or_default();
                        ui.centered_and_justified(|ui| {
                            ui.vertical_centered(|ui| {
                                ui.add_space(20.0);
                                ui.spinner();
                                ui.add_space(10.0);
                                ui.label(
                                    egui::RichText::new(format!("Loading {}...", name))
                                        .size(16.0)
                                        .color(egui::Color32::from_gray(200)),
                                );
                            });
                        });
                        Vec::new()
                    }
                    Lifecycle::Error => {
                        let message = renderer
                            .last_error()
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| "Failed to load file".to_string());
                        ui.centered_and_justified(|ui| {
                            ui.colored_label(egui::Color32::from_rgb(255, 110, 110), message);
                        });
                        Vec::new()
                    }
                    _ => {
                        let surface_size = {
                            let config = renderer.config();
                            (config.surface_width, config.surface_height)
                        };
                        let actions = canvas::show(
                            ui,
                            self.dispatcher.container(),
                            surface_size,
                            &mut self.textures,
                            &mut self.canvas_state,
                            self.current_tool,
                        );
                        ui.separator();
                        ui.horizontal(|ui| {
                            ui.label(format!("Current tool: {:?}", self.current_tool));
                            if let Some(v) = self.dispatcher.renderer().and_then(|r| r.viewport()) {
                                ui.separator();
                                ui.label(format!("Zoom: {:.0}%", v.scale * 100.0));
                            }
                        });
                        actions
                    }
                }
            })
            .inner;

        for action in canvas_actions {
            match action {
                canvas::CanvasAction::Input(event) => {
                    self.dispatcher.handle_input(event);
                }
                canvas::CanvasAction::Resize(w, h) => self.dispatcher.resize(w, h),
                canvas::CanvasAction::PlacePoint(pos) => self.place_point(pos),
                canvas::CanvasAction::PlaceRectangle(a, b) => self.place_rectangle(a, b),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn playing(current: f64, duration: f64) -> PlaybackState {
        PlaybackState {
            is_playing: true,
            current_time_seconds: current,
            duration_seconds: duration,
            volume: 1.0,
        }
    }

    #[test]
    fn test_clock_advances_while_playing() {
        let mut clock = MediaClock::default();
        let t0 = Instant::now();
        assert_eq!(clock.tick(playing(1.0, 10.0), t0), None);

        match clock.tick(playing(1.0, 10.0), t0 + Duration::from_millis(500)) {
            Some(InputEvent::TimeUpdate(t)) => assert!((t - 1.5).abs() < 1e-9),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_clock_reports_end() {
        let mut clock = MediaClock::default();
        let t0 = Instant::now();
        clock.tick(playing(9.9, 10.0), t0);
        assert_eq!(clock.tick(playing(9.9, 10.0), t0 + Duration::from_millis(200)), Some(InputEvent::Ended));
    }

    #[test]
    fn test_clock_idle_when_paused() {
        let mut clock = MediaClock::default();
        let t0 = Instant::now();
        clock.tick(playing(0.0, 10.0), t0);
        assert_eq!(clock.tick(PlaybackState::default(), t0 + Duration::from_secs(1)), None);
        assert!(clock.last_tick.is_none());
    }
}
