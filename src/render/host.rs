// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Lifecycle shared by every renderer variant.
//!
//! A [`Variant`] only knows how to decode its content and turn its state into
//! draw commands. [`VariantRenderer`] wraps one and implements the
//! [`Renderer`] contract on top: lifecycle transitions, load generations,
//! the annotation store, the nodes created on the surface and their teardown.

use std::collections::HashMap;

use crate::config::RendererConfiguration;
use crate::error::{LoadError, RenderError, RenderResult};
use crate::io::source::LoadedContent;
use crate::models::annotation::{Annotation, Shape};
use crate::models::file::{FileDescriptor, MediaKind};
use crate::surface::{Color, DrawCommand, Layer, NodeId, Surface};
use crate::util::geometry::Pos;

use super::marks::MarkStyle;
use super::{
    InputEvent, Lifecycle, LoadOutcome, LoadTicket, PlaybackState, ReconcileReport, Renderer, ViewportState,
};

/// Media-specific half of a renderer.
///
/// Every paint method is a pure function of the variant's state and the
/// configuration it is given.
pub trait Variant: Default {
    const KIND: MediaKind;

    /// Whether the variant paints playback controls when configured to.
    const HAS_CONTROLS: bool = false;

    /// Decode fetched content, replacing any previous content.
    fn decode(
        &mut self,
        file: &FileDescriptor,
        content: LoadedContent,
        config: &RendererConfiguration,
    ) -> Result<(), LoadError>;

    fn paint_base(&self, config: &RendererConfiguration) -> Vec<DrawCommand>;

    fn paint_controls(&self, _config: &RendererConfiguration) -> Vec<DrawCommand> {
        Vec::new()
    }

    /// Commands for one well-formed annotation; empty when it is not shown.
    fn paint_mark(
        &self,
        annotation: &Annotation,
        shape: &Shape,
        config: &RendererConfiguration,
        style: &MarkStyle,
    ) -> Vec<DrawCommand>;

    /// Apply an input event; true when state changed.
    fn handle_input(&mut self, event: &InputEvent, config: &RendererConfiguration) -> bool;

    /// The surface changed size.
    fn resized(&mut self, _config: &RendererConfiguration) {}

    fn content_point(&self, screen: Pos, config: &RendererConfiguration) -> Option<Pos>;

    fn viewport(&self) -> Option<ViewportState> {
        None
    }

    fn playback(&self) -> Option<PlaybackState> {
        None
    }
}

/// [`Renderer`] implementation around a [`Variant`].
pub struct VariantRenderer<V: Variant> {
    config: RendererConfiguration,
    view: V,
    lifecycle: Lifecycle,
    generation: u64,
    file: Option<FileDescriptor>,
    error: Option<LoadError>,
    store: super::AnnotationStore,
    style: MarkStyle,
    base: Option<NodeId>,
    controls: Option<NodeId>,
    marks: HashMap<String, NodeId>,
}

impl<V: Variant> VariantRenderer<V> {
    pub fn new(config: RendererConfiguration) -> Self {
        Self {
            config,
            view: V::default(),
            lifecycle: Lifecycle::Uninitialized,
            generation: 0,
            file: None,
            error: None,
            store: super::AnnotationStore::new(),
            style: MarkStyle::default(),
            base: None,
            controls: None,
            marks: HashMap::new(),
        }
    }

    /// The variant, for state inspection.
    pub fn view(&self) -> &V {
        &self.view
    }

    fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    /// Remove every node this renderer created.
    fn teardown(&mut self, surface: &mut dyn Surface) {
        for node in self.base.take().into_iter().chain(self.controls.take()) {
            surface.remove_node(node);
        }
        self.clear_marks(surface);
    }

    fn clear_marks(&mut self, surface: &mut dyn Surface) {
        for (_, node) in self.marks.drain() {
            surface.remove_node(node);
        }
    }

    fn repaint_node(surface: &mut dyn Surface, slot: &mut Option<NodeId>, layer: Layer, cmds: Vec<DrawCommand>) {
        let node = *slot.get_or_insert_with(|| surface.create_node(layer));
        surface.clear_node(node);
        for cmd in cmds {
            surface.draw(node, cmd);
        }
    }

    /// Drop the mark for `id` and paint a fresh one if the annotation is shown.
    fn paint_mark(&mut self, id: &str, surface: &mut dyn Surface) {
        if let Some(node) = self.marks.remove(id) {
            surface.remove_node(node);
        }
        let Some(annotation) = self.store.get(id) else {
            return;
        };
        let shape = match annotation.shape() {
            Ok(shape) => shape,
            Err(err) => {
                log::debug!("Skipping mark: {}", err);
                return;
            }
        };
        let cmds = self.view.paint_mark(annotation, &shape, &self.config, &self.style);
        if cmds.is_empty() {
            return;
        }
        let node = surface.create_node(Layer::Overlay);
        for cmd in cmds {
            surface.draw(node, cmd);
        }
        self.marks.insert(id.to_string(), node);
    }

    fn repaint_overlay(&mut self, surface: &mut dyn Surface) {
        self.clear_marks(surface);
        let ids: Vec<String> = self.store.ordered().into_iter().map(|a| a.id.clone()).collect();
        for id in ids {
            self.paint_mark(&id, surface);
        }
    }
}

impl<V: Variant> Renderer for VariantRenderer<V> {
    fn kind(&self) -> MediaKind {
        V::KIND
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn file(&self) -> Option<&FileDescriptor> {
        self.file.as_ref()
    }

    fn last_error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    fn config(&self) -> &RendererConfiguration {
        &self.config
    }

    fn begin_load(&mut self, file: FileDescriptor, surface: &mut dyn Surface) -> RenderResult<LoadTicket> {
        if self.lifecycle == Lifecycle::Destroyed {
            return Err(RenderError::Destroyed);
        }
        if file.media_kind != V::KIND {
            return Err(RenderError::KindMismatch {
                expected: V::KIND,
                found: file.media_kind,
            });
        }

        self.teardown(surface);
        // Annotations belong to a file; switching files starts from an empty set.
        if self.file.as_ref().map(|f| f.id.as_str()) != Some(file.id.as_str()) {
            self.store.clear();
        }
        self.view = V::default();
        self.generation += 1;
        self.error = None;
        self.lifecycle = Lifecycle::Loading;
        log::info!("Loading {} ({})", file.name, V::KIND);
        self.file = Some(file);

        Ok(LoadTicket {
            generation: self.generation,
        })
    }

    fn complete_load(
        &mut self,
        ticket: LoadTicket,
        content: Result<LoadedContent, LoadError>,
        surface: &mut dyn Surface,
    ) -> Result<LoadOutcome, LoadError> {
        if self.lifecycle != Lifecycle::Loading || ticket.generation != self.generation {
            log::debug!(
                "Discarding stale load (ticket {}, current {}, {:?})",
                ticket.generation,
                self.generation,
                self.lifecycle
            );
            return Ok(LoadOutcome::Discarded);
        }
        let Some(file) = self.file.as_ref() else {
            return Ok(LoadOutcome::Discarded);
        };

        let mut view = V::default();
        match content.and_then(|c| view.decode(file, c, &self.config)) {
            Ok(()) => {
                log::info!("Loaded {}", file.name);
                self.view = view;
                self.lifecycle = Lifecycle::Ready;
                self.render(surface);
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                log::error!("Failed to load {}: {}", file.name, err);
                self.lifecycle = Lifecycle::Error;
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn render(&mut self, surface: &mut dyn Surface) {
        if !self.is_ready() {
            return;
        }
        let base = self.view.paint_base(&self.config);
        Self::repaint_node(surface, &mut self.base, Layer::Base, base);

        if V::HAS_CONTROLS && self.config.show_controls {
            let controls = self.view.paint_controls(&self.config);
            Self::repaint_node(surface, &mut self.controls, Layer::Controls, controls);
        } else if let Some(node) = self.controls.take() {
            surface.remove_node(node);
        }

        self.repaint_overlay(surface);
    }

    fn resize(&mut self, width: f64, height: f64, surface: &mut dyn Surface) {
        self.config.surface_width = width;
        self.config.surface_height = height;
        self.view.resized(&self.config);
        self.render(surface);
    }

    fn add_annotation(&mut self, annotation: Annotation, surface: &mut dyn Surface) {
        let id = annotation.id.clone();
        self.store.insert(annotation);
        if self.is_ready() {
            self.paint_mark(&id, surface);
        }
    }

    fn remove_annotation(&mut self, id: &str, surface: &mut dyn Surface) -> Option<Annotation> {
        if let Some(node) = self.marks.remove(id) {
            surface.remove_node(node);
        }
        self.store.remove(id)
    }

    fn annotations(&self) -> Vec<Annotation> {
        self.store.snapshot()
    }

    fn reconcile(&mut self, target: &[Annotation], surface: &mut dyn Surface) -> ReconcileReport {
        let delta = self.store.diff(target);
        let added: Vec<Annotation> = delta.to_add.into_iter().cloned().collect();
        let report = ReconcileReport {
            added: added.iter().map(|a| a.id.clone()).collect(),
            removed: delta.to_remove,
        };

        for id in &report.removed {
            self.remove_annotation(id, surface);
        }
        for annotation in added {
            self.add_annotation(annotation, surface);
        }
        log::debug!(
            "Reconciled annotations: +{} -{}",
            report.added.len(),
            report.removed.len()
        );
        report
    }

    fn handle_input(&mut self, event: InputEvent, surface: &mut dyn Surface) -> bool {
        if !self.is_ready() || (event.is_manipulation() && !self.config.interactive) {
            return false;
        }
        let changed = self.view.handle_input(&event, &self.config);
        if changed {
            self.render(surface);
        }
        changed
    }

    fn content_point(&self, screen: Pos) -> Option<Pos> {
        if !self.is_ready() {
            return None;
        }
        self.view.content_point(screen, &self.config)
    }

    fn mark_node(&self, id: &str) -> Option<NodeId> {
        self.marks.get(id).copied()
    }

    fn viewport(&self) -> Option<ViewportState> {
        self.view.viewport()
    }

    fn playback(&self) -> Option<PlaybackState> {
        self.view.playback()
    }

    fn set_mark_color(&mut self, color: Color, surface: &mut dyn Surface) {
        if self.style.stroke != color {
            self.style.stroke = color;
            if self.is_ready() {
                self.repaint_overlay(surface);
            }
        }
    }

    fn destroy(&mut self, surface: &mut dyn Surface) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }
        self.teardown(surface);
        self.store.clear();
        self.view = V::default();
        self.generation += 1;
        self.lifecycle = Lifecycle::Destroyed;
        if let Some(file) = &self.file {
            log::debug!("Destroyed renderer for {}", file.name);
        }
    }
}
