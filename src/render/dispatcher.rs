// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Variant selection and the single-renderer container.

use std::time::Duration;

use crate::config::RendererConfiguration;
use crate::error::{LoadError, RenderError, RenderResult};
use crate::io::loader::{LoadMessage, Loader, PendingLoad};
use crate::models::annotation::Annotation;
use crate::models::file::{FileClassification, FileDescriptor, MediaKind};
use crate::surface::{Color, Scene, Surface};
use crate::util::geometry::Pos;

use super::{
    AudioRenderer, ImageRenderer, InputEvent, LoadOutcome, LoadTicket, ReconcileReport, Renderer, TabularRenderer,
    TextRenderer, VideoRenderer,
};

/// Construct the renderer variant for a classification.
pub fn select(classification: FileClassification, config: &RendererConfiguration) -> RenderResult<Box<dyn Renderer>> {
    let kind = classification
        .media_kind()
        .ok_or(RenderError::UnsupportedMediaKind(classification))?;
    let config = config.clone();
    let renderer: Box<dyn Renderer> = match kind {
        MediaKind::Text => Box::new(TextRenderer::new(config)),
        MediaKind::Tabular => Box::new(TabularRenderer::new(config)),
        MediaKind::Image => Box::new(ImageRenderer::new(config)),
        MediaKind::Audio => Box::new(AudioRenderer::new(config)),
        MediaKind::Video => Box::new(VideoRenderer::new(config)),
    };
    Ok(renderer)
}

struct Attached {
    renderer: Box<dyn Renderer>,
    pending: Option<PendingLoad>,
}

/// Owns a container surface and at most one renderer attached to it.
///
/// Opening a file destroys whatever was attached before, so the container
/// never holds nodes from two renderers.
pub struct Dispatcher<S: Surface = Scene> {
    container: S,
    config: RendererConfiguration,
    loader: Loader,
    active: Option<Attached>,
}

impl<S: Surface> Dispatcher<S> {
    pub fn new(container: S, config: RendererConfiguration, loader: Loader) -> Self {
        Self {
            container,
            config,
            loader,
            active: None,
        }
    }

    pub fn container(&self) -> &S {
        &self.container
    }

    pub fn config(&self) -> &RendererConfiguration {
        &self.config
    }

    pub fn renderer(&self) -> Option<&dyn Renderer> {
        self.active.as_ref().map(|a| a.renderer.as_ref())
    }

    /// Whether a load is still in flight.
    pub fn is_loading(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.pending.is_some())
    }

    /// Attach a renderer for `file` and start loading it in the background.
    ///
    /// An unsupported classification fails before anything is torn down, so
    /// the previously attached renderer stays in place.
    pub fn open(&mut self, file: FileDescriptor, classification: FileClassification) -> RenderResult<LoadTicket> {
        let mut renderer = select(classification, &self.config)?;
        if renderer.kind() != file.media_kind {
            return Err(RenderError::KindMismatch {
                expected: renderer.kind(),
                found: file.media_kind,
            });
        }

        self.close();
        let ticket = renderer.begin_load(file.clone(), &mut self.container)?;
        let pending = self.loader.spawn(file, ticket);
        self.active = Some(Attached {
            renderer,
            pending: Some(pending),
        });
        Ok(ticket)
    }

    /// Apply a finished load, if one arrived.
    pub fn poll(&mut self) -> Option<Result<LoadOutcome, LoadError>> {
        let msg = self.active.as_ref()?.pending.as_ref()?.try_take()?;
        Some(self.finish(msg))
    }

    /// Block up to `timeout` for the in-flight load.
    pub fn wait(&mut self, timeout: Duration) -> Option<Result<LoadOutcome, LoadError>> {
        let msg = self.active.as_ref()?.pending.as_ref()?.wait(timeout)?;
        Some(self.finish(msg))
    }

    fn finish(&mut self, msg: LoadMessage) -> Result<LoadOutcome, LoadError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(LoadOutcome::Discarded);
        };
        active.pending = None;
        active.renderer.complete_load(msg.ticket, msg.result, &mut self.container)
    }

    /// Destroy the attached renderer and abandon its load.
    pub fn close(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.renderer.destroy(&mut self.container);
        }
    }

    pub fn render(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.renderer.render(&mut self.container);
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.config.surface_width = width;
        self.config.surface_height = height;
        if let Some(active) = self.active.as_mut() {
            active.renderer.resize(width, height, &mut self.container);
        }
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        if let Some(active) = self.active.as_mut() {
            active.renderer.add_annotation(annotation, &mut self.container);
        }
    }

    pub fn remove_annotation(&mut self, id: &str) -> Option<Annotation> {
        let active = self.active.as_mut()?;
        active.renderer.remove_annotation(id, &mut self.container)
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        self.renderer().map(|r| r.annotations()).unwrap_or_default()
    }

    pub fn reconcile(&mut self, target: &[Annotation]) -> ReconcileReport {
        match self.active.as_mut() {
            Some(active) => active.renderer.reconcile(target, &mut self.container),
            None => ReconcileReport::default(),
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match self.active.as_mut() {
            Some(active) => active.renderer.handle_input(event, &mut self.container),
            None => false,
        }
    }

    pub fn content_point(&self, screen: Pos) -> Option<Pos> {
        self.renderer()?.content_point(screen)
    }

    pub fn set_mark_color(&mut self, color: Color) {
        if let Some(active) = self.active.as_mut() {
            active.renderer.set_mark_color(color, &mut self.container);
        }
    }
}

impl<S: Surface> Drop for Dispatcher<S> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::MemorySource;
    use crate::models::annotation::{AnnotationKind, Position};
    use crate::render::Lifecycle;

    const WAIT: Duration = Duration::from_secs(5);

    fn dispatcher(source: MemorySource) -> Dispatcher {
        Dispatcher::new(Scene::new(), RendererConfiguration::new(400.0, 300.0), Loader::new(source))
    }

    fn text_file(id: &str, location: &str) -> FileDescriptor {
        FileDescriptor::new(id, format!("{}.txt", id), MediaKind::Text, location)
    }

    #[test]
    fn test_select_every_supported_kind() {
        let config = RendererConfiguration::default();
        for c in [
            FileClassification::Text,
            FileClassification::Tabular,
            FileClassification::Image,
            FileClassification::Audio,
            FileClassification::Video,
        ] {
            let renderer = select(c, &config).unwrap();
            assert_eq!(FileClassification::from(renderer.kind()), c);
            assert_eq!(renderer.lifecycle(), Lifecycle::Uninitialized);
        }
    }

    #[test]
    fn test_select_unsupported() {
        let err = select(FileClassification::Archive, &RendererConfiguration::default())
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::UnsupportedMediaKind(FileClassification::Archive)));
    }

    #[test]
    fn test_open_and_wait() {
        let mut d = dispatcher(MemorySource::new().with("a", "hello\nworld"));
        d.open(text_file("a", "a"), FileClassification::Text).unwrap();
        assert!(d.is_loading());

        let outcome = d.wait(WAIT).unwrap();
        assert_eq!(outcome, Ok(LoadOutcome::Applied));
        assert!(!d.is_loading());
        assert_eq!(d.renderer().unwrap().lifecycle(), Lifecycle::Ready);
        assert!(!d.container().is_empty());
    }

    #[test]
    fn test_failed_fetch_moves_to_error() {
        let mut d = dispatcher(MemorySource::new());
        d.open(text_file("a", "nowhere"), FileClassification::Text).unwrap();

        let outcome = d.wait(WAIT).unwrap();
        assert!(matches!(outcome, Err(LoadError::Fetch { .. })));
        let renderer = d.renderer().unwrap();
        assert_eq!(renderer.lifecycle(), Lifecycle::Error);
        assert!(renderer.last_error().is_some());
    }

    #[test]
    fn test_open_replaces_prior_renderer() {
        let mut d = dispatcher(MemorySource::new().with("a", "one").with("b", "two"));
        d.open(text_file("a", "a"), FileClassification::Text).unwrap();
        d.wait(WAIT).unwrap().unwrap();
        d.add_annotation(Annotation::new("n1", "a", AnnotationKind::Point, Position::point(5.0, 5.0)));
        assert!(d.container().node_count() >= 2);

        d.open(text_file("b", "b"), FileClassification::Text).unwrap();
        // The prior renderer's nodes are gone before the new load completes.
        assert_eq!(d.container().node_count(), 0);
        assert!(d.annotations().is_empty());

        d.wait(WAIT).unwrap().unwrap();
        assert_eq!(d.renderer().unwrap().file().unwrap().id, "b");
    }

    #[test]
    fn test_unsupported_keeps_prior_renderer() {
        let mut d = dispatcher(MemorySource::new().with("a", "one"));
        d.open(text_file("a", "a"), FileClassification::Text).unwrap();
        d.wait(WAIT).unwrap().unwrap();
        let nodes = d.container().node_count();

        let zip = FileDescriptor::new("z", "z.zip", MediaKind::Text, "z");
        let err = d.open(zip, FileClassification::Archive).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedMediaKind(_)));
        assert_eq!(d.container().node_count(), nodes);
        assert_eq!(d.renderer().unwrap().lifecycle(), Lifecycle::Ready);
    }

    #[test]
    fn test_mismatched_descriptor_names_its_kind() {
        let mut d = dispatcher(MemorySource::new().with("a", "one"));
        d.open(text_file("a", "a"), FileClassification::Text).unwrap();
        d.wait(WAIT).unwrap().unwrap();
        let nodes = d.container().node_count();

        let err = d.open(text_file("b", "b"), FileClassification::Image).unwrap_err();
        assert!(matches!(
            err,
            RenderError::KindMismatch {
                expected: MediaKind::Image,
                found: MediaKind::Text,
            }
        ));
        assert_eq!(err.to_string(), "text file cannot be opened by the image renderer");
        assert_eq!(d.container().node_count(), nodes);
        assert_eq!(d.renderer().unwrap().file().unwrap().id, "a");
    }

    #[test]
    fn test_close_twice() {
        let mut d = dispatcher(MemorySource::new().with("a", "one"));
        d.open(text_file("a", "a"), FileClassification::Text).unwrap();
        d.wait(WAIT).unwrap().unwrap();

        d.close();
        d.close();
        assert_eq!(d.container().node_count(), 0);
        assert!(d.renderer().is_none());
        assert!(d.poll().is_none());
    }

    #[test]
    fn test_forwarding_without_renderer() {
        let mut d = dispatcher(MemorySource::new());
        assert!(!d.handle_input(InputEvent::ResetView));
        assert_eq!(d.reconcile(&[]), ReconcileReport::default());
        assert!(d.remove_annotation("x").is_none());
        assert!(d.content_point(Pos::new(1.0, 1.0)).is_none());
        d.resize(10.0, 10.0);
        assert_eq!(d.config().surface_width, 10.0);
    }
}
