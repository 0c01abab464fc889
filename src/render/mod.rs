// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The rendering engine.
//!
//! One [`Renderer`] contract, five variants behind it (text, tabular, image,
//! audio, video) and a [`Dispatcher`] that picks a variant for a file and
//! owns its lifecycle inside a container.
//!
//! Every variant shares the same lifecycle:
//!
//! ```text
//! Uninitialized -> Loading -> Ready
//!                     \-> Error
//! (any) -> Destroyed
//! ```
//!
//! `render` repaints from owned state only, so it can be called any number
//! of times without leaving stale marks behind.

mod audio;
mod dispatcher;
mod host;
mod image;
mod marks;
mod playback;
mod store;
mod tabular;
mod text;
mod video;
mod viewport;

pub use audio::{AudioRenderer, AudioView};
pub use dispatcher::{select, Dispatcher};
pub use host::{Variant, VariantRenderer};
pub use self::image::{ImageRenderer, ImageView};
pub use playback::{format_time, PlaybackController, PlaybackState, TIMESTAMP_WINDOW_SECONDS};
pub use store::{AnnotationStore, Delta};
pub use tabular::{parse_delimited, TabularRenderer, TabularView, Table};
pub use text::{pretty_json, TextRenderer, TextView};
pub use video::{VideoRenderer, VideoView};
pub use viewport::{
    ViewportController, ViewportState, MAX_SCALE, MIN_SCALE, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};

use crate::config::RendererConfiguration;
use crate::error::{LoadError, RenderResult};
use crate::io::source::LoadedContent;
use crate::models::annotation::Annotation;
use crate::models::file::{FileDescriptor, MediaKind};
use crate::surface::{Color, NodeId, Surface};
use crate::util::geometry::Pos;

/// Lifecycle state of a renderer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Loading,
    Ready,
    Error,
    Destroyed,
}

/// Identifies one `load` call; completions carrying an older ticket are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
}

/// What happened to a load completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The content was decoded and the renderer is ready.
    Applied,
    /// A newer load or a destroy superseded this one; nothing changed.
    Discarded,
}

/// Ids touched by a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl ReconcileReport {
    /// Number of add and remove operations performed.
    pub fn operations(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

/// Discrete input delivered to a renderer's state machines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// One wheel tick; positive `delta_y` zooms out, negative zooms in.
    Wheel { delta_y: f64, cursor: Pos },
    PointerDown(Pos),
    PointerMove(Pos),
    PointerUp,
    PointerLeave,
    /// Scroll the content of text and tabular surfaces.
    Scroll { delta_y: f64 },
    ResetView,
    TogglePlayback,
    /// Seek to a position in `[0, 100]`.
    Seek(f64),
    SetVolume(f64),
    TimeUpdate(f64),
    LoadedMetadata {
        duration_seconds: f64,
        width: Option<u32>,
        height: Option<u32>,
    },
    Ended,
}

impl InputEvent {
    /// Pan/zoom input, ignored by non-interactive renderers.
    pub fn is_manipulation(&self) -> bool {
        matches!(
            self,
            InputEvent::Wheel { .. } | InputEvent::PointerDown(_) | InputEvent::PointerMove(_)
        )
    }
}

/// The contract every renderer variant implements.
///
/// All painting goes through the `surface` passed in; a renderer only ever
/// touches nodes it created on it.
pub trait Renderer {
    fn kind(&self) -> MediaKind;

    fn lifecycle(&self) -> Lifecycle;

    /// File being shown, once `begin_load` has been called.
    fn file(&self) -> Option<&FileDescriptor>;

    /// Error that moved the renderer into [`Lifecycle::Error`].
    fn last_error(&self) -> Option<&LoadError>;

    fn config(&self) -> &RendererConfiguration;

    /// Start loading `file`, tearing down anything painted for a previous file.
    fn begin_load(&mut self, file: FileDescriptor, surface: &mut dyn Surface) -> RenderResult<LoadTicket>;

    /// Finish the load identified by `ticket` with fetched content.
    fn complete_load(
        &mut self,
        ticket: LoadTicket,
        content: Result<LoadedContent, LoadError>,
        surface: &mut dyn Surface,
    ) -> Result<LoadOutcome, LoadError>;

    fn render(&mut self, surface: &mut dyn Surface);

    fn resize(&mut self, width: f64, height: f64, surface: &mut dyn Surface);

    /// Insert or replace an annotation and paint its mark.
    fn add_annotation(&mut self, annotation: Annotation, surface: &mut dyn Surface);

    fn remove_annotation(&mut self, id: &str, surface: &mut dyn Surface) -> Option<Annotation>;

    /// Snapshot of the current annotations in insertion order.
    fn annotations(&self) -> Vec<Annotation>;

    /// Converge the annotation set onto `target` by id, touching only the difference.
    fn reconcile(&mut self, target: &[Annotation], surface: &mut dyn Surface) -> ReconcileReport;

    /// Feed an input event; returns true when state changed and was repainted.
    fn handle_input(&mut self, event: InputEvent, surface: &mut dyn Surface) -> bool;

    /// Map a surface position to content coordinates, if the media has any.
    fn content_point(&self, screen: Pos) -> Option<Pos>;

    /// Overlay node currently showing annotation `id`.
    fn mark_node(&self, id: &str) -> Option<NodeId>;

    fn viewport(&self) -> Option<ViewportState> {
        None
    }

    fn playback(&self) -> Option<PlaybackState> {
        None
    }

    fn set_mark_color(&mut self, color: Color, surface: &mut dyn Surface);

    /// Release everything. Safe to call more than once.
    fn destroy(&mut self, surface: &mut dyn Surface);
}
