// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video timeline with a frame overlay.
//!
//! Spatial annotations are stored in native video pixels and stretched onto
//! the overlay with independent x/y scales, recomputed whenever metadata
//! arrives or the surface is resized. Until the native size is known no
//! spatial mark is drawn.

use crate::config::RendererConfiguration;
use crate::error::LoadError;
use crate::io::source::LoadedContent;
use crate::models::annotation::{Annotation, Shape};
use crate::models::file::{FileDescriptor, MediaKind};
use crate::surface::{Color, DrawCommand, MediaFrameKind};
use crate::util::geometry::{time_to_x, Pos, Rect, Size, Transform};

use super::audio::{apply_playback_event, check_media};
use super::host::{Variant, VariantRenderer};
use super::marks::{spatial_mark, timestamp_mark, MarkStyle};
use super::playback::{PlaybackController, PlaybackState};
use super::InputEvent;

/// Height of the band along the bottom of the frame used for timestamp marks.
const TIMESTAMP_BAND: f64 = 48.0;

pub type VideoRenderer = VariantRenderer<VideoView>;

#[derive(Debug, Default)]
pub struct VideoView {
    playback: PlaybackController,
    native: Option<Size>,
    overlay: Option<Transform>,
}

impl VideoView {
    pub fn native_size(&self) -> Option<Size> {
        self.native
    }

    /// Native-to-overlay transform, once the native size is known.
    pub fn overlay_transform(&self) -> Option<Transform> {
        self.overlay
    }

    fn set_native(&mut self, width: Option<u32>, height: Option<u32>, config: &RendererConfiguration) {
        if let (Some(w), Some(h)) = (width, height) {
            if w > 0 && h > 0 {
                self.native = Some(Size::new(f64::from(w), f64::from(h)));
            }
        }
        self.refresh_overlay(config);
    }

    fn refresh_overlay(&mut self, config: &RendererConfiguration) {
        self.overlay = self
            .native
            .and_then(|native| Transform::stretch(native, overlay_size(config)));
    }
}

fn overlay_size(config: &RendererConfiguration) -> Size {
    Size::new(config.surface_width, config.media_height())
}

impl Variant for VideoView {
    const KIND: MediaKind = MediaKind::Video;
    const HAS_CONTROLS: bool = true;

    fn decode(
        &mut self,
        file: &FileDescriptor,
        content: LoadedContent,
        config: &RendererConfiguration,
    ) -> Result<(), LoadError> {
        check_media(file, &content)?;
        if let Some(meta) = content.metadata {
            if let Some(duration) = meta.duration_seconds {
                self.playback.on_loaded_metadata(duration);
            }
            self.set_native(meta.width, meta.height, config);
        }
        Ok(())
    }

    fn paint_base(&self, config: &RendererConfiguration) -> Vec<DrawCommand> {
        let frame = Rect::from_size(overlay_size(config));
        vec![
            DrawCommand::Fill {
                rect: frame,
                color: config.background(Color::BLACK),
            },
            DrawCommand::MediaFrame {
                kind: MediaFrameKind::Video,
                rect: frame,
                time: self.playback.state().current_time_seconds,
            },
        ]
    }

    fn paint_controls(&self, config: &RendererConfiguration) -> Vec<DrawCommand> {
        self.playback.controls(config)
    }

    fn paint_mark(
        &self,
        annotation: &Annotation,
        shape: &Shape,
        config: &RendererConfiguration,
        style: &MarkStyle,
    ) -> Vec<DrawCommand> {
        if let Shape::Timestamp(t) = *shape {
            if !self.playback.is_near(t) {
                return Vec::new();
            }
            let state = self.playback.state();
            let height = config.media_height();
            let band = TIMESTAMP_BAND.min(height);
            let x = time_to_x(t, state.duration_seconds, config.surface_width);
            return timestamp_mark(x, height - band, band, t, &annotation.label, style);
        }

        // Spatial marks pinned to a moment follow the same window.
        if annotation.timestamp().is_some_and(|t| !self.playback.is_near(t)) {
            return Vec::new();
        }
        match &self.overlay {
            Some(transform) => spatial_mark(shape, &annotation.label, transform, style),
            None => Vec::new(),
        }
    }

    fn handle_input(&mut self, event: &InputEvent, config: &RendererConfiguration) -> bool {
        if let InputEvent::LoadedMetadata { width, height, .. } = *event {
            self.set_native(width, height, config);
        }
        apply_playback_event(&mut self.playback, event)
    }

    fn resized(&mut self, config: &RendererConfiguration) {
        self.refresh_overlay(config);
    }

    fn content_point(&self, screen: Pos, _config: &RendererConfiguration) -> Option<Pos> {
        self.overlay.map(|t| t.to_content(screen))
    }

    fn playback(&self) -> Option<PlaybackState> {
        Some(self.playback.state())
    }
}
