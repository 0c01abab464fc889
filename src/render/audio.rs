// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Audio timeline.

use crate::config::RendererConfiguration;
use crate::error::LoadError;
use crate::io::source::LoadedContent;
use crate::models::annotation::{Annotation, Shape};
use crate::models::file::{FileDescriptor, MediaKind};
use crate::surface::{Color, DrawCommand, MediaFrameKind, Stroke, TextStyle};
use crate::util::geometry::{time_to_x, Pos, Rect};

use super::host::{Variant, VariantRenderer};
use super::marks::{timestamp_mark, MarkStyle};
use super::playback::{PlaybackController, PlaybackState};
use super::text::PADDING;
use super::InputEvent;

pub type AudioRenderer = VariantRenderer<AudioView>;

#[derive(Debug, Default)]
pub struct AudioView {
    title: String,
    playback: PlaybackController,
}

/// Apply media-element events shared by audio and video.
pub(crate) fn apply_playback_event(playback: &mut PlaybackController, event: &InputEvent) -> bool {
    match *event {
        InputEvent::TogglePlayback => {
            playback.toggle();
            true
        }
        InputEvent::Seek(percent) => playback.seek(percent).is_some(),
        InputEvent::SetVolume(volume) => playback.set_volume(volume),
        InputEvent::TimeUpdate(t) => playback.on_time_update(t),
        InputEvent::LoadedMetadata { duration_seconds, .. } => {
            playback.on_loaded_metadata(duration_seconds);
            true
        }
        InputEvent::Ended => {
            playback.on_ended();
            true
        }
        _ => false,
    }
}

/// Reject empty payloads before handing them to the media pipeline.
pub(crate) fn check_media(file: &FileDescriptor, content: &LoadedContent) -> Result<(), LoadError> {
    if content.bytes.is_empty() {
        return Err(LoadError::media(&file.name, "empty media file"));
    }
    Ok(())
}

impl Variant for AudioView {
    const KIND: MediaKind = MediaKind::Audio;
    const HAS_CONTROLS: bool = true;

    fn decode(
        &mut self,
        file: &FileDescriptor,
        content: LoadedContent,
        _config: &RendererConfiguration,
    ) -> Result<(), LoadError> {
        check_media(file, &content)?;
        self.title = file.name.clone();
        if let Some(duration) = content.metadata.and_then(|m| m.duration_seconds) {
            self.playback.on_loaded_metadata(duration);
        }
        Ok(())
    }

    fn paint_base(&self, config: &RendererConfiguration) -> Vec<DrawCommand> {
        let state = self.playback.state();
        let width = config.surface_width;
        let height = config.media_height();
        let track_y = height / 2.0;
        let playhead = time_to_x(state.current_time_seconds, state.duration_seconds, width);

        vec![
            DrawCommand::Fill {
                rect: Rect::new(0.0, 0.0, width, height),
                color: config.background(Color::CANVAS),
            },
            DrawCommand::MediaFrame {
                kind: MediaFrameKind::Audio,
                rect: Rect::new(0.0, 0.0, width, height),
                time: state.current_time_seconds,
            },
            DrawCommand::Text {
                pos: Pos::new(PADDING, PADDING),
                text: self.title.clone(),
                style: TextStyle::body(Color::WHITE),
            },
            DrawCommand::Line {
                from: Pos::new(0.0, track_y),
                to: Pos::new(width, track_y),
                stroke: Stroke::new(2.0, Color::MUTED),
            },
            DrawCommand::Line {
                from: Pos::new(playhead, 0.0),
                to: Pos::new(playhead, height),
                stroke: Stroke::new(1.0, Color::LIGHT_BLUE),
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
        // Audio has no spatial content; only timestamps are shown.
        let Shape::Timestamp(t) = *shape else {
            return Vec::new();
        };
        if !self.playback.is_near(t) {
            return Vec::new();
        }
        let state = self.playback.state();
        let x = time_to_x(t, state.duration_seconds, config.surface_width);
        timestamp_mark(x, 0.0, config.media_height(), t, &annotation.label, style)
    }

    fn handle_input(&mut self, event: &InputEvent, _config: &RendererConfiguration) -> bool {
        apply_playback_event(&mut self.playback, event)
    }

    fn content_point(&self, _screen: Pos, _config: &RendererConfiguration) -> Option<Pos> {
        None
    }

    fn playback(&self) -> Option<PlaybackState> {
        Some(self.playback.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::MediaMetadata;
    use crate::models::annotation::{AnnotationKind, Position};

    fn loaded(duration: Option<f64>) -> AudioView {
        let file = FileDescriptor::new("snd", "tone.wav", MediaKind::Audio, "tone.wav");
        let content = LoadedContent {
            bytes: vec![1, 2, 3],
            metadata: duration.map(|d| MediaMetadata {
                duration_seconds: Some(d),
                ..Default::default()
            }),
        };
        let mut view = AudioView::default();
        view.decode(&file, content, &RendererConfiguration::default()).unwrap();
        view
    }

    #[test]
    fn test_empty_media_is_load_error() {
        let file = FileDescriptor::new("snd", "tone.wav", MediaKind::Audio, "tone.wav");
        let err = AudioView::default()
            .decode(&file, LoadedContent::bytes(Vec::new()), &RendererConfiguration::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Media { .. }));
    }

    #[test]
    fn test_metadata_sets_duration() {
        assert_eq!(loaded(Some(30.0)).playback().unwrap().duration_seconds, 30.0);
        assert_eq!(loaded(None).playback().unwrap().duration_seconds, 0.0);
    }

    #[test]
    fn test_timestamp_marker_position() {
        let config = RendererConfiguration::new(600.0, 200.0);
        let mut view = loaded(Some(60.0));
        view.handle_input(&InputEvent::TimeUpdate(15.2), &config);

        let a = Annotation::new("t", "snd", AnnotationKind::Timestamp, Position::timestamp(15.0)).with_label("beat");
        let cmds = view.paint_mark(&a, &a.shape().unwrap(), &config, &MarkStyle::default());
        assert!(matches!(cmds[0], DrawCommand::Line { from, .. } if from.x == 150.0));

        view.handle_input(&InputEvent::TimeUpdate(16.0), &config);
        assert!(view.paint_mark(&a, &a.shape().unwrap(), &config, &MarkStyle::default()).is_empty());
    }

    #[test]
    fn test_spatial_marks_are_not_drawn() {
        let view = loaded(Some(60.0));
        let a = Annotation::new("p", "snd", AnnotationKind::Point, Position::point(1.0, 1.0));
        let cmds = view.paint_mark(&a, &a.shape().unwrap(), &RendererConfiguration::default(), &MarkStyle::default());
        assert!(cmds.is_empty());
    }
}
