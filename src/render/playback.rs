// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Play/pause/seek/volume state machine for time-based media.
//!
//! The controller never touches a media element. Hosts feed it the element's
//! events (`on_time_update`, `on_loaded_metadata`, `on_ended`) and read back
//! the state to drive playback.

use crate::config::{RendererConfiguration, CONTROLS_HEIGHT};
use crate::surface::{Color, DrawCommand, TextStyle};
use crate::util::geometry::{Pos, Rect};

/// Timestamp annotations show while the playhead is closer than this.
pub const TIMESTAMP_WINDOW_SECONDS: f64 = 0.5;

const CONTROL_PADDING: f64 = 8.0;
const BUTTON_WIDTH: f64 = 56.0;
const TIME_LABEL_WIDTH: f64 = 96.0;
const VOLUME_WIDTH: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time_seconds: f64,
    /// Zero until metadata has loaded.
    pub duration_seconds: f64,
    /// In `[0, 1]`.
    pub volume: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time_seconds: 0.0,
            duration_seconds: 0.0,
            volume: 1.0,
        }
    }
}

impl PlaybackState {
    pub fn has_duration(&self) -> bool {
        self.duration_seconds.is_finite() && self.duration_seconds > 0.0
    }

    /// Whole-number progress in `[0, 100]`; zero until the duration is known.
    pub fn progress_percent(&self) -> f64 {
        if !self.has_duration() {
            return 0.0;
        }
        (self.current_time_seconds / self.duration_seconds * 100.0)
            .round()
            .clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlaybackController {
    state: PlaybackState,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Flip between playing and stopped; returns the new playing flag.
    ///
    /// Starting again after the end rewinds to the beginning.
    pub fn toggle(&mut self) -> bool {
        if self.state.is_playing {
            self.state.is_playing = false;
        } else {
            if self.state.has_duration() && self.state.current_time_seconds >= self.state.duration_seconds {
                self.state.current_time_seconds = 0.0;
            }
            self.state.is_playing = true;
        }
        self.state.is_playing
    }

    pub fn on_loaded_metadata(&mut self, duration_seconds: f64) {
        self.state.duration_seconds = if duration_seconds.is_finite() && duration_seconds > 0.0 {
            duration_seconds
        } else {
            0.0
        };
        self.state.current_time_seconds = self.clamp_time(self.state.current_time_seconds);
    }

    pub fn on_time_update(&mut self, seconds: f64) -> bool {
        if !seconds.is_finite() {
            return false;
        }
        let t = self.clamp_time(seconds);
        let changed = t != self.state.current_time_seconds;
        self.state.current_time_seconds = t;
        changed
    }

    /// End of media: stop and park the playhead at the end.
    pub fn on_ended(&mut self) {
        self.state.is_playing = false;
        if self.state.has_duration() {
            self.state.current_time_seconds = self.state.duration_seconds;
        }
    }

    /// Seek to `percent` of the duration; a no-op until the duration is known.
    pub fn seek(&mut self, percent: f64) -> Option<f64> {
        if !self.state.has_duration() || !percent.is_finite() {
            return None;
        }
        let t = percent.clamp(0.0, 100.0) / 100.0 * self.state.duration_seconds;
        self.state.current_time_seconds = t;
        Some(t)
    }

    pub fn set_volume(&mut self, volume: f64) -> bool {
        if !volume.is_finite() {
            return false;
        }
        let v = volume.clamp(0.0, 1.0);
        let changed = v != self.state.volume;
        self.state.volume = v;
        changed
    }

    /// Slider position in `[0, 100]`; 0 while the duration is unknown.
    pub fn progress_percent(&self) -> f64 {
        self.state.progress_percent()
    }

    /// Whether a mark pinned at `t` seconds is inside the visibility window.
    pub fn is_near(&self, t: f64) -> bool {
        (self.state.current_time_seconds - t).abs() < TIMESTAMP_WINDOW_SECONDS
    }

    fn clamp_time(&self, t: f64) -> f64 {
        let t = t.max(0.0);
        if self.state.has_duration() {
            t.min(self.state.duration_seconds)
        } else {
            t
        }
    }

    /// Controls strip along the bottom of the surface.
    pub(crate) fn controls(&self, config: &RendererConfiguration) -> Vec<DrawCommand> {
        let width = config.surface_width;
        let top = config.surface_height - CONTROLS_HEIGHT;
        let inner = CONTROLS_HEIGHT - 2.0 * CONTROL_PADDING;
        let mut x = CONTROL_PADDING;

        let mut cmds = vec![DrawCommand::Fill {
            rect: Rect::new(0.0, top, width, CONTROLS_HEIGHT),
            color: Color::PANEL,
        }];

        let label = if self.state.is_playing { "Pause" } else { "Play" };
        cmds.push(DrawCommand::Button {
            rect: Rect::new(x, top + CONTROL_PADDING, BUTTON_WIDTH, inner),
            label: label.to_string(),
        });
        x += BUTTON_WIDTH + CONTROL_PADDING;

        let progress_width =
            (width - x - TIME_LABEL_WIDTH - VOLUME_WIDTH - 3.0 * CONTROL_PADDING).max(0.0);
        cmds.push(DrawCommand::Slider {
            rect: Rect::new(x, top + CONTROL_PADDING, progress_width, inner),
            value: self.progress_percent(),
        });
        x += progress_width + CONTROL_PADDING;

        let duration = if self.state.has_duration() {
            format_time(self.state.duration_seconds)
        } else {
            "--:--".to_string()
        };
        cmds.push(DrawCommand::Text {
            pos: Pos::new(x, top + CONTROL_PADDING + 4.0),
            text: format!("{} / {}", format_time(self.state.current_time_seconds), duration),
            style: TextStyle::mono(Color::WHITE),
        });
        x += TIME_LABEL_WIDTH + CONTROL_PADDING;

        cmds.push(DrawCommand::Slider {
            rect: Rect::new(x, top + CONTROL_PADDING, VOLUME_WIDTH, inner),
            value: self.state.volume * 100.0,
        });
        cmds
    }
}

/// `m:ss`, or `h:mm:ss` past an hour.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0).floor() as u64 } else { 0 };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_duration(d: f64) -> PlaybackController {
        let mut p = PlaybackController::new();
        p.on_loaded_metadata(d);
        p
    }

    #[test]
    fn test_progress_zero_without_duration() {
        let mut p = PlaybackController::new();
        p.on_time_update(12.0);
        assert_eq!(p.progress_percent(), 0.0);
        assert_eq!(p.seek(50.0), None);
        assert_eq!(p.state().current_time_seconds, 12.0);
    }

    #[test]
    fn test_progress_tracks_time() {
        let mut p = with_duration(120.0);
        for (t, expected) in [(0.0, 0.0), (30.0, 25.0), (59.6, 50.0), (119.9, 100.0), (120.0, 100.0)] {
            p.on_time_update(t);
            assert_eq!(p.progress_percent(), expected, "t = {}", t);
        }
    }

    #[test]
    fn test_state_progress_matches_controller() {
        let mut p = with_duration(200.0);
        p.on_time_update(33.3);
        let state = p.state();
        assert_eq!(state.progress_percent(), 17.0);
        assert_eq!(state.progress_percent(), p.progress_percent());

        assert_eq!(PlaybackState::default().progress_percent(), 0.0);
    }

    #[test]
    fn test_seek_maps_linearly() {
        let mut p = with_duration(120.0);
        assert_eq!(p.seek(25.0), Some(30.0));
        assert_eq!(p.seek(150.0), Some(120.0));
        assert_eq!(p.seek(-5.0), Some(0.0));
        assert_eq!(p.state().current_time_seconds, 0.0);
    }

    #[test]
    fn test_toggle_and_end() {
        let mut p = with_duration(10.0);
        assert!(p.toggle());
        p.on_time_update(10.0);
        p.on_ended();
        assert!(!p.state().is_playing);
        assert_eq!(p.state().current_time_seconds, 10.0);

        assert!(p.toggle());
        assert_eq!(p.state().current_time_seconds, 0.0);
        assert!(!p.toggle());
    }

    #[test]
    fn test_volume_is_independent_and_clamped() {
        let mut p = with_duration(10.0);
        p.toggle();
        assert!(p.set_volume(0.25));
        assert!(p.state().is_playing);
        p.set_volume(3.0);
        assert_eq!(p.state().volume, 1.0);
        p.set_volume(-1.0);
        assert_eq!(p.state().volume, 0.0);
        assert!(!p.set_volume(f64::NAN));
    }

    #[test]
    fn test_visibility_window() {
        let mut p = with_duration(120.0);
        p.on_time_update(59.4);
        assert!(!p.is_near(60.0));
        p.on_time_update(59.6);
        assert!(p.is_near(60.0));
        p.on_time_update(60.6);
        assert!(!p.is_near(60.0));
    }

    #[test]
    fn test_controls_show_progress_slider() {
        let mut p = with_duration(100.0);
        p.on_time_update(42.4);
        let cmds = p.controls(&RendererConfiguration::new(640.0, 360.0));
        let sliders: Vec<f64> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Slider { value, .. } => Some(*value),
                _ => None,
            })
            .collect();
        assert_eq!(sliders, vec![42.0, 100.0]);
        assert!(cmds.iter().any(|c| matches!(c, DrawCommand::Button { label, .. } if label == "Play")));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(61.9), "1:01");
        assert_eq!(format_time(3725.0), "1:02:05");
        assert_eq!(format_time(f64::NAN), "0:00");
    }
}
