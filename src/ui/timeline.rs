// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback timeline for audio and video.
//!
//! This module provides the play/pause button, the seek scrubber and the
//! volume slider. Every interaction becomes an input event for the renderer.

use mars::render::{format_time, InputEvent, PlaybackState};

/// Display the timeline and return the events the user triggered.
pub fn show(ui: &mut egui::Ui, state: PlaybackState) -> Vec<InputEvent> {
    let mut events = Vec::new();

    ui.horizontal(|ui| {
        let label = if state.is_playing { "⏸ Pause" } else { "▶ Play" };
        if ui.button(label).clicked() {
            events.push(InputEvent::TogglePlayback);
        }

        let mut percent = state.progress_percent();
        let scrubber = ui.add_enabled(
            state.has_duration(),
            egui::Slider::new(&mut percent, 0.0..=100.0).show_value(false),
        );
        if scrubber.changed() {
            events.push(InputEvent::Seek(percent));
        }

        ui.label(format!(
            "{} / {}",
            format_time(state.current_time_seconds),
            format_time(state.duration_seconds)
        ));

        ui.separator();

        let mut volume = state.volume;
        ui.label("🔊");
        if ui
            .add(egui::Slider::new(&mut volume, 0.0..=1.0).show_value(false))
            .changed()
        {
            events.push(InputEvent::SetVolume(volume));
        }
    });

    events
}
