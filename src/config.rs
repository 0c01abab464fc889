// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration structures.
//!
//! [`RendererConfiguration`] is handed to a renderer once at construction and
//! afterwards only changes through `resize`. [`ViewerConfig`] wraps it with
//! the settings of the desktop host and can be read from YAML or JSON.

use serde::{Deserialize, Serialize};

use crate::surface::Color;
use crate::util::geometry::Size;

/// Height of the playback controls strip when controls are shown.
pub const CONTROLS_HEIGHT: f64 = 40.0;

/// Per-renderer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererConfiguration {
    pub surface_width: f64,
    pub surface_height: f64,
    /// `#rrggbb` or `#rrggbbaa`.
    pub background_color: Option<String>,
    /// When false, wheel and drag input is ignored.
    pub interactive: bool,
    /// Paint playback controls for audio and video.
    pub show_controls: bool,
}

impl Default for RendererConfiguration {
    fn default() -> Self {
        Self {
            surface_width: 800.0,
            surface_height: 600.0,
            background_color: None,
            interactive: true,
            show_controls: true,
        }
    }
}

impl RendererConfiguration {
    pub fn new(surface_width: f64, surface_height: f64) -> Self {
        Self {
            surface_width,
            surface_height,
            ..Default::default()
        }
    }

    pub fn surface_size(&self) -> Size {
        Size::new(self.surface_width, self.surface_height)
    }

    /// Parsed background color, falling back to `default` when unset or invalid.
    pub fn background(&self, default: Color) -> Color {
        match self.background_color.as_deref() {
            None => default,
            Some(raw) => Color::from_hex(raw).unwrap_or_else(|| {
                log::warn!("Ignoring invalid background color {:?}", raw);
                default
            }),
        }
    }

    /// Height left for media once the controls strip is reserved.
    pub fn media_height(&self) -> f64 {
        if self.show_controls {
            (self.surface_height - CONTROLS_HEIGHT).max(0.0)
        } else {
            self.surface_height
        }
    }
}

/// Settings for the desktop viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub renderer: RendererConfiguration,
    /// Ask `ffprobe` for audio/video duration and frame size.
    pub probe_media: bool,
    /// Stroke color for annotation marks.
    pub annotation_color: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            renderer: RendererConfiguration {
                show_controls: false,
                ..Default::default()
            },
            probe_media: true,
            annotation_color: "#ffff00".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let cfg: RendererConfiguration = serde_json::from_str(r#"{"surfaceWidth": 400}"#).unwrap();
        assert_eq!(cfg.surface_width, 400.0);
        assert_eq!(cfg.surface_height, 600.0);
        assert!(cfg.interactive);
        assert!(cfg.show_controls);
    }

    #[test]
    fn test_background_fallback() {
        let mut cfg = RendererConfiguration::default();
        assert_eq!(cfg.background(Color::BLACK), Color::BLACK);

        cfg.background_color = Some("#102030".to_string());
        assert_eq!(cfg.background(Color::BLACK), Color::rgb(0x10, 0x20, 0x30));

        cfg.background_color = Some("teal".to_string());
        assert_eq!(cfg.background(Color::BLACK), Color::BLACK);
    }

    #[test]
    fn test_media_height_reserves_controls() {
        let mut cfg = RendererConfiguration::new(640.0, 400.0);
        assert_eq!(cfg.media_height(), 360.0);
        cfg.show_controls = false;
        assert_eq!(cfg.media_height(), 400.0);
    }

    #[test]
    fn test_viewer_config_yaml() {
        let yaml = "renderer:\n  surfaceWidth: 1024\n  surfaceHeight: 768\nprobeMedia: false\n";
        let cfg: ViewerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.renderer.surface_width, 1024.0);
        assert!(!cfg.probe_media);
        assert_eq!(cfg.annotation_color, "#ffff00");
    }
}
