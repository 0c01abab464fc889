// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The container a renderer paints into.
//!
//! A [`Surface`] is a retained tree of nodes, one level deep, each holding a
//! list of [`DrawCommand`]s. Renderers create the nodes they need, repaint
//! them from state, and remove every one of them when destroyed. The host
//! decides how the commands reach the screen; [`Scene`] keeps them in memory
//! so they can be inspected headlessly or painted by the desktop viewer.

mod scene;

use std::sync::Arc;

pub use scene::Scene;

use crate::util::geometry::{Pos, Rect};

/// Handle to a node created on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Paint order of nodes: base content, then annotation marks, then controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Base,
    Overlay,
    Controls,
}

/// RGBA color, not premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const LIGHT_BLUE: Color = Color::rgb(140, 200, 255);
    pub const CANVAS: Color = Color::rgb(40, 40, 40);
    pub const PANEL: Color = Color::rgb(28, 28, 28);
    pub const MUTED: Color = Color::rgb(150, 150, 150);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().strip_prefix('#')?;
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

/// Outline style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: Color,
}

impl Stroke {
    pub const fn new(width: f64, color: Color) -> Self {
        Self { width, color }
    }
}

/// Text appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub monospace: bool,
    pub strong: bool,
}

impl TextStyle {
    pub const fn body(color: Color) -> Self {
        Self {
            size: 14.0,
            color,
            monospace: false,
            strong: false,
        }
    }

    pub const fn mono(color: Color) -> Self {
        Self {
            size: 13.0,
            color,
            monospace: true,
            strong: false,
        }
    }
}

/// Decoded RGBA8 pixels shared between a renderer and its surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Stable key for texture caches; the owning file id.
    pub key: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

/// Whether a media frame placeholder stands for audio or video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFrameKind {
    Audio,
    Video,
}

/// A single paint instruction in surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        rect: Rect,
        color: Color,
    },
    Image {
        image: ImageData,
        rect: Rect,
    },
    /// Region where the host composites the current media frame.
    MediaFrame {
        kind: MediaFrameKind,
        rect: Rect,
        time: f64,
    },
    Text {
        pos: Pos,
        text: String,
        style: TextStyle,
    },
    StrokeRect {
        rect: Rect,
        stroke: Stroke,
    },
    Circle {
        center: Pos,
        radius: f64,
        fill: Color,
        stroke: Stroke,
    },
    Path {
        points: Vec<Pos>,
        closed: bool,
        stroke: Stroke,
    },
    Line {
        from: Pos,
        to: Pos,
        stroke: Stroke,
    },
    /// Horizontal slider; `value` is in `[0, 100]`.
    Slider {
        rect: Rect,
        value: f64,
    },
    Button {
        rect: Rect,
        label: String,
    },
}

/// A container renderers paint into.
pub trait Surface {
    /// Create an empty node on `layer`.
    fn create_node(&mut self, layer: Layer) -> NodeId;

    /// Remove a node and everything drawn into it. Unknown ids are ignored.
    fn remove_node(&mut self, node: NodeId);

    /// Drop every command drawn into a node, keeping the node.
    fn clear_node(&mut self, node: NodeId);

    /// Append a command to a node.
    fn draw(&mut self, node: NodeId, command: DrawCommand);

    /// Number of live nodes.
    fn node_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("#ff800080"), Some(Color::rgba(255, 128, 0, 128)));
        assert_eq!(Color::from_hex("ff8000"), None);
        assert_eq!(Color::from_hex("#ff80"), None);
        assert_eq!(Color::from_hex("#gg8000"), None);
    }
}
