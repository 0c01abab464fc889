// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate transforms between content space
//! (image pixels, native video pixels, media time) and surface space.

use serde::{Deserialize, Serialize};

/// A 2D position in either content or surface coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pos {
    pub x: f64,
    pub y: f64,
}

impl Pos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a surface or piece of content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative or not finite.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn min(&self) -> Pos {
        Pos::new(self.x, self.y)
    }

    pub fn max(&self) -> Pos {
        Pos::new(self.x + self.width, self.y + self.height)
    }

    pub fn contains(&self, p: Pos) -> bool {
        p.x >= self.x && p.y >= self.y && p.x <= self.x + self.width && p.y <= self.y + self.height
    }
}

/// Scale followed by translation: `screen = content * scale + offset`.
///
/// Image viewports use equal scales on both axes; video overlays stretch the
/// native frame to the overlay and may scale each axis differently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale_x: 1.0,
        scale_y: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// Uniform scale with an offset, as used by the image viewport.
    pub fn uniform(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            offset_x,
            offset_y,
        }
    }

    /// Stretch `native` onto `target` with no offset.
    ///
    /// Returns `None` while the native size is unknown.
    pub fn stretch(native: Size, target: Size) -> Option<Self> {
        if native.is_empty() {
            return None;
        }
        Some(Self {
            scale_x: target.width / native.width,
            scale_y: target.height / native.height,
            offset_x: 0.0,
            offset_y: 0.0,
        })
    }

    /// Map a content position to surface coordinates.
    pub fn to_screen(&self, p: Pos) -> Pos {
        Pos::new(p.x * self.scale_x + self.offset_x, p.y * self.scale_y + self.offset_y)
    }

    /// Map a surface position back to content coordinates.
    pub fn to_content(&self, p: Pos) -> Pos {
        Pos::new(
            (p.x - self.offset_x) / self.scale_x,
            (p.y - self.offset_y) / self.scale_y,
        )
    }

    /// Map a content rectangle to surface coordinates.
    pub fn map_rect(&self, r: Rect) -> Rect {
        let min = self.to_screen(r.min());
        Rect::new(min.x, min.y, r.width * self.scale_x, r.height * self.scale_y)
    }
}

/// Largest scale that fits `content` inside `surface` without upscaling.
pub fn fit_scale(content: Size, surface: Size) -> f64 {
    if content.is_empty() || surface.is_empty() {
        return 1.0;
    }
    (surface.width / content.width)
        .min(surface.height / content.height)
        .min(1.0)
}

/// Fit-to-container transform: scaled by [`fit_scale`] and centered.
pub fn fit_transform(content: Size, surface: Size) -> Transform {
    let scale = fit_scale(content, surface);
    Transform::uniform(
        scale,
        (surface.width - content.width * scale) / 2.0,
        (surface.height - content.height * scale) / 2.0,
    )
}

/// Horizontal position of media time `t` on a track `width` pixels wide.
///
/// Unknown durations pin every time to the left edge.
pub fn time_to_x(t: f64, duration: f64, width: f64) -> f64 {
    if !(duration.is_finite() && duration > 0.0) {
        return 0.0;
    }
    (t / duration).clamp(0.0, 1.0) * width
}
