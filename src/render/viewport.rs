// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom and pan state for spatially transformable media.

use crate::util::geometry::{fit_transform, Pos, Size, Transform};

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;

/// Scale multiplier for one wheel tick towards the user.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Scale multiplier for one wheel tick away from the user.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Scale and offset mapping content pixels onto the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewportState {
    pub fn transform(&self) -> Transform {
        Transform::uniform(self.scale, self.offset_x, self.offset_y)
    }
}

/// Owns the [`ViewportState`] of one image and applies wheel and drag input.
#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState,
    content: Size,
    last_pointer: Option<Pos>,
}

impl ViewportController {
    /// Start fitted to `surface`.
    pub fn new(content: Size, surface: Size) -> Self {
        let mut controller = Self {
            state: ViewportState {
                scale: 1.0,
                offset_x: 0.0,
                offset_y: 0.0,
            },
            content,
            last_pointer: None,
        };
        controller.reset_view(surface);
        controller
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn transform(&self) -> Transform {
        self.state.transform()
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    /// Discard pan and zoom and fit the content into `surface` again.
    ///
    /// The fitted scale never exceeds 1 and is not subject to the zoom clamp.
    pub fn reset_view(&mut self, surface: Size) {
        let t = fit_transform(self.content, surface);
        self.state = ViewportState {
            scale: t.scale_x,
            offset_x: t.offset_x,
            offset_y: t.offset_y,
        };
        self.last_pointer = None;
    }

    /// Zoom one tick, keeping the content point under `cursor` fixed.
    pub fn on_wheel(&mut self, delta_y: f64, cursor: Pos) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return false;
        }
        if !(self.state.scale.is_finite() && self.state.scale > 0.0) {
            return false;
        }
        let factor = if delta_y > 0.0 { ZOOM_OUT_FACTOR } else { ZOOM_IN_FACTOR };
        let scale = (self.state.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if scale == self.state.scale {
            return false;
        }

        let anchor = self.transform().to_content(cursor);
        let (offset_x, offset_y) = (cursor.x - anchor.x * scale, cursor.y - anchor.y * scale);
        if !(offset_x.is_finite() && offset_y.is_finite()) {
            return false;
        }
        self.state = ViewportState {
            scale,
            offset_x,
            offset_y,
        };
        true
    }

    pub fn on_pointer_down(&mut self, pos: Pos) {
        self.last_pointer = Some(pos);
    }

    /// Pan by the pointer delta while a drag is active.
    pub fn on_pointer_move(&mut self, pos: Pos) -> bool {
        let Some(last) = self.last_pointer else {
            return false;
        };
        let (dx, dy) = (pos.x - last.x, pos.y - last.y);
        self.last_pointer = Some(pos);
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.state.offset_x += dx;
        self.state.offset_y += dy;
        true
    }

    /// Pointer released or left the surface.
    pub fn end_drag(&mut self) {
        self.last_pointer = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last_pointer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn controller(img: (f64, f64), surface: (f64, f64)) -> ViewportController {
        ViewportController::new(Size::new(img.0, img.1), Size::new(surface.0, surface.1))
    }

    #[test]
    fn test_fit_same_size() {
        let v = controller((800.0, 600.0), (800.0, 600.0));
        assert_eq!(
            v.state(),
            ViewportState {
                scale: 1.0,
                offset_x: 0.0,
                offset_y: 0.0
            }
        );
    }

    #[test]
    fn test_fit_downscales_large_image() {
        let v = controller((1600.0, 1200.0), (400.0, 300.0));
        assert_eq!(v.state().scale, 0.25);
        assert_eq!(v.state().offset_x, 0.0);
        assert_eq!(v.state().offset_y, 0.0);
    }

    #[test]
    fn test_fit_centers_small_image() {
        let v = controller((200.0, 100.0), (800.0, 600.0));
        assert_eq!(v.state().scale, 1.0);
        assert_eq!(v.state().offset_x, 300.0);
        assert_eq!(v.state().offset_y, 250.0);
    }

    #[test]
    fn test_wheel_keeps_point_under_cursor() {
        let mut v = controller((1600.0, 1200.0), (400.0, 300.0));
        let cursor = Pos::new(123.0, 77.0);

        for delta in [-1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0] {
            let before = v.transform().to_content(cursor);
            v.on_wheel(delta, cursor);
            let after = v.transform().to_screen(before);
            assert!((after.x - cursor.x).abs() < EPS);
            assert!((after.y - cursor.y).abs() < EPS);
        }
    }

    #[test]
    fn test_wheel_direction_and_factor() {
        let mut v = controller((800.0, 600.0), (800.0, 600.0));
        v.on_wheel(-3.0, Pos::new(0.0, 0.0));
        assert!((v.state().scale - 1.1).abs() < EPS);
        v.on_wheel(3.0, Pos::new(0.0, 0.0));
        assert!((v.state().scale - 0.99).abs() < EPS);
        assert!(!v.on_wheel(0.0, Pos::new(0.0, 0.0)));
    }

    #[test]
    fn test_wheel_clamps_scale() {
        let mut v = controller((800.0, 600.0), (800.0, 600.0));
        for _ in 0..100 {
            v.on_wheel(-1.0, Pos::new(400.0, 300.0));
        }
        assert_eq!(v.state().scale, MAX_SCALE);
        assert!(!v.on_wheel(-1.0, Pos::new(400.0, 300.0)));

        for _ in 0..200 {
            v.on_wheel(1.0, Pos::new(400.0, 300.0));
        }
        assert_eq!(v.state().scale, MIN_SCALE);
    }

    #[test]
    fn test_wheel_on_empty_surface_stays_finite() {
        let mut v = controller((100.0, 100.0), (0.0, 0.0));
        assert_eq!(v.state().scale, 1.0);

        assert!(v.on_wheel(-1.0, Pos::new(5.0, 5.0)));
        let s = v.state();
        assert!((s.scale - 1.1).abs() < EPS);
        assert!(s.offset_x.is_finite() && s.offset_y.is_finite());

        v.on_pointer_down(Pos::new(0.0, 0.0));
        v.on_pointer_move(Pos::new(3.0, 4.0));
        assert!(v.state().offset_x.is_finite());
    }

    #[test]
    fn test_wheel_rejects_non_finite_cursor() {
        let mut v = controller((800.0, 600.0), (800.0, 600.0));
        let before = v.state();
        assert!(!v.on_wheel(-1.0, Pos::new(f64::NAN, 10.0)));
        assert!(!v.on_wheel(-1.0, Pos::new(f64::INFINITY, 10.0)));
        assert_eq!(v.state(), before);
    }

    #[test]
    fn test_drag_pans_by_delta() {
        let mut v = controller((800.0, 600.0), (800.0, 600.0));
        assert!(!v.on_pointer_move(Pos::new(10.0, 10.0)));

        v.on_pointer_down(Pos::new(10.0, 10.0));
        assert!(v.on_pointer_move(Pos::new(30.0, 5.0)));
        assert!(v.on_pointer_move(Pos::new(35.0, 5.0)));
        v.end_drag();
        assert!(!v.on_pointer_move(Pos::new(100.0, 100.0)));

        assert_eq!(v.state().offset_x, 25.0);
        assert_eq!(v.state().offset_y, -5.0);
    }

    #[test]
    fn test_reset_view_discards_pan_and_zoom() {
        let mut v = controller((1600.0, 1200.0), (400.0, 300.0));
        v.on_wheel(-1.0, Pos::new(50.0, 50.0));
        v.on_pointer_down(Pos::new(0.0, 0.0));
        v.on_pointer_move(Pos::new(40.0, 40.0));

        v.reset_view(Size::new(400.0, 300.0));
        assert_eq!(v.state().scale, 0.25);
        assert_eq!(v.state().offset_x, 0.0);
        assert!(!v.is_dragging());
    }
}
