// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the rendered scene.
//!
//! This module paints the draw commands recorded in a [`Scene`] with the
//! egui painter and turns mouse interaction into renderer input events or
//! annotation placement requests.

use std::collections::HashMap;

use mars::render::InputEvent;
use mars::surface::{Color, DrawCommand, MediaFrameKind, Scene, TextStyle};
use mars::util::geometry::{Pos, Rect};

use crate::app::Tool;

/// Result of canvas interaction.
pub enum CanvasAction {
    Input(InputEvent),
    /// The canvas area changed size.
    Resize(f64, f64),
    /// Place a point at a surface position.
    PlacePoint(Pos),
    /// Place a rectangle spanning two surface positions.
    PlaceRectangle(Pos, Pos),
}

/// Textures uploaded for image commands, keyed by image key.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, egui::TextureHandle>,
}

impl TextureCache {
    pub fn clear(&mut self) {
        self.textures.clear();
    }

    fn get(&mut self, ctx: &egui::Context, image: &mars::surface::ImageData) -> egui::TextureId {
        self.textures
            .entry(image.key.clone())
            .or_insert_with(|| {
                let size = [image.width as usize, image.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &image.pixels);
                ctx.load_texture(image.key.clone(), color_image, egui::TextureOptions::LINEAR)
            })
            .id()
    }
}

/// Pointer state carried between frames.
#[derive(Default)]
pub struct CanvasState {
    /// Start of a rectangle drag, in surface coordinates.
    drag_start: Option<Pos>,
    /// A pan drag has left the canvas.
    left: bool,
}

/// Display the canvas and collect what the user did on it.
pub fn show(
    ui: &mut egui::Ui,
    scene: &Scene,
    surface_size: (f64, f64),
    textures: &mut TextureCache,
    state: &mut CanvasState,
    tool: Tool,
) -> Vec<CanvasAction> {
    let mut actions = Vec::new();
    let available = ui.available_size();
    let (rect, response) = ui.allocate_exact_size(available, egui::Sense::click_and_drag());

    let (w, h) = (rect.width() as f64, rect.height() as f64);
    if w > 0.0 && h > 0.0 && ((w - surface_size.0).abs() > 0.5 || (h - surface_size.1).abs() > 0.5) {
        actions.push(CanvasAction::Resize(w, h));
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(40));
    for cmd in scene.paint_order() {
        paint_command(&painter, ui.ctx(), rect.min, textures, cmd);
    }

    let to_surface = |p: egui::Pos2| Pos::new((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64);

    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            // egui reports wheel-up as positive; renderers expect DOM-style deltas.
            let delta_y = -scroll as f64;
            if let Some(cursor) = response.hover_pos() {
                actions.push(CanvasAction::Input(InputEvent::Wheel {
                    delta_y,
                    cursor: to_surface(cursor),
                }));
            }
            actions.push(CanvasAction::Input(InputEvent::Scroll { delta_y }));
        }
    }

    match tool {
        Tool::Pan => {
            if response.drag_started() {
                if let Some(pos) = response.interact_pointer_pos() {
                    actions.push(CanvasAction::Input(InputEvent::PointerDown(to_surface(pos))));
                }
            } else if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    actions.push(CanvasAction::Input(InputEvent::PointerMove(to_surface(pos))));
                }
            }
            if response.drag_stopped() {
                actions.push(CanvasAction::Input(InputEvent::PointerUp));
            }
        }
        Tool::Point => {
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    actions.push(CanvasAction::PlacePoint(to_surface(pos)));
                }
            }
        }
        Tool::Rectangle => {
            if response.drag_started() {
                state.drag_start = response.interact_pointer_pos().map(to_surface);
            }
            if let (Some(start), Some(now)) = (state.drag_start, response.interact_pointer_pos()) {
                let a = rect.min + egui::vec2(start.x as f32, start.y as f32);
                painter.rect_stroke(
                    egui::Rect::from_two_pos(a, now),
                    0.0,
                    egui::Stroke::new(1.5, egui::Color32::LIGHT_BLUE),
                );
            }
            if response.drag_stopped() {
                if let (Some(start), Some(end)) = (state.drag_start.take(), response.interact_pointer_pos()) {
                    actions.push(CanvasAction::PlaceRectangle(start, to_surface(end)));
                }
            }
        }
    }

    if tool == Tool::Pan && response.dragged() && !response.contains_pointer() {
        if !state.left {
            state.left = true;
            actions.push(CanvasAction::Input(InputEvent::PointerLeave));
        }
    } else {
        state.left = false;
    }

    actions
}

/// Welcome message shown when nothing is open.
pub fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("MARS")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Media Annotation Rendering System")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open a text, table, image, audio or video file to begin")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}

fn color32(c: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

fn stroke(s: mars::surface::Stroke) -> egui::Stroke {
    egui::Stroke::new(s.width as f32, color32(s.color))
}

fn font(style: &TextStyle) -> egui::FontId {
    if style.monospace {
        egui::FontId::monospace(style.size as f32)
    } else {
        egui::FontId::proportional(style.size as f32)
    }
}

fn paint_command(
    painter: &egui::Painter,
    ctx: &egui::Context,
    origin: egui::Pos2,
    textures: &mut TextureCache,
    cmd: &DrawCommand,
) {
    let pos = |p: Pos| origin + egui::vec2(p.x as f32, p.y as f32);
    let rect = |r: Rect| egui::Rect::from_min_size(pos(Pos::new(r.x, r.y)), egui::vec2(r.width as f32, r.height as f32));

    match cmd {
        DrawCommand::Fill { rect: r, color } => {
            painter.rect_filled(rect(*r), 0.0, color32(*color));
        }
        DrawCommand::Image { image, rect: r } => {
            let id = textures.get(ctx, image);
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(id, rect(*r), uv, egui::Color32::WHITE);
        }
        DrawCommand::MediaFrame { kind, rect: r, time } => {
            let r = rect(*r);
            painter.rect_filled(r, 0.0, egui::Color32::from_gray(16));
            let glyph = match kind {
                MediaFrameKind::Audio => "♪",
                MediaFrameKind::Video => "🎞",
            };
            painter.text(
                r.center(),
                egui::Align2::CENTER_CENTER,
                format!("{} {}", glyph, mars::render::format_time(*time)),
                egui::FontId::proportional(20.0),
                egui::Color32::from_gray(120),
            );
        }
        DrawCommand::Text { pos: p, text, style } => {
            painter.text(pos(*p), egui::Align2::LEFT_TOP, text, font(style), color32(style.color));
        }
        DrawCommand::StrokeRect { rect: r, stroke: s } => {
            painter.rect_stroke(rect(*r), 0.0, stroke(*s));
        }
        DrawCommand::Circle {
            center,
            radius,
            fill,
            stroke: s,
        } => {
            painter.circle(pos(*center), *radius as f32, color32(*fill), stroke(*s));
        }
        DrawCommand::Path {
            points,
            closed,
            stroke: s,
        } => {
            let points: Vec<egui::Pos2> = points.iter().map(|p| pos(*p)).collect();
            let shape = if *closed {
                egui::Shape::closed_line(points, stroke(*s))
            } else {
                egui::Shape::line(points, stroke(*s))
            };
            painter.add(shape);
        }
        DrawCommand::Line { from, to, stroke: s } => {
            painter.line_segment([pos(*from), pos(*to)], stroke(*s));
        }
        DrawCommand::Slider { rect: r, value } => {
            let r = rect(*r);
            painter.rect_filled(r, 2.0, egui::Color32::from_gray(70));
            let filled = r.width() * (*value as f32 / 100.0).clamp(0.0, 1.0);
            painter.rect_filled(
                egui::Rect::from_min_size(r.min, egui::vec2(filled, r.height())),
                2.0,
                egui::Color32::LIGHT_BLUE,
            );
        }
        DrawCommand::Button { rect: r, label } => {
            let r = rect(*r);
            painter.rect_filled(r, 3.0, egui::Color32::from_gray(60));
            painter.text(
                r.center(),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(13.0),
                egui::Color32::WHITE,
            );
        }
    }
}
