// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing of annotation marks.

use crate::models::annotation::Shape;
use crate::surface::{Color, DrawCommand, Stroke, TextStyle};
use crate::util::geometry::{Pos, Transform};

use super::playback::format_time;

const VERTEX_RADIUS: f64 = 4.0;
const LABEL_GAP: f64 = 6.0;

/// Colors used for annotation marks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkStyle {
    pub stroke: Color,
    pub label: Color,
}

impl Default for MarkStyle {
    fn default() -> Self {
        Self {
            stroke: Color::YELLOW,
            label: Color::WHITE,
        }
    }
}

impl MarkStyle {
    fn line(&self) -> Stroke {
        Stroke::new(2.0, self.stroke)
    }

    fn label_at(&self, pos: Pos, text: &str) -> Option<DrawCommand> {
        (!text.is_empty()).then(|| DrawCommand::Text {
            pos,
            text: text.to_string(),
            style: TextStyle::body(self.label),
        })
    }

    fn vertex(&self, center: Pos) -> DrawCommand {
        DrawCommand::Circle {
            center,
            radius: VERTEX_RADIUS,
            fill: self.stroke,
            stroke: Stroke::new(1.0, Color::BLACK),
        }
    }
}

/// Commands for a spatial shape placed through `transform`.
///
/// Timestamp shapes have no spatial extent and produce nothing.
pub(crate) fn spatial_mark(shape: &Shape, label: &str, transform: &Transform, style: &MarkStyle) -> Vec<DrawCommand> {
    let mut cmds = Vec::new();
    match shape {
        Shape::Point(p) => {
            let at = transform.to_screen(*p);
            cmds.push(style.vertex(at));
            cmds.extend(style.label_at(Pos::new(at.x + LABEL_GAP, at.y - 2.0 * LABEL_GAP), label));
        }
        Shape::Rectangle(r) => {
            let rect = transform.map_rect(*r);
            cmds.push(DrawCommand::StrokeRect {
                rect,
                stroke: style.line(),
            });
            cmds.extend(style.label_at(Pos::new(rect.x, rect.y - 3.0 * LABEL_GAP), label));
        }
        Shape::Polygon(points) => {
            let screen: Vec<Pos> = points.iter().map(|p| transform.to_screen(*p)).collect();
            let Some(&first) = screen.first() else {
                return cmds;
            };
            cmds.push(DrawCommand::Path {
                points: screen.clone(),
                closed: true,
                stroke: style.line(),
            });
            cmds.extend(screen.into_iter().map(|p| style.vertex(p)));
            cmds.extend(style.label_at(Pos::new(first.x + LABEL_GAP, first.y - 2.0 * LABEL_GAP), label));
        }
        Shape::Text(p) => {
            let at = transform.to_screen(*p);
            let text = if label.is_empty() { "\u{00b6}" } else { label };
            cmds.push(DrawCommand::Text {
                pos: at,
                text: text.to_string(),
                style: TextStyle::body(style.stroke),
            });
        }
        Shape::Timestamp(_) => {}
    }
    cmds
}

/// Vertical marker at `x` spanning `[top, top + height]` with a time label.
pub(crate) fn timestamp_mark(x: f64, top: f64, height: f64, t: f64, label: &str, style: &MarkStyle) -> Vec<DrawCommand> {
    let text = if label.is_empty() {
        format_time(t)
    } else {
        format!("{} ({})", label, format_time(t))
    };
    vec![
        DrawCommand::Line {
            from: Pos::new(x, top),
            to: Pos::new(x, top + height),
            stroke: style.line(),
        },
        DrawCommand::Text {
            pos: Pos::new(x + LABEL_GAP, top + LABEL_GAP),
            text,
            style: TextStyle::body(style.label),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::geometry::Rect;

    #[test]
    fn test_rectangle_goes_through_transform() {
        let t = Transform::uniform(0.5, 10.0, 20.0);
        let cmds = spatial_mark(
            &Shape::Rectangle(Rect::new(100.0, 100.0, 40.0, 20.0)),
            "",
            &t,
            &MarkStyle::default(),
        );
        assert_eq!(cmds.len(), 1);
        match &cmds[0] {
            DrawCommand::StrokeRect { rect, .. } => {
                assert_eq!(*rect, Rect::new(60.0, 70.0, 20.0, 10.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_polygon_closed_with_vertices() {
        let tri = vec![Pos::new(0.0, 0.0), Pos::new(10.0, 0.0), Pos::new(0.0, 10.0)];
        let cmds = spatial_mark(&Shape::Polygon(tri), "roi", &Transform::IDENTITY, &MarkStyle::default());
        assert!(matches!(&cmds[0], DrawCommand::Path { closed: true, points, .. } if points.len() == 3));
        let circles = cmds.iter().filter(|c| matches!(c, DrawCommand::Circle { .. })).count();
        assert_eq!(circles, 3);
        assert!(matches!(cmds.last(), Some(DrawCommand::Text { text, .. }) if text == "roi"));
    }

    #[test]
    fn test_empty_polygon_draws_nothing() {
        let cmds = spatial_mark(&Shape::Polygon(Vec::new()), "roi", &Transform::IDENTITY, &MarkStyle::default());
        assert!(cmds.is_empty());
    }

    #[test]
    fn test_timestamp_has_no_spatial_mark() {
        let cmds = spatial_mark(&Shape::Timestamp(3.0), "x", &Transform::IDENTITY, &MarkStyle::default());
        assert!(cmds.is_empty());
    }

    #[test]
    fn test_timestamp_mark_label() {
        let cmds = timestamp_mark(50.0, 0.0, 100.0, 65.0, "intro", &MarkStyle::default());
        assert!(matches!(&cmds[1], DrawCommand::Text { text, .. } if text == "intro (1:05)"));
    }
}
