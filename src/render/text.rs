// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Plain text, markdown and JSON.
//!
//! Content is laid out line by line on a scrollable surface. Annotation
//! marks sit at their literal surface coordinates and do not follow the
//! scroll offset.

use crate::config::RendererConfiguration;
use crate::error::LoadError;
use crate::io::source::LoadedContent;
use crate::models::annotation::{Annotation, Shape};
use crate::models::file::{FileDescriptor, MediaKind};
use crate::surface::{Color, DrawCommand, TextStyle};
use crate::util::geometry::{Pos, Rect, Transform};

use super::host::{Variant, VariantRenderer};
use super::marks::{spatial_mark, MarkStyle};
use super::InputEvent;

pub(crate) const PADDING: f64 = 16.0;
pub(crate) const LINE_HEIGHT: f64 = 18.0;

pub type TextRenderer = VariantRenderer<TextView>;

#[derive(Debug, Default)]
pub struct TextView {
    lines: Vec<String>,
    scroll_y: f64,
}

impl TextView {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_y
    }

    fn content_height(&self) -> f64 {
        2.0 * PADDING + self.lines.len() as f64 * LINE_HEIGHT
    }
}

/// Pretty-print JSON with two-space indentation, or `None` if it does not parse.
pub fn pretty_json(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

/// Decode UTF-8, dropping a leading byte order mark.
pub(crate) fn decode_utf8(file: &FileDescriptor, bytes: Vec<u8>) -> Result<String, LoadError> {
    let text = String::from_utf8(bytes).map_err(|e| LoadError::decode(&file.name, e))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Clamp a scroll offset so the content never scrolls past its end.
pub(crate) fn clamp_scroll(offset: f64, content_height: f64, surface_height: f64) -> f64 {
    offset.clamp(0.0, (content_height - surface_height).max(0.0))
}

impl Variant for TextView {
    const KIND: MediaKind = MediaKind::Text;

    fn decode(
        &mut self,
        file: &FileDescriptor,
        content: LoadedContent,
        _config: &RendererConfiguration,
    ) -> Result<(), LoadError> {
        let mut text = decode_utf8(file, content.bytes)?;
        if file.extension().as_deref() == Some("json") {
            match pretty_json(&text) {
                Some(pretty) => text = pretty,
                None => log::warn!("{} is not valid JSON, showing it verbatim", file.name),
            }
        }
        self.lines = text.lines().map(|l| l.replace('\t', "    ")).collect();
        self.scroll_y = 0.0;
        Ok(())
    }

    fn paint_base(&self, config: &RendererConfiguration) -> Vec<DrawCommand> {
        let mut cmds = vec![DrawCommand::Fill {
            rect: Rect::from_size(config.surface_size()),
            color: config.background(Color::PANEL),
        }];
        let style = TextStyle::mono(Color::rgb(220, 220, 220));
        for (i, line) in self.lines.iter().enumerate() {
            let y = PADDING + i as f64 * LINE_HEIGHT - self.scroll_y;
            if y < -LINE_HEIGHT {
                continue;
            }
            if y > config.surface_height {
                break;
            }
            cmds.push(DrawCommand::Text {
                pos: Pos::new(PADDING, y),
                text: line.clone(),
                style,
            });
        }
        cmds
    }

    fn paint_mark(
        &self,
        annotation: &Annotation,
        shape: &Shape,
        _config: &RendererConfiguration,
        style: &MarkStyle,
    ) -> Vec<DrawCommand> {
        spatial_mark(shape, &annotation.label, &Transform::IDENTITY, style)
    }

    fn handle_input(&mut self, event: &InputEvent, config: &RendererConfiguration) -> bool {
        match *event {
            InputEvent::Scroll { delta_y } if delta_y.is_finite() => {
                let next = clamp_scroll(self.scroll_y + delta_y, self.content_height(), config.surface_height);
                let changed = next != self.scroll_y;
                self.scroll_y = next;
                changed
            }
            _ => false,
        }
    }

    fn resized(&mut self, config: &RendererConfiguration) {
        self.scroll_y = clamp_scroll(self.scroll_y, self.content_height(), config.surface_height);
    }

    fn content_point(&self, screen: Pos, _config: &RendererConfiguration) -> Option<Pos> {
        Some(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{AnnotationKind, Position};

    fn load(name: &str, body: &str) -> TextView {
        let file = FileDescriptor::new("t1", name, MediaKind::Text, name);
        let mut view = TextView::default();
        view.decode(&file, LoadedContent::bytes(body.as_bytes().to_vec()), &RendererConfiguration::default())
            .unwrap();
        view
    }

    #[test]
    fn test_json_is_pretty_printed() {
        let view = load("data.json", r#"{"a":1,"b":[true]}"#);
        assert_eq!(view.lines(), ["{", "  \"a\": 1,", "  \"b\": [", "    true", "  ]", "}"]);
    }

    #[test]
    fn test_invalid_json_shown_verbatim() {
        let view = load("broken.json", "{not json");
        assert_eq!(view.lines(), ["{not json"]);
    }

    #[test]
    fn test_markdown_kept_as_is() {
        let view = load("notes.md", "# Title\n\n- item\n");
        assert_eq!(view.lines(), ["# Title", "", "- item"]);
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let file = FileDescriptor::new("t1", "a.txt", MediaKind::Text, "a.txt");
        let err = TextView::default()
            .decode(&file, LoadedContent::bytes(vec![0xff, 0xfe, 0x00]), &RendererConfiguration::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn test_scroll_moves_text_but_not_marks() {
        let body: String = (0..100).map(|i| format!("line {}\n", i)).collect();
        let mut view = load("long.txt", &body);
        let config = RendererConfiguration::new(400.0, 300.0);

        assert!(view.handle_input(&InputEvent::Scroll { delta_y: 40.0 }, &config));
        let first_text = view.paint_base(&config).into_iter().find_map(|c| match c {
            DrawCommand::Text { pos, .. } => Some(pos),
            _ => None,
        });
        assert!(first_text.unwrap().y < PADDING);

        let a = Annotation::new("a", "t1", AnnotationKind::Point, Position::point(30.0, 40.0));
        let cmds = view.paint_mark(&a, &a.shape().unwrap(), &config, &MarkStyle::default());
        assert!(matches!(cmds[0], DrawCommand::Circle { center, .. } if center == Pos::new(30.0, 40.0)));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut view = load("short.txt", "one\ntwo\n");
        let config = RendererConfiguration::new(400.0, 300.0);
        assert!(!view.handle_input(&InputEvent::Scroll { delta_y: 500.0 }, &config));
        assert_eq!(view.scroll_offset(), 0.0);
    }
}
