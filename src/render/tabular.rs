// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! CSV and TSV tables.

use crate::config::RendererConfiguration;
use crate::error::LoadError;
use crate::io::source::LoadedContent;
use crate::models::annotation::{Annotation, Shape};
use crate::models::file::{FileDescriptor, MediaKind};
use crate::surface::{Color, DrawCommand, Stroke, TextStyle};
use crate::util::geometry::{Pos, Rect, Transform};

use super::host::{Variant, VariantRenderer};
use super::marks::{spatial_mark, MarkStyle};
use super::text::{clamp_scroll, decode_utf8, PADDING};
use super::InputEvent;

const ROW_HEIGHT: f64 = 24.0;
const CELL_PADDING: f64 = 6.0;
/// Rough advance of one character at body size, used to truncate cells.
const CHAR_WIDTH: f64 = 7.5;

pub type TabularRenderer = VariantRenderer<TabularView>;

/// Header row plus data rows, all padded to the same width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn columns(&self) -> usize {
        self.header.len()
    }
}

/// Parse delimited text with RFC 4180 quoting.
///
/// The first record is the header. Short records are padded with empty
/// cells; when a record is wider than the header, the header is padded too.
pub fn parse_delimited(text: &str, delimiter: char) -> Table {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    let mut records = records.into_iter();
    let mut header = records.next().unwrap_or_default();
    let mut rows: Vec<Vec<String>> = records.collect();

    let width = rows.iter().map(Vec::len).chain(Some(header.len())).max().unwrap_or(0);
    header.resize(width, String::new());
    for row in &mut rows {
        row.resize(width, String::new());
    }
    Table { header, rows }
}

fn truncate(text: &str, width: f64) -> String {
    let max = ((width - 2.0 * CELL_PADDING) / CHAR_WIDTH).floor().max(1.0) as usize;
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
        out.push('\u{2026}');
        out
    }
}

#[derive(Debug, Default)]
pub struct TabularView {
    table: Table,
    scroll_y: f64,
}

impl TabularView {
    pub fn table(&self) -> &Table {
        &self.table
    }

    fn content_height(&self) -> f64 {
        2.0 * PADDING + (self.table.rows.len() + 1) as f64 * ROW_HEIGHT
    }
}

impl Variant for TabularView {
    const KIND: MediaKind = MediaKind::Tabular;

    fn decode(
        &mut self,
        file: &FileDescriptor,
        content: LoadedContent,
        _config: &RendererConfiguration,
    ) -> Result<(), LoadError> {
        let text = decode_utf8(file, content.bytes)?;
        let delimiter = if file.extension().as_deref() == Some("tsv") { '\t' } else { ',' };
        self.table = parse_delimited(&text, delimiter);
        self.scroll_y = 0.0;
        Ok(())
    }

    fn paint_base(&self, config: &RendererConfiguration) -> Vec<DrawCommand> {
        let surface = config.surface_size();
        let mut cmds = vec![DrawCommand::Fill {
            rect: Rect::from_size(surface),
            color: config.background(Color::PANEL),
        }];

        if self.table.columns() == 0 {
            cmds.push(DrawCommand::Text {
                pos: Pos::new(PADDING, PADDING),
                text: "No rows".to_string(),
                style: TextStyle::body(Color::MUTED),
            });
            return cmds;
        }

        let table_width = surface.width - 2.0 * PADDING;
        let cell_width = table_width / self.table.columns() as f64;
        let row_y = |index: usize| PADDING + index as f64 * ROW_HEIGHT - self.scroll_y;

        let header_y = row_y(0);
        cmds.push(DrawCommand::Fill {
            rect: Rect::new(PADDING, header_y, table_width, ROW_HEIGHT),
            color: Color::rgb(55, 55, 60),
        });
        let header_style = TextStyle {
            strong: true,
            ..TextStyle::body(Color::WHITE)
        };
        for (col, name) in self.table.header.iter().enumerate() {
            cmds.push(DrawCommand::Text {
                pos: Pos::new(PADDING + col as f64 * cell_width + CELL_PADDING, header_y + CELL_PADDING),
                text: truncate(name, cell_width),
                style: header_style,
            });
        }
        cmds.push(DrawCommand::Line {
            from: Pos::new(PADDING, header_y + ROW_HEIGHT),
            to: Pos::new(PADDING + table_width, header_y + ROW_HEIGHT),
            stroke: Stroke::new(1.0, Color::MUTED),
        });

        let cell_style = TextStyle::body(Color::rgb(220, 220, 220));
        for (i, row) in self.table.rows.iter().enumerate() {
            let y = row_y(i + 1);
            if y < -ROW_HEIGHT {
                continue;
            }
            if y > surface.height {
                break;
            }
            for (col, cell) in row.iter().enumerate() {
                cmds.push(DrawCommand::Text {
                    pos: Pos::new(PADDING + col as f64 * cell_width + CELL_PADDING, y + CELL_PADDING),
                    text: truncate(cell, cell_width),
                    style: cell_style,
                });
            }
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
