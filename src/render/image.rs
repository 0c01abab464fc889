// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster images with zoom and pan.
//!
//! The image and every annotation mark are placed through the same viewport
//! transform, so marks stay locked to the pixels they annotate while the
//! user zooms and drags.

use std::sync::Arc;

use crate::config::RendererConfiguration;
use crate::error::LoadError;
use crate::io::source::LoadedContent;
use crate::models::annotation::{Annotation, Shape};
use crate::models::file::{FileDescriptor, MediaKind};
use crate::surface::{Color, DrawCommand, ImageData};
use crate::util::geometry::{Pos, Rect, Size};

use super::host::{Variant, VariantRenderer};
use super::marks::{spatial_mark, MarkStyle};
use super::viewport::{ViewportController, ViewportState};
use super::InputEvent;

pub type ImageRenderer = VariantRenderer<ImageView>;

#[derive(Debug, Default)]
pub struct ImageView {
    image: Option<ImageData>,
    viewport: Option<ViewportController>,
}

impl ImageView {
    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }
}

/// Decode an encoded image into RGBA8 pixels.
fn decode_image(file: &FileDescriptor, bytes: &[u8]) -> Result<ImageData, LoadError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| LoadError::decode(&file.name, e))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(LoadError::decode(&file.name, "image has no pixels"));
    }
    Ok(ImageData {
        key: file.id.clone(),
        width,
        height,
        pixels: Arc::from(rgba.into_raw()),
    })
}

impl Variant for ImageView {
    const KIND: MediaKind = MediaKind::Image;

    fn decode(
        &mut self,
        file: &FileDescriptor,
        content: LoadedContent,
        config: &RendererConfiguration,
    ) -> Result<(), LoadError> {
        let image = decode_image(file, &content.bytes)?;
        let size = Size::new(f64::from(image.width), f64::from(image.height));
        log::info!("Decoded image {} ({}x{})", file.name, image.width, image.height);
        self.viewport = Some(ViewportController::new(size, config.surface_size()));
        self.image = Some(image);
        Ok(())
    }

    fn paint_base(&self, config: &RendererConfiguration) -> Vec<DrawCommand> {
        let mut cmds = vec![DrawCommand::Fill {
            rect: Rect::from_size(config.surface_size()),
            color: config.background(Color::CANVAS),
        }];
        if let (Some(image), Some(viewport)) = (&self.image, &self.viewport) {
            let bounds = Rect::from_size(viewport.content_size());
            cmds.push(DrawCommand::Image {
                image: image.clone(),
                rect: viewport.transform().map_rect(bounds),
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
        match &self.viewport {
            Some(viewport) => spatial_mark(shape, &annotation.label, &viewport.transform(), style),
            None => Vec::new(),
        }
    }

    fn handle_input(&mut self, event: &InputEvent, config: &RendererConfiguration) -> bool {
        let Some(viewport) = self.viewport.as_mut() else {
            return false;
        };
        match *event {
            InputEvent::Wheel { delta_y, cursor } => viewport.on_wheel(delta_y, cursor),
            InputEvent::PointerDown(pos) => {
                viewport.on_pointer_down(pos);
                false
            }
            InputEvent::PointerMove(pos) => viewport.on_pointer_move(pos),
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                viewport.end_drag();
                false
            }
            InputEvent::ResetView => {
                viewport.reset_view(config.surface_size());
                true
            }
            _ => false,
        }
    }

    fn content_point(&self, screen: Pos, _config: &RendererConfiguration) -> Option<Pos> {
        self.viewport.as_ref().map(|v| v.transform().to_content(screen))
    }

    fn viewport(&self) -> Option<ViewportState> {
        self.viewport.as_ref().map(ViewportController::state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{AnnotationKind, Position};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn loaded(width: u32, height: u32, config: &RendererConfiguration) -> ImageView {
        let file = FileDescriptor::new("img", "a.png", MediaKind::Image, "a.png");
        let mut view = ImageView::default();
        view.decode(&file, LoadedContent::bytes(png(width, height)), config).unwrap();
        view
    }

    #[test]
    fn test_decode_fits_image() {
        let config = RendererConfiguration::new(400.0, 300.0);
        let view = loaded(80, 60, &config);
        assert_eq!(view.image().unwrap().pixels.len(), 80 * 60 * 4);
        let v = view.viewport().unwrap();
        assert_eq!(v.scale, 1.0);
        assert_eq!(v.offset_x, 160.0);
        assert_eq!(v.offset_y, 120.0);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let file = FileDescriptor::new("img", "a.png", MediaKind::Image, "a.png");
        let err = ImageView::default()
            .decode(&file, LoadedContent::bytes(b"not an image".to_vec()), &RendererConfiguration::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn test_marks_follow_pan() {
        let config = RendererConfiguration::new(400.0, 300.0);
        let mut view = loaded(400, 300, &config);
        let a = Annotation::new("p", "img", AnnotationKind::Point, Position::point(100.0, 100.0));
        let shape = a.shape().unwrap();

        view.handle_input(&InputEvent::PointerDown(Pos::new(0.0, 0.0)), &config);
        view.handle_input(&InputEvent::PointerMove(Pos::new(15.0, -5.0)), &config);

        let cmds = view.paint_mark(&a, &shape, &config, &MarkStyle::default());
        assert!(matches!(cmds[0], DrawCommand::Circle { center, .. } if center == Pos::new(115.0, 95.0)));

        let base = view.paint_base(&config);
        assert!(matches!(&base[1], DrawCommand::Image { rect, .. } if rect.x == 15.0 && rect.y == -5.0));
    }

    #[test]
    fn test_content_point_inverts_viewport() {
        let config = RendererConfiguration::new(400.0, 300.0);
        let view = loaded(1600, 1200, &config);
        assert_eq!(view.content_point(Pos::new(100.0, 50.0), &config), Some(Pos::new(400.0, 200.0)));
    }
}
