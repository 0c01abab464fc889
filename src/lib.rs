// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! MARS - Media Annotation Rendering System
//!
//! Renders text, tables, images, audio and video into a retained surface and
//! keeps annotation overlays in sync with the content: image marks follow
//! zoom and pan, video marks follow the frame size, and timestamp marks
//! follow the playhead.

pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod render;
pub mod surface;
pub mod util;

pub use config::{RendererConfiguration, ViewerConfig};
pub use error::{LoadError, MalformedAnnotation, RenderError, RenderResult};
pub use models::annotation::{Annotation, AnnotationKind, Position};
pub use models::file::{FileClassification, FileDescriptor, MediaKind};
pub use render::{Dispatcher, InputEvent, Lifecycle, LoadOutcome, LoadTicket, ReconcileReport, Renderer};
pub use surface::{Scene, Surface};
