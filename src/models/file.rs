// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! File descriptors and media classifications.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five media kinds a renderer exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Text,
    Tabular,
    Image,
    Audio,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Text => "text",
            MediaKind::Tabular => "tabular",
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        };
        f.write_str(name)
    }
}

/// Result of content-type/extension sniffing, produced by the host.
///
/// Only the first five map onto a renderer; the rest are surfaced as
/// unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileClassification {
    Text,
    Tabular,
    Image,
    Audio,
    Video,
    Document,
    Archive,
    Binary,
    Unknown,
}

impl FileClassification {
    /// Media kind served by a renderer, if any.
    pub fn media_kind(self) -> Option<MediaKind> {
        match self {
            FileClassification::Text => Some(MediaKind::Text),
            FileClassification::Tabular => Some(MediaKind::Tabular),
            FileClassification::Image => Some(MediaKind::Image),
            FileClassification::Audio => Some(MediaKind::Audio),
            FileClassification::Video => Some(MediaKind::Video),
            FileClassification::Document
            | FileClassification::Archive
            | FileClassification::Binary
            | FileClassification::Unknown => None,
        }
    }
}

impl fmt::Display for FileClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<MediaKind> for FileClassification {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Text => FileClassification::Text,
            MediaKind::Tabular => FileClassification::Tabular,
            MediaKind::Image => FileClassification::Image,
            MediaKind::Audio => FileClassification::Audio,
            MediaKind::Video => FileClassification::Video,
        }
    }
}

/// Identifies what a renderer loads. Immutable once handed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub id: String,
    pub name: String,
    pub media_kind: MediaKind,
    /// Path or key understood by the content source.
    pub source_location: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub content_type: String,
}

impl FileDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        media_kind: MediaKind,
        source_location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            media_kind,
            source_location: source_location.into(),
            size_bytes: 0,
            content_type: String::new(),
        }
    }

    /// Lowercased extension of the file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}
