// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Where file content comes from.
//!
//! Renderers never read files themselves. A [`ContentSource`] fetches the
//! raw bytes (and, for audio/video, whatever metadata it can find) and the
//! loader hands the result to the renderer.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::models::file::{FileDescriptor, MediaKind};

use super::media;

/// Metadata a media element would report once loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MediaMetadata {
    pub duration_seconds: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Raw content plus optional media metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedContent {
    pub bytes: Vec<u8>,
    pub metadata: Option<MediaMetadata>,
}

impl LoadedContent {
    pub fn bytes(bytes: Vec<u8>) -> Self {
        Self { bytes, metadata: None }
    }
}

/// Fetches content for a file descriptor. Called from loader threads.
pub trait ContentSource: Send + Sync {
    fn fetch(&self, file: &FileDescriptor) -> Result<Vec<u8>>;

    /// Media metadata for audio/video; `Ok(None)` when unavailable.
    ///
    /// An error means the media cannot be played.
    fn probe(&self, _file: &FileDescriptor) -> Result<Option<MediaMetadata>> {
        Ok(None)
    }
}

/// Reads `source_location` as a filesystem path.
#[derive(Debug, Clone, Default)]
pub struct FsSource {
    /// Run `ffprobe` on audio/video files.
    pub probe_media: bool,
}

impl FsSource {
    pub fn new(probe_media: bool) -> Self {
        Self { probe_media }
    }
}

impl ContentSource for FsSource {
    fn fetch(&self, file: &FileDescriptor) -> Result<Vec<u8>> {
        std::fs::read(&file.source_location).with_context(|| format!("reading {}", file.source_location))
    }

    fn probe(&self, file: &FileDescriptor) -> Result<Option<MediaMetadata>> {
        if !self.probe_media || !matches!(file.media_kind, MediaKind::Audio | MediaKind::Video) {
            return Ok(None);
        }
        media::probe(Path::new(&file.source_location), file.media_kind)
    }
}

/// In-memory content keyed by `source_location`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
    metadata: HashMap<String, MediaMetadata>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(location, bytes);
        self
    }

    pub fn with_metadata(mut self, location: impl Into<String>, metadata: MediaMetadata) -> Self {
        self.metadata.insert(location.into(), metadata);
        self
    }

    pub fn insert(&mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(location.into(), bytes.into());
    }
}

impl ContentSource for MemorySource {
    fn fetch(&self, file: &FileDescriptor) -> Result<Vec<u8>> {
        self.entries
            .get(&file.source_location)
            .cloned()
            .ok_or_else(|| anyhow!("no content at {}", file.source_location))
    }

    fn probe(&self, file: &FileDescriptor) -> Result<Option<MediaMetadata>> {
        Ok(self.metadata.get(&file.source_location).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fs_source_reads_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"hello").unwrap();
        let location = tmp.path().to_string_lossy().to_string();

        let file = FileDescriptor::new("1", "hello.txt", MediaKind::Text, location);
        assert_eq!(FsSource::default().fetch(&file).unwrap(), b"hello");
        assert_eq!(FsSource::new(true).probe(&file).unwrap(), None);
    }

    #[test]
    fn test_fs_source_missing_file() {
        let file = FileDescriptor::new("1", "gone.txt", MediaKind::Text, "/definitely/not/here.txt");
        let err = FsSource::default().fetch(&file).unwrap_err();
        assert!(format!("{:#}", err).contains("reading /definitely/not/here.txt"));
    }

    #[test]
    fn test_memory_source() {
        let meta = MediaMetadata {
            duration_seconds: Some(3.0),
            ..Default::default()
        };
        let source = MemorySource::new().with("a", "abc").with_metadata("a", meta);
        let file = FileDescriptor::new("1", "a.wav", MediaKind::Audio, "a");
        assert_eq!(source.fetch(&file).unwrap(), b"abc");
        assert_eq!(source.probe(&file).unwrap(), Some(meta));

        let missing = FileDescriptor::new("2", "b.wav", MediaKind::Audio, "b");
        assert!(source.fetch(&missing).is_err());
    }
}
