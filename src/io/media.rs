// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file helpers for hosts.
//!
//! This module classifies files by extension, builds file descriptors for
//! local paths, and probes audio/video metadata with `ffprobe`.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::models::file::{FileClassification, FileDescriptor};

use super::source::MediaMetadata;

/// Classify a file by its extension.
pub fn classify(path: &Path) -> FileClassification {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "md" | "markdown" | "json" | "log" | "yaml" | "yml" | "xml" => FileClassification::Text,
        "csv" | "tsv" => FileClassification::Tabular,
        "jpg" | "jpeg" | "png" | "bmp" | "gif" | "webp" | "tif" | "tiff" => FileClassification::Image,
        "mp3" | "wav" | "ogg" | "flac" | "m4a" | "aac" => FileClassification::Audio,
        "mp4" | "webm" | "mov" | "mkv" | "avi" => FileClassification::Video,
        "pdf" | "doc" | "docx" | "odt" => FileClassification::Document,
        "zip" | "tar" | "gz" | "7z" => FileClassification::Archive,
        "bin" | "exe" | "so" | "dll" => FileClassification::Binary,
        _ => FileClassification::Unknown,
    }
}

/// Descriptor for a local file, or the classification it was rejected with.
pub fn describe(path: &Path) -> std::result::Result<FileDescriptor, FileClassification> {
    let classification = classify(path);
    let kind = classification.media_kind().ok_or(classification)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let location = path.to_string_lossy().to_string();
    let mut file = FileDescriptor::new(location.clone(), name, kind, location);
    file.size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    Ok(file)
}

#[derive(Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Probe duration and frame size with `ffprobe`.
///
/// Returns `Ok(None)` when `ffprobe` is not installed. Fails when the file
/// has no stream of the expected kind or cannot be parsed at all.
pub fn probe(path: &Path, kind: crate::models::file::MediaKind) -> Result<Option<MediaMetadata>> {
    let output = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_format", "-show_streams"])
        .arg(path)
        .stdin(Stdio::null())
        .output();
    let output = match output {
        Ok(out) => out,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("ffprobe not found, media metadata unavailable");
            return Ok(None);
        }
        Err(e) => return Err(e).context("running ffprobe"),
    };
    if !output.status.success() {
        bail!(
            "ffprobe failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    parse_probe(&output.stdout, kind).map(Some)
}

fn parse_probe(json: &[u8], kind: crate::models::file::MediaKind) -> Result<MediaMetadata> {
    let probe: ProbeOut = serde_json::from_slice(json).context("parsing ffprobe output")?;
    let wanted = match kind {
        crate::models::file::MediaKind::Video => "video",
        _ => "audio",
    };
    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some(wanted));
    let Some(stream) = stream else {
        bail!("no {} stream", wanted);
    };
    let duration_seconds = probe
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0);

    Ok(MediaMetadata {
        duration_seconds,
        width: stream.width,
        height: stream.height,
    })
}
