// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation document and configuration deserialization.
//!
//! This module reads annotation documents and viewer configuration from
//! YAML or JSON, choosing the format by file extension.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;

use crate::config::ViewerConfig;
use crate::models::document::AnnotationDocument;

/// Parse `path` as YAML or JSON depending on its extension.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let extension = path.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase());
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data = match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text).with_context(|| format!("parsing YAML {}", path.display()))?,
        Some("json") => serde_json::from_str(&text).with_context(|| format!("parsing JSON {}", path.display()))?,
        _ => bail!("Unsupported file extension: {:?}", extension),
    };
    Ok(data)
}

/// Import an annotation document from YAML or JSON.
pub fn import_annotations(path: &Path) -> Result<AnnotationDocument> {
    let doc: AnnotationDocument = read_document(path)?;
    log::info!("Imported {} annotations from {}", doc.annotations.len(), path.display());
    Ok(doc)
}

/// Load viewer configuration from YAML or JSON.
pub fn load_config(path: &Path) -> Result<ViewerConfig> {
    read_document(path)
}
