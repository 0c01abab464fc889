// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation documents.
//!
//! Hosts hand renderers a target annotation list; on disk that list lives in
//! a small YAML or JSON document keyed by the file it belongs to.

use serde::{Deserialize, Serialize};

use super::annotation::Annotation;

/// Target annotation list for one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDocument {
    /// File the annotations belong to; empty means "whatever is open".
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl AnnotationDocument {
    /// Create a new document for the given file.
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            annotations: Vec::new(),
        }
    }

    /// Annotations that apply to `file_id`.
    ///
    /// Annotations whose own `fileId` is empty are treated as belonging to
    /// the document's file.
    pub fn annotations_for<'a>(&'a self, file_id: &'a str) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations.iter().filter(move |a| {
            let owner = if a.file_id.is_empty() { self.file_id.as_str() } else { a.file_id.as_str() };
            owner.is_empty() || owner == file_id
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{AnnotationKind, Position};

    #[test]
    fn test_annotations_for_filters_by_owner() {
        let mut doc = AnnotationDocument::new("img-1");
        doc.annotations.push(Annotation::new("a", "", AnnotationKind::Point, Position::point(1.0, 1.0)));
        doc.annotations.push(Annotation::new("b", "img-1", AnnotationKind::Point, Position::point(1.0, 1.0)));
        doc.annotations.push(Annotation::new("c", "img-2", AnnotationKind::Point, Position::point(1.0, 1.0)));

        let ids: Vec<_> = doc.annotations_for("img-1").map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
