// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error taxonomy.
//!
//! Every error is local to one renderer instance. `UnsupportedMediaKind`
//! is raised before a renderer exists, `LoadError` moves a renderer into its
//! error state, and `MalformedAnnotation` only ever causes a mark to be
//! skipped.

use crate::models::annotation::AnnotationKind;
use crate::models::file::{FileClassification, MediaKind};

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("unsupported media kind: {0}")]
    UnsupportedMediaKind(FileClassification),

    /// The descriptor's own kind disagrees with the renderer chosen for it.
    #[error("{found} file cannot be opened by the {expected} renderer")]
    KindMismatch { expected: MediaKind, found: MediaKind },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("renderer has been destroyed")]
    Destroyed,
}

/// Failure to fetch or decode content inside `load`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("failed to fetch {location}: {reason}")]
    Fetch { location: String, reason: String },

    #[error("failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },

    /// Media element level failures such as an unsupported codec.
    #[error("cannot play {name}: {reason}")]
    Media { name: String, reason: String },
}

impl LoadError {
    pub fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn media(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Media {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

/// An annotation missing a field its kind requires.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("annotation {id} ({kind:?}) is missing `{missing}`")]
pub struct MalformedAnnotation {
    pub id: String,
    pub kind: AnnotationKind,
    pub missing: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(RenderError::UnsupportedMediaKind(FileClassification::Archive)
            .to_string()
            .contains("unsupported media kind: Archive"));
        assert_eq!(
            RenderError::KindMismatch {
                expected: MediaKind::Image,
                found: MediaKind::Text,
            }
            .to_string(),
            "text file cannot be opened by the image renderer"
        );
        assert!(LoadError::fetch("/x", "gone").to_string().contains("failed to fetch /x"));
        assert!(LoadError::decode("a.png", "bad").to_string().contains("failed to decode a.png"));
        assert!(LoadError::media("a.mp4", "codec").to_string().contains("cannot play a.mp4"));
    }

    #[test]
    fn load_error_is_transparent() {
        let err = RenderError::from(LoadError::decode("a.png", "truncated"));
        assert_eq!(err.to_string(), "failed to decode a.png: truncated");
    }
}
