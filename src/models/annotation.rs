// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the annotation record exchanged with hosts and the
//! validated [`Shape`] each renderer paints from it.

use serde::{Deserialize, Serialize};

use crate::error::MalformedAnnotation;
use crate::util::geometry::{Pos, Rect};

/// Minimum number of vertices for a polygon annotation.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Type of annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Point,
    Rectangle,
    Polygon,
    Text,
    Timestamp,
}

/// Raw position fields; which ones are required depends on the kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Pos>>,
    /// Media time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl Position {
    pub fn point(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn polygon(points: Vec<Pos>) -> Self {
        Self {
            points: Some(points),
            ..Default::default()
        }
    }

    pub fn timestamp(seconds: f64) -> Self {
        Self {
            timestamp: Some(seconds),
            ..Default::default()
        }
    }
}

/// A user-created mark attached to one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique within the file's annotation set; supplied by the caller.
    pub id: String,
    #[serde(default)]
    pub file_id: String,
    pub kind: AnnotationKind,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub created_by: String,
}

/// Geometry of an annotation after its required fields have been checked.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Pos),
    Rectangle(Rect),
    Polygon(Vec<Pos>),
    Text(Pos),
    Timestamp(f64),
}

impl Shape {
    /// Whether the shape lives in a 2D content space.
    pub fn is_spatial(&self) -> bool {
        !matches!(self, Shape::Timestamp(_))
    }
}

impl Annotation {
    /// Create a new annotation with the given id, owning file, kind and position.
    pub fn new(
        id: impl Into<String>,
        file_id: impl Into<String>,
        kind: AnnotationKind,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            file_id: file_id.into(),
            kind,
            position,
            label: String::new(),
            notes: None,
            created_at: String::new(),
            created_by: String::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Validate the position fields required by the kind.
    pub fn shape(&self) -> Result<Shape, MalformedAnnotation> {
        let p = &self.position;
        match self.kind {
            AnnotationKind::Point => Ok(Shape::Point(self.anchor()?)),
            AnnotationKind::Text => Ok(Shape::Text(self.anchor()?)),
            AnnotationKind::Rectangle => {
                let origin = self.anchor()?;
                let width = self.finite(p.width, "width")?;
                let height = self.finite(p.height, "height")?;
                Ok(Shape::Rectangle(Rect::new(origin.x, origin.y, width, height)))
            }
            AnnotationKind::Polygon => {
                let points = p.points.as_deref().unwrap_or_default();
                if points.len() < MIN_POLYGON_VERTICES
                    || points.iter().any(|v| !(v.x.is_finite() && v.y.is_finite()))
                {
                    return Err(self.malformed("points"));
                }
                Ok(Shape::Polygon(points.to_vec()))
            }
            AnnotationKind::Timestamp => Ok(Shape::Timestamp(self.finite(p.timestamp, "timestamp")?)),
        }
    }

    /// Media time the annotation is pinned to, if any.
    ///
    /// Spatial annotations on video may optionally carry one as well.
    pub fn timestamp(&self) -> Option<f64> {
        self.position.timestamp.filter(|t| t.is_finite())
    }

    fn anchor(&self) -> Result<Pos, MalformedAnnotation> {
        Ok(Pos::new(
            self.finite(self.position.x, "x")?,
            self.finite(self.position.y, "y")?,
        ))
    }

    fn finite(&self, value: Option<f64>, field: &'static str) -> Result<f64, MalformedAnnotation> {
        value.filter(|v| v.is_finite()).ok_or_else(|| self.malformed(field))
    }

    fn malformed(&self, missing: &'static str) -> MalformedAnnotation {
        MalformedAnnotation {
            id: self.id.clone(),
            kind: self.kind,
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_requires_size() {
        let mut a = Annotation::new("r1", "f1", AnnotationKind::Rectangle, Position::point(1.0, 2.0));
        let err = a.shape().unwrap_err();
        assert_eq!(err.missing, "width");

        a.position = Position::rectangle(1.0, 2.0, 30.0, 40.0);
        assert_eq!(a.shape().unwrap(), Shape::Rectangle(Rect::new(1.0, 2.0, 30.0, 40.0)));
    }

    #[test]
    fn test_polygon_needs_three_vertices() {
        let two = vec![Pos::new(0.0, 0.0), Pos::new(1.0, 1.0)];
        let a = Annotation::new("p1", "f1", AnnotationKind::Polygon, Position::polygon(two));
        assert!(a.shape().is_err());

        let tri = vec![Pos::new(0.0, 0.0), Pos::new(1.0, 1.0), Pos::new(0.0, 1.0)];
        let a = Annotation::new("p2", "f1", AnnotationKind::Polygon, Position::polygon(tri));
        assert!(matches!(a.shape(), Ok(Shape::Polygon(v)) if v.len() == 3));
    }

    #[test]
    fn test_non_finite_is_malformed() {
        let a = Annotation::new("t1", "f1", AnnotationKind::Timestamp, Position::timestamp(f64::NAN));
        assert_eq!(a.shape().unwrap_err().missing, "timestamp");
        assert_eq!(a.timestamp(), None);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "a1",
            "fileId": "f1",
            "kind": "point",
            "position": {"x": 10, "y": 20},
            "label": "corner",
            "createdAt": "2025-01-01T00:00:00Z",
            "createdBy": "alice"
        }"#;
        let a: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(a.file_id, "f1");
        assert_eq!(a.kind, AnnotationKind::Point);
        assert_eq!(a.shape().unwrap(), Shape::Point(Pos::new(10.0, 20.0)));
        assert_eq!(a.notes, None);
    }
}
