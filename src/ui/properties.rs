// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation properties panel.
//!
//! Lists the annotations attached to the open file with their kind and
//! position, and lets the user select or delete them.

use mars::models::annotation::{Annotation, AnnotationKind};

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    Select(String),
    Delete(String),
}

/// Display the annotation list.
pub fn show(ui: &mut egui::Ui, annotations: &[Annotation], selected: Option<&str>) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Annotations");
    ui.separator();

    if annotations.is_empty() {
        ui.label(egui::RichText::new("No annotations").weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for annotation in annotations {
            let is_selected = selected == Some(annotation.id.as_str());
            let title = if annotation.label.is_empty() {
                annotation.id.clone()
            } else {
                annotation.label.clone()
            };

            ui.horizontal(|ui| {
                if ui
                    .selectable_label(is_selected, format!("{} {}", kind_icon(annotation.kind), title))
                    .clicked()
                {
                    action = PropertiesAction::Select(annotation.id.clone());
                }
                if ui.small_button("🗑").on_hover_text("Delete annotation").clicked() {
                    action = PropertiesAction::Delete(annotation.id.clone());
                }
            });

            if is_selected {
                ui.indent(&annotation.id, |ui| {
                    ui.label(format!("Kind: {:?}", annotation.kind));
                    ui.label(describe_position(annotation));
                    if let Some(notes) = &annotation.notes {
                        ui.label(egui::RichText::new(notes).italics());
                    }
                    if !annotation.created_by.is_empty() {
                        ui.label(egui::RichText::new(format!("by {}", annotation.created_by)).weak());
                    }
                });
            }
        }
    });

    action
}

fn kind_icon(kind: AnnotationKind) -> &'static str {
    match kind {
        AnnotationKind::Point => "•",
        AnnotationKind::Rectangle => "▭",
        AnnotationKind::Polygon => "▱",
        AnnotationKind::Text => "¶",
        AnnotationKind::Timestamp => "⏱",
    }
}

fn describe_position(annotation: &Annotation) -> String {
    let p = &annotation.position;
    match annotation.shape() {
        Ok(_) => match annotation.kind {
            AnnotationKind::Timestamp => format!("At {}", mars::render::format_time(p.timestamp.unwrap_or(0.0))),
            AnnotationKind::Polygon => format!("{} vertices", p.points.as_ref().map_or(0, |v| v.len())),
            AnnotationKind::Rectangle => format!(
                "({:.0}, {:.0}) {:.0}×{:.0}",
                p.x.unwrap_or(0.0),
                p.y.unwrap_or(0.0),
                p.width.unwrap_or(0.0),
                p.height.unwrap_or(0.0)
            ),
            AnnotationKind::Point | AnnotationKind::Text => {
                format!("({:.0}, {:.0})", p.x.unwrap_or(0.0), p.y.unwrap_or(0.0))
            }
        },
        Err(err) => format!("Not shown: {}", err),
    }
}
