// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.
//!
//! This module provides the toolbar interface for selecting how pointer
//! input on the canvas is interpreted.

use crate::app::Tool;

/// Display the toolbar with tool selection buttons.
///
/// Returns true when "Reset View" was clicked.
pub fn show(ui: &mut egui::Ui, current_tool: &mut Tool, can_reset: bool) -> bool {
    let mut reset = false;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");

        ui.separator();

        if ui.selectable_label(*current_tool == Tool::Pan, "✋ Pan").clicked() {
            *current_tool = Tool::Pan;
        }

        if ui.selectable_label(*current_tool == Tool::Point, "• Point").clicked() {
            *current_tool = Tool::Point;
        }

        if ui.selectable_label(*current_tool == Tool::Rectangle, "▭ Rectangle").clicked() {
            *current_tool = Tool::Rectangle;
        }

        ui.separator();

        reset = ui.add_enabled(can_reset, egui::Button::new("⟲ Reset View")).clicked();

        ui.separator();

        let tool_text = match current_tool {
            Tool::Pan => "Drag to pan, scroll to zoom or scroll text",
            Tool::Point => "Click to place a point annotation",
            Tool::Rectangle => "Drag to draw a rectangle annotation",
        };

        ui.label(egui::RichText::new(tool_text).italics().weak());
    });
    reset
}
