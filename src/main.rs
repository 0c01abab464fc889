// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! MARS - Media Annotation Rendering System
//!
//! A desktop viewer that renders a media file with its annotation overlay.

mod app;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use app::MarsApp;
use clap::Parser;
use mars::config::ViewerConfig;

#[derive(Parser, Debug)]
#[command(name = "mars", version, about = "View media files with their annotations")]
struct Cli {
    /// Media file to open on startup.
    file: Option<PathBuf>,

    /// Annotation document (YAML or JSON) to reconcile onto the file.
    #[arg(long, short = 'a')]
    annotations: Option<PathBuf>,

    /// Viewer configuration (YAML or JSON).
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => mars::io::serialization::load_config(path)?,
        None => ViewerConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("MARS - Media Annotation Rendering System"),
        ..Default::default()
    };

    eframe::run_native(
        "MARS",
        options,
        Box::new(move |_cc| Ok(Box::new(MarsApp::new(config, cli.file, cli.annotations)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
