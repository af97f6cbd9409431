// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Signbook desktop editor.
//!
//! Authors bilingual books pairing written text with sign-language video,
//! images and audio.

mod app;
mod ui;

use anyhow::Result;
use app::SignbookApp;
use signbook::config::AppConfig;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::load()?;
    let app = SignbookApp::new(config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 860.0])
            .with_min_inner_size([960.0, 640.0])
            .with_title("Signbook"),
        ..Default::default()
    };

    eframe::run_native("Signbook", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
