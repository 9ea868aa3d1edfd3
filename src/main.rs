mod app;

use std::path::PathBuf;

use anyhow::{bail, Context};
use atlas_mapper::logging::setup_logging;
use eframe::egui;

use crate::app::AtlasApp;

fn existing_path(arg: Option<String>) -> anyhow::Result<Option<PathBuf>> {
    let Some(arg) = arg else {
        return Ok(None);
    };
    let path = PathBuf::from(arg);
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    Ok(Some(path))
}

fn main() -> anyhow::Result<()> {
    let _logger = setup_logging("info").context("failed to initialize logging")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") || args.len() > 2 {
        println!("Usage: atlas-mapper [atlas.png] [mask.png]");
        return Ok(());
    }
    let mut args = args.into_iter();
    let atlas_path = existing_path(args.next())?;
    let mask_path = existing_path(args.next())?;

    let title = match atlas_path.as_ref().and_then(|p| p.file_name()) {
        Some(name) => format!("Atlas Mapper - {}", name.to_string_lossy()),
        None => "Atlas Mapper".to_string(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(&title),
        ..Default::default()
    };

    log::info!("Starting {title}");
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(AtlasApp::new(atlas_path, mask_path)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run eframe: {err}"))?;
    Ok(())
}
