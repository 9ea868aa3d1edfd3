//! Reading atlases, masks and frame mappings from disk, and writing exports.

use std::path::Path;

use image::RgbaImage;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AtlasError, Result};
use crate::model::Rect;

#[derive(Deserialize)]
struct FrameBounds {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Deserialize)]
struct FramesEntry {
    frame: FrameBounds,
}

/// Parses a `{"frames": {name: {"frame": {x, y, w, h}}}}` document into
/// rects, in document order. Groups are not read; every rect lands in the
/// default group.
pub fn parse_frames(text: &str) -> Result<Vec<Rect>> {
    let document: Value = serde_json::from_str(text)?;
    let Some(frames) = document.get("frames").and_then(Value::as_object) else {
        return Err(AtlasError::MissingFrames);
    };

    frames
        .iter()
        .map(|(name, entry)| {
            let FramesEntry { frame } = FramesEntry::deserialize(entry).map_err(|source| {
                AtlasError::InvalidFrame {
                    name: name.clone(),
                    source,
                }
            })?;
            Ok(Rect::new(frame.x, frame.y, frame.w, frame.h, name.clone()))
        })
        .collect()
}

pub fn read_frames_file(path: &Path) -> Result<Vec<Rect>> {
    let text = std::fs::read_to_string(path)?;
    let rects = parse_frames(&text)?;
    log::info!("Loaded {} frames from {}", rects.len(), path.display());
    Ok(rects)
}

/// Decodes any image format the `image` crate knows into RGBA8.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)?.to_rgba8();
    log::info!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Writes `value` as pretty-printed JSON.
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    std::fs::write(path, data)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
