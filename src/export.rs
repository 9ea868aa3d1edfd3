//! Sprite-sheet JSON exporters
//!
//! Each [`ExportFormat`] maps the session's rects onto a common sprite-sheet
//! schema. The global prefix from [`Settings`] is applied to names here and
//! only here; stored rect names never change.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AtlasError, Result};
use crate::model::Rect;
use crate::settings::{ExportFormat, Pivot, Settings};

pub const APP_NAME: &str = "AtlasMapper";
pub const APP_VERSION: &str = "5.0";
pub const DEFAULT_FILE_NAME: &str = "atlas.json";

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct SpriteSourceSize {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct SourceSize {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<&'a str>,
    frame: Frame,
    rotated: bool,
    trimmed: bool,
    sprite_source_size: SpriteSourceSize,
    source_size: SourceSize,
    pivot: Pivot,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a str>,
}

impl<'a> FrameEntry<'a> {
    fn new(rect: &Rect, pivot: Pivot) -> Self {
        Self {
            filename: None,
            frame: Frame {
                x: rect.x,
                y: rect.y,
                w: rect.w,
                h: rect.h,
            },
            rotated: false,
            trimmed: false,
            sprite_source_size: SpriteSourceSize {
                x: 0,
                y: 0,
                w: rect.w,
                h: rect.h,
            },
            source_size: SourceSize {
                w: rect.w,
                h: rect.h,
            },
            pivot,
            group: None,
        }
    }
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
}

const META: Meta = Meta {
    app: APP_NAME,
    version: APP_VERSION,
};

#[derive(Serialize)]
struct GenericSheet<'a> {
    frames: Map<String, Value>,
    meta: &'a Meta,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct PhaserTexture<'a> {
    image: &'static str,
    format: &'static str,
    size: Size,
    scale: u32,
    frames: Vec<FrameEntry<'a>>,
}

#[derive(Serialize)]
struct PhaserSheet<'a> {
    textures: Vec<PhaserTexture<'a>>,
    meta: &'a Meta,
}

#[derive(Serialize)]
struct SimpleEntry<'a> {
    name: &'a str,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    group: &'a str,
}

/// Exported name: prefix plus the stored name, or `sprite_<index>` when the
/// stored name is empty.
fn export_name(prefix: &str, rect: &Rect, index: usize) -> String {
    if rect.name.is_empty() {
        format!("{prefix}sprite_{index}")
    } else {
        format!("{prefix}{}", rect.name)
    }
}

/// Builds the export document for `settings.export_format`.
pub fn export(rects: &[Rect], settings: &Settings) -> Result<Value> {
    if rects.is_empty() {
        return Err(AtlasError::NothingToExport);
    }
    let prefix = settings.global_prefix.as_str();
    let pivot = settings.pivot;
    let names: Vec<String> = rects
        .iter()
        .enumerate()
        .map(|(i, r)| export_name(prefix, r, i))
        .collect();

    let value = match settings.export_format {
        ExportFormat::Generic => {
            let mut frames = Map::new();
            for (rect, name) in rects.iter().zip(&names) {
                let entry = FrameEntry {
                    group: (!rect.group.is_empty()).then_some(rect.group.as_str()),
                    ..FrameEntry::new(rect, pivot)
                };
                frames.insert(name.clone(), serde_json::to_value(entry)?);
            }
            serde_json::to_value(GenericSheet {
                frames,
                meta: &META,
            })?
        }
        ExportFormat::Phaser => {
            let frames = rects
                .iter()
                .zip(&names)
                .map(|(rect, name)| FrameEntry {
                    filename: Some(name.as_str()),
                    ..FrameEntry::new(rect, pivot)
                })
                .collect();
            serde_json::to_value(PhaserSheet {
                textures: vec![PhaserTexture {
                    image: "atlas.png",
                    format: "RGBA8888",
                    size: Size { w: 0, h: 0 },
                    scale: 1,
                    frames,
                }],
                meta: &META,
            })?
        }
        ExportFormat::Simple => {
            let entries: Vec<SimpleEntry<'_>> = rects
                .iter()
                .zip(&names)
                .map(|(rect, name)| SimpleEntry {
                    name,
                    x: rect.x,
                    y: rect.y,
                    w: rect.w,
                    h: rect.h,
                    group: &rect.group,
                })
                .collect();
            serde_json::to_value(entries)?
        }
    };

    log::info!(
        "Exported {} rects as {}",
        rects.len(),
        settings.export_format.key()
    );
    Ok(value)
}

/// Exports with a format given by key. Unknown keys yield `Ok(None)`.
pub fn export_as(rects: &[Rect], settings: &Settings, format: &str) -> Result<Option<Value>> {
    let Some(export_format) = ExportFormat::parse(format) else {
        log::warn!("Unknown export format `{format}`, skipping");
        return Ok(None);
    };
    let settings = Settings {
        export_format,
        ..settings.clone()
    };
    export(rects, &settings).map(Some)
}
