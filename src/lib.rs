//! Derive sprite rectangles from a color-coded mask, edit them, and export
//! them as sprite-sheet JSON.
//!
//! The [`detect`] module turns a mask raster into rects; [`session::Session`]
//! owns the editable state with undo/redo and change notifications;
//! [`export`] and [`import`] move rects in and out of JSON.

pub mod detect;
pub mod error;
pub mod events;
pub mod export;
pub mod history;
pub mod import;
pub mod logging;
pub mod model;
pub mod session;
pub mod settings;

pub use error::{AtlasError, Result};
pub use model::{Rect, RectPatch};
pub use session::{SelectMode, Session};
pub use settings::{ExportFormat, Settings};
