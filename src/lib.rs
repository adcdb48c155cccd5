//! Exact-color palette extraction and editing for raster images.
//!
//! A [`Document`] owns an image, the active selection, the palette extracted
//! from that selection and the undo history of palette edits. Editing a
//! palette entry repaints every pixel that had the entry's color when the
//! palette was extracted.

pub mod cli;
pub mod color;
pub mod document;
pub mod error;
pub mod grid;
pub mod layout;
pub mod pipeline;
pub mod region;
pub mod report;
pub mod tui;

pub use color::Color;
pub use document::{Document, DocumentConfig, DocumentEvent};
pub use error::{EditorError, Result};
pub use grid::PixelGrid;
pub use layout::{linear_index, SwatchLayout};
pub use pipeline::{build, History, HistoryEntry, HistoryPolicy, Palette, PaletteStore};
pub use region::{Point, Region, Selection};
