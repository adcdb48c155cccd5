//! Palette extraction, write-through editing and undo.

pub mod extract;
pub mod history;
pub mod store;

pub use extract::{build, Palette};
pub use history::{History, HistoryEntry, HistoryPolicy};
pub use store::PaletteStore;
