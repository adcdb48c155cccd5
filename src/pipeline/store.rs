use crate::color::Color;
use crate::error::{EditorError, Result};
use crate::grid::PixelGrid;

use super::extract::Palette;
use super::history::{History, HistoryEntry, HistoryPolicy};

/// The current palette and its edit history.
///
/// The store does not own the pixel grid; every mutation takes the grid it
/// writes through to.
#[derive(Debug, Clone, Default)]
pub struct PaletteStore {
    palette: Palette,
    history: History,
}

impl PaletteStore {
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Swap in a freshly extracted palette.
    pub fn replace(&mut self, palette: Palette, policy: HistoryPolicy) {
        self.palette = palette;
        if policy == HistoryPolicy::Clear {
            self.history.clear();
        }
    }

    /// Paint every cell of entry `index` with `color` and update the entry.
    ///
    /// Nothing changes when `index` is out of range. When `record` is set
    /// the edit is pushed onto the history.
    pub fn set_entry<G: PixelGrid + ?Sized>(
        &mut self,
        grid: &mut G,
        index: usize,
        color: Color,
        record: bool,
    ) -> Result<HistoryEntry> {
        let len = self.palette.len();
        let old = self
            .palette
            .color(index)
            .ok_or(EditorError::IndexOutOfRange { index, len })?;

        for &p in &self.palette.points[index] {
            grid.set_color(p, color);
        }
        self.palette.colors[index] = color;

        let entry = HistoryEntry {
            index,
            old,
            new: color,
        };
        if record {
            self.history.push(entry);
        }
        Ok(entry)
    }

    pub fn record_and_apply<G: PixelGrid + ?Sized>(
        &mut self,
        grid: &mut G,
        index: usize,
        color: Color,
    ) -> Result<HistoryEntry> {
        self.set_entry(grid, index, color, true)
    }

    /// Revert the most recent recorded edit without recording the revert.
    ///
    /// Returns `Ok(None)` when there is nothing to undo. An entry whose index
    /// no longer exists in the palette is discarded and reported as
    /// [`EditorError::IndexOutOfRange`].
    pub fn undo<G: PixelGrid + ?Sized>(&mut self, grid: &mut G) -> Result<Option<HistoryEntry>> {
        let Some(entry) = self.history.pop() else {
            return Ok(None);
        };
        if let Err(err) = self.set_entry(grid, entry.index, entry.old, false) {
            log::warn!("dropping stale undo entry for index {}: {err}", entry.index);
            return Err(err);
        }
        Ok(Some(entry))
    }
}
