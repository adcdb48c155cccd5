//! Mapping between a row/column swatch grid and linear palette indices.

use crate::error::{EditorError, Result};

/// Column cap used when no other is configured.
pub const MAX_PALETTE_COLUMNS: usize = 16;

/// `col + row * columns_per_row`, checked against the palette length.
///
/// Cells past the last entry exist whenever the final swatch row is not
/// full; they map to [`EditorError::IndexOutOfRange`].
pub fn linear_index(row: usize, col: usize, columns_per_row: usize, entries: usize) -> Result<usize> {
    let index = row
        .checked_mul(columns_per_row)
        .and_then(|base| base.checked_add(col))
        .unwrap_or(usize::MAX);
    if index >= entries {
        return Err(EditorError::IndexOutOfRange {
            index,
            len: entries,
        });
    }
    Ok(index)
}

/// Shape of the swatch grid for a palette of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwatchLayout {
    pub rows: usize,
    pub columns: usize,
    pub entries: usize,
}

impl SwatchLayout {
    /// As many columns as entries, up to `max_columns`, and as many rows as
    /// needed. An empty palette still gets a single (empty) cell.
    pub fn for_entries(entries: usize, max_columns: usize) -> Self {
        let columns = entries.clamp(1, max_columns.max(1));
        let rows = entries.div_ceil(columns).max(1);
        Self {
            rows,
            columns,
            entries,
        }
    }

    pub fn index_at(&self, row: usize, col: usize) -> Result<usize> {
        if col >= self.columns {
            return Err(EditorError::IndexOutOfRange {
                index: row.saturating_mul(self.columns).saturating_add(col),
                len: self.entries,
            });
        }
        linear_index(row, col, self.columns, self.entries)
    }

    /// Inverse of [`SwatchLayout::index_at`]; `None` past the last entry.
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.entries).then(|| (index / self.columns, index % self.columns))
    }
}
