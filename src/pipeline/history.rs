use crate::color::Color;

/// One reversible palette edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub index: usize,
    pub old: Color,
    pub new: Color,
}

/// What happens to recorded edits when the palette is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HistoryPolicy {
    /// Keep entries; their indices then name entries of the new palette.
    #[default]
    Keep,
    /// Forget all entries on every rebuild.
    Clear,
}

/// LIFO record of palette edits. Entries are never modified in place.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
