//! One open image with its selection, palette and edit history.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use image::RgbaImage;

use crate::color::Color;
use crate::error::{EditorError, Result};
use crate::grid::{self, PixelGrid};
use crate::pipeline::{self, History, HistoryEntry, HistoryPolicy, Palette, PaletteStore};
use crate::region::{Point, Region, Selection};

/// Change notifications for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// Entry `index` and every pixel it owns now have `color`.
    EntryChanged { index: usize, color: Color },
    /// The palette was replaced by a new extraction.
    PaletteRebuilt { entries: usize },
    SelectionChanged(Region),
    ImageLoaded { width: u32, height: u32 },
    ImageSaved(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentConfig {
    pub history_policy: HistoryPolicy,
    /// Re-extract whenever the active selection changes. When unset the
    /// palette only changes on load or an explicit [`Document::rebuild`].
    pub rebuild_on_select: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            history_policy: HistoryPolicy::Keep,
            rebuild_on_select: true,
        }
    }
}

pub struct Document {
    image: RgbaImage,
    path: Option<PathBuf>,
    selection: Selection,
    store: PaletteStore,
    config: DocumentConfig,
    subscribers: Vec<Sender<DocumentEvent>>,
}

impl Document {
    /// A document over an in-memory image, with the whole image selected and
    /// extracted.
    pub fn from_image(image: RgbaImage, config: DocumentConfig) -> Self {
        let full = image.full_region();
        let mut doc = Self {
            image,
            path: None,
            selection: Selection::new(full),
            store: PaletteStore::default(),
            config,
            subscribers: Vec::new(),
        };
        doc.extract_palette(full);
        doc
    }

    pub fn open(path: &Path, config: DocumentConfig) -> Result<Self> {
        let image = grid::load(path)?;
        let mut doc = Self::from_image(image, config);
        doc.path = Some(path.to_path_buf());
        log::info!("opened {} ({} colors)", path.display(), doc.palette().len());
        Ok(doc)
    }

    /// Receive every event emitted from now on. Dropped receivers are pruned.
    pub fn subscribe(&mut self) -> Receiver<DocumentEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: DocumentEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn palette(&self) -> &Palette {
        self.store.palette()
    }

    pub fn history(&self) -> &History {
        self.store.history()
    }

    /// Replace the image wholesale and extract a palette over all of it.
    ///
    /// On failure the document is left exactly as it was.
    pub fn load_image(&mut self, path: &Path) -> Result<()> {
        let image = grid::load(path)?;
        let (width, height) = image.dimensions();
        self.image = image;
        self.path = Some(path.to_path_buf());
        log::info!("loaded {} ({width}x{height})", path.display());
        self.notify(DocumentEvent::ImageLoaded { width, height });

        let full = self.image.full_region();
        self.selection.reset(full);
        self.notify(DocumentEvent::SelectionChanged(full));
        self.extract_palette(full);
        Ok(())
    }

    /// Save the whole image, or only the active selection, as PNG.
    ///
    /// A whole-image save also becomes the document's path.
    pub fn save_image(&mut self, path: &Path, region_only: bool) -> Result<()> {
        let region = region_only.then(|| self.selection.active());
        grid::save(&self.image, path, region)?;
        if !region_only {
            self.path = Some(path.to_path_buf());
        }
        log::info!("saved {}{}", path.display(), if region_only { " (selection)" } else { "" });
        self.notify(DocumentEvent::ImageSaved(path.to_path_buf()));
        Ok(())
    }

    /// Save the whole image back to [`Document::path`].
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(EditorError::NoImagePath)?;
        self.save_image(&path, false)
    }

    /// Replace the palette with the colors of `region`, clipped to the image.
    pub fn extract_palette(&mut self, region: Region) -> &Palette {
        let region = region.clip(self.image.full_region());
        let palette = pipeline::build(&self.image, region);
        if palette.is_empty() {
            log::debug!("empty region {region}, palette cleared");
        }
        let entries = palette.len();
        self.store.replace(palette, self.config.history_policy);
        self.notify(DocumentEvent::PaletteRebuilt { entries });
        self.store.palette()
    }

    /// Re-extract over the active selection.
    pub fn rebuild(&mut self) -> &Palette {
        self.extract_palette(self.selection.active())
    }

    /// Set entry `index` to `color`, repainting its pixels and recording the
    /// edit for undo.
    pub fn edit_entry(&mut self, index: usize, color: Color) -> Result<()> {
        self.store.record_and_apply(&mut self.image, index, color)?;
        log::debug!("entry {index} set to {color}");
        self.notify(DocumentEvent::EntryChanged { index, color });
        Ok(())
    }

    /// Revert the latest edit. A no-op returning `Ok(None)` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Result<Option<HistoryEntry>> {
        let undone = self.store.undo(&mut self.image)?;
        if let Some(entry) = undone {
            self.notify(DocumentEvent::EntryChanged {
                index: entry.index,
                color: entry.old,
            });
        }
        Ok(undone)
    }

    pub fn current_selection(&self) -> Region {
        self.selection.active()
    }

    pub fn set_selection(&mut self, region: Region) {
        self.selection.set(region);
        self.selection_committed(region);
    }

    pub fn reset_selection_to_full_image(&mut self) {
        let full = self.image.full_region();
        self.selection.reset(full);
        self.selection_committed(full);
    }

    /// Start a drag selection. Presses outside the image are ignored.
    pub fn begin_drag(&mut self, anchor: Point) -> bool {
        if !self.image.full_region().contains(anchor) {
            return false;
        }
        self.selection.begin_drag(anchor);
        true
    }

    pub fn drag_to(&mut self, pointer: Point) -> Option<Region> {
        self.selection.drag_to(pointer)
    }

    /// The drag-in-progress rectangle, for live feedback only.
    pub fn provisional_selection(&self) -> Option<Region> {
        self.selection.provisional()
    }

    pub fn finish_drag(&mut self) -> Option<Region> {
        let region = self.selection.finish_drag()?;
        self.selection_committed(region);
        Some(region)
    }

    pub fn cancel_drag(&mut self) {
        self.selection.cancel_drag();
    }

    fn selection_committed(&mut self, region: Region) {
        self.notify(DocumentEvent::SelectionChanged(region));
        if self.config.rebuild_on_select {
            self.extract_palette(region);
        }
    }
}
