use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by the palette engine and its image I/O boundary.
#[derive(Error, Debug)]
pub enum EditorError {
    /// A palette index at or past the current entry count.
    #[error("palette index {index} out of range (palette has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("failed to open image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to save image {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no file to save to; load an image or save under a new name first")]
    NoImagePath,

    #[error("invalid color '{0}': expected #rrggbb or #aarrggbb")]
    InvalidColor(String),

    #[error("invalid region '{0}': expected X,Y,WIDTH,HEIGHT")]
    InvalidRegion(String),
}

pub type Result<T> = std::result::Result<T, EditorError>;
