use std::path::Path;

use image::{imageops, ImageFormat, RgbaImage};

use crate::color::Color;
use crate::error::{EditorError, Result};
use crate::region::{Point, Region};

/// A mutable 2D grid of colors that palettes are extracted from and written
/// back into.
pub trait PixelGrid {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Color at `p`. `p` must lie within [`PixelGrid::full_region`].
    fn color_at(&self, p: Point) -> Color;

    /// Overwrite the color at `p`. `p` must lie within [`PixelGrid::full_region`].
    fn set_color(&mut self, p: Point, color: Color);

    fn full_region(&self) -> Region {
        Region::full(self.width(), self.height())
    }
}

impl PixelGrid for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn color_at(&self, p: Point) -> Color {
        Color::from_rgba(*self.get_pixel(p.x, p.y))
    }

    fn set_color(&mut self, p: Point, color: Color) {
        self.put_pixel(p.x, p.y, color.to_rgba());
    }
}

/// Decode any format `image` understands into a truecolor RGBA grid.
///
/// Indexed and grayscale sources are expanded so that every pixel can hold
/// an arbitrary color after editing.
pub fn load(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| EditorError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Write `image` as PNG, or only the part inside `region` when given.
pub fn save(image: &RgbaImage, path: &Path, region: Option<Region>) -> Result<()> {
    let encode_err = |source| EditorError::Encode {
        path: path.to_path_buf(),
        source,
    };
    match region {
        Some(r) => {
            let r = r.clip(image.full_region());
            imageops::crop_imm(image, r.x, r.y, r.width, r.height)
                .to_image()
                .save_with_format(path, ImageFormat::Png)
                .map_err(encode_err)
        }
        None => image
            .save_with_format(path, ImageFormat::Png)
            .map_err(encode_err),
    }
}
