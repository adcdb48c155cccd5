use std::collections::HashMap;

use crate::color::Color;
use crate::grid::PixelGrid;
use crate::region::{Point, Region};

/// The distinct colors of a scanned region, in first-seen order, each with
/// the cells where it occurred.
///
/// `colors` and `points` are parallel and every `points[i]` is non-empty.
/// At extraction time the point lists partition the scanned region by color;
/// after an edit they still partition it by the color each cell had then.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    pub colors: Vec<Color>,
    pub points: Vec<Vec<Point>>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// Index of the entry whose point list contains `p`.
    pub fn entry_at(&self, p: Point) -> Option<usize> {
        self.points.iter().position(|pts| pts.contains(&p))
    }
}

/// Scan `region` of `grid` row-major and group its cells by exact color.
///
/// `region` must already be clipped to the grid. An empty region yields an
/// empty palette.
pub fn build<G: PixelGrid + ?Sized>(grid: &G, region: Region) -> Palette {
    let mut lookup: HashMap<Color, usize> = HashMap::new();
    let mut palette = Palette::default();

    for p in region.points() {
        let color = grid.color_at(p);
        match lookup.get(&color) {
            Some(&i) => palette.points[i].push(p),
            None => {
                lookup.insert(color, palette.colors.len());
                palette.colors.push(color);
                palette.points.push(vec![p]);
            }
        }
    }

    log::debug!(
        "extracted {} colors from {} pixels in {}",
        palette.len(),
        region.area(),
        region
    );
    palette
}
