//! Plain-text renderings of a palette for stdout.

use std::fmt::Write;

use crossterm::style::{Color as TermColor, Stylize};

use crate::layout::SwatchLayout;
use crate::pipeline::Palette;

/// One line per entry: index, color, pixel count.
pub fn listing(palette: &Palette) -> String {
    let mut out = String::new();
    for (i, (color, points)) in palette.colors.iter().zip(&palette.points).enumerate() {
        let _ = writeln!(out, "{i:>4}  {color:<9}  {}", points.len());
    }
    out
}

/// Truecolor swatches laid out like the interactive editor's grid.
pub fn preview(palette: &Palette, max_columns: usize) -> String {
    let layout = SwatchLayout::for_entries(palette.len(), max_columns);
    let mut out = String::new();
    for row in 0..layout.rows {
        for col in 0..layout.columns {
            let Ok(i) = layout.index_at(row, col) else {
                break;
            };
            let c = palette.colors[i];
            let fg = if c.relative_luminance() > 0.4 {
                TermColor::Black
            } else {
                TermColor::White
            };
            let bg = TermColor::Rgb {
                r: c.red(),
                g: c.green(),
                b: c.blue(),
            };
            let _ = write!(out, "{} ", format!("{i:^5}").with(fg).on(bg));
        }
        out.push('\n');
    }
    out
}
