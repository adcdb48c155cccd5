use image::RgbaImage;
use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::color::Color as PixelColor;
use crate::layout::SwatchLayout;
use crate::pipeline::Palette;
use crate::region::{Point, Region};

/// Terminal columns taken by one swatch, including the gap after it.
pub const SWATCH_WIDTH: u16 = 6;

const UPPER_HALF: &str = "\u{2580}";

fn to_color(c: PixelColor) -> Color {
    Color::Rgb(c.red(), c.green(), c.blue())
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(c: PixelColor) -> Color {
    if c.relative_luminance() > 0.4 {
        Color::Black
    } else {
        Color::White
    }
}

/// The image drawn two pixels per cell with upper half blocks, starting at
/// `scroll`. Pixels on the edge of the selection are drawn in a marker color.
pub struct ImageView<'a> {
    image: &'a RgbaImage,
    scroll: Point,
    selection: Option<Region>,
    provisional: Option<Region>,
}

impl<'a> ImageView<'a> {
    pub fn new(image: &'a RgbaImage, scroll: Point) -> Self {
        Self {
            image,
            scroll,
            selection: None,
            provisional: None,
        }
    }

    pub fn selection(mut self, selection: Option<Region>) -> Self {
        self.selection = selection;
        self
    }

    pub fn provisional(mut self, provisional: Option<Region>) -> Self {
        self.provisional = provisional;
        self
    }

    fn pixel(&self, p: Point) -> Option<Color> {
        let (width, height) = self.image.dimensions();
        if p.x >= width || p.y >= height {
            return None;
        }
        if self.provisional.is_some_and(|r| on_edge(r, p)) {
            return Some(Color::Yellow);
        }
        if self.selection.is_some_and(|r| on_edge(r, p)) {
            return Some(Color::Cyan);
        }
        Some(to_color(PixelColor::from_rgba(*self.image.get_pixel(p.x, p.y))))
    }
}

fn on_edge(r: Region, p: Point) -> bool {
    let Some(br) = r.bottom_right() else {
        return false;
    };
    r.contains(p) && (p.x == r.x || p.y == r.y || p.x == br.x || p.y == br.y)
}

impl Widget for ImageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let x = self.scroll.x + u32::from(col);
                let y = self.scroll.y + 2 * u32::from(row);
                let top = self.pixel(Point::new(x, y));
                let bottom = self.pixel(Point::new(x, y + 1));
                if top.is_none() && bottom.is_none() {
                    continue;
                }
                let style = Style::default()
                    .fg(top.unwrap_or(Color::Reset))
                    .bg(bottom.unwrap_or(Color::Reset));
                buf.set_string(area.x + col, area.y + row, UPPER_HALF, style);
            }
        }
    }
}

/// The palette as a grid of colored swatches labelled with their index.
/// Highlights the entry under the cursor.
pub struct SwatchGrid<'a> {
    palette: &'a Palette,
    layout: SwatchLayout,
    selected: Option<usize>,
}

impl<'a> SwatchGrid<'a> {
    pub fn new(palette: &'a Palette, layout: SwatchLayout, selected: Option<usize>) -> Self {
        Self {
            palette,
            layout,
            selected,
        }
    }
}

/// Build one row of swatches. Selected entry gets bold + underline.
fn build_swatch_row(palette: &Palette, layout: SwatchLayout, row: usize, selected: Option<usize>) -> Line<'static> {
    let mut spans = Vec::with_capacity(layout.columns * 2);
    for col in 0..layout.columns {
        let Ok(i) = layout.index_at(row, col) else {
            break;
        };
        let c = palette.colors[i];
        let mut style = Style::default().bg(to_color(c)).fg(contrast_fg(c));
        if selected == Some(i) {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!("{:^5}", i), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

impl Widget for SwatchGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(format!("Palette ({})", self.palette.len()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = if self.palette.is_empty() {
            vec![Line::from("  (empty selection)")]
        } else {
            (0..self.layout.rows)
                .map(|row| build_swatch_row(self.palette, self.layout, row, self.selected))
                .collect()
        };

        // Info line for the selected entry
        if let Some(i) = self.selected {
            if let Some(color) = self.palette.color(i) {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("      ", Style::default().bg(to_color(color))),
                    Span::raw(format!(
                        "  {i}: {color}  {} px",
                        self.palette.points[i].len()
                    )),
                ]));
            }
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Which swatch cell a terminal position inside the grid's inner area hits.
pub fn swatch_cell_at(inner: Rect, column: u16, row: u16) -> Option<(usize, usize)> {
    if !inner.contains(Position::new(column, row)) {
        return None;
    }
    let col = usize::from((column - inner.x) / SWATCH_WIDTH);
    let row = usize::from(row - inner.y);
    Some((row, col))
}
