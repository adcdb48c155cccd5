pub mod widgets;

use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::{DefaultTerminal, Frame};

use crate::color::Color;
use crate::document::{Document, DocumentEvent};
use crate::error::EditorError;
use crate::grid::PixelGrid;
use crate::layout::SwatchLayout;
use crate::region::{Point, Region};

use widgets::{swatch_cell_at, ImageView, SwatchGrid, SWATCH_WIDTH};

const SCROLL_STEP: u32 = 8;

const HELP: &str = "drag: select  ctrl-click: pick  {/}: bottom row -/+  enter: edit  u: undo  \
r: rebuild  esc: reset  o: open  s: save  a: save as  S: save region  q: quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Typing into the status line prompt.
    Prompt(Prompt, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    /// New color for the entry under the cursor.
    Color,
    Open,
    SaveAs,
    SaveRegion,
}

impl Prompt {
    fn accepts(self, c: char) -> bool {
        match self {
            Prompt::Color => c.is_ascii_hexdigit() || c == '#',
            _ => !c.is_control(),
        }
    }
}

/// State for the interactive editor.
pub struct TuiApp {
    doc: Document,
    events: Receiver<DocumentEvent>,
    max_columns: usize,
    cursor: usize,
    scroll: Point,
    mode: Mode,
    status: String,
    layout: SwatchLayout,
    image_area: Rect,
    swatch_area: Rect,
    quit: bool,
}

impl TuiApp {
    pub fn new(mut doc: Document, max_columns: usize) -> Self {
        let events = doc.subscribe();
        let layout = SwatchLayout::for_entries(doc.palette().len(), max_columns);
        Self {
            doc,
            events,
            max_columns,
            cursor: 0,
            scroll: Point::new(0, 0),
            mode: Mode::Normal,
            status: HELP.to_string(),
            layout,
            image_area: Rect::default(),
            swatch_area: Rect::default(),
            quit: false,
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [main, status] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());
        let swatch_width = swatch_pane_width(self.max_columns);
        let [image_pane, swatch_pane] =
            Layout::horizontal([Constraint::Min(10), Constraint::Max(swatch_width)]).areas(main);

        let title = match self.doc.path() {
            Some(p) => format!("{}  [{}]", p.display(), self.doc.current_selection()),
            None => format!("[{}]", self.doc.current_selection()),
        };
        let block = Block::bordered().title(title);
        self.image_area = block.inner(image_pane);
        frame.render_widget(block, image_pane);

        let full = self.doc.current_selection() == self.doc.image().full_region();
        let view = ImageView::new(self.doc.image(), self.scroll)
            .selection((!full).then(|| self.doc.current_selection()))
            .provisional(self.doc.provisional_selection());
        frame.render_widget(view, self.image_area);

        let fit = usize::from(swatch_pane.width.saturating_sub(2) / SWATCH_WIDTH).max(1);
        self.layout = SwatchLayout::for_entries(self.doc.palette().len(), self.max_columns.min(fit));
        self.swatch_area = Block::bordered().inner(swatch_pane);
        let selected = (!self.doc.palette().is_empty()).then_some(self.cursor);
        frame.render_widget(SwatchGrid::new(self.doc.palette(), self.layout, selected), swatch_pane);

        let status_line = match &self.mode {
            Mode::Normal => Line::from(self.status.as_str()),
            Mode::Prompt(Prompt::Color, input) => {
                Line::from(format!("entry {}: new color {input}_", self.cursor))
            }
            Mode::Prompt(Prompt::Open, input) => Line::from(format!("open: {input}_")),
            Mode::Prompt(Prompt::SaveAs, input) => Line::from(format!("save as: {input}_")),
            Mode::Prompt(Prompt::SaveRegion, input) => {
                Line::from(format!("save region as: {input}_"))
            }
        };
        frame.render_widget(Paragraph::new(status_line), status);
    }

    /// Apply pending document events to view state.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                DocumentEvent::EntryChanged { index, color } => {
                    self.status = format!("entry {index} is now {color}");
                }
                DocumentEvent::PaletteRebuilt { entries } => {
                    self.cursor = self.cursor.min(entries.saturating_sub(1));
                    self.status = format!("palette rebuilt: {entries} colors");
                }
                DocumentEvent::SelectionChanged(region) => {
                    self.status = format!("selection {region}");
                }
                DocumentEvent::ImageLoaded { width, height } => {
                    self.scroll = Point::new(0, 0);
                    self.status = format!("loaded {width}x{height}");
                }
                DocumentEvent::ImageSaved(path) => {
                    self.status = format!("saved {}", path.display());
                }
            }
        }
    }

    fn report(&mut self, err: EditorError) {
        log::warn!("{err}");
        self.status = err.to_string();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if let Mode::Prompt(prompt, input) = &mut self.mode {
            let prompt = *prompt;
            match key.code {
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) if prompt.accepts(c) => input.push(c),
                KeyCode::Enter => {
                    let input = std::mem::take(input);
                    self.mode = Mode::Normal;
                    self.submit(prompt, &input);
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Char('H') => self.scroll_by(-1, 0),
            KeyCode::Char('L') => self.scroll_by(1, 0),
            KeyCode::Char('K') => self.scroll_by(0, -1),
            KeyCode::Char('J') => self.scroll_by(0, 1),
            KeyCode::Enter => self.start_edit(self.cursor),
            KeyCode::Char('u') => match self.doc.undo() {
                Ok(None) => self.status = "nothing to undo".to_string(),
                Ok(Some(_)) => {}
                Err(err) => self.report(err),
            },
            KeyCode::Char('r') => {
                self.doc.rebuild();
            }
            KeyCode::Esc => {
                self.doc.cancel_drag();
                self.doc.reset_selection_to_full_image();
            }
            KeyCode::Char('{') => self.nudge_bottom(-1),
            KeyCode::Char('}') => self.nudge_bottom(1),
            KeyCode::Char('s') => {
                if let Err(err) = self.doc.save() {
                    self.report(err);
                }
            }
            KeyCode::Char('o') => self.start_prompt(Prompt::Open, self.doc_path_text()),
            KeyCode::Char('a') => self.start_prompt(Prompt::SaveAs, self.doc_path_text()),
            KeyCode::Char('S') => {
                let suggestion = self
                    .region_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.start_prompt(Prompt::SaveRegion, suggestion);
            }
            _ => {}
        }
    }

    fn start_prompt(&mut self, prompt: Prompt, initial: String) {
        self.mode = Mode::Prompt(prompt, initial);
    }

    fn doc_path_text(&self) -> String {
        self.doc
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    fn submit(&mut self, prompt: Prompt, input: &str) {
        let result = match prompt {
            Prompt::Color => {
                Color::from_hex(input).and_then(|color| self.doc.edit_entry(self.cursor, color))
            }
            Prompt::Open => self.doc.load_image(Path::new(input)),
            Prompt::SaveAs => self.doc.save_image(Path::new(input), false),
            Prompt::SaveRegion => self.doc.save_image(Path::new(input), true),
        };
        if let Err(err) = result {
            self.report(err);
        }
    }

    /// Move the selection's bottom edge by one image row. Mouse drags land
    /// on even rows only, since each cell shows two pixels.
    fn nudge_bottom(&mut self, delta: i64) {
        let current = self.doc.current_selection();
        let Ok(height) = u32::try_from(i64::from(current.height) + delta) else {
            return;
        };
        let region = Region::new(current.x, current.y, current.width, height)
            .clip(self.doc.image().full_region());
        if region.is_empty() || region == current {
            return;
        }
        self.doc.set_selection(region);
    }

    /// Move the cursor to the entry owning the pixel under the pointer.
    fn pick(&mut self, p: Point) {
        match self.doc.palette().entry_at(p) {
            Some(index) => {
                self.cursor = index;
                self.status = format!("picked entry {index}");
            }
            None => self.status = "pixel is outside the selection".to_string(),
        }
    }

    /// `<stem>-region.png` next to the document.
    fn region_path(&self) -> Option<PathBuf> {
        let path = self.doc.path()?;
        let stem = path.file_stem()?.to_string_lossy();
        Some(path.with_file_name(format!("{stem}-region.png")))
    }

    fn start_edit(&mut self, index: usize) {
        match self.doc.palette().color(index) {
            Some(color) => {
                self.cursor = index;
                self.start_prompt(Prompt::Color, color.to_hex());
            }
            None => self.report(EditorError::IndexOutOfRange {
                index,
                len: self.doc.palette().len(),
            }),
        }
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let Some((row, col)) = self.layout.position(self.cursor) else {
            return;
        };
        let (Some(row), Some(col)) = (row.checked_add_signed(d_row), col.checked_add_signed(d_col)) else {
            return;
        };
        if let Ok(index) = self.layout.index_at(row, col) {
            self.cursor = index;
        }
    }

    fn scroll_by(&mut self, dx: i64, dy: i64) {
        let (width, height) = self.doc.image().dimensions();
        let step = i64::from(SCROLL_STEP);
        let x = (i64::from(self.scroll.x) + dx * step).clamp(0, i64::from(width.saturating_sub(1)));
        let y = (i64::from(self.scroll.y) + dy * step).clamp(0, i64::from(height.saturating_sub(1)));
        self.scroll = Point::new(x as u32, y as u32);
    }

    /// Image pixel under a terminal cell (its top half). Cells left of or
    /// above the view clamp to the view's edge so drags can leave it.
    fn pixel_at(&self, column: u16, row: u16) -> Point {
        let col = column.saturating_sub(self.image_area.x);
        let row = row.saturating_sub(self.image_area.y);
        Point::new(
            self.scroll.x + u32::from(col),
            self.scroll.y + 2 * u32::from(row),
        )
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        let in_image = self.image_area.contains(pos);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left)
                if in_image && mouse.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.pick(self.pixel_at(mouse.column, mouse.row));
            }
            MouseEventKind::Down(MouseButton::Left) if in_image => {
                self.doc.begin_drag(self.pixel_at(mouse.column, mouse.row));
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((row, col)) = swatch_cell_at(self.swatch_area, mouse.column, mouse.row) {
                    match self.layout.index_at(row, col) {
                        Ok(index) => self.start_edit(index),
                        Err(err) => self.report(err),
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.doc.drag_to(self.pixel_at(mouse.column, mouse.row));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.doc.finish_drag();
            }
            MouseEventKind::Down(MouseButton::Right) if in_image => {
                self.doc.cancel_drag();
                self.doc.reset_selection_to_full_image();
            }
            MouseEventKind::Down(MouseButton::Middle) if in_image => {
                self.doc.rebuild();
            }
            MouseEventKind::ScrollDown => self.scroll_by(0, 1),
            MouseEventKind::ScrollUp => self.scroll_by(0, -1),
            _ => {}
        }
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.quit {
            self.drain_events();
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                _ => {}
            }
        }
        Ok(())
    }
}

/// Width of the swatch pane for `max_columns` swatches plus its border.
fn swatch_pane_width(max_columns: usize) -> u16 {
    u16::try_from(max_columns)
        .unwrap_or(u16::MAX)
        .saturating_mul(SWATCH_WIDTH)
        .saturating_add(2)
}

/// Launch the editor and block until the user quits.
pub fn run(mut app: TuiApp) -> Result<()> {
    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;
    let result = app.event_loop(&mut terminal);
    execute!(stdout(), DisableMouseCapture)?;
    ratatui::restore();
    let pending = app.doc.history().len();
    if pending > 0 {
        log::info!("quit with {pending} edits in history");
    }
    result
}
