//! Projection of the application state onto a grid of styled cells.
//!
//! [`render`] never touches the terminal or mutates state; [`draw`] is the
//! only function here that writes escape sequences.

use std::io::Write;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use devtunnel_tui_core::command_definitions::CommandSpec;
use devtunnel_tui_core::error::Result;
use devtunnel_tui_core::execution::Executor;
use devtunnel_tui_core::interpolation::command_text;
use itertools::Itertools;
use unicode_width::UnicodeWidthChar;

use super::colors::{self, Style};
use super::input::TextInput;
use super::layout::Rect;
use super::state::App;
use super::types::{ArgumentForm, Mode};

const TITLE: &str = " DevTunnels TUI ";
const SPINNER_FRAMES: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

/// Rows of the commands pane below the list: blank, selected, example
const COMMAND_FOOTER_ROWS: usize = 3;

const HELP_LINES: [(&str, &str); 13] = [
    ("←/→ h/l", "previous / next category"),
    ("↑/↓ j/k", "previous / next command"),
    ("g / G", "first / last command"),
    ("1-9", "jump to category"),
    ("enter", "run selected command"),
    ("/", "filter commands"),
    (":", "type a raw command"),
    ("r", "rerun last command"),
    ("u/d", "scroll output"),
    ("PgUp/PgDn", "scroll output"),
    ("tab", "next form field"),
    ("?", "toggle this help"),
    ("q / ctrl-c", "quit"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    pub style: Style,
    /// Right half of a double width symbol in the cell to the left
    pub continuation: bool,
}

impl Cell {
    fn blank(style: Style) -> Self {
        Self {
            symbol: ' ',
            style,
            continuation: false,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Style::default())
    }
}

/// A styled run of text on one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// One full screen of output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    /// Where the terminal cursor should sit, when a text field has focus
    cursor: Option<(u16, u16)>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
            cursor: None,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize)
    }

    fn cell_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get_mut(y as usize * self.width as usize + x as usize)
    }

    /// Blanks whatever half of a double width symbol would survive
    /// overwriting the cell at `(x, y)`.
    fn split_wide_symbol(&mut self, x: u16, y: u16) {
        let Some(&cell) = self.cell(x, y) else {
            return;
        };

        if cell.continuation && x > 0 {
            if let Some(left) = self.cell_mut(x - 1, y) {
                *left = Cell::blank(left.style);
            }
        }

        let right_is_continuation = self
            .cell(x.saturating_add(1), y)
            .is_some_and(|right| right.continuation);
        if right_is_continuation {
            if let Some(right) = self.cell_mut(x + 1, y) {
                *right = Cell::blank(right.style);
            }
        }
    }

    fn put(&mut self, x: u16, y: u16, cell: Cell) {
        self.split_wide_symbol(x, y);
        if let Some(target) = self.cell_mut(x, y) {
            *target = cell;
        }
    }

    /// Writes `text` starting at `(x, y)`, clipped to `max_width` columns and
    /// the frame. Double width symbols take two cells; zero width and control
    /// characters are skipped. Returns the column after the last written symbol.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style, max_width: u16) -> u16 {
        let limit = x.saturating_add(max_width).min(self.width);
        let mut column = x;

        for symbol in text.chars() {
            let width = symbol.width().unwrap_or(0) as u16;
            if width == 0 {
                continue;
            }
            if column.saturating_add(width) > limit {
                break;
            }

            let base = self.cell(column, y).map_or(Style::default(), |cell| cell.style);
            let style = style.over(base);
            self.put(
                column,
                y,
                Cell {
                    symbol,
                    style,
                    continuation: false,
                },
            );
            if width == 2 {
                self.put(
                    column + 1,
                    y,
                    Cell {
                        symbol: ' ',
                        style,
                        continuation: true,
                    },
                );
            }
            column += width;
        }

        column
    }

    pub fn fill(&mut self, area: Rect, style: Style) {
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                self.put(x, y, Cell::blank(style));
            }
        }
    }

    pub fn draw_box(&mut self, area: Rect, style: Style) {
        if area.width < 2 || area.height < 2 {
            return;
        }

        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;
        let horizontal = "─".repeat(area.width as usize - 2);

        self.set_string(area.x, area.y, "┌", style, 1);
        self.set_string(area.x + 1, area.y, &horizontal, style, area.width - 2);
        self.set_string(right, area.y, "┐", style, 1);
        for y in area.y + 1..bottom {
            self.set_string(area.x, y, "│", style, 1);
            self.set_string(right, y, "│", style, 1);
        }
        self.set_string(area.x, bottom, "└", style, 1);
        self.set_string(area.x + 1, bottom, &horizontal, style, area.width - 2);
        self.set_string(right, bottom, "┘", style, 1);
    }

    /// Plain text of one row without trailing blanks.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = y as usize * self.width as usize;
        let text: String = self.cells[start..start + self.width as usize]
            .iter()
            .filter(|cell| !cell.continuation)
            .map(|cell| cell.symbol)
            .collect();
        text.trim_end().to_string()
    }

    /// One row as runs of identically styled cells.
    pub fn row_spans(&self, y: u16) -> Vec<Span> {
        if y >= self.height {
            return Vec::new();
        }
        let start = y as usize * self.width as usize;
        let runs = self.cells[start..start + self.width as usize]
            .iter()
            .chunk_by(|cell| cell.style);

        let spans = runs
            .into_iter()
            .map(|(style, cells)| Span {
                text: cells
                    .filter(|cell| !cell.continuation)
                    .map(|cell| cell.symbol)
                    .collect(),
                style,
            })
            .collect();
        spans
    }

    /// Whether any row contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }
}

/// Builds the frame for the current state.
pub fn render<E: Executor>(app: &App<E>) -> Frame {
    let layout = app.layout();
    let mut frame = Frame::new(layout.width, layout.height);

    render_header(&mut frame, app);
    render_categories(&mut frame, app);
    render_commands(&mut frame, app);
    render_output(&mut frame, app);
    render_bottom_bar(&mut frame, app);

    if app.show_help() {
        render_help(&mut frame);
    }

    frame
}

fn spinner_glyph(frame_index: usize) -> char {
    SPINNER_FRAMES[frame_index % SPINNER_FRAMES.len()]
}

fn render_header<E: Executor>(frame: &mut Frame, app: &App<E>) {
    let width = frame.width();
    frame.fill(Rect::new(0, 0, width, 1), colors::HEADER_INFO);

    let mut x = frame.set_string(0, 0, TITLE, colors::HEADER, width);
    x = frame.set_string(
        x,
        0,
        &format!(" mode:{}  ", app.mode().label()),
        colors::HEADER_INFO,
        width.saturating_sub(x),
    );

    if app.is_running() {
        let glyph = spinner_glyph(app.spinner_frame()).to_string();
        x = frame.set_string(x, 0, &glyph, colors::SPINNER, width.saturating_sub(x));
        x = frame.set_string(x, 0, " ", colors::HEADER_INFO, width.saturating_sub(x));
    }

    let status = app.status();
    frame.set_string(
        x,
        0,
        &status.text,
        colors::status_style(status.level),
        width.saturating_sub(x),
    );
}

/// Draws the border and title of a pane and returns the padded content area.
fn render_pane(frame: &mut Frame, area: Rect, title: &str, focused: bool) -> Rect {
    let border = if focused {
        colors::FOCUS_BORDER
    } else {
        colors::PANE_BORDER
    };
    frame.draw_box(area, border);

    let inner = area.inner();
    let content = Rect::new(
        inner.x.saturating_add(1),
        inner.y,
        inner.width.saturating_sub(2),
        inner.height,
    );
    frame.set_string(content.x, content.y, title, colors::PANE_TITLE, content.width);
    content
}

fn render_list_line(frame: &mut Frame, area: Rect, row: u16, line: &str, selected: bool) {
    let style = if selected {
        colors::SELECTED
    } else {
        colors::NORMAL
    };
    frame.set_string(area.x, row, &format!(" {line} "), style, area.width);
}

fn render_categories<E: Executor>(frame: &mut Frame, app: &App<E>) {
    let area = render_pane(frame, app.layout().categories, "Resources", false);

    let rows = area.height.saturating_sub(1) as usize;
    for (i, category) in app.catalog().iter().take(rows).enumerate() {
        let line = format!("{} {}", i + 1, category.name);
        let row = area.y + 1 + i as u16;
        render_list_line(frame, area, row, &line, i == app.category_index());
    }
}

fn full_command_line(tool: &str, command: &CommandSpec) -> String {
    let mut argv = vec![tool.to_string()];
    argv.extend(command.base_args.iter().cloned());
    command_text(&argv)
}

fn render_commands<E: Executor>(frame: &mut Frame, app: &App<E>) {
    let focused = *app.mode() == Mode::Normal;
    let area = render_pane(frame, app.layout().commands, "Commands", focused);
    let bottom = area.y + area.height;
    let mut row = area.y + 1;

    let filter = app.filter().value();
    if !filter.trim().is_empty() {
        frame.set_string(area.x, row, &format!("filter: {filter}"), colors::DIM, area.width);
        row += 1;
    }

    let visible = app.visible_commands();
    if visible.is_empty() {
        frame.set_string(area.x, row, "No commands match filter", colors::DIM, area.width);
        return;
    }

    let list_rows = (bottom.saturating_sub(row) as usize)
        .saturating_sub(COMMAND_FOOTER_ROWS)
        .max(1);
    let selected_index = app.command_index().min(visible.len() - 1);
    let offset = (selected_index + 1).saturating_sub(list_rows);

    for (i, command) in visible.iter().enumerate().skip(offset).take(list_rows) {
        render_list_line(frame, area, row, &command.to_string(), i == selected_index);
        row += 1;
    }

    row += 1;
    let selected = visible[selected_index];
    frame.set_string(
        area.x,
        row,
        &format!("selected: {}", full_command_line(app.tool(), selected)),
        colors::DIM,
        area.width,
    );
    row += 1;

    if let Some(example) = &selected.example {
        frame.set_string(
            area.x,
            row,
            &format!("example: {} {example}", app.tool()),
            colors::DIM,
            area.width,
        );
    }
}

fn render_output<E: Executor>(frame: &mut Frame, app: &App<E>) {
    let layout = app.layout();
    let area = render_pane(frame, layout.output, "Output", false);

    let lines = app.output_lines();
    for (i, line) in lines
        .iter()
        .skip(app.output_scroll())
        .take(layout.output_rows())
        .enumerate()
    {
        let row = area.y + 1 + i as u16;
        frame.set_string(area.x, row, line, colors::NORMAL, area.width);
    }
}

/// Draws a text field and parks the terminal cursor inside it.
fn render_input(frame: &mut Frame, x: u16, y: u16, input: &TextInput, max_width: u16) -> u16 {
    let mut end = frame.set_string(x, y, input.prompt(), colors::COMMAND_LINE, max_width);
    let value_x = end;
    let remaining = max_width.saturating_sub(end - x);

    if input.value().is_empty() {
        end = frame.set_string(end, y, input.placeholder(), colors::DIM, remaining);
    } else {
        end = frame.set_string(end, y, input.value(), colors::COMMAND_LINE, remaining);
    }

    let cursor_x = value_x.saturating_add(input.cursor() as u16);
    frame.cursor = Some((cursor_x.min(x + max_width.saturating_sub(1)), y));
    end
}

fn render_bottom_bar<E: Executor>(frame: &mut Frame, app: &App<E>) {
    let area = app.layout().bottom_bar;
    let x = 1;
    let width = area.width.saturating_sub(2);

    match app.mode() {
        Mode::Form(form) => {
            frame.fill(area, colors::COMMAND_LINE);
            render_form(frame, area, form, app.tool());
        }
        Mode::RawCommand(input) => {
            frame.fill(Rect::new(area.x, area.y, area.width, 1), colors::COMMAND_LINE);
            let end = render_input(frame, x, area.y, input, width);
            let hint_x = end.saturating_add(2);
            frame.set_string(
                hint_x,
                area.y,
                "(Enter run, Esc cancel)",
                colors::COMMAND_LINE,
                width.saturating_sub(hint_x),
            );
        }
        Mode::Filtering => {
            frame.fill(Rect::new(area.x, area.y, area.width, 1), colors::COMMAND_LINE);
            let end = render_input(frame, x, area.y, app.filter(), width);
            let hint_x = end.saturating_add(2);
            frame.set_string(
                hint_x,
                area.y,
                "(Enter apply, Esc cancel)",
                colors::COMMAND_LINE,
                width.saturating_sub(hint_x),
            );
        }
        Mode::Running => {
            frame.fill(Rect::new(area.x, area.y, area.width, 1), colors::STATUS_BAR);
            let glyph = spinner_glyph(app.spinner_frame());
            frame.set_string(
                x,
                area.y,
                &format!("{glyph} command running, output appears when it finishes  (q quit)"),
                colors::STATUS_BAR,
                width,
            );
        }
        Mode::Normal => {
            frame.fill(Rect::new(area.x, area.y, area.width, 1), colors::STATUS_BAR);
            let help = [
                ("←/→", "category"),
                ("↑/↓", "command"),
                ("enter", "run"),
                (":", "raw cmd"),
                ("/", "filter"),
                ("u/d", "output scroll"),
                ("r", "rerun"),
                ("?", "help"),
                ("q", "quit"),
            ];

            let mut column = x;
            for (key, description) in help {
                let remaining = width.saturating_sub(column);
                column = frame.set_string(column, area.y, key, colors::HOTKEY, remaining);
                let remaining = width.saturating_sub(column);
                column = frame.set_string(
                    column,
                    area.y,
                    &format!(" {description}  "),
                    colors::STATUS_BAR,
                    remaining,
                );
            }
        }
    }
}

fn render_form(frame: &mut Frame, area: Rect, form: &ArgumentForm, tool: &str) {
    let x = area.x + 1;
    let width = area.width.saturating_sub(2);
    let field = form.focused();

    let kind = if form.is_optional_field(form.focus) {
        " (optional)"
    } else {
        ""
    };

    frame.set_string(
        x,
        area.y,
        &format!("Run: {}", full_command_line(tool, &form.command)),
        colors::COMMAND_LINE,
        width,
    );
    frame.set_string(
        x,
        area.y + 1,
        &format!(
            "Field {}/{} - {}{kind}",
            form.focus + 1,
            form.fields.len(),
            field.label
        ),
        colors::COMMAND_LINE,
        width,
    );
    frame.set_string(
        x,
        area.y + 3,
        "Enter next/run, Tab switch field, Esc cancel",
        colors::COMMAND_LINE,
        width,
    );
    render_input(frame, x, area.y + 2, &field.input, width);
}

fn render_help(frame: &mut Frame) {
    let key_width = HELP_LINES
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);
    let lines: Vec<String> = HELP_LINES
        .iter()
        .map(|(key, description)| format!("{key:<key_width$}  {description}"))
        .collect();

    let content_width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as u16;
    let box_width = (content_width + 4).min(frame.width());
    let box_height = (lines.len() as u16 + 4).min(frame.height());
    let area = Rect::new(
        frame.width().saturating_sub(box_width) / 2,
        frame.height().saturating_sub(box_height) / 2,
        box_width,
        box_height,
    );

    frame.fill(area, colors::STATUS_BAR);
    frame.draw_box(area, colors::FOCUS_BORDER.over(colors::STATUS_BAR));

    let inner = area.inner();
    let x = inner.x + 1;
    let width = inner.width.saturating_sub(2);
    frame.set_string(x, inner.y, "Keys", colors::PANE_TITLE, width);
    for (i, line) in lines.iter().enumerate() {
        frame.set_string(x, inner.y + 1 + i as u16, line, colors::STATUS_BAR, width);
    }
}

/// Queues `frame` to `out` and flushes it.
pub fn draw<W: Write>(out: &mut W, frame: &Frame) -> Result<()> {
    queue!(out, Hide)?;

    for y in 0..frame.height() {
        queue!(out, MoveTo(0, y))?;
        for span in frame.row_spans(y) {
            queue!(
                out,
                SetForegroundColor(span.style.fg.unwrap_or(Color::Reset)),
                SetBackgroundColor(span.style.bg.unwrap_or(Color::Reset)),
                SetAttribute(if span.style.bold {
                    Attribute::Bold
                } else {
                    Attribute::NormalIntensity
                }),
                Print(span.text),
            )?;
        }
    }

    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    if let Some((x, y)) = frame.cursor() {
        queue!(out, MoveTo(x, y), Show)?;
    }

    out.flush()?;
    Ok(())
}
