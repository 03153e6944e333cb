/// Minimum width of the categories pane
const MIN_CATEGORY_WIDTH: u16 = 20;
/// Minimum width of the commands pane
const MIN_COMMAND_WIDTH: u16 = 36;
/// Minimum width of the output pane
const MIN_OUTPUT_WIDTH: u16 = 30;
/// Minimum height of the three panes
const MIN_BODY_HEIGHT: u16 = 8;

/// Rows taken by the header line
pub const HEADER_ROWS: u16 = 1;
/// Rows reserved below the panes for help, text fields and the form
pub const BOTTOM_BAR_ROWS: u16 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The area inside a one cell border.
    pub fn inner(&self) -> Rect {
        Rect {
            x: self.x.saturating_add(1),
            y: self.y.saturating_add(1),
            width: self.width.saturating_sub(2),
            height: self.height.saturating_sub(2),
        }
    }
}

/// Pane geometry derived from the terminal size.
///
/// Panes keep their minimum sizes even on tiny terminals; whatever does not
/// fit is clipped when drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    pub categories: Rect,
    pub commands: Rect,
    pub output: Rect,
    pub bottom_bar: Rect,
}

impl Layout {
    pub fn new(width: u16, height: u16) -> Self {
        let category_width = MIN_CATEGORY_WIDTH.max(width / 5);
        let command_width = MIN_COMMAND_WIDTH.max(width / 3);
        let output_width =
            MIN_OUTPUT_WIDTH.max(width.saturating_sub(category_width + command_width));
        let body_height =
            MIN_BODY_HEIGHT.max(height.saturating_sub(HEADER_ROWS + BOTTOM_BAR_ROWS));

        let y = HEADER_ROWS;
        Self {
            width,
            height,
            categories: Rect::new(0, y, category_width, body_height),
            commands: Rect::new(category_width, y, command_width, body_height),
            output: Rect::new(category_width + command_width, y, output_width, body_height),
            bottom_bar: Rect::new(0, y + body_height, width, BOTTOM_BAR_ROWS),
        }
    }

    /// Rows of output text visible below the output pane title.
    pub fn output_rows(&self) -> usize {
        self.output.inner().height.saturating_sub(1).max(1) as usize
    }
}
