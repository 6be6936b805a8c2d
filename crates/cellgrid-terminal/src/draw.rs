//! Geometry helpers on [`Canvas`].
//!
//! Plain coordinate generators; every cell goes through
//! [`Canvas::write_cell`].

use crate::canvas::Canvas;
use cellgrid_core::{Color24, StyleMask};

/// Border style using Unicode box-drawing characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// Rounded corners: ╭─╮│╰─╯
    #[default]
    Rounded,
    /// Single line: ┌─┐│└─┘
    Single,
    /// Double line: ╔═╗║╚═╝
    Double,
    /// Heavy/thick: ┏━┓┃┗━┛
    Heavy,
    /// ASCII only: +-+|+-+
    Ascii,
}

impl BorderStyle {
    /// Border characters: (`top_left`, horizontal, `top_right`, vertical, `bottom_left`, `bottom_right`)
    #[must_use]
    pub const fn chars(self) -> (char, char, char, char, char, char) {
        match self {
            Self::Rounded => ('╭', '─', '╮', '│', '╰', '╯'),
            Self::Single => ('┌', '─', '┐', '│', '└', '┘'),
            Self::Double => ('╔', '═', '╗', '║', '╚', '╝'),
            Self::Heavy => ('┏', '━', '┓', '┃', '┗', '┛'),
            Self::Ascii => ('+', '-', '+', '|', '+', '+'),
        }
    }
}

impl Canvas {
    /// Draw `glyph` along the line from `(x0, y0)` to `(x1, y1)`, both ends
    /// included.
    ///
    /// Points wrap onto the grid like [`Canvas::write_cell`]. At most one
    /// point per grid cell is plotted; a longer line stops there.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        glyph: char,
        fg: Color24,
        bg: Color24,
        style: StyleMask,
    ) {
        let (x0, y0, x1, y1) = (
            i64::from(x0),
            i64::from(y0),
            i64::from(x1),
            i64::from(y1),
        );

        // Bresenham's line algorithm
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;
        let mut budget = self.grid().cell_count();

        loop {
            self.plot(x, y, glyph, fg, bg, style);
            budget -= 1;

            if (x == x1 && y == y1) || budget == 0 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a rounded box in the default colors with its top-left corner
    /// at `(x, y)`.
    ///
    /// `title`, if any, is written into the top edge from column `x + 2`.
    /// Boxes narrower or shorter than 2 draw nothing.
    pub fn draw_box(&mut self, x: i32, y: i32, width: i32, height: i32, title: Option<&str>) {
        self.draw_box_styled(
            x,
            y,
            width,
            height,
            title,
            BorderStyle::Rounded,
            Color24::DEFAULT_FG,
        );
    }

    /// Draw a box with an explicit border style and color.
    ///
    /// Edges wrap onto the grid. An edge longer than the grid covers it
    /// once and stops.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_box_styled(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        title: Option<&str>,
        border: BorderStyle,
        fg: Color24,
    ) {
        if width < 2 || height < 2 {
            return;
        }
        let (tl, h, tr, v, bl, br) = border.chars();
        let bg = Color24::DEFAULT_BG;
        let none = StyleMask::NONE;
        let (x, y) = (i64::from(x), i64::from(y));
        let right = x + i64::from(width) - 1;
        let bottom = y + i64::from(height) - 1;
        let grid = self.grid();

        for col in (x + 1..right).take(grid.cell_count()) {
            self.plot(col, y, h, fg, bg, none);
            self.plot(col, bottom, h, fg, bg, none);
        }
        for row in (y + 1..bottom).take(usize::from(grid.height())) {
            self.plot(x, row, v, fg, bg, none);
            self.plot(right, row, v, fg, bg, none);
        }
        self.plot(x, y, tl, fg, bg, none);
        self.plot(right, y, tr, fg, bg, none);
        self.plot(x, bottom, bl, fg, bg, none);
        self.plot(right, bottom, br, fg, bg, none);

        if let Some(title) = title {
            for (col, glyph) in (x + 2..).zip(title.chars()) {
                self.plot(col, y, glyph, fg, bg, none);
            }
        }
    }

    fn plot(&mut self, x: i64, y: i64, glyph: char, fg: Color24, bg: Color24, style: StyleMask) {
        let index = self.grid().wrap_point(x, y);
        self.put(index, glyph, fg, bg, style);
    }
}
