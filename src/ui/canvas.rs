//! Character grid painted from a diagram.
//!
//! Drawables are painted in ascending z order, and in list order within
//! one z, so labels end up on top of brackets. Pass-through legs are painted
//! last, over any label in the lane they cross. Every cell remembers which
//! drawable painted it last; the UI uses that to style and highlight.

use crate::layout::{Diagram, DrawableKind};
use crate::text::char_width;
use crate::ui::glyphs::Glyphs;

/// Placeholder for the second cell of a double-width character.
pub const WIDE_CONTINUATION: char = '\0';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    /// Index of the drawable that painted this cell
    pub owner: Option<usize>,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', owner: None }
    }
}

/// A fixed-size character grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    /// Creates a blank canvas.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Paints every drawable of the diagram.
    pub fn paint(diagram: &Diagram, glyphs: &Glyphs) -> Self {
        let mut canvas = Self::new(diagram.width, diagram.height);

        let mut order: Vec<usize> = (0..diagram.drawables.len()).collect();
        order.sort_by_key(|&idx| diagram.drawables[idx].z);

        for idx in order {
            let drawable = &diagram.drawables[idx];
            match &drawable.kind {
                DrawableKind::Bracket { glyphs: arc, .. } => {
                    for glyph in arc {
                        canvas.set(glyph.x, glyph.y, glyphs.char_for(glyph.kind), Some(idx));
                    }
                }
                DrawableKind::Label { text, .. } => {
                    canvas.put_str(drawable.rect.x, drawable.rect.y, text, Some(idx));
                }
            }
        }

        for (idx, drawable) in diagram.drawables.iter().enumerate() {
            if let DrawableKind::Bracket { glyphs: arc, .. } = &drawable.kind {
                for glyph in arc.iter().filter(|g| g.kind.is_leg()) {
                    canvas.set(glyph.x, glyph.y, glyphs.char_for(glyph.kind), Some(idx));
                }
            }
        }
        canvas
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Writes one cell; returns false when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, ch: char, owner: Option<usize>) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.cells[y * self.width + x] = Cell { ch, owner };
        true
    }

    /// Writes text starting at `(x, y)`, clipped at the right edge.
    pub fn put_str(&mut self, x: usize, y: usize, text: &str, owner: Option<usize>) {
        let mut col = x;
        for ch in text.chars() {
            let width = char_width(ch);
            if width == 0 {
                continue;
            }
            if col + width > self.width {
                break;
            }
            self.set(col, y, ch, owner);
            if width == 2 {
                self.set(col + 1, y, WIDE_CONTINUATION, owner);
            }
            col += width;
        }
    }

    /// Cells of one row.
    pub fn row(&self, y: usize) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Text of one row, without trailing spaces.
    pub fn row_text(&self, y: usize) -> String {
        let line: String = self
            .row(y)
            .iter()
            .filter(|c| c.ch != WIDE_CONTINUATION)
            .map(|c| c.ch)
            .collect();
        line.trim_end_matches(' ').to_string()
    }
}
