// SPDX-License-Identifier: MIT
//
// FrameBuffer — the 2D cell grid the palette view paints to.
//
// The view paints swatches, labels, the input field and toasts here each
// frame; the diff renderer then compares the frame against the previous
// one and emits only the changed cells.
//
//   - Flat `Vec<Cell>`, row-major: `index = y * width + x`. The renderer
//     scans rows left to right, so a row is one contiguous slice.
//
//   - Paint operations clip to the buffer. Callers that want a narrower
//     region pass a `Rect` and paint operations intersect with it.
//
//   - Wide characters occupy two columns. The first cell holds the
//     codepoint; the second is a continuation (`'\0'`). Writing over
//     either half breaks the pair so no half-glyph reaches the terminal.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Attr, Cell, CellColor};

// ─── Rect ────────────────────────────────────────────────────────────────────

/// A screen-space rectangle.
///
/// ```
/// use n_term::buffer::Rect;
///
/// let r = Rect::new(10, 5, 20, 4);
/// assert!(r.contains(10, 5));
/// assert!(r.contains(29, 8));
/// assert!(!r.contains(30, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, px: u16, py: u16) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Overlap of two rectangles, or `None` if they don't touch.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        (x2 > x1 && y2 > y1).then(|| Self::new(x1, y1, x2 - x1, y2 - y1))
    }

    /// Split into a `cols × rows` grid of near-equal cells, row-major.
    ///
    /// Remainder columns and rows go to the last cell in each direction, so
    /// the pieces tile the rectangle exactly.
    #[must_use]
    pub fn grid(self, cols: u16, rows: u16) -> Vec<Self> {
        if cols == 0 || rows == 0 {
            return Vec::new();
        }
        let cw = self.width / cols;
        let ch = self.height / rows;
        let mut out = Vec::with_capacity(usize::from(cols) * usize::from(rows));
        for row in 0..rows {
            for col in 0..cols {
                let x = self.x + col * cw;
                let y = self.y + row * ch;
                let w = if col + 1 == cols { self.right() - x } else { cw };
                let h = if row + 1 == rows { self.bottom() - y } else { ch };
                out.push(Self::new(x, y, w, h));
            }
        }
        out
    }
}

// ─── FrameBuffer ─────────────────────────────────────────────────────────────

/// The cell grid for one frame.
///
/// ```
/// use n_term::buffer::FrameBuffer;
/// use n_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// buf.set(5, 3, Cell::new('X'));
/// assert_eq!(buf.get(5, 3).map(|c| c.ch), Some('X'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// A buffer of blank cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a [`Rect`].
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The cell at `(x, y)`, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.in_bounds(x, y).then(|| &self.cells[self.index(x, y)])
    }

    /// The raw cell slice, row-major.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row as a slice.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        (y < self.height).then(|| {
            let start = self.index(0, y);
            &self.cells[start..start + usize::from(self.width)]
        })
    }

    /// A row's characters as a `String`, continuation cells skipped.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().filter(|c| !c.is_continuation()).map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize and clear.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    // ─── Writes ──────────────────────────────────────────────────────────

    /// Bounds-checked raw write. No wide-char cleanup.
    ///
    /// Returns `true` if the position was in bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Break any wide character touching `(x, y)`.
    fn break_wide_char_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);
        if self.cells[idx].is_continuation() && x > 0 {
            let prev = self.index(x - 1, y);
            self.cells[prev].ch = ' ';
        }
        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next] = Cell::EMPTY;
            }
        }
    }

    /// Fill a rectangle with blank cells on `bg`.
    pub fn fill_rect(&mut self, rect: Rect, bg: CellColor) {
        let Some(r) = rect.intersect(self.bounds()) else {
            return;
        };
        let blank = Cell::EMPTY.with_bg(bg);
        for y in r.y..r.bottom() {
            if r.x > 0 {
                self.break_wide_char_at(r.x, y);
            }
            let start = self.index(r.x, y);
            let end = self.index(r.right(), y);
            self.cells[start..end].fill(blank);
            if r.right() < self.width {
                self.break_wide_char_at(r.right(), y);
            }
        }
    }

    /// Print `text` starting at `(x, y)`, clipped to `clip` (or the buffer).
    ///
    /// The background of each touched cell is kept unless `bg` is given, so
    /// labels can sit on top of a filled swatch. Zero-width characters are
    /// skipped; a wide character that would straddle the clip edge is
    /// replaced by a space.
    ///
    /// Returns the number of columns consumed.
    #[allow(clippy::too_many_arguments)]
    pub fn print(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: CellColor,
        bg: Option<CellColor>,
        attrs: Attr,
        clip: Option<Rect>,
    ) -> u16 {
        let area = clip.map_or(Some(self.bounds()), |c| c.intersect(self.bounds()));
        let Some(area) = area else {
            return 0;
        };
        if !area.contains(area.x.max(x), y) {
            return 0;
        }

        let mut col = x;
        for ch in text.chars() {
            if col >= area.right() {
                break;
            }
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if col < area.x {
                col = col.saturating_add(w);
                continue;
            }
            let wide = w == 2;
            let glyph = if wide && col + 1 >= area.right() { ' ' } else { ch };

            self.paint(col, y, glyph, fg, bg, attrs);
            if wide && glyph != ' ' {
                self.paint(col + 1, y, '\0', fg, bg, attrs);
            }
            col = col.saturating_add(if glyph == ' ' { 1 } else { w });
        }
        col.saturating_sub(x)
    }

    fn paint(&mut self, x: u16, y: u16, ch: char, fg: CellColor, bg: Option<CellColor>, attrs: Attr) {
        if ch != '\0' {
            self.break_wide_char_at(x, y);
        }
        let idx = self.index(x, y);
        let keep_bg = self.cells[idx].bg;
        self.cells[idx] = Cell {
            ch,
            fg,
            bg: bg.unwrap_or(keep_bg),
            attrs,
        };
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width ──────────────────────────────────────────────────────────────

/// Display width of a character: 0, 1 or 2 columns.
///
/// ```
/// use n_term::buffer::char_width;
///
/// assert_eq!(char_width('a'), 1);
/// assert_eq!(char_width('中'), 2);
/// assert_eq!(char_width('\n'), 0);
/// ```
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn char_width(ch: char) -> u16 {
    ch.width().unwrap_or(0) as u16
}

/// Display width of a string in columns.
#[must_use]
pub fn string_width(s: &str) -> u16 {
    s.chars().map(char_width).fold(0, u16::saturating_add)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
