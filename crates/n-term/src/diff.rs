// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Each frame is compared against the previous one and only changed cells
// are written. Holding a key on the text field changes one row; cycling
// the vision mode changes the swatch area. Neither repaints the screen.
//
// Per frame:
//
//   1. The view paints into a FrameBuffer.
//   2. `render()` diffs it against the stored previous frame. Unchanged
//      rows are skipped with one slice comparison.
//   3. Changed cells go through a CellWriter that drops redundant cursor
//      moves and SGR changes.
//   4. Everything lands in one byte buffer, wrapped in synchronized
//      output; `flush_to()` writes it in a single call.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::cell::{Attr, Cell, CellColor};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What a render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub cells_rendered: usize,
    pub cells_skipped: usize,
    pub bytes_written: usize,
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Tracks what the terminal already has so repeated state isn't re-sent.
///
/// - The cursor move is skipped when the next cell is `(last_x + 1, last_y)`.
/// - On an attribute change, SGR 0 is sent first (when old attrs were set)
///   and the color tracking is invalidated.
/// - A continuation cell right after its wide glyph writes nothing.
#[allow(clippy::struct_field_names)]
struct CellWriter {
    last_x: i32,
    last_y: i32,
    last_fg: Option<CellColor>,
    last_bg: Option<CellColor>,
    last_attrs: Attr,
}

impl CellWriter {
    const fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_fg: None,
            last_bg: None,
            last_attrs: Attr::empty(),
        }
    }

    fn render_cell(&mut self, out: &mut Vec<u8>, x: u16, y: u16, cell: &Cell) {
        let xi = i32::from(x);
        let yi = i32::from(y);

        if cell.is_continuation() && yi == self.last_y && xi == self.last_x + 1 {
            self.last_x = xi;
            return;
        }
        if yi != self.last_y || xi != self.last_x + 1 {
            ansi::cursor_to(out, x, y).ok();
        }
        self.apply_style(out, cell);

        let ch = if cell.is_continuation() { ' ' } else { cell.ch };
        let mut enc = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());

        self.last_x = xi;
        self.last_y = yi;
    }

    fn apply_style(&mut self, out: &mut Vec<u8>, cell: &Cell) {
        if cell.attrs != self.last_attrs {
            if !self.last_attrs.is_empty() {
                ansi::reset(out).ok();
                self.last_fg = None;
                self.last_bg = None;
            }
            self.last_attrs = cell.attrs;
            ansi::attrs(out, cell.attrs).ok();
        }
        if self.last_fg != Some(cell.fg) {
            ansi::fg(out, cell.fg).ok();
            self.last_fg = Some(cell.fg);
        }
        if self.last_bg != Some(cell.bg) {
            ansi::bg(out, cell.bg).ok();
            self.last_bg = Some(cell.bg);
        }
    }
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Emits ANSI only for cells that changed since the last frame.
///
/// ```
/// use n_term::buffer::FrameBuffer;
/// use n_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let frame = FrameBuffer::new(20, 4);
/// assert_eq!(renderer.render(&frame).cells_rendered, 80);
/// assert_eq!(renderer.render(&frame).cells_rendered, 0);
/// ```
pub struct DiffRenderer {
    output: Vec<u8>,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// A renderer whose first frame draws everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: Vec::with_capacity(16_384),
            previous: None,
        }
    }

    /// Diff `current` against the previous frame into the output buffer.
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        let mut writer = CellWriter::new();
        let mut stats = RenderStats::default();
        let (width, height) = (current.width(), current.height());

        if width == 0 || height == 0 {
            self.previous = Some(current.clone());
            return stats;
        }

        ansi::begin_sync(&mut self.output).ok();

        let prev = self
            .previous
            .take()
            .filter(|p| p.width() == width && p.height() == height);
        if prev.is_none() {
            ansi::clear_screen(&mut self.output).ok();
        }

        for y in 0..height {
            let Some(row) = current.row(y) else { continue };
            let prev_row = prev.as_ref().and_then(|p| p.row(y));
            if prev_row == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }
            for (x, cell) in (0..width).zip(row) {
                if prev_row.is_some_and(|p| p[usize::from(x)] == *cell) {
                    stats.cells_skipped += 1;
                } else {
                    writer.render_cell(&mut self.output, x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        ansi::reset(&mut self.output).ok();
        ansi::end_sync(&mut self.output).ok();
        stats.bytes_written = self.output.len();

        self.previous = Some(current.clone());
        stats
    }

    /// Bytes produced by the last [`render`](Self::render).
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Write the pending output to `w` and clear it.
    ///
    /// # Errors
    ///
    /// Returns the writer's I/O error.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.output.is_empty() {
            w.write_all(&self.output)?;
            w.flush()?;
            self.output.clear();
        }
        Ok(())
    }

    /// Forget the previous frame so the next render repaints everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
