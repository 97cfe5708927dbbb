// SPDX-License-Identifier: MIT
//
// View — paints the palette screen into a FrameBuffer.
//
//   ┌──────────────────────────────────────────┐
//   │ n-palette               vision: normal   │  row 0 (INVERSE)
//   │                                          │
//   │ Base   #3498db▏ [Enter] Generate         │  row 2
//   │                                          │
//   │ ▸░░░░░░░░░░░░░░░░░░▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒ │
//   │ ░░░░░#3498db░░░░░░░▒▒▒▒▒#67cc0e▒▒▒▒▒▒▒▒ │  2×2 swatch grid filled
//   │ ░░░░░Copied!░░░░░░░▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒ │  with simulated colors,
//   │ ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓█████████████████████ │  labels show the
//   │ ▓▓▓▓▓#0165a8▓▓▓▓▓▓▓██████#cb6724████████ │  generated hex
//   │ ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓███ Toast title ██████ │  toast bottom-right
//   │                    ███ description ██████ │
//   │ Tab focus  ^Y hex  ^E vision  …  Esc quit │  last row (DIM)
//   └──────────────────────────────────────────┘
//
// Rendering is a pure function of `Screen`; all state lives in the shell.

use n_color::SimulationMode;
use n_term::buffer::{FrameBuffer, Rect, string_width};
use n_term::cell::{Attr, CellColor};

use crate::field::TextField;
use crate::shell::Swatch;
use crate::toast::{Toast, ToastKind};

/// Column where the field text starts.
const FIELD_X: u16 = 8;
const INPUT_Y: u16 = 2;
const GRID_TOP: u16 = 4;

const INK_DARK: CellColor = CellColor::Rgb(0, 0, 0);
const INK_LIGHT: CellColor = CellColor::Rgb(255, 255, 255);
const TOAST_SUCCESS: CellColor = CellColor::Rgb(0x1e, 0x8e, 0x3e);
const TOAST_ERROR: CellColor = CellColor::Rgb(0xc0, 0x39, 0x2b);

const HINTS_HEAD: &str = "Tab focus  ^Y hex  ^E vision  ";
const HINTS_EXPORT: &str = "^S CSS  ^P PNG  ";
const HINTS_TAIL: &str = "Esc quit";

/// Everything one frame needs.
pub struct Screen<'a> {
    pub mode: SimulationMode,
    pub input: &'a TextField,
    pub swatches: &'a [Swatch],
    pub toast: Option<&'a Toast>,
}

/// Paint `screen` and return the field cursor position, if visible.
pub fn render(screen: &Screen<'_>, frame: &mut FrameBuffer) -> Option<(u16, u16)> {
    let w = frame.width();
    let h = frame.height();
    if w == 0 || h == 0 {
        return None;
    }

    render_title(frame, screen.mode);
    let cursor = render_input(frame, screen.input);

    let grid = Rect::new(1, GRID_TOP, w.saturating_sub(2), h.saturating_sub(GRID_TOP + 2));
    if screen.swatches.is_empty() {
        render_placeholder(frame, grid);
    } else {
        render_swatches(frame, grid, screen.swatches);
    }

    if h > GRID_TOP {
        render_hints(frame, h - 1, !screen.swatches.is_empty());
    }
    if let Some(toast) = screen.toast {
        render_toast(frame, toast);
    }
    cursor
}

fn render_title(frame: &mut FrameBuffer, mode: SimulationMode) {
    let w = usize::from(frame.width());
    let left = " n-palette";
    let right = format!("vision: {mode} ");
    let pad = w.saturating_sub(left.len());
    let line = format!("{left}{right:>pad$}");
    frame.print(0, 0, &line, CellColor::Default, None, Attr::INVERSE | Attr::BOLD, None);
}

fn render_input(frame: &mut FrameBuffer, field: &TextField) -> Option<(u16, u16)> {
    frame.print(1, INPUT_Y, "Base", CellColor::Default, None, Attr::BOLD, None);
    let used = frame.print(FIELD_X, INPUT_Y, field.text(), CellColor::Default, None, Attr::UNDERLINE, None);

    let hint_x = FIELD_X + used.max(7) + 2;
    frame.print(hint_x, INPUT_Y, "[Enter] Generate", CellColor::Default, None, Attr::DIM, None);

    let x = FIELD_X.saturating_add(field.cursor_column());
    frame.in_bounds(x, INPUT_Y).then_some((x, INPUT_Y))
}

fn render_placeholder(frame: &mut FrameBuffer, area: Rect) {
    let msg = "Press Enter to generate a palette";
    let x = area.x + area.width.saturating_sub(string_width(msg)) / 2;
    let y = area.y + area.height / 2;
    frame.print(x, y, msg, CellColor::Default, None, Attr::DIM, Some(area));
}

fn render_swatches(frame: &mut FrameBuffer, area: Rect, swatches: &[Swatch]) {
    for (swatch, cell) in swatches.iter().zip(area.grid(2, 2)) {
        frame.fill_rect(cell, CellColor::from_u24(swatch.displayed.value()));
        let ink = if swatch.dark_label { INK_DARK } else { INK_LIGHT };

        let label = swatch.original.to_hex();
        let y = cell.y + cell.height / 2;
        frame.print(centered(cell, &label), y, &label, ink, None, Attr::BOLD, Some(cell));
        if swatch.copied {
            frame.print(centered(cell, "Copied!"), y + 1, "Copied!", ink, None, Attr::empty(), Some(cell));
        }
        if swatch.focused {
            frame.print(cell.x + 1, cell.y, "▸", ink, None, Attr::BOLD, Some(cell));
        }
    }
}

fn render_hints(frame: &mut FrameBuffer, y: u16, has_palette: bool) {
    let mut hints = String::from(HINTS_HEAD);
    if has_palette {
        hints.push_str(HINTS_EXPORT);
    }
    hints.push_str(HINTS_TAIL);
    frame.print(1, y, &hints, CellColor::Default, None, Attr::DIM, None);
}

/// Two rows (title, description) anchored above the hint row.
fn render_toast(frame: &mut FrameBuffer, toast: &Toast) {
    let w = frame.width();
    let h = frame.height();
    if h < GRID_TOP {
        return;
    }
    let inner = string_width(&toast.title).max(string_width(&toast.description));
    let box_w = (inner + 2).min(w);
    let area = Rect::new(w.saturating_sub(box_w + 1), h - 3, box_w, 2);

    let bg = match toast.kind {
        ToastKind::Success => TOAST_SUCCESS,
        ToastKind::Error => TOAST_ERROR,
    };
    frame.fill_rect(area, bg);
    frame.print(area.x + 1, area.y, &toast.title, INK_LIGHT, None, Attr::BOLD, Some(area));
    frame.print(area.x + 1, area.y + 1, &toast.description, INK_LIGHT, None, Attr::empty(), Some(area));
}

fn centered(cell: Rect, text: &str) -> u16 {
    cell.x + cell.width.saturating_sub(string_width(text)) / 2
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use n_color::{Color, Palette, simulate};

    const W: u16 = 60;
    const H: u16 = 20;

    fn swatches(mode: SimulationMode) -> Vec<Swatch> {
        Palette::from_hex("#3498db")
            .unwrap()
            .iter()
            .enumerate()
            .map(|(i, &original)| Swatch {
                original,
                displayed: simulate(original, mode),
                dark_label: original.wants_dark_label(),
                copied: i == 0,
                focused: i == 0,
            })
            .collect()
    }

    fn paint(swatches: &[Swatch], toast: Option<&Toast>) -> (FrameBuffer, Option<(u16, u16)>) {
        let field = TextField::new("#3498db");
        let screen = Screen {
            mode: SimulationMode::Protanopia,
            input: &field,
            swatches,
            toast,
        };
        let mut frame = FrameBuffer::new(W, H);
        let cursor = render(&screen, &mut frame);
        (frame, cursor)
    }

    fn bg_at(frame: &FrameBuffer, x: u16, y: u16) -> CellColor {
        frame.get(x, y).unwrap().bg
    }

    // ── Chrome ──────────────────────────────────────────────────

    #[test]
    fn title_shows_mode() {
        let (frame, _) = paint(&[], None);
        let row = frame.row_text(0);
        assert!(row.starts_with(" n-palette"));
        assert!(row.trim_end().ends_with("vision: protanopia"));
    }

    #[test]
    fn cursor_sits_after_field_text() {
        let (frame, cursor) = paint(&[], None);
        assert_eq!(cursor, Some((FIELD_X + 7, INPUT_Y)));
        assert!(frame.row_text(INPUT_Y).contains("Base   #3498db"));
        assert!(frame.row_text(INPUT_Y).contains("[Enter] Generate"));
    }

    #[test]
    fn placeholder_before_first_generate() {
        let (frame, _) = paint(&[], None);
        let found = (0..H).any(|y| frame.row_text(y).contains("Press Enter to generate a palette"));
        assert!(found);
    }

    #[test]
    fn export_hints_only_with_palette() {
        let (frame, _) = paint(&[], None);
        let hints = frame.row_text(H - 1);
        assert!(hints.contains("^E vision"));
        assert!(!hints.contains("^S"));

        let (frame, _) = paint(&swatches(SimulationMode::Normal), None);
        let hints = frame.row_text(H - 1);
        assert!(hints.contains("^S CSS"));
        assert!(hints.contains("^P PNG"));
        assert!(hints.trim_end().ends_with("Esc quit"));
    }

    #[test]
    fn full_hint_row_fits_narrow_terminal() {
        let full = format!("{HINTS_HEAD}{HINTS_EXPORT}{HINTS_TAIL}");
        assert!(1 + string_width(&full) <= W);

        let field = TextField::new("#3498db");
        let sw = swatches(SimulationMode::Normal);
        let screen = Screen {
            mode: SimulationMode::Normal,
            input: &field,
            swatches: &sw,
            toast: None,
        };
        let mut frame = FrameBuffer::new(80, 24);
        render(&screen, &mut frame);
        assert_eq!(frame.row_text(23).trim_end(), format!(" {full}"));
    }

    // ── Swatches ────────────────────────────────────────────────

    #[test]
    fn quadrants_fill_with_displayed_color() {
        let sw = swatches(SimulationMode::Protanopia);
        let (frame, _) = paint(&sw, None);

        // Grid is (1, 4) 58×14, so cells are 29×7.
        let probes = [(5, 5), (40, 5), (5, 12), (40, 16)];
        for (s, (x, y)) in sw.iter().zip(probes) {
            assert_eq!(bg_at(&frame, x, y), CellColor::from_u24(s.displayed.value()));
        }
        assert_eq!(bg_at(&frame, 5, 5), CellColor::from_u24(Color::parse("#5f60b3").unwrap().value()));
    }

    #[test]
    fn labels_show_original_hex_with_ink() {
        let sw = swatches(SimulationMode::Deuteranopia);
        let (frame, _) = paint(&sw, None);

        let row = frame.row_text(7);
        assert!(row.contains("#3498db"));
        assert!(row.contains("#67cc0e"));
        assert!(frame.row_text(14).contains("#cb6724"));

        let x = row.find("#3498db").unwrap() as u16;
        let cell = frame.get(x, 7).unwrap();
        assert_eq!(cell.fg, INK_LIGHT);
        assert!(cell.attrs.contains(Attr::BOLD));

        let x = frame.row_text(14).find("#cb6724").unwrap() as u16;
        assert_eq!(frame.get(x, 14).unwrap().fg, INK_DARK);
    }

    #[test]
    fn copied_label_and_focus_marker() {
        let (frame, _) = paint(&swatches(SimulationMode::Normal), None);
        assert!(frame.row_text(8).contains("Copied!"));
        assert_eq!(frame.row_text(8).matches("Copied!").count(), 1);
        assert_eq!(frame.get(2, GRID_TOP).unwrap().ch, '▸');
    }

    // ── Toast ───────────────────────────────────────────────────

    #[test]
    fn toast_renders_bottom_right() {
        let toast = Toast::success("CSS Variables Copied", "Variables copied to clipboard successfully");
        let (frame, _) = paint(&swatches(SimulationMode::Normal), Some(&toast));

        assert!(frame.row_text(H - 3).contains("CSS Variables Copied"));
        let desc = frame.row_text(H - 2);
        assert!(desc.trim_end().ends_with("Variables copied to clipboard successfully"));
        assert_eq!(bg_at(&frame, W - 2, H - 2), TOAST_SUCCESS);
    }

    #[test]
    fn error_toast_is_red() {
        let toast = Toast::error("No colors generated", "Please generate a color palette first");
        let (frame, _) = paint(&[], Some(&toast));
        assert_eq!(bg_at(&frame, W - 2, H - 3), TOAST_ERROR);
    }

    // ── Small terminals ─────────────────────────────────────────

    #[test]
    fn tiny_frame_does_not_panic() {
        let field = TextField::new("#3498db");
        let sw = swatches(SimulationMode::Normal);
        let toast = Toast::error("x", "y");
        for (w, h) in [(1, 1), (3, 2), (10, 4), (20, 6)] {
            let mut frame = FrameBuffer::new(w, h);
            let screen = Screen {
                mode: SimulationMode::Normal,
                input: &field,
                swatches: &sw,
                toast: Some(&toast),
            };
            render(&screen, &mut frame);
        }
    }
}
