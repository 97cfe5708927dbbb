// SPDX-License-Identifier: MIT
//
// PaletteApp — the shell driven by n-term's event loop.
//
//   stdin → parser → on_event → key dispatch → Shell action
//   on_tick → Shell::tick (copy indicator, toast expiry)
//   paint → view::render → framebuffer → diff renderer → terminal
//
// Clipboard writes are OSC 52 sequences. They are buffered during event
// handling and handed to the loop through `take_output`, which writes them
// after the frame, so they never interleave with a half-drawn screen.

use std::io;
use std::time::Instant;

use n_export::DirectoryDownload;
use n_term::ansi::{self, CursorShape};
use n_term::buffer::FrameBuffer;
use n_term::event_loop::{Action, App, EventLoop, LoopConfig};
use n_term::input::{Event, KeyCode, KeyEvent, Modifiers};

use crate::config::Settings;
use crate::shell::{Clipboard, Shell};
use crate::toast::ToastQueue;
use crate::view::{self, Screen};

// ─── OSC 52 clipboard ────────────────────────────────────────────────────────

/// Clipboard that queues OSC 52 sequences for the terminal.
#[derive(Debug, Default)]
pub struct Osc52Clipboard {
    pending: Vec<u8>,
}

impl Osc52Clipboard {
    /// Bytes queued since the last call.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.pending)
    }
}

impl Clipboard for Osc52Clipboard {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        ansi::set_clipboard(&mut self.pending, text)
    }
}

// ─── App ─────────────────────────────────────────────────────────────────────

pub type TerminalShell = Shell<Osc52Clipboard, ToastQueue, DirectoryDownload>;

pub struct PaletteApp {
    shell: TerminalShell,

    /// Field cursor from the last paint.
    cursor: Option<(u16, u16)>,
}

impl PaletteApp {
    pub const fn new(shell: TerminalShell) -> Self {
        Self { shell, cursor: None }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Shell::new(
            &settings.base_color,
            settings.timings(),
            Osc52Clipboard::default(),
            ToastQueue::new(),
            DirectoryDownload::new(&settings.export_dir),
        ))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(Modifiers::CTRL) {
            return self.handle_ctrl(key.code);
        }

        match key.code {
            KeyCode::Escape => return Action::Quit,
            KeyCode::Enter => self.shell.generate(),
            KeyCode::Tab if key.modifiers.contains(Modifiers::SHIFT) => self.shell.focus_prev(),
            KeyCode::Tab | KeyCode::Down => self.shell.focus_next(),
            KeyCode::Up => self.shell.focus_prev(),
            code => self.edit_field(code, key.modifiers),
        }
        Action::Continue
    }

    fn edit_field(&mut self, code: KeyCode, modifiers: Modifiers) {
        let field = self.shell.input_mut();
        match code {
            KeyCode::Backspace => {
                field.backspace();
            }
            KeyCode::Delete => {
                field.delete();
            }
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            KeyCode::Home => field.move_home(),
            KeyCode::End => field.move_end(),
            KeyCode::Char(ch) if !modifiers.contains(Modifiers::ALT) => field.insert_char(ch),
            _ => {}
        }
    }

    fn handle_ctrl(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('c') => return Action::Quit,
            KeyCode::Char('y') => self.shell.copy_selected(Instant::now()),
            KeyCode::Char('e') => self.shell.cycle_mode(),
            KeyCode::Char('s') => self.shell.copy_css(),
            KeyCode::Char('p') => self.shell.export_png(),
            _ => {}
        }
        Action::Continue
    }
}

impl App for PaletteApp {
    fn on_event(&mut self, event: &Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Paste(text) => {
                self.shell.input_mut().insert_str(text);
                Action::Continue
            }
        }
    }

    fn on_tick(&mut self) -> bool {
        self.shell.tick(Instant::now())
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        let swatches = self.shell.swatches();
        let screen = Screen {
            mode: self.shell.mode(),
            input: self.shell.input(),
            swatches: &swatches,
            toast: self.shell.notifier().latest(),
        };
        self.cursor = view::render(&screen, frame);
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        self.cursor.map(|(x, y)| (x, y, CursorShape::SteadyBar))
    }

    fn take_output(&mut self) -> Vec<u8> {
        self.shell.clipboard_mut().take()
    }
}

/// Run the interactive screen until the user quits.
///
/// # Errors
///
/// Terminal setup or output failures.
pub fn run(settings: &Settings) -> io::Result<()> {
    let mut app = PaletteApp::from_settings(settings);
    tracing::info!(base = %settings.base_color, export_dir = %settings.export_dir.display(), "starting");
    EventLoop::new(LoopConfig::from_hz(settings.tick_hz)).run(&mut app)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
