// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: stdin bytes in, frames out.
//
// Bytes from the background reader are parsed into events, the app
// handles them and paints a FrameBuffer, and the diff renderer writes only
// what changed.
//
// The loop blocks on the stdin channel with a tick-length timeout:
//
//   - A keypress wakes it immediately.
//   - With no input, `recv_timeout` parks the thread between ticks.
//   - Each tick calls `App::on_tick`, which is how toasts and the
//     "Copied!" indicator expire. Frames are only painted when something
//     reported a change.
//
// A lone ESC is held by the parser; the first tick with no new bytes
// flushes it as the Escape key.
//
// Resize arrives as SIGWINCH, which sets an atomic flag checked once per
// iteration.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App ─────────────────────────────────────────────────────────────────────

/// What to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// A terminal application driven by [`EventLoop`].
///
/// Per iteration the loop calls, in order: [`on_event`](App::on_event)
/// for each parsed event, [`on_resize`](App::on_resize) on SIGWINCH,
/// [`on_tick`](App::on_tick), then [`paint`](App::paint) and
/// [`cursor`](App::cursor) if anything changed. Bytes returned by
/// [`take_output`](App::take_output) are written after the frame.
pub trait App {
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// Called after the frame buffer has been resized.
    fn on_resize(&mut self, _size: Size) {}

    /// Time-based state. Return `true` to request a repaint.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Paint into a cleared buffer.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Where to show the hardware cursor, or `None` to hide it.
    fn cursor(&self) -> Option<(u16, u16, ansi::CursorShape)> {
        None
    }

    /// Raw escape output produced while handling events (OSC 52
    /// clipboard writes, for instance).
    fn take_output(&mut self) -> Vec<u8> {
        Vec::new()
    }
}

// ─── LoopConfig ──────────────────────────────────────────────────────────────

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// `recv_timeout` per iteration; also the Escape-key delay.
    pub tick: Duration,
}

impl LoopConfig {
    /// Tick at `hz` times per second, clamped to 1..=240.
    #[must_use]
    pub fn from_hz(hz: u32) -> Self {
        let hz = hz.clamp(1, 240);
        Self {
            tick: Duration::from_micros(1_000_000 / u64::from(hz)),
        }
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::from_hz(60)
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal, parser and renderer; [`run`](Self::run) drives an
/// [`App`] until it quits.
///
/// ```no_run
/// use n_term::buffer::FrameBuffer;
/// use n_term::event_loop::{Action, App, EventLoop, LoopConfig};
/// use n_term::input::{Event, KeyCode, KeyEvent};
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_event(&mut self, event: &Event) -> Action {
///         match event {
///             Event::Key(KeyEvent { code: KeyCode::Escape, .. }) => Action::Quit,
///             _ => Action::Continue,
///         }
///     }
///
///     fn paint(&mut self, _buf: &mut FrameBuffer) {}
/// }
///
/// EventLoop::new(LoopConfig::default()).run(&mut Quitter)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
}

impl EventLoop {
    #[must_use]
    pub fn new(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter TUI mode, run until [`Action::Quit`] or stdin closes, then
    /// restore the terminal (also on error).
    ///
    /// # Errors
    ///
    /// Terminal setup, restore or frame output failures.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();
        app.on_resize(self.terminal.size());

        let result = StdinReader::spawn().and_then(|(mut reader, rx)| {
            let result = self.run_inner(app, &rx);
            reader.stop();
            result
        });

        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let mut dirty = true;

        loop {
            let events = match rx.recv_timeout(self.config.tick) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) if self.parser.has_pending() => self.parser.flush(),
                Err(RecvTimeoutError::Timeout) => Vec::new(),
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("input channel closed");
                    return Ok(());
                }
            };
            match dispatch(app, &events) {
                Action::Quit => return Ok(()),
                Action::Continue => dirty |= !events.is_empty(),
            }

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                tracing::debug!(cols = size.cols, rows = size.rows, "resize");
                frame.resize(size.cols, size.rows);
                self.renderer.force_redraw();
                app.on_resize(size);
                dirty = true;
            }

            dirty |= app.on_tick();

            let extra = app.take_output();
            if dirty || !extra.is_empty() {
                self.present(app, &mut frame, dirty, &extra)?;
                dirty = false;
            }
        }
    }

    fn present(
        &mut self,
        app: &mut impl App,
        frame: &mut FrameBuffer,
        repaint: bool,
        extra: &[u8],
    ) -> io::Result<()> {
        let mut out = io::stdout().lock();
        if repaint {
            frame.clear();
            app.paint(frame);
            self.renderer.render(frame);
            self.renderer.flush_to(&mut out)?;
        }
        out.write_all(extra)?;
        match app.cursor() {
            Some((x, y, shape)) => {
                ansi::cursor_to(&mut out, x, y)?;
                ansi::set_cursor_shape(&mut out, shape)?;
                ansi::cursor_show(&mut out)?;
            }
            None => ansi::cursor_hide(&mut out)?,
        }
        out.flush()
    }
}

/// Feed events to the app, stopping at the first [`Action::Quit`].
fn dispatch(app: &mut impl App, events: &[Event]) -> Action {
    for event in events {
        if app.on_event(event) == Action::Quit {
            return Action::Quit;
        }
    }
    Action::Continue
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent};

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Event>,
    }

    impl App for Recorder {
        fn on_event(&mut self, event: &Event) -> Action {
            self.seen.push(event.clone());
            match event {
                Event::Key(KeyEvent { code: KeyCode::Escape, .. }) => Action::Quit,
                _ => Action::Continue,
            }
        }

        fn paint(&mut self, _buf: &mut FrameBuffer) {}
    }

    // ── LoopConfig ──────────────────────────────────────────────

    #[test]
    fn default_ticks_at_60hz() {
        assert_eq!(LoopConfig::default().tick, Duration::from_micros(16_666));
    }

    #[test]
    fn from_hz_clamps() {
        assert_eq!(LoopConfig::from_hz(0).tick, Duration::from_secs(1));
        assert_eq!(LoopConfig::from_hz(10_000), LoopConfig::from_hz(240));
    }

    // ── Dispatch ────────────────────────────────────────────────

    #[test]
    fn dispatch_stops_at_quit() {
        let mut app = Recorder::default();
        let events = vec![
            Event::Key(KeyEvent::plain(KeyCode::Char('a'))),
            Event::Key(KeyEvent::plain(KeyCode::Escape)),
            Event::Key(KeyEvent::plain(KeyCode::Char('b'))),
        ];
        assert_eq!(dispatch(&mut app, &events), Action::Quit);
        assert_eq!(app.seen.len(), 2);
    }

    #[test]
    fn dispatch_continues_without_quit() {
        let mut app = Recorder::default();
        let events = vec![Event::Paste("#fff000".into())];
        assert_eq!(dispatch(&mut app, &events), Action::Continue);
        assert_eq!(app.seen, events);
    }

    // ── App defaults ────────────────────────────────────────────

    #[test]
    fn app_defaults() {
        let mut app = Recorder::default();
        assert!(!app.on_tick());
        assert!(app.cursor().is_none());
        assert!(app.take_output().is_empty());
        app.on_resize(Size { cols: 100, rows: 50 });
    }

    #[test]
    fn sigwinch_flag_swaps() {
        SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
        assert!(SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed));
        assert!(!SIGWINCH_RECEIVED.load(Ordering::Relaxed));
    }
}
