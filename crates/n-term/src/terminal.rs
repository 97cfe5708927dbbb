// SPDX-License-Identifier: MIT
//
// Session control for the palette screen.
//
// A session is raw input plus the alternate screen with a hidden cursor and
// bracketed paste. `Terminal::enter` starts one and `Terminal::leave` (or
// Drop) ends it. The saved termios lives in `RawMode`, which puts it back
// when dropped, so an early `?` in `enter` cannot strand the shell in raw
// mode.
//
// On panic the hook writes `SESSION_END` to fd 1 and restores the saved
// termios before the default hook prints, so the message is readable.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ────────────────────────────────────────────────────────────────────

/// Screen size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Assumed when stdout is not a terminal.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };

    /// Current window size, `None` when stdout is not a terminal.
    #[must_use]
    pub fn query() -> Option<Self> {
        window_size()
    }
}

/// Same as [`Size::query`].
#[must_use]
pub fn get_size() -> Option<Size> {
    window_size()
}

#[cfg(unix)]
fn window_size() -> Option<Size> {
    // SAFETY: winsize is plain data; TIOCGWINSZ fills it or fails.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    if rc != 0 || ws.ws_col == 0 || ws.ws_row == 0 {
        return None;
    }
    Some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
fn window_size() -> Option<Size> {
    None
}

/// Whether stdin is attached to a terminal.
#[must_use]
pub fn is_tty() -> bool {
    use std::io::IsTerminal;
    io::stdin().is_terminal()
}

// ─── Raw mode ────────────────────────────────────────────────────────────────

/// termios saved by the live `RawMode`, read by the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Raw input on stdin until dropped.
struct RawMode {
    #[cfg(unix)]
    saved: libc::termios,
}

impl RawMode {
    /// `Ok(None)` when stdin is not a terminal; there is nothing to switch.
    #[cfg(unix)]
    fn enable() -> io::Result<Option<Self>> {
        if !is_tty() {
            return Ok(None);
        }
        let saved = read_termios()?;
        let mut t = saved;
        // SAFETY: cfmakeraw only edits the struct it is handed.
        unsafe { libc::cfmakeraw(&raw mut t) };
        t.c_cc[libc::VMIN] = 1;
        t.c_cc[libc::VTIME] = 0;
        write_termios(&t)?;

        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = Some(saved);
        }
        Ok(Some(Self { saved }))
    }

    #[cfg(not(unix))]
    fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    /// Put the saved termios back, reporting failure.
    fn restore(self) -> io::Result<()> {
        let result = self.apply_saved();
        std::mem::forget(self);
        result
    }

    #[cfg(unix)]
    fn apply_saved(&self) -> io::Result<()> {
        write_termios(&self.saved)?;
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = None;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn apply_saved(&self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = self.apply_saved() {
            tracing::warn!(error = %e, "failed to restore termios");
        }
    }
}

#[cfg(unix)]
fn read_termios() -> io::Result<libc::termios> {
    // SAFETY: termios is plain data; tcgetattr fills it or fails.
    let mut t: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut t) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(t)
}

#[cfg(unix)]
fn write_termios(t: &libc::termios) -> io::Result<()> {
    // SAFETY: `t` is a valid termios for the duration of the call.
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, t) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

// ─── Panic hook ──────────────────────────────────────────────────────────────

/// Written raw on panic. Leaving the alternate screen comes last.
#[rustfmt::skip]
const SESSION_END: &[u8] = b"\
    \x1b[?2026l\
    \x1b[?2004l\
    \x1b[0m\
    \x1b[0 q\
    \x1b[?25h\
    \x1b[?1049l";

static HOOK: Once = Once::new();

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            end_session_unlocked();
            previous(info);
        }));
    });
}

/// Bypasses the stdout lock, which the panicking frame may hold.
#[cfg(unix)]
fn end_session_unlocked() {
    // SAFETY: writes a static buffer to fd 1.
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            SESSION_END.as_ptr().cast::<libc::c_void>(),
            SESSION_END.len(),
        );
    }
    let saved = SAVED_TERMIOS.lock().ok().and_then(|slot| *slot);
    if let Some(t) = saved {
        let _ = write_termios(&t);
    }
}

#[cfg(not(unix))]
fn end_session_unlocked() {
    let mut out = io::stdout();
    let _ = out.write_all(SESSION_END);
    let _ = out.flush();
}

// ─── Terminal ────────────────────────────────────────────────────────────────

/// Owner of the screen session. Leaves it on drop.
///
/// ```no_run
/// use n_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    raw: Option<RawMode>,
    size: Size,
    active: bool,
}

impl Terminal {
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: None,
            size: Size::query().unwrap_or(Size::FALLBACK),
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the window, keeping the last known size on failure.
    pub fn refresh_size(&mut self) -> Size {
        self.size = Size::query().unwrap_or(self.size);
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Start the session. Does nothing when one is running.
    ///
    /// # Errors
    ///
    /// termios cannot be changed, or stdout rejects the mode switch.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        let raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::enable_bracketed_paste(&mut out)?;
        out.flush()?;

        self.raw = raw;
        self.active = true;
        tracing::debug!(cols = self.size.cols, rows = self.size.rows, "session started");
        Ok(())
    }

    /// End the session. Does nothing when none is running.
    ///
    /// # Errors
    ///
    /// stdout rejects the restore sequence, or termios cannot be restored.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        {
            let mut out = io::stdout().lock();
            ansi::end_sync(&mut out)?;
            ansi::disable_bracketed_paste(&mut out)?;
            ansi::reset(&mut out)?;
            ansi::set_cursor_shape(&mut out, ansi::CursorShape::Default)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush()?;
        }

        if let Some(raw) = self.raw.take() {
            raw.restore()?;
        }
        tracing::debug!("session ended");
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            tracing::warn!(error = %e, "failed to leave screen session");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_end_leaves_alt_screen_last() {
        let s = std::str::from_utf8(SESSION_END).unwrap();
        assert!(s.starts_with("\x1b[?2026l"));
        assert!(s.contains("\x1b[?2004l"));
        assert!(s.contains("\x1b[?25h"));
        assert!(s.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn fresh_terminal_is_inactive_with_a_size() {
        let term = Terminal::new();
        assert!(!term.is_active());
        assert!(term.size().cols > 0);
        assert!(term.size().rows > 0);
    }

    #[test]
    fn repeated_enter_and_leave_are_harmless() {
        let mut term = Terminal::new();
        term.leave().unwrap();
        term.enter().unwrap();
        term.enter().unwrap();
        assert!(term.is_active());
        term.leave().unwrap();
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn refresh_size_updates_cache() {
        let mut term = Terminal::new();
        assert_eq!(term.refresh_size(), term.size());
        assert_eq!(get_size(), Size::query());
    }
}
