// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key and paste events. The palette UI only
// enables bracketed paste on top of the legacy keyboard encoding, so the
// grammar is small:
//
// - Control bytes (Ctrl+letter, Enter, Tab, Backspace)
// - CSI sequences: arrows, Home/End, Delete, Shift+Tab, xterm modifiers
// - SS3 sequences: arrows and Home/End in application cursor mode
// - Alt+key (ESC followed by a printable byte)
// - UTF-8 multi-byte characters
// - Bracketed paste, delivered as one `Paste` event
//
// Sequences can be split across reads, so the parser keeps unconsumed
// bytes between `advance` calls. A lone ESC stays pending until the caller
// decides no more bytes are coming and calls `flush`.

use bitflags::bitflags;

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Text between `CSI 200~` and `CSI 201~`.
    Paste(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Plain key, no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// Ctrl + `c`.
    #[must_use]
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CTRL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Modifier keys, in the xterm bit order (`param = 1 + bits`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const ALT   = 0b010;
        const CTRL  = 0b100;
    }
}

// ─── Parser ──────────────────────────────────────────────────────────────────

const PASTE_START: &[u8] = b"\x1b[200~";
const PASTE_END: &[u8] = b"\x1b[201~";

/// Incremental byte-to-event parser.
///
/// ```
/// use n_term::input::{Event, KeyCode, KeyEvent, Parser};
///
/// let mut p = Parser::new();
/// assert_eq!(p.advance(b"\x1b[").len(), 0);
/// assert_eq!(p.advance(b"A"), vec![Event::Key(KeyEvent::plain(KeyCode::Up))]);
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    buf: Vec<u8>,
    in_paste: bool,
}

/// One parse step: an event and the bytes it used, bytes to drop, or a
/// request for more input.
enum Step {
    Emit(Event, usize),
    Skip(usize),
    Incomplete,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes; return every event they complete.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            let rest = &self.buf[pos..];

            if self.in_paste {
                let Some(end) = find(rest, PASTE_END) else { break };
                events.push(Event::Paste(String::from_utf8_lossy(&rest[..end]).into_owned()));
                pos += end + PASTE_END.len();
                self.in_paste = false;
                continue;
            }
            if rest.starts_with(PASTE_START) {
                self.in_paste = true;
                pos += PASTE_START.len();
                continue;
            }
            if rest.len() < PASTE_START.len() && rest.len() > 2 && PASTE_START.starts_with(rest) {
                break;
            }

            match step(rest) {
                Step::Emit(event, n) => {
                    events.push(event);
                    pos += n;
                }
                Step::Skip(n) => pos += n,
                Step::Incomplete => break,
            }
        }

        self.buf.drain(..pos);
        events
    }

    /// Whether bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Give up waiting: a pending lone ESC becomes Escape, other pending
    /// bytes become the keys they'd be on their own.
    pub fn flush(&mut self) -> Vec<Event> {
        if self.in_paste {
            self.in_paste = false;
            let text = String::from_utf8_lossy(&self.buf).into_owned();
            self.buf.clear();
            return vec![Event::Paste(text)];
        }
        let events = self
            .buf
            .iter()
            .filter_map(|&b| match b {
                0x1B => Some(KeyEvent::plain(KeyCode::Escape)),
                0x20..=0x7E => Some(KeyEvent::plain(KeyCode::Char(b as char))),
                _ => control_key(b),
            })
            .map(Event::Key)
            .collect();
        self.buf.clear();
        events
    }
}

// ─── Grammar ─────────────────────────────────────────────────────────────────

fn step(buf: &[u8]) -> Step {
    match buf[0] {
        0x1B => escape(buf),
        b @ 0x20..=0x7E => Step::Emit(key(KeyCode::Char(b as char), Modifiers::empty()), 1),
        0xC0..=0xFF => utf8(buf),
        b => control_key(b).map_or(Step::Skip(1), |k| Step::Emit(Event::Key(k), 1)),
    }
}

/// Single control byte.
fn control_key(b: u8) -> Option<KeyEvent> {
    Some(match b {
        0x09 => KeyEvent::plain(KeyCode::Tab),
        0x0A | 0x0D => KeyEvent::plain(KeyCode::Enter),
        0x08 | 0x7F => KeyEvent::plain(KeyCode::Backspace),
        0x00 => KeyEvent::ctrl(' '),
        0x01..=0x1A => KeyEvent::ctrl((b - 1 + b'a') as char),
        _ => return None,
    })
}

fn escape(buf: &[u8]) -> Step {
    let Some(&next) = buf.get(1) else {
        return Step::Incomplete;
    };
    match next {
        b'[' => csi(buf),
        b'O' => ss3(buf),
        0x1B => Step::Emit(key(KeyCode::Escape, Modifiers::ALT), 2),
        0x20..=0x7E => Step::Emit(key(KeyCode::Char(next as char), Modifiers::ALT), 2),
        _ => Step::Emit(key(KeyCode::Escape, Modifiers::empty()), 1),
    }
}

/// `ESC [ params final`.
fn csi(buf: &[u8]) -> Step {
    let Some(end) = buf[2..].iter().position(|b| (0x40..=0x7E).contains(b)).map(|i| i + 2) else {
        return if buf[2..].iter().all(|b| (0x20..=0x3F).contains(b)) {
            Step::Incomplete
        } else {
            Step::Skip(buf.len())
        };
    };
    let params: Vec<u16> = buf[2..end]
        .split(|&b| b == b';')
        .map(|p| std::str::from_utf8(p).ok().and_then(|s| s.parse().ok()).unwrap_or(0))
        .collect();
    let consumed = end + 1;
    let mods = params.get(1).map_or(Modifiers::empty(), |&p| modifiers(p));

    let code = match buf[end] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        b'Z' => return Step::Emit(key(KeyCode::Tab, Modifiers::SHIFT), consumed),
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            15 => KeyCode::F(5),
            17..=21 => {
                #[allow(clippy::cast_possible_truncation)]
                let n = params[0] as u8 - 11;
                KeyCode::F(n)
            }
            23 => KeyCode::F(11),
            24 => KeyCode::F(12),
            _ => return Step::Skip(consumed),
        },
        _ => return Step::Skip(consumed),
    };
    Step::Emit(key(code, mods), consumed)
}

/// `ESC O final`.
fn ss3(buf: &[u8]) -> Step {
    let Some(&last) = buf.get(2) else {
        return Step::Incomplete;
    };
    let code = match last {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Step::Skip(3),
    };
    Step::Emit(key(code, Modifiers::empty()), 3)
}

fn utf8(buf: &[u8]) -> Step {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Step::Skip(1),
    };
    if buf.len() < len {
        return Step::Incomplete;
    }
    std::str::from_utf8(&buf[..len])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Step::Skip(1), |ch| Step::Emit(key(KeyCode::Char(ch), Modifiers::empty()), len))
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

const fn key(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent::new(code, modifiers))
}

/// xterm modifier parameter: `1 + bits`, 0 and 1 meaning none.
#[allow(clippy::cast_possible_truncation)]
const fn modifiers(param: u16) -> Modifiers {
    Modifiers::from_bits_truncate(param.saturating_sub(1) as u8)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
