// SPDX-License-Identifier: MIT
//
// Toasts — short-lived notifications in the bottom-right corner.
//
// The shell reports every user-facing outcome (copied, saved, rejected)
// through the `Notifier` trait. The TUI's notifier is a `ToastQueue`: each
// toast is stamped with its deadline when it arrives and dropped by
// `expire` once the deadline passes. Only the newest live toast is drawn.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a toast stays up unless configured otherwise.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

/// Oldest toasts are dropped past this many.
const QUEUE_CAP: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Screen corner a toast is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastPosition {
    #[default]
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
    pub duration: Duration,
    pub position: ToastPosition,
}

impl Toast {
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, title.into(), description.into())
    }

    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, title.into(), description.into())
    }

    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    const fn new(kind: ToastKind, title: String, description: String) -> Self {
        Self {
            kind,
            title,
            description,
            duration: DEFAULT_DURATION,
            position: ToastPosition::BottomRight,
        }
    }
}

// ─── Notifier ────────────────────────────────────────────────────────────────

/// Receives toasts from the shell.
pub trait Notifier {
    fn notify(&mut self, toast: Toast);

    /// Drop whatever has outlived its duration. Returns `true` if anything
    /// visible changed.
    fn expire(&mut self, _now: Instant) -> bool {
        false
    }
}

// ─── ToastQueue ──────────────────────────────────────────────────────────────

/// Live toasts with their deadlines, oldest first.
#[derive(Debug, Default)]
pub struct ToastQueue {
    entries: VecDeque<(Toast, Instant)>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `toast` as if it arrived at `now`.
    pub fn push_at(&mut self, toast: Toast, now: Instant) {
        let deadline = now + toast.duration;
        self.entries.push_back((toast, deadline));
        while self.entries.len() > QUEUE_CAP {
            self.entries.pop_front();
        }
    }

    /// The toast to draw: the most recent one still alive.
    #[must_use]
    pub fn latest(&self) -> Option<&Toast> {
        self.entries.back().map(|(toast, _)| toast)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, toast: Toast) {
        tracing::debug!(kind = ?toast.kind, title = %toast.title, "toast");
        self.push_at(toast, Instant::now());
    }

    fn expire(&mut self, now: Instant) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(_, deadline)| *deadline > now);
        self.entries.len() != before
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
