// SPDX-License-Identifier: MIT
//
// Stdin pump.
//
// Key bytes arrive on a channel fed by a helper thread. The event loop
// waits on that channel with a timeout, which gives it the idle ticks that
// expire toasts and the "Copied!" label.
//
// On unix the thread waits for readability in short slices and looks at
// the stop flag between slices. `stop()` therefore returns within one
// slice even when no key is ever pressed.
#![allow(unsafe_code)]

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

const CHUNK: usize = 4096;

/// Handle to the pump thread. Dropping it stops the thread.
///
/// ```no_run
/// use n_term::reader::StdinReader;
///
/// let (reader, bytes) = StdinReader::spawn()?;
/// for chunk in bytes.iter().take(3) {
///     println!("{chunk:?}");
/// }
/// drop(reader);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct StdinReader {
    thread: Option<JoinHandle<()>>,
    halt: Arc<AtomicBool>,
}

impl StdinReader {
    /// Start pumping. The receiver disconnects on stop or end of input.
    ///
    /// # Errors
    ///
    /// The OS refuses a new thread.
    pub fn spawn() -> io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let halt = Arc::new(AtomicBool::new(false));
        let pump = Pump {
            tx,
            halt: Arc::clone(&halt),
        };
        let thread = thread::Builder::new()
            .name("n-term-stdin".into())
            .spawn(move || pump.run())?;

        Ok((
            Self {
                thread: Some(thread),
                halt,
            },
            rx,
        ))
    }

    /// Ask the thread to finish and wait for it. Safe to call twice.
    pub fn stop(&mut self) {
        self.halt.store(true, Ordering::Relaxed);
        let Some(thread) = self.thread.take() else {
            return;
        };
        if thread.join().is_err() {
            tracing::warn!("stdin pump panicked");
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Pump ────────────────────────────────────────────────────────────────────

struct Pump {
    tx: Sender<Vec<u8>>,
    halt: Arc<AtomicBool>,
}

impl Pump {
    fn halted(&self) -> bool {
        self.halt.load(Ordering::Relaxed)
    }

    /// `false` once nobody is listening.
    fn forward(&self, bytes: &[u8]) -> bool {
        self.tx.send(bytes.to_vec()).is_ok()
    }

    #[cfg(unix)]
    fn run(self) {
        let mut buf = [0u8; CHUNK];
        while !self.halted() {
            match unix::wait_readable() {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!(error = %e, "stdin poll failed");
                    return;
                }
            }
            match unix::read(&mut buf) {
                Ok(0) => {
                    tracing::debug!("stdin reached end of input");
                    return;
                }
                Ok(n) => {
                    if !self.forward(&buf[..n]) {
                        return;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::debug!(error = %e, "stdin read failed");
                    return;
                }
            }
        }
    }

    /// Blocking reads; `stop()` waits for the next key.
    #[cfg(not(unix))]
    fn run(self) {
        use std::io::Read;

        let mut stdin = io::stdin();
        let mut buf = [0u8; CHUNK];
        while !self.halted() {
            match stdin.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => {
                    if !self.forward(&buf[..n]) {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(unix)]
mod unix {
    use std::io;

    /// Longest wait before the stop flag is checked again.
    const SLICE_MS: i32 = 50;

    /// Whether stdin became readable within one slice.
    pub(super) fn wait_readable() -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: one valid pollfd for the duration of the call.
        let rc = unsafe { libc::poll(&raw mut pfd, 1, SLICE_MS) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(rc > 0)
    }

    pub(super) fn read(buf: &mut [u8]) -> io::Result<usize> {
        // SAFETY: `buf` is writable for `buf.len()` bytes.
        let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
        usize::try_from(n).map_err(|_| io::Error::last_os_error())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
