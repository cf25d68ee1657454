//! Asynchronous signal bridge.
//!
//! The only work performed in signal-handler context is storing the signal
//! number into an atomic (last write wins) and writing one byte to a
//! non-blocking wake pipe so a blocked `poll` returns. Everything user
//! visible - cursor restore, notices, process exit - happens later, from
//! ordinary rendering-loop context, after [`SignalBridge::take`].

use std::ffi::CStr;
use std::io::{self, Write};
use std::os::unix::io::RawFd;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGWINCH};

use crate::config::Config;
use crate::term;

/// Signals that interrupt rendering. SIGWINCH is registered separately since
/// it may be tolerated at dispatch time.
const FATAL_SIGNALS: &[i32] = &[SIGINT, SIGTERM, SIGQUIT, SIGHUP];

/// The flag-plus-wake-pipe pair shared with signal-handler context.
///
/// Invariant: at most one unconsumed signal number is remembered; a second
/// delivery before [`take`](Self::take) overwrites the first. The pipe
/// carries no identity, only a wake-up.
pub struct SignalBridge {
    flag: Arc<AtomicUsize>,
    wake_rx: RawFd,
    wake_tx: RawFd,
}

impl SignalBridge {
    /// Creates the wake pipe and registers handlers for SIGINT, SIGTERM,
    /// SIGQUIT, SIGHUP and SIGWINCH. The flag store is registered before the
    /// pipe write so a woken poller always observes the number.
    pub fn install() -> io::Result<Self> {
        let (wake_rx, wake_tx) = nonblocking_pipe()?;
        let flag = Arc::new(AtomicUsize::new(0));

        for &sig in FATAL_SIGNALS.iter().chain([&SIGWINCH]) {
            signal_hook::flag::register_usize(sig, Arc::clone(&flag), sig as usize)?;
            signal_hook::low_level::pipe::register_raw(sig, wake_tx)?;
        }

        Ok(Self {
            flag,
            wake_rx,
            wake_tx,
        })
    }

    /// A bridge with a wake pipe but no registered handlers. Used by error
    /// paths that run before [`install`](Self::install) and by tests.
    pub fn inert() -> io::Result<Self> {
        let (wake_rx, wake_tx) = nonblocking_pipe()?;
        Ok(Self {
            flag: Arc::new(AtomicUsize::new(0)),
            wake_rx,
            wake_tx,
        })
    }

    /// Atomically takes and clears the pending signal number, if any.
    pub fn take(&self) -> Option<i32> {
        match self.flag.swap(0, Ordering::SeqCst) {
            0 => None,
            signo => Some(signo as i32),
        }
    }

    /// Read end of the wake pipe, for `poll(2)` alongside stdin.
    pub fn wake_fd(&self) -> RawFd {
        self.wake_rx
    }

    /// Discards any queued wake bytes.
    pub fn drain(&self) {
        let mut buf = [0u8; 128];
        loop {
            let r = unsafe { libc::read(self.wake_rx, buf.as_mut_ptr().cast(), buf.len()) };
            if r <= 0 {
                break;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn raise(&self, signo: i32) {
        self.flag.store(signo as usize, Ordering::SeqCst);
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.wake_rx);
            libc::close(self.wake_tx);
        }
    }
}

fn nonblocking_pipe() -> io::Result<(RawFd, RawFd)> {
    let mut fds = [0; 2];
    if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    for fd in fds {
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL, 0) };
        if flags < 0 || unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
            let err = io::Error::last_os_error();
            unsafe {
                libc::close(fds[0]);
                libc::close(fds[1]);
            }
            return Err(err);
        }
    }
    Ok((fds[0], fds[1]))
}

/// Reacts to a consumed signal number.
///
/// Returns normally only for SIGWINCH with resize tolerance enabled; every
/// other signal terminates the process with `128 + signo`. The cursor is
/// restored before anything is printed, on every path.
pub fn handle(signo: i32, config: &Config) {
    if signo == SIGWINCH && config.allow_resize {
        return;
    }

    term::show_cursor();
    if config.beep {
        term::bell();
    }

    let code = 128 + signo;
    // Break the partially typed line before reporting.
    let mut out = io::stdout();
    let _ = out.write_all(b"\n");
    let _ = out.flush();

    eprintln!(
        "\x1b[33msignal {} ({code}):\x1b[0m {}",
        name(signo),
        describe(signo)
    );
    if signo == SIGWINCH {
        eprintln!(
            "\x1b[31merror ({code}):\x1b[0m Resizing during typing is not advised and may \
             corrupt output. Note: some terminal environments can send SIGWINCH when focus \
             changes. Use -r/--allow-resize to ignore resize events."
        );
    }
    if config.beep {
        term::bell();
    }

    process::exit(code);
}

/// Symbolic name for a handled signal.
pub fn name(signo: i32) -> String {
    match signo {
        SIGINT => "SIGINT".into(),
        SIGTERM => "SIGTERM".into(),
        SIGQUIT => "SIGQUIT".into(),
        SIGHUP => "SIGHUP".into(),
        SIGWINCH => "SIGWINCH".into(),
        other => format!("SIG{other}"),
    }
}

/// Platform description of a signal, from `strsignal(3)`.
fn describe(signo: i32) -> String {
    let ptr = unsafe { libc::strsignal(signo) };
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}
