//! Terminal plumbing: width queries, cursor visibility, the bell, and the
//! exit-time cursor restore hook.

use std::io::{self, Write};

use crossterm::cursor;
use terminal_size::{terminal_size, Width};

/// Column count assumed when the terminal cannot be queried.
pub const FALLBACK_COLS: usize = 80;

/// Current terminal width in columns. Queried fresh at every call; the
/// renderer deliberately does not cache this.
pub fn cols() -> usize {
    match terminal_size() {
        Some((Width(w), _)) if w > 0 => w as usize,
        _ => FALLBACK_COLS,
    }
}

pub fn hide_cursor() {
    let _ = crossterm::execute!(io::stdout(), cursor::Hide);
}

pub fn show_cursor() {
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

/// Sound the terminal bell. Written to stderr so it lands next to the error
/// and signal notices it punctuates.
pub fn bell() {
    let mut err = io::stderr();
    let _ = err.write_all(b"\x07");
    let _ = err.flush();
}

extern "C" fn restore_cursor_at_exit() {
    // Runs from exit context on every path, including signal-triggered
    // process::exit. Raw fd write only; no buffered I/O here.
    const SHOW: &[u8] = b"\x1b[?25h";
    unsafe {
        libc::write(libc::STDOUT_FILENO, SHOW.as_ptr().cast(), SHOW.len());
    }
}

/// Registers the unconditional cursor-restore hook. Call once at startup.
pub fn install_exit_hook() {
    unsafe {
        libc::atexit(restore_cursor_at_exit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cols_has_a_sane_value_even_without_a_terminal() {
        // Under the test harness there may or may not be a TTY; either way
        // the value must be positive (the fallback covers the headless case).
        assert!(cols() > 0);
    }
}
