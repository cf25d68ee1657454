//! The line renderer.
//!
//! Drives the character-by-character emission loop: per-line escape
//! transform, optional dimmed line-number gutter, glyph decoding, tab stops,
//! hard wrapping against the live terminal width, mistake interludes and the
//! end-of-line cursor flash. The full accumulated line is redrawn after
//! every state change (carriage return, clear-to-end, buffer, cursor block)
//! so dwell states and corrections are visible frame by frame.
//!
//! The signal flag is polled at least once per decoded unit and once per
//! timing sub-step, so a delivered signal is acted on within roughly one
//! delay step no matter where in a line rendering currently is.

pub mod escape;
pub mod glyph;
pub mod mistake;
pub mod timing;

use std::io::{self, Write};
use std::thread;

use rand::rngs::ThreadRng;

use crate::config::{Config, EscapeMode};
use crate::signals::{self, SignalBridge};
use crate::term;
use escape::ESC;
use timing::{
    CHAR_DWELL, EOL_FLASH_DWELL, MISTAKE_SETTLE_DWELL, MISTAKE_WRONG_DWELL, TAB_DWELL, TAB_SIZE,
    WRAP_DWELL,
};

/// Cursor glyph drawn at the write position while typing.
const CURSOR_BLOCK: &str = "\u{2588}";
/// Carriage return plus clear-to-end-of-line; every redraw starts with this.
const CLEAR_LINE: &[u8] = b"\r\x1b[K";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// The line-number gutter: full form for the first segment, dimmed blanks
/// for wrapped continuations.
struct Gutter {
    first: Vec<u8>,
    cont: Vec<u8>,
    /// Visible columns both forms occupy.
    width: usize,
}

/// Renders lines to a terminal writer.
///
/// Holds only per-run state; the per-line buffer and column live inside
/// [`type_line`](Self::type_line). With `bridge: None` the renderer runs
/// without signal integration (early error paths, tests).
pub struct Renderer<'a, W: Write> {
    config: &'a Config,
    bridge: Option<&'a SignalBridge>,
    out: W,
    rng: ThreadRng,
    cols_override: Option<usize>,
}

impl<'a, W: Write> Renderer<'a, W> {
    pub fn new(config: &'a Config, bridge: Option<&'a SignalBridge>, out: W) -> Self {
        Self {
            config,
            bridge,
            out,
            rng: rand::thread_rng(),
            cols_override: None,
        }
    }

    /// Fixes the terminal width instead of querying it, for tests.
    pub fn with_cols(mut self, cols: usize) -> Self {
        self.cols_override = Some(cols);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Types one line, with an optional 1-based line number and total count
    /// for the gutter. Returns after the trailing cursor flash; only a fatal
    /// signal exits earlier (via [`signals::handle`]).
    pub fn type_line(
        &mut self,
        raw: &[u8],
        lineno: Option<usize>,
        total: usize,
    ) -> io::Result<()> {
        self.poll_signals();

        let line = escape::apply(self.config.escape_mode, raw);
        let passthrough = self.config.escape_mode == EscapeMode::Passthrough;

        if self.config.debug {
            self.trace_enter(lineno, total);
        }

        let gutter = self.gutter(lineno, total);
        let mut buf: Vec<u8> = Vec::with_capacity(line.len() + 16);
        let mut col = gutter.width;
        buf.extend_from_slice(&gutter.first);

        let mut i = 0;
        while i < line.len() {
            self.poll_signals();
            let cols = self.cols();
            let b = line[i];

            // Passthrough mode leaves real escape bytes in the line; they
            // are reproduced as one atomic write, zero width, no delay.
            if passthrough && b == ESC {
                let end = escape::sequence_end(&line, i);
                buf.extend_from_slice(&line[i..end]);
                i = end;
                self.redraw(&buf, true)?;
                continue;
            }

            let g = glyph::decode(&line, i);
            let delta = if b == b'\t' {
                self.redraw(&buf, true)?;
                self.dwell(TAB_DWELL);
                match col % TAB_SIZE {
                    0 => TAB_SIZE,
                    m => TAB_SIZE - m,
                }
            } else {
                self.redraw(&buf, true)?;
                self.dwell(CHAR_DWELL);
                g.width
            };

            if delta > 0 && col + delta >= cols {
                self.wrap(&mut buf, &gutter, &mut col)?;
            } else {
                col += delta;
            }

            if self.config.mistakes && g.len == 1 && mistake::eligible(b) {
                if mistake::roll(&mut self.rng, self.config.mistake_chance) {
                    self.mistake_interlude(&buf, b as char)?;
                } else {
                    // A failed roll still costs one step.
                    self.dwell(1);
                }
            }

            buf.extend_from_slice(&line[i..i + g.len]);
            i += g.len;
            self.redraw(&buf, true)?;
        }

        // Never flush a sequence the wrap/width logic may have truncated.
        escape::sanitize_trailing(&mut buf);
        self.redraw(&buf, false)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;

        self.out.write_all(CURSOR_BLOCK.as_bytes())?;
        self.out.flush()?;
        self.dwell(EOL_FLASH_DWELL);
        self.out.write_all(CLEAR_LINE)?;
        self.out.flush()?;

        if self.config.debug {
            self.trace_done(lineno);
        }
        Ok(())
    }

    /// Consumes the pending signal number, if any, and dispatches it.
    fn poll_signals(&mut self) {
        if let Some(bridge) = self.bridge {
            if let Some(signo) = bridge.take() {
                bridge.drain();
                signals::handle(signo, self.config);
            }
        }
    }

    fn cols(&self) -> usize {
        self.cols_override.unwrap_or_else(term::cols)
    }

    fn dwell(&mut self, steps: u32) {
        for _ in 0..steps {
            self.poll_signals();
            thread::sleep(timing::delay(self.config.speed, &mut self.rng));
        }
    }

    fn redraw(&mut self, buf: &[u8], cursor: bool) -> io::Result<()> {
        self.out.write_all(CLEAR_LINE)?;
        self.out.write_all(buf)?;
        if cursor {
            self.out.write_all(CURSOR_BLOCK.as_bytes())?;
        }
        self.out.flush()
    }

    /// Hard newline and reset to the continuation gutter.
    fn wrap(&mut self, buf: &mut Vec<u8>, gutter: &Gutter, col: &mut usize) -> io::Result<()> {
        self.redraw(buf, false)?;
        self.out.write_all(b"\n")?;
        buf.clear();
        if gutter.width > 0 {
            buf.extend_from_slice(&gutter.cont);
            self.out.write_all(&gutter.cont)?;
            *col = gutter.width;
        } else {
            *col = 0;
        }
        self.out.write_all(CURSOR_BLOCK.as_bytes())?;
        self.out.flush()?;
        self.dwell(WRAP_DWELL);
        Ok(())
    }

    /// Shows a wrong neighboring key, dwells, erases, dwells again.
    fn mistake_interlude(&mut self, buf: &[u8], ch: char) -> io::Result<()> {
        let wrong = mistake::neighbor_of(&mut self.rng, ch);
        self.out.write_all(CLEAR_LINE)?;
        self.out.write_all(buf)?;
        let mut utf8 = [0u8; 4];
        self.out.write_all(wrong.encode_utf8(&mut utf8).as_bytes())?;
        self.out.write_all(CURSOR_BLOCK.as_bytes())?;
        self.out.flush()?;
        self.dwell(MISTAKE_WRONG_DWELL);

        self.redraw(buf, true)?;
        self.dwell(MISTAKE_SETTLE_DWELL);
        Ok(())
    }

    fn gutter(&self, lineno: Option<usize>, total: usize) -> Gutter {
        let lineno = match lineno {
            Some(n) if self.config.line_numbers && n >= 1 => n,
            _ => {
                return Gutter {
                    first: Vec::new(),
                    cont: Vec::new(),
                    width: 0,
                }
            }
        };

        let width = digits(if total > 0 { total } else { lineno });
        let visible = if self.config.binary_input {
            format!("{}?| ", " ".repeat(width - 1))
        } else {
            format!("{lineno:>width$}| ")
        };
        let cont = format!("{}| ", " ".repeat(width));

        Gutter {
            width: visible.len(),
            first: format!("{DIM}{visible}{RESET}").into_bytes(),
            cont: format!("{DIM}{cont}{RESET}").into_bytes(),
        }
    }

    fn trace_enter(&self, lineno: Option<usize>, total: usize) {
        let position = match lineno {
            Some(n) => format!(" {}/{}", n, if total > 0 { total } else { n }),
            None => String::new(),
        };
        eprintln!(
            "\x1b[36mDEBUG:\x1b[0m typing line{position} cols={} speed={} allow-resize={} binary={}",
            self.cols(),
            self.config.speed,
            if self.config.allow_resize { "ON" } else { "OFF" },
            if self.config.binary_input { "YES" } else { "NO" },
        );
    }

    fn trace_done(&self, lineno: Option<usize>) {
        let position = match lineno {
            Some(n) => format!(" {n}"),
            None => String::new(),
        };
        eprintln!(
            "\x1b[36mDEBUG:\x1b[0m finished line{position} cols={} speed={}",
            self.cols(),
            self.config.speed,
        );
    }
}

/// Debug summary after a completed run. Goes to stderr, like every other
/// trace.
pub fn trace_success(config: &Config) {
    eprintln!("{}", success_summary(config.allow_resize));
}

fn success_summary(allow_resize: bool) -> String {
    format!(
        "\x1b[32msuccess (0):\x1b[0m work finished successfully! (allow-resize: {})",
        if allow_resize { "ENABLED" } else { "DISABLED" }
    )
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> Config {
        Config {
            speed: 100,
            ..Config::default()
        }
    }

    fn render(config: &Config, cols: usize, line: &[u8], lineno: Option<usize>, total: usize) -> Vec<u8> {
        let mut renderer = Renderer::new(config, None, Vec::new()).with_cols(cols);
        renderer.type_line(line, lineno, total).unwrap();
        renderer.into_inner()
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn plain_line_is_typed_and_terminated() {
        let config = fast_config();
        let out = as_text(&render(&config, 80, b"ab", None, 0));
        // Incremental frames, then the final sanitized flush with newline,
        // then the cleared cursor flash.
        assert!(out.contains("\r\u{1b}[Ka\u{2588}"));
        assert!(out.contains("\r\u{1b}[Kab\n"));
        assert!(out.ends_with("\r\u{1b}[K"));
    }

    #[test]
    fn wrap_triggers_when_column_meets_width() {
        let config = fast_config();
        let out = as_text(&render(&config, 10, b"0123456789", None, 0));
        // Ten width-1 glyphs against ten columns: the last one wraps.
        assert!(out.contains("\r\u{1b}[K012345678\n"));
        assert!(out.contains("\r\u{1b}[K9\n"));
    }

    #[test]
    fn no_wrap_below_the_boundary() {
        let config = fast_config();
        let out = as_text(&render(&config, 10, b"012345678", None, 0));
        assert_eq!(out.matches('\n').count(), 1);
        assert!(out.contains("\r\u{1b}[K012345678\n"));
    }

    #[test]
    fn wide_glyph_counts_two_columns_for_wrapping() {
        let config = fast_config();
        // "aa" fills columns 0-1; the width-2 ideograph would reach column 4.
        let out = as_text(&render(&config, 4, "aa\u{4e2d}".as_bytes(), None, 0));
        assert!(out.contains("\r\u{1b}[Kaa\n"));
        assert!(out.contains("\r\u{1b}[K\u{4e2d}\n"));
    }

    #[test]
    fn zero_width_glyph_does_not_advance_or_wrap() {
        let config = fast_config();
        // Combining acute accent after 'e', right at the width boundary.
        let line = "abcdefghe\u{301}".as_bytes();
        let out = as_text(&render(&config, 10, line, None, 0));
        assert_eq!(out.matches('\n').count(), 1);
        assert!(out.contains("abcdefghe\u{301}\n"));
    }

    #[test]
    fn strip_mode_removes_sequences_from_output() {
        let config = fast_config();
        let out = render(&config, 80, b"\x1b[31mred\x1b[0m", None, 0);
        let text = as_text(&out);
        assert!(text.contains("\r\u{1b}[Kred\n"));
        assert!(!text.contains("[31m"));
    }

    #[test]
    fn passthrough_emits_sequences_atomically() {
        let config = Config {
            escape_mode: EscapeMode::Passthrough,
            ..fast_config()
        };
        let out = as_text(&render(&config, 80, b"\\e[31mx", None, 0));
        assert!(out.contains("\r\u{1b}[K\u{1b}[31mx\n"));
    }

    #[test]
    fn dangling_escape_is_sanitized_from_the_final_flush() {
        let config = Config {
            escape_mode: EscapeMode::Passthrough,
            ..fast_config()
        };
        let out = as_text(&render(&config, 80, b"x\\e[3", None, 0));
        assert!(out.contains("\r\u{1b}[Kx\n"));
    }

    #[test]
    fn numbered_gutter_precedes_the_text() {
        let config = Config {
            line_numbers: true,
            ..fast_config()
        };
        let out = as_text(&render(&config, 80, b"hi", Some(3), 120));
        assert!(out.contains("\u{1b}[2m  3| \u{1b}[0m"));
        assert!(out.contains("  3| \u{1b}[0mhi\n"));
    }

    #[test]
    fn binary_input_gutter_shows_a_placeholder() {
        let config = Config {
            line_numbers: true,
            binary_input: true,
            ..fast_config()
        };
        let out = as_text(&render(&config, 80, b"hi", Some(2), 12));
        assert!(out.contains("\u{1b}[2m ?| \u{1b}[0m"));
    }

    #[test]
    fn continuation_gutter_after_wrap_uses_blanks() {
        let config = Config {
            line_numbers: true,
            ..fast_config()
        };
        // Gutter "1| " occupies 3 columns; 7 more glyphs hit column 10.
        let out = as_text(&render(&config, 10, b"abcdefghij", Some(1), 1));
        assert!(out.contains("\u{1b}[2m1| \u{1b}[0m"));
        assert!(out.contains("\u{1b}[2m | \u{1b}[0m"));
    }

    #[test]
    fn mistakes_at_full_chance_show_a_wrong_neighbor() {
        let config = Config {
            mistakes: true,
            mistake_chance: 100,
            ..fast_config()
        };
        let out = as_text(&render(&config, 80, b"a", None, 0));
        let wrong_frame = "qwsz"
            .chars()
            .any(|w| out.contains(&format!("\r\u{1b}[K{w}\u{2588}")));
        assert!(wrong_frame, "no wrong-key frame in: {out:?}");
        assert!(out.contains("\r\u{1b}[Ka\n"));
    }

    #[test]
    fn tab_advances_to_the_next_tab_stop() {
        let config = fast_config();
        let out = as_text(&render(&config, 80, b"a\tb", None, 0));
        // The raw tab is kept in the buffer; the terminal expands it.
        assert!(out.contains("\r\u{1b}[Ka\tb\n"));
    }

    #[test]
    fn success_summary_reports_the_resize_setting() {
        assert_eq!(
            success_summary(false),
            "\u{1b}[32msuccess (0):\u{1b}[0m work finished successfully! (allow-resize: DISABLED)"
        );
        assert!(success_summary(true).ends_with("(allow-resize: ENABLED)"));
    }

    #[test]
    fn digit_widths() {
        assert_eq!(digits(1), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
        assert_eq!(digits(120), 3);
    }
}
