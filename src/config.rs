//! Immutable rendering configuration.
//!
//! Built once from the parsed command line and passed by reference into the
//! renderer. The signal flag in [`crate::signals`] is the only mutable state
//! shared across contexts; everything here is fixed for the whole run.

/// How ANSI escape sequences in the input are treated, once per line, before
/// the character loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeMode {
    /// Remove real CSI/OSC sequences and literal `\e`/`\x1b`/`\033` markers.
    #[default]
    Strip,
    /// Convert literal markers to real escape bytes and emit sequences live
    /// (`-c/--color`).
    Passthrough,
    /// Convert every escape sequence to its textual `\e[...` form
    /// (`-e/--print-escapes`).
    Textualize,
}

/// Process-wide configuration, read-only during rendering.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Typing speed, 1-100. 100 yields the minimum delay.
    pub speed: u8,
    /// Whether simulated typing mistakes are enabled.
    pub mistakes: bool,
    /// Mistake probability in percent, 1-100.
    pub mistake_chance: u8,
    /// Escape sequence handling mode.
    pub escape_mode: EscapeMode,
    /// Prepend a dimmed `N| ` gutter to each line.
    pub line_numbers: bool,
    /// Ignore SIGWINCH instead of treating it as fatal.
    pub allow_resize: bool,
    /// Sound BEL around error and signal reports.
    pub beep: bool,
    /// Print debug traces to stderr.
    pub debug: bool,
    /// The input was classified as binary; the gutter shows `?` instead of
    /// line numbers.
    pub binary_input: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: 50,
            mistakes: false,
            mistake_chance: 10,
            escape_mode: EscapeMode::Strip,
            line_numbers: false,
            allow_resize: false,
            beep: false,
            debug: false,
            binary_input: false,
        }
    }
}
