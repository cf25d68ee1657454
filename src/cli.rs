//! Command line definition and validation.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, EscapeMode};
use crate::exit::{ExitCode, FatalError};

const AFTER_HELP: &str = "\
Input:
  If no file is provided and stdin is a TTY, typecat reads lines as you
  type them (press Enter to send a line). If stdin is piped, the whole
  input is consumed and displayed.

License: GPLv3.0";

/// Terminal typing simulator.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "typecat",
    version,
    about = "Displays text with a live typing effect: configurable speed, \
             simulated mistakes, escape handling and line numbering.",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Typing speed (1-100). 100 = minimal delay
    #[arg(short, long, default_value_t = 50, value_name = "1-100")]
    pub speed: u32,

    /// Enable random mistakes, optionally with a chance percentage
    #[arg(
        short,
        long,
        value_name = "1-100",
        num_args = 0..=1,
        default_missing_value = "10"
    )]
    pub mistakes: Option<String>,

    /// Interpret ANSI escape sequences (emit colors)
    #[arg(short, long)]
    pub color: bool,

    /// Print ANSI escapes textually as \e[..., not as colors
    #[arg(short = 'e', long)]
    pub print_escapes: bool,

    /// Emit BEL on errors and signals
    #[arg(short, long)]
    pub beep: bool,

    /// Add a text line to display (can be repeated)
    #[arg(short, long, value_name = "STRING")]
    pub text: Vec<String>,

    /// Force showing input even if detected as binary
    #[arg(short = 'a', long)]
    pub show_all: bool,

    /// Prepend dimmed line numbers (N| ) to each line
    #[arg(short = 'n', long)]
    pub line_numbers: bool,

    /// Allow terminal resize (SIGWINCH) during typing
    #[arg(short = 'r', long)]
    pub allow_resize: bool,

    /// Print debug traces to stderr
    #[arg(long)]
    pub debug: bool,

    /// Show a list of exit codes and signal handling details
    #[arg(long)]
    pub codes: bool,

    /// File to display
    pub file: Option<PathBuf>,
}

impl Cli {
    /// Checks value ranges and option conflicts that carry their own exit
    /// codes in the `--codes` contract.
    pub fn validate(&self) -> Result<(), FatalError> {
        if !(1..=100).contains(&self.speed) {
            return Err(FatalError::new(
                ExitCode::BadSpeed,
                format!("Invalid speed parameter: {}", self.speed),
            ));
        }
        if let Some(chance) = &self.mistakes {
            match chance.parse::<u32>() {
                Ok(v) if (1..=100).contains(&v) => {}
                _ => {
                    return Err(FatalError::new(
                        ExitCode::BadMistakes,
                        format!("Invalid mistakes parameter: {chance}"),
                    ));
                }
            }
        }
        if self.color && self.print_escapes {
            return Err(FatalError::new(
                ExitCode::BadUsage,
                "Options -c/--color and -e/--print-escapes are mutually exclusive",
            ));
        }
        Ok(())
    }

    /// Builds the immutable run configuration. Call after [`Cli::validate`];
    /// out-of-range values are clamped so the error printer can reuse this
    /// on unvalidated input.
    pub fn to_config(&self, binary_input: bool) -> Config {
        let escape_mode = if self.print_escapes {
            EscapeMode::Textualize
        } else if self.color {
            EscapeMode::Passthrough
        } else {
            EscapeMode::Strip
        };
        let mistake_chance = self
            .mistakes
            .as_deref()
            .and_then(|v| v.parse::<u32>().ok())
            .map_or(10, |v| v.clamp(1, 100)) as u8;

        Config {
            speed: self.speed.clamp(1, 100) as u8,
            mistakes: self.mistakes.is_some(),
            mistake_chance,
            escape_mode,
            line_numbers: self.line_numbers,
            allow_resize: self.allow_resize,
            beep: self.beep,
            debug: self.debug,
            binary_input,
        }
    }
}

/// Prints the `--codes` listing: the fixed exit-code contract and the signal
/// dispatch policy.
pub fn print_codes() {
    println!("Exit codes and signals handled by typecat:\n");
    println!("Standard exit codes:");
    println!("  0   - OK");
    println!("  1   - Output is not a TTY (cannot pipe/redirect)");
    println!("  2   - Invalid speed parameter (use 1-100)");
    println!("  3   - Invalid mistakes parameter (use 1-100)");
    println!("  4   - Input appears to be binary (stdin). Use -a/--show-all to override.");
    println!("  5   - File cannot be read (permission denied / cannot open)");
    println!("  6   - Bad parameter / option conflict");
    println!("  7   - Other runtime error");
    println!("  8   - File does not exist");
    println!("  9   - File is empty");
    println!(" 10   - File appears to be binary (file). Use -a/--show-all to override.\n");
    println!(
        "Signals (typecat exits with 128 + signal number unless allow-resize \
         is enabled for SIGWINCH):"
    );
    println!("  SIGINT   (2)  -> exit 130   - Interrupted by user (Ctrl-C)");
    println!("  SIGTERM  (15) -> exit 143   - Termination request");
    println!("  SIGQUIT  (3)  -> exit 131   - Quit from keyboard");
    println!("  SIGHUP   (1)  -> exit 129   - Hangup detected on controlling terminal");
    let winch = signal_hook::consts::SIGWINCH;
    println!(
        "  SIGWINCH ({winch}) -> exit {}   - Window size change; by default typecat \
         prints a signal line and an error indicating that resizing during \
         typing is not advised, then exits.",
        128 + winch
    );
    println!("           Use -r/--allow-resize to ignore resize events.");
}
