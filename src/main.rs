//! typecat binary: argument flow, input selection and fatal-error reporting.
//!
//! The rendering engine itself lives in the library; this file only decides
//! what to render and turns failures into the documented exit codes.

use std::io;
use std::process;

use anyhow::{Context, Result};
use atty::Stream;
use clap::Parser;

use typecat::cli::{self, Cli};
use typecat::config::{Config, EscapeMode};
use typecat::exit::{ExitCode, FatalError};
use typecat::input::{self, interactive, Input};
use typecat::render::{self, Renderer};
use typecat::signals::SignalBridge;
use typecat::term;

fn main() {
    term::install_exit_hook();
    let cli = Cli::parse();

    if cli.codes {
        cli::print_codes();
        return;
    }

    if let Err(err) = run(&cli) {
        let (code, message) = match err.downcast::<FatalError>() {
            Ok(fatal) => (fatal.code, fatal.message),
            Err(other) => (ExitCode::Runtime, format!("{other:#}")),
        };
        report_fatal(&cli, code, &message);
    }
}

fn run(cli: &Cli) -> Result<()> {
    cli.validate()?;
    let bridge = SignalBridge::install().context("failed to install signal handlers")?;

    let input = acquire(cli)?;
    let config = cli.to_config(input.as_ref().is_some_and(|i| i.binary));

    if !atty::is(Stream::Stdout) || !atty::is(Stream::Stderr) {
        return Err(FatalError::new(
            ExitCode::NotATty,
            "Output cannot be piped or redirected. (FD: 1/2)",
        )
        .into());
    }

    match input {
        Some(input) => {
            term::hide_cursor();
            let mut renderer = Renderer::new(&config, Some(&bridge), io::stdout());
            let total = input.lines.len();
            for (idx, line) in input.lines.iter().enumerate() {
                if config.line_numbers {
                    renderer.type_line(line, Some(idx + 1), total)?;
                } else {
                    renderer.type_line(line, None, 0)?;
                }
            }
        }
        None => interactive::run(&config, &bridge)?,
    }

    if config.debug {
        render::trace_success(&config);
    }
    Ok(())
}

/// Collects the lines to render: `-t` texts, then the file, else piped
/// stdin. `None` means interactive terminal mode.
fn acquire(cli: &Cli) -> Result<Option<Input>, FatalError> {
    let mut lines: Vec<Vec<u8>> = cli.text.iter().map(|t| t.clone().into_bytes()).collect();
    let mut binary = false;

    if let Some(path) = &cli.file {
        let file = input::from_file(path, cli.show_all)?;
        binary = file.binary;
        lines.extend(file.lines);
    } else if lines.is_empty() {
        if atty::is(Stream::Stdin) {
            return Ok(None);
        }
        return Ok(Some(input::from_stdin(cli.show_all)?));
    }

    Ok(Some(Input { lines, binary }))
}

/// Reports a fatal error and exits. On a terminal the message is typed in
/// red through the renderer (escapes live, mistakes off); piped output gets
/// a plain stderr line instead.
fn report_fatal(cli: &Cli, code: ExitCode, message: &str) -> ! {
    if cli.beep {
        term::bell();
    }

    if atty::is(Stream::Stdout) && atty::is(Stream::Stderr) {
        let config = Config {
            escape_mode: EscapeMode::Passthrough,
            mistakes: false,
            line_numbers: false,
            ..cli.to_config(false)
        };
        term::hide_cursor();
        let styled = format!("\x1b[31merror ({}):\x1b[0m {message}", code.code());
        let mut renderer = Renderer::new(&config, None, io::stdout());
        let _ = renderer.type_line(styled.as_bytes(), None, 0);
    } else {
        eprintln!("error ({}): {message}", code.code());
    }

    if cli.beep {
        term::bell();
    }
    process::exit(code.code());
}
