//! Input acquisition: files, piped stdin, and binary-content sniffing.

pub mod interactive;

use std::io::{self, Read};
use std::path::Path;

use crate::exit::{ExitCode, FatalError};

/// Sample size for the binary sniff.
const SNIFF_LIMIT: usize = 4096;
/// Fraction of non-printable bytes beyond which input counts as binary.
const BINARY_THRESHOLD: f64 = 0.30;

/// Lines ready to render, plus the binary classification that drives the
/// `?` gutter placeholder.
#[derive(Debug)]
pub struct Input {
    pub lines: Vec<Vec<u8>>,
    pub binary: bool,
}

/// Heuristic binary check over the first 4 KiB: any NUL byte decides
/// immediately; otherwise more than 30% non-printable bytes.
pub fn looks_binary(data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }
    let sample = &data[..data.len().min(SNIFF_LIMIT)];
    let mut nonprint = 0usize;
    for &b in sample {
        if b == 0 {
            return true;
        }
        if b < 0x09 || (0x0D < b && b < 0x20) {
            nonprint += 1;
        }
    }
    nonprint as f64 / sample.len() as f64 > BINARY_THRESHOLD
}

/// Splits on `\n` with getline semantics: a trailing newline does not
/// produce an empty final line, and empty input yields no lines.
pub fn split_lines(data: &[u8]) -> Vec<Vec<u8>> {
    if data.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<Vec<u8>> = data.split(|&b| b == b'\n').map(<[u8]>::to_vec).collect();
    if data.ends_with(b"\n") {
        lines.pop();
    }
    lines
}

/// Reads a file to render, enforcing the exit-code contract: missing (8),
/// unreadable (5), empty (9), binary without `--show-all` (10).
pub fn from_file(path: &Path, show_all: bool) -> Result<Input, FatalError> {
    if !path.exists() {
        return Err(FatalError::new(
            ExitCode::MissingFile,
            format!("File does not exist: {}", path.display()),
        ));
    }
    let data = std::fs::read(path).map_err(|err| {
        let reason = if err.kind() == io::ErrorKind::PermissionDenied {
            "Cannot read file (permission denied)"
        } else {
            "Cannot open file for reading"
        };
        FatalError::new(
            ExitCode::UnreadableFile,
            format!("{reason}: {}", path.display()),
        )
    })?;
    if data.is_empty() {
        return Err(FatalError::new(
            ExitCode::EmptyFile,
            format!("File is empty: {}", path.display()),
        ));
    }
    let binary = looks_binary(&data);
    if binary && !show_all {
        return Err(FatalError::new(
            ExitCode::BinaryFile,
            "File appears to be binary. Use -a/--show-all to force display.",
        ));
    }
    Ok(Input {
        lines: split_lines(&data),
        binary,
    })
}

/// Consumes piped stdin in one read. Binary input without `--show-all` is
/// exit code 4.
pub fn from_stdin(show_all: bool) -> Result<Input, FatalError> {
    let mut data = Vec::new();
    io::stdin().read_to_end(&mut data).map_err(|err| {
        FatalError::new(ExitCode::Runtime, format!("Cannot read stdin: {err}"))
    })?;
    let binary = looks_binary(&data);
    if binary && !show_all {
        return Err(FatalError::new(
            ExitCode::BinaryStdin,
            "Input appears to be binary. Use -a/--show-all to force display.",
        ));
    }
    Ok(Input {
        lines: split_lines(&data),
        binary,
    })
}
