//! Process exit codes and the fatal error type that carries them.
//!
//! The code values are a fixed contract, documented by `typecat --codes`.
//! Signals exit with `128 + signo` and are handled in [`crate::signals`],
//! not here.

/// Exit codes raised by typecat itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Successful run.
    Ok = 0,
    /// Output is not a TTY (cannot pipe/redirect).
    NotATty = 1,
    /// Invalid speed parameter (use 1-100).
    BadSpeed = 2,
    /// Invalid mistakes parameter (use 1-100).
    BadMistakes = 3,
    /// Stdin input appears to be binary.
    BinaryStdin = 4,
    /// File cannot be read or opened.
    UnreadableFile = 5,
    /// Bad usage / option conflict.
    BadUsage = 6,
    /// Other runtime error.
    Runtime = 7,
    /// File does not exist.
    MissingFile = 8,
    /// File is empty.
    EmptyFile = 9,
    /// File input appears to be binary.
    BinaryFile = 10,
}

impl ExitCode {
    /// Numeric value passed to `process::exit`.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// An error that terminates the process with a specific [`ExitCode`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct FatalError {
    pub code: ExitCode,
    pub message: String,
}

impl FatalError {
    pub fn new(code: ExitCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_documented_contract() {
        assert_eq!(ExitCode::Ok.code(), 0);
        assert_eq!(ExitCode::NotATty.code(), 1);
        assert_eq!(ExitCode::BadSpeed.code(), 2);
        assert_eq!(ExitCode::BadMistakes.code(), 3);
        assert_eq!(ExitCode::BinaryStdin.code(), 4);
        assert_eq!(ExitCode::UnreadableFile.code(), 5);
        assert_eq!(ExitCode::BadUsage.code(), 6);
        assert_eq!(ExitCode::Runtime.code(), 7);
        assert_eq!(ExitCode::MissingFile.code(), 8);
        assert_eq!(ExitCode::EmptyFile.code(), 9);
        assert_eq!(ExitCode::BinaryFile.code(), 10);
    }

    #[test]
    fn fatal_error_displays_message_only() {
        let err = FatalError::new(ExitCode::MissingFile, "File does not exist: x");
        assert_eq!(err.to_string(), "File does not exist: x");
    }
}
