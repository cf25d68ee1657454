//! typecat core library.
//!
//! Renders lines of text to a terminal character-by-character with a
//! randomized typing delay, optional simulated typing mistakes, ANSI escape
//! handling, a dimmed line-number gutter, and cooperative POSIX signal
//! handling.
//!
//! The rendering engine lives in [`render`]; everything else is the glue
//! around it: argument handling ([`cli`]), input acquisition ([`input`]),
//! the asynchronous signal bridge ([`signals`]) and terminal plumbing
//! ([`term`]).

pub mod cli;
pub mod config;
pub mod exit;
pub mod input;
pub mod render;
pub mod signals;
pub mod term;

pub use config::{Config, EscapeMode};
pub use exit::{ExitCode, FatalError};
