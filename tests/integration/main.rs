//! Binary-level integration tests for the typecat CLI.

mod helpers;

mod cli_test;
mod input_test;
