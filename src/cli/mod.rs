//! CLI support for nljq
//!
//! The binary is a thin shell over these functions so they can be driven
//! from tests or other tools without spawning a process.

mod demo;
mod run;

pub use demo::{SAMPLE_DOCUMENT, SAMPLE_QUERIES, run_demo};
pub use run::{
    AskOptions, CompileOptions, EvalOptions, execute_ask, execute_compile, execute_eval,
    explain, format_translation, render,
};

use std::io;

use thiserror::Error;

use crate::error::NljqError;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Nljq(#[from] NljqError),

    #[error("Error: could not read input: {0}")]
    Io(#[from] io::Error),

    /// No `--input` and nothing piped to stdin
    #[error("Error: No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("Error: the expression is empty")]
    EmptyExpression,

    /// `compile --explain` with a strategy other than `rules`
    #[error("Error: --explain only traces the rules strategy")]
    ExplainNeedsRules,
}
