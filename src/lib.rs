//! Answer natural-language questions about JSON documents with jq.
//!
//! A question is translated into a jq expression by a [`Compiler`], then the
//! expression is run against the document. [`Pipeline`] does both.

pub mod cli;
pub mod compiler;
pub mod document;
pub mod error;
#[cfg(feature = "jq")]
pub mod jq;
pub mod pipeline;
pub mod tokenizer;

pub use compiler::{
    CompileError, Compiler, Expression, LlmConfig, RuleCompiler, Strategy, Translation,
};
pub use document::{Document, DocumentSource};
pub use error::NljqError;
pub use pipeline::{Answer, Pipeline, evaluate};
pub use tokenizer::{Tokenizer, WordTokenizer};
