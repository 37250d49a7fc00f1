use thiserror::Error;

use crate::compiler::CompileError;

/// Every way answering a question can fail.
///
/// The display text is what callers show to users; each kind carries its
/// own prefix so the cause is visible at a glance.
#[derive(Debug, Error)]
pub enum NljqError {
    /// The document text is not valid JSON
    #[error("Error: Invalid JSON data: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The document is neither JSON text nor a parsed value
    #[error("Error: Invalid document input: {0}")]
    InvalidInputType(String),

    /// The compiler could not produce an expression
    #[error("Error: Could not translate the query.")]
    TranslationFailure,

    /// The evaluator rejected the expression or failed while running it
    #[cfg(feature = "jq")]
    #[error("Error applying jq: {0}")]
    Evaluation(#[from] crate::jq::EvalError),

    /// A capability this call needs was compiled out or failed to load
    #[error("Error: {capability} not available: {reason}")]
    MissingCapability {
        capability: &'static str,
        reason: String,
    },

    /// The completion service could not be reached or answered badly
    #[cfg(feature = "llm")]
    #[error("Error: LLM request failed: {0}")]
    Llm(#[from] crate::compiler::llm::LlmError),
}

impl From<CompileError> for NljqError {
    fn from(e: CompileError) -> Self {
        match e {
            CompileError::TranslationFailure => NljqError::TranslationFailure,
            #[cfg(feature = "llm")]
            CompileError::Llm(e) => NljqError::Llm(e),
        }
    }
}
