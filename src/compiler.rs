//! Translation of natural-language questions into jq expressions.
//!
//! Two strategies implement the same [`Compiler`] contract:
//!
//! - [`RuleCompiler`] - deterministic, local; token rules plus ordered
//!   override rules
//! - `LlmCompiler` (feature `llm`) - asks a chat-completion service
//!
//! Callers pick one with [`Strategy`] and never need to know which one
//! produced an [`Expression`].
//!
//! ## Rule tiers
//!
//! The rule compiler resolves conflicting signals with three tiers, each
//! replacing whatever the lower tiers built:
//!
//! 1. token accumulation ([`rules`])
//! 2. "X of Y" decomposition ([`overrides`])
//! 3. ordinal references ("second", "third") ([`overrides`])
//!
//! ```
//! use nljq::compiler::RuleCompiler;
//! use nljq::tokenizer::WordTokenizer;
//!
//! let compiler = RuleCompiler::new(WordTokenizer::load().unwrap());
//!
//! assert_eq!(compiler.translate("average age").unwrap().as_str(), "map(.age) | add / length");
//! assert_eq!(compiler.translate("name of address").unwrap().as_str(), ".name.address");
//! assert_eq!(compiler.translate("name second").unwrap().as_str(), ".[] | .[1]");
//! ```

#[cfg(feature = "llm")]
pub mod llm;
pub mod overrides;
pub mod rules;

use std::{fmt, time::Duration};

use thiserror::Error;
use tracing::debug;

use crate::{document::Document, tokenizer::Tokenizer};

pub use overrides::{OVERRIDE_RULES, OverrideRule, PhraseContext};
pub use rules::TokenRule;

/// A non-empty jq program produced by a compiler.
///
/// The compiler never inspects it; only the evaluator does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression(String);

impl Expression {
    /// Wraps `text`, or returns `None` when it is empty.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            None
        } else {
            Some(Expression(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors a compiler can report.
#[derive(Debug, Error)]
pub enum CompileError {
    /// No rule produced any expression text
    #[error("could not translate the query")]
    TranslationFailure,

    #[cfg(feature = "llm")]
    #[error(transparent)]
    Llm(#[from] llm::LlmError),
}

/// Turns a question about a document into a jq expression.
pub trait Compiler {
    fn compile(&self, query: &str, document: &Document) -> Result<Expression, CompileError>;
}

/// Which [`Compiler`] implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Strategy {
    /// Local token and override rules
    #[default]
    Rules,
    /// Remote chat-completion service
    Llm,
}

/// Connection settings for the completion service used by
/// [`Strategy::Llm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL without the `/chat/completions` suffix
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Step-by-step record of one rule translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Lowercase tokens the tokenizer produced
    pub tokens: Vec<String>,
    /// Buffer after token accumulation
    pub accumulated: String,
    /// Name of the override rule that replaced the buffer, if any
    pub override_rule: Option<&'static str>,
    /// Final expression text; empty means translation failed
    pub expression: String,
}

impl Translation {
    pub fn into_expression(self) -> Result<Expression, CompileError> {
        Expression::new(self.expression).ok_or(CompileError::TranslationFailure)
    }
}

/// Deterministic compiler built from token rules and override rules.
pub struct RuleCompiler<T> {
    tokenizer: T,
    overrides: &'static [OverrideRule],
}

impl<T: Tokenizer> RuleCompiler<T> {
    /// Creates a compiler using the standard override rules.
    pub fn new(tokenizer: T) -> Self {
        Self::with_overrides(tokenizer, OVERRIDE_RULES)
    }

    /// Creates a compiler with a custom override rule list, applied in order.
    pub fn with_overrides(tokenizer: T, overrides: &'static [OverrideRule]) -> Self {
        RuleCompiler {
            tokenizer,
            overrides,
        }
    }

    /// Runs every tier and records what each one decided.
    pub fn explain(&self, query: &str) -> Translation {
        let tokens = self.tokenizer.tokenize(query);
        let accumulated = rules::accumulate(&tokens);
        debug!(?tokens, %accumulated, "token rules applied");

        let context = PhraseContext::new(query, &tokens);
        let (expression, override_rule) =
            overrides::apply(self.overrides, &context, accumulated.clone());
        if let Some(rule) = override_rule {
            debug!(rule, %expression, "override rule replaced the expression");
        }

        Translation {
            tokens,
            accumulated,
            override_rule,
            expression,
        }
    }

    /// Translates `query` without a document.
    pub fn translate(&self, query: &str) -> Result<Expression, CompileError> {
        self.explain(query).into_expression()
    }
}

impl<T: Tokenizer> Compiler for RuleCompiler<T> {
    /// The document is unused; rules see only the query.
    fn compile(&self, query: &str, _document: &Document) -> Result<Expression, CompileError> {
        self.translate(query)
    }
}
