//! Question in, answer out.
//!
//! [`Pipeline`] wires a [`Compiler`] to the jq evaluator:
//!
//! ```text
//! document source ─▶ Document::parse ─┐
//! query ──────────────────────────────┴▶ Compiler::compile ─▶ Expression ─▶ evaluate ─▶ JSON
//! ```
//!
//! [`Pipeline::answer`] returns an explicit `Result`; [`Pipeline::answer_text`]
//! folds every failure into user-facing text and never propagates.

use tracing::{debug, info};

use crate::{
    compiler::{Compiler, Expression, LlmConfig, RuleCompiler, Strategy},
    document::{Document, DocumentSource},
    error::NljqError,
    tokenizer::WordTokenizer,
};

/// A translated question and the value it evaluated to.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub expression: Expression,
    pub result: serde_json::Value,
}

impl Answer {
    /// The result as two-space indented JSON.
    pub fn render(&self) -> String {
        render_json(&self.result)
    }
}

pub(crate) fn render_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Runs `expression` against the document and returns its first output.
///
/// # Errors
///
/// - [`NljqError::InvalidJson`] / [`NljqError::InvalidInputType`] for bad documents
/// - `NljqError::Evaluation` when the expression is invalid or fails
/// - [`NljqError::MissingCapability`] when built without the `jq` feature
pub fn evaluate(
    expression: &Expression,
    source: impl Into<DocumentSource>,
) -> Result<serde_json::Value, NljqError> {
    let document = Document::parse(source)?;
    evaluate_document(expression, &document)
}

#[cfg(feature = "jq")]
fn evaluate_document(
    expression: &Expression,
    document: &Document,
) -> Result<serde_json::Value, NljqError> {
    let input = crate::jq::Value::from(document.as_json().clone());
    let value = crate::jq::evaluate(expression.as_str(), &input)?;
    Ok(value.into())
}

#[cfg(not(feature = "jq"))]
fn evaluate_document(
    _expression: &Expression,
    _document: &Document,
) -> Result<serde_json::Value, NljqError> {
    Err(NljqError::MissingCapability {
        capability: "jq evaluator",
        reason: "built without the `jq` feature".to_string(),
    })
}

/// Compiler plus evaluator.
pub struct Pipeline {
    compiler: Box<dyn Compiler>,
}

impl Pipeline {
    pub fn new(compiler: Box<dyn Compiler>) -> Self {
        Pipeline { compiler }
    }

    /// Pipeline over the rule compiler with the default tokenizer.
    pub fn with_rules() -> Result<Self, NljqError> {
        let tokenizer = WordTokenizer::load().map_err(|e| NljqError::MissingCapability {
            capability: "tokenizer",
            reason: e.to_string(),
        })?;
        Ok(Pipeline::new(Box::new(RuleCompiler::new(tokenizer))))
    }

    /// Pipeline for `strategy`; `llm` carries the service settings used by
    /// [`Strategy::Llm`].
    pub fn for_strategy(strategy: Strategy, llm: LlmConfig) -> Result<Self, NljqError> {
        info!(?strategy, "building pipeline");
        match strategy {
            Strategy::Rules => Pipeline::with_rules(),
            #[cfg(feature = "llm")]
            Strategy::Llm => {
                let compiler = crate::compiler::llm::LlmCompiler::new(llm)?;
                Ok(Pipeline::new(Box::new(compiler)))
            }
            #[cfg(not(feature = "llm"))]
            Strategy::Llm => {
                let _ = llm;
                Err(NljqError::MissingCapability {
                    capability: "LLM compiler",
                    reason: "built without the `llm` feature".to_string(),
                })
            }
        }
    }

    /// Parses the document and translates `query` against it.
    pub fn compile(
        &self,
        query: &str,
        source: impl Into<DocumentSource>,
    ) -> Result<Expression, NljqError> {
        let document = Document::parse(source)?;
        self.compile_document(query, &document)
    }

    fn compile_document(&self, query: &str, document: &Document) -> Result<Expression, NljqError> {
        let expression = self.compiler.compile(query, document)?;
        debug!(query, %expression, "query compiled");
        Ok(expression)
    }

    /// Translates `query` and evaluates the expression against the document.
    ///
    /// # Examples
    ///
    /// ```
    /// use nljq::Pipeline;
    ///
    /// let pipeline = Pipeline::with_rules().unwrap();
    /// let doc = r#"[{"name":"Alice","age":30},{"name":"Bob","age":25}]"#;
    ///
    /// let answer = pipeline.answer("average age", doc).unwrap();
    /// assert_eq!(answer.expression.as_str(), "map(.age) | add / length");
    /// assert_eq!(answer.render(), "27.5");
    /// ```
    pub fn answer(
        &self,
        query: &str,
        source: impl Into<DocumentSource>,
    ) -> Result<Answer, NljqError> {
        let document = Document::parse(source)?;
        // Translation failure stops here, before the evaluator sees anything
        let expression = self.compile_document(query, &document)?;
        let result = evaluate_document(&expression, &document)?;
        Ok(Answer { expression, result })
    }

    /// Like [`Pipeline::answer`], but every outcome is text: the rendered
    /// result, or the error message.
    pub fn answer_text(&self, query: &str, source: impl Into<DocumentSource>) -> String {
        match self.answer(query, source) {
            Ok(answer) => answer.render(),
            Err(e) => e.to_string(),
        }
    }
}
