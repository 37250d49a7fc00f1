//! Execute ask, compile and eval requests

use tracing::debug;

use super::CliError;
use crate::{
    compiler::{Expression, RuleCompiler, Strategy, Translation},
    document::DocumentSource,
    error::NljqError,
    pipeline::{self, Pipeline},
    tokenizer::WordTokenizer,
};

/// Options for the ask command
#[derive(Debug, Clone, Default)]
pub struct AskOptions {
    /// The question to answer
    pub query: String,
    /// The document, as given on the command line or read from stdin
    pub input: Option<DocumentSource>,
}

/// Options for the compile command
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub query: String,
    /// The document; only remote strategies look at it
    pub input: Option<DocumentSource>,
}

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// A jq expression
    pub expression: String,
    pub input: Option<DocumentSource>,
}

/// Translates and evaluates the question against the input.
pub fn execute_ask(
    pipeline: &Pipeline,
    options: &AskOptions,
) -> Result<serde_json::Value, CliError> {
    let input = options.input.clone().ok_or(CliError::NoInput)?;
    let answer = pipeline.answer(&options.query, input)?;
    debug!(expression = %answer.expression, "answered");
    Ok(answer.result)
}

/// Translates the question. Without input the document is `null`.
pub fn execute_compile(
    pipeline: &Pipeline,
    options: &CompileOptions,
) -> Result<Expression, CliError> {
    let expression = match options.input.clone() {
        Some(input) => pipeline.compile(&options.query, input)?,
        None => pipeline.compile(&options.query, serde_json::Value::Null)?,
    };
    Ok(expression)
}

/// Runs the rule compiler tier by tier, keeping the trace.
///
/// Only the rules strategy has tiers to show; any other strategy is refused.
pub fn explain(query: &str, strategy: Strategy) -> Result<Translation, CliError> {
    if strategy != Strategy::Rules {
        return Err(CliError::ExplainNeedsRules);
    }
    let tokenizer = WordTokenizer::load().map_err(|e| NljqError::MissingCapability {
        capability: "tokenizer",
        reason: e.to_string(),
    })?;
    Ok(RuleCompiler::new(tokenizer).explain(query))
}

/// One line per tier, ending with the final expression.
pub fn format_translation(translation: &Translation) -> String {
    let mut out = String::new();
    out.push_str(&format!("tokens: {:?}\n", translation.tokens));
    out.push_str(&format!("accumulated: {}\n", translation.accumulated));
    out.push_str(&format!(
        "override: {}\n",
        translation.override_rule.unwrap_or("none")
    ));
    if translation.expression.is_empty() {
        out.push_str("expression: <none>\n");
    } else {
        out.push_str(&format!("expression: {}\n", translation.expression));
    }
    out
}

/// Runs a jq expression directly, with no translation step.
pub fn execute_eval(options: &EvalOptions) -> Result<serde_json::Value, CliError> {
    let expression =
        Expression::new(options.expression.as_str()).ok_or(CliError::EmptyExpression)?;
    let input = options.input.clone().ok_or(CliError::NoInput)?;
    let value = pipeline::evaluate(&expression, input)?;
    Ok(value)
}

/// Compact JSON, or two-space indented with `pretty`.
pub fn render(value: &serde_json::Value, pretty: bool) -> String {
    if pretty {
        pipeline::render_json(value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_without_input() {
        let pipeline = Pipeline::with_rules().unwrap();
        let options = AskOptions {
            query: "name".to_string(),
            input: None,
        };
        assert!(matches!(
            execute_ask(&pipeline, &options),
            Err(CliError::NoInput)
        ));
    }

    #[test]
    fn test_compile_without_input_uses_rules() {
        let pipeline = Pipeline::with_rules().unwrap();
        let options = CompileOptions {
            query: "city".to_string(),
            input: None,
        };
        let expr = execute_compile(&pipeline, &options).unwrap();
        assert_eq!(expr.as_str(), ".address.city");
    }

    #[test]
    fn test_format_translation() {
        let translation = explain("name second", Strategy::Rules).unwrap();
        let text = format_translation(&translation);
        assert!(text.contains("accumulated: .name\n"));
        assert!(text.contains("override: second-ordinal\n"));
        assert!(text.ends_with("expression: .[] | .[1]\n"));
    }

    #[test]
    fn test_explain_refuses_llm_strategy() {
        assert!(matches!(
            explain("name second", Strategy::Llm),
            Err(CliError::ExplainNeedsRules)
        ));
    }

    #[test]
    fn test_eval_rejects_non_utf8_bytes() {
        let options = EvalOptions {
            expression: ".".to_string(),
            input: Some(DocumentSource::Bytes(vec![0xff, 0xfe, b'1'])),
        };
        assert!(matches!(
            execute_eval(&options),
            Err(CliError::Nljq(NljqError::InvalidInputType(_)))
        ));
    }

    #[test]
    fn test_ask_accepts_utf8_bytes() {
        let pipeline = Pipeline::with_rules().unwrap();
        let options = AskOptions {
            query: "name".to_string(),
            input: Some(DocumentSource::Bytes(br#"{"name":"Alice"}"#.to_vec())),
        };
        assert_eq!(
            execute_ask(&pipeline, &options).unwrap(),
            serde_json::json!("Alice")
        );
    }

    #[test]
    fn test_render_compact_and_pretty() {
        let value = serde_json::json!({"a": [1, 2]});
        assert_eq!(render(&value, false), r#"{"a":[1,2]}"#);
        assert_eq!(render(&value, true), "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }
}
