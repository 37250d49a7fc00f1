//! Chat-completion strategy.
//!
//! Sends the whole document and the question to an OpenAI-compatible
//! `/chat/completions` endpoint and takes the reply as the expression. The
//! model is told to answer `.` when it cannot translate; that sentinel maps
//! to [`CompileError::TranslationFailure`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    compiler::{CompileError, Compiler, Expression, LlmConfig},
    document::Document,
};

/// Reply meaning "no translation possible".
pub const SENTINEL: &str = ".";

/// Errors from the completion round trip.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured (set OPENAI_API_KEY or pass --api-key)")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response contained no choices")]
    EmptyResponse,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

const SYSTEM_PROMPT: &str = "You translate natural language questions about JSON documents into jq filters.";

/// Builds the user prompt: instructions, the pretty-printed document and
/// the question.
pub fn build_prompt(query: &str, document: &Document) -> String {
    format!(
        r#"You are a helpful assistant that translates natural language queries into jq filters. You are given a JSON document and a natural language query. Your task is to generate a valid jq filter that extracts the information requested in the natural language query.

Do *NOT* provide any additional text, explanations or apologies. Only provide the valid jq program. If the query is ambiguous or cannot be converted to jq, return '{SENTINEL}'.

JSON Document:
```json
{}
```

Natural Language Query: {}

jq filter:"#,
        document.to_pretty_string(),
        query
    )
}

/// Turns the model's reply into an expression.
///
/// Surrounding whitespace, a markdown code fence, inline backticks and one
/// pair of enclosing single quotes are stripped. An empty reply or the bare
/// sentinel is a translation failure.
pub fn parse_completion(reply: &str) -> Result<Expression, CompileError> {
    let mut text = reply.trim();

    if let Some(fenced) = text.strip_prefix("```") {
        // Drop an optional language tag on the opening fence line
        let body = fenced.split_once('\n').map_or(fenced, |(_, rest)| rest);
        text = body.trim_end().strip_suffix("```").unwrap_or(body).trim();
    }
    let text = text.trim_matches('`').trim();
    // Shell-style quoting, e.g. an echoed `'.'`
    let text = text
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .map_or(text, str::trim);

    if text == SENTINEL {
        warn!("model reported the query as untranslatable");
        return Err(CompileError::TranslationFailure);
    }
    Expression::new(text).ok_or(CompileError::TranslationFailure)
}

/// Compiler that delegates translation to a completion service.
pub struct LlmCompiler {
    client: reqwest::blocking::Client,
    config: LlmConfig,
}

impl LlmCompiler {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(LlmCompiler { client, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn complete(&self, prompt: String) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            temperature: 0.0,
        };
        debug!(%url, model = %self.config.model, "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json()?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

impl Compiler for LlmCompiler {
    fn compile(&self, query: &str, document: &Document) -> Result<Expression, CompileError> {
        let reply = self.complete(build_prompt(query, document))?;
        debug!(%reply, "completion received");
        parse_completion(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_translation_failure() {
        assert!(matches!(
            parse_completion(" .\n"),
            Err(CompileError::TranslationFailure)
        ));
        assert!(matches!(parse_completion(""), Err(CompileError::TranslationFailure)));
    }

    #[test]
    fn test_quoted_sentinel_is_translation_failure() {
        for reply in ["'.'", " ' . ' ", "`'.'`", "```\n'.'\n```"] {
            assert!(
                matches!(parse_completion(reply), Err(CompileError::TranslationFailure)),
                "reply: {reply:?}"
            );
        }
        assert!(matches!(parse_completion("''"), Err(CompileError::TranslationFailure)));
    }

    #[test]
    fn test_single_quoted_program_is_unwrapped() {
        let expr = parse_completion("'map(.name)'").unwrap();
        assert_eq!(expr.as_str(), "map(.name)");
        // A lone quote is not a pair
        assert_eq!(parse_completion("'.name").unwrap().as_str(), "'.name");
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let expr = parse_completion("```jq\nmap(.age) | add\n```").unwrap();
        assert_eq!(expr.as_str(), "map(.age) | add");

        let expr = parse_completion("`.[0].name`").unwrap();
        assert_eq!(expr.as_str(), ".[0].name");
    }

    #[test]
    fn test_prompt_embeds_document_and_query() {
        let doc = Document::parse(r#"{"name":"Alice"}"#).unwrap();
        let prompt = build_prompt("what is the name", &doc);
        assert!(prompt.contains("\"name\": \"Alice\""));
        assert!(prompt.contains("Natural Language Query: what is the name"));
        assert!(prompt.contains("return '.'"));
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        assert!(matches!(
            LlmCompiler::new(LlmConfig::default()),
            Err(LlmError::MissingApiKey)
        ));
    }
}
