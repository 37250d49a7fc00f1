// tests/pipeline_tests.rs

use nljq::compiler::{CompileError, Compiler};
use nljq::{
    Document, DocumentSource, Expression, LlmConfig, NljqError, Pipeline, Strategy, evaluate,
};
use serde_json::json;

const PEOPLE: &str = r#"[{"name":"Alice","age":30},{"name":"Bob","age":25}]"#;

const NESTED: &str = r#"[
  {"name": "Alice", "age": 30, "address": {"city": "New York", "country": "USA"}},
  {"name": "Bob", "age": 25, "address": {"city": "London", "country": "UK"}}
]"#;

fn rules() -> Pipeline {
    Pipeline::with_rules().unwrap()
}

fn expr(text: &str) -> Expression {
    Expression::new(text).unwrap()
}

// ============================================================================
// Documents
// ============================================================================

#[test]
fn test_document_sources() {
    let from_text = Document::parse(PEOPLE).unwrap();
    let from_value = Document::parse(json!([{"name": "Alice", "age": 30}, {"name": "Bob", "age": 25}])).unwrap();
    let from_bytes = Document::parse(PEOPLE.as_bytes().to_vec()).unwrap();
    assert_eq!(from_text, from_value);
    assert_eq!(from_text, from_bytes);
}

#[test]
fn test_invalid_json() {
    assert!(matches!(
        Document::parse("{not json"),
        Err(NljqError::InvalidJson(_))
    ));
    assert!(matches!(
        rules().compile("name", "{not json"),
        Err(NljqError::InvalidJson(_))
    ));
    assert!(matches!(
        evaluate(&expr(".name"), "{not json"),
        Err(NljqError::InvalidJson(_))
    ));
}

#[test]
fn test_invalid_input_type() {
    let source = DocumentSource::Bytes(vec![0xff, 0xfe, b'[', b']']);
    assert!(matches!(
        Document::parse(source),
        Err(NljqError::InvalidInputType(_))
    ));
}

// ============================================================================
// Answers
// ============================================================================

#[test]
fn test_average_age() {
    let answer = rules().answer("average age", PEOPLE).unwrap();
    assert_eq!(answer.expression.as_str(), "map(.age) | add / length");
    assert_eq!(answer.result, json!(27.5));
    assert_eq!(answer.render(), "27.5");
}

#[test]
fn test_count() {
    let answer = rules().answer("how many people, count them", PEOPLE).unwrap();
    assert_eq!(answer.result, json!(2));
}

#[test]
fn test_city_on_single_record() {
    let answer = rules().answer("city", json!({"address": {"city": "Paris"}})).unwrap();
    assert_eq!(answer.result, json!("Paris"));
}

#[test]
fn test_all_returns_first_output() {
    let answer = rules().answer("all", NESTED).unwrap();
    assert_eq!(answer.expression.as_str(), ".[]");
    assert_eq!(answer.result["name"], json!("Alice"));
}

#[test]
fn test_render_is_indented() {
    let answer = rules().answer("all", PEOPLE).unwrap();
    assert_eq!(answer.render(), "{\n  \"name\": \"Alice\",\n  \"age\": 30\n}");
}

#[test]
fn test_sum_of_age_fails_in_evaluation() {
    let err = rules().answer("sum of age", PEOPLE).unwrap_err();
    assert!(matches!(err, NljqError::Evaluation(_)));
    assert_eq!(
        err.to_string(),
        "Error applying jq: Access error: Cannot index array with \"sum\""
    );
}

#[test]
fn test_filter_clause_is_a_syntax_error() {
    let err = rules().answer("filter where age > 28", PEOPLE).unwrap_err();
    assert!(err.to_string().starts_with("Error applying jq: Syntax error: Expected an expression"));
}

#[test]
fn test_translation_failure_skips_evaluation() {
    // The document is never evaluated, so an odd but valid one is fine
    let err = rules().answer("hello there", "42").unwrap_err();
    assert!(matches!(err, NljqError::TranslationFailure));
}

// ============================================================================
// Text Answers
// ============================================================================

#[test]
fn test_answer_text_prefixes() {
    let pipeline = rules();
    assert_eq!(pipeline.answer_text("average age", PEOPLE), "27.5");
    assert_eq!(
        pipeline.answer_text("xyz", PEOPLE),
        "Error: Could not translate the query."
    );
    assert!(pipeline
        .answer_text("name", "{not json")
        .starts_with("Error: Invalid JSON data: "));
    assert!(pipeline
        .answer_text("sum of age", PEOPLE)
        .starts_with("Error applying jq: "));
    assert!(pipeline
        .answer_text("name", vec![0xc3u8, 0x28])
        .starts_with("Error: Invalid document input: "));
}

// ============================================================================
// Direct Evaluation
// ============================================================================

#[test]
fn test_evaluate_direct() {
    assert_eq!(evaluate(&expr(".[1].name"), PEOPLE).unwrap(), json!("Bob"));
    assert_eq!(
        evaluate(&expr("map(.name)"), PEOPLE).unwrap(),
        json!(["Alice", "Bob"])
    );
}

#[test]
fn test_evaluate_whitespace_expression() {
    // Non-empty, so it reaches the evaluator and fails there
    let err = evaluate(&expr(" and "), PEOPLE).unwrap_err();
    assert!(matches!(err, NljqError::Evaluation(_)));
}

// ============================================================================
// Strategies
// ============================================================================

struct FixedCompiler(&'static str);

impl Compiler for FixedCompiler {
    fn compile(&self, _query: &str, document: &Document) -> Result<Expression, CompileError> {
        if document.as_json().is_array() {
            Expression::new(self.0).ok_or(CompileError::TranslationFailure)
        } else {
            Err(CompileError::TranslationFailure)
        }
    }
}

#[test]
fn test_custom_compiler() {
    let pipeline = Pipeline::new(Box::new(FixedCompiler("map(.age) | max")));
    assert_eq!(pipeline.answer("oldest", PEOPLE).unwrap().result, json!(30));
    assert!(matches!(
        pipeline.answer("oldest", "{}"),
        Err(NljqError::TranslationFailure)
    ));
}

#[test]
fn test_rules_strategy() {
    let pipeline = Pipeline::for_strategy(Strategy::Rules, LlmConfig::default()).unwrap();
    assert_eq!(pipeline.compile("country", PEOPLE).unwrap().as_str(), ".address.country");
}

#[cfg(not(feature = "llm"))]
#[test]
fn test_llm_strategy_without_feature() {
    let err = Pipeline::for_strategy(Strategy::Llm, LlmConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err, NljqError::MissingCapability { .. }));
    assert!(err.to_string().starts_with("Error: LLM compiler not available: "));
}

#[cfg(feature = "llm")]
#[test]
fn test_llm_strategy_requires_api_key() {
    let err = Pipeline::for_strategy(Strategy::Llm, LlmConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err, NljqError::Llm(_)));
}

#[test]
fn test_deeply_nested_expression_is_reported() {
    let err = evaluate(&expr(&"(".repeat(50_000)), "[1]").unwrap_err();
    assert!(matches!(err, NljqError::Evaluation(_)));
    assert!(err.to_string().starts_with("Error applying jq: Syntax error: Expression nests deeper than"));
}
