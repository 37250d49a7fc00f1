// tests/jq_evaluator_tests.rs

use nljq::jq::{self, EvalError, Value};
use serde_json::json;

fn people() -> Value {
    Value::from(json!([
        {"name": "Alice", "age": 30, "address": {"city": "New York", "country": "USA"}},
        {"name": "Bob", "age": 25, "address": {"city": "London", "country": "UK"}}
    ]))
}

fn eval(program: &str, input: Value) -> serde_json::Value {
    jq::evaluate(program, &input)
        .map(serde_json::Value::from)
        .unwrap_or_else(|e| panic!("{:?} failed: {}", program, e))
}

fn eval_all(program: &str, input: Value) -> Vec<serde_json::Value> {
    jq::evaluate_all(program, &input)
        .unwrap_or_else(|e| panic!("{:?} failed: {}", program, e))
        .into_iter()
        .map(serde_json::Value::from)
        .collect()
}

fn eval_err(program: &str, input: Value) -> EvalError {
    match jq::evaluate(program, &input) {
        Ok(v) => panic!("{:?} unexpectedly produced {:?}", program, v),
        Err(e) => e,
    }
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn test_identity_and_fields() {
    let doc = Value::from(json!({"name": "Alice", "address": {"city": "Paris"}}));
    assert_eq!(eval(".", doc.clone()), json!({"name": "Alice", "address": {"city": "Paris"}}));
    assert_eq!(eval(".name", doc.clone()), json!("Alice"));
    assert_eq!(eval(".address.city", doc.clone()), json!("Paris"));
    assert_eq!(eval(".missing", doc.clone()), json!(null));
    assert_eq!(eval(".missing.deeper", doc), json!(null));
}

#[test]
fn test_indexing() {
    let doc = Value::from(json!([10, 20, 30]));
    assert_eq!(eval(".[0]", doc.clone()), json!(10));
    assert_eq!(eval(".[-1]", doc.clone()), json!(30));
    assert_eq!(eval(".[5]", doc.clone()), json!(null));
    assert_eq!(eval(".[-4]", doc), json!(null));
}

#[test]
fn test_iteration_keeps_every_output() {
    assert_eq!(eval_all(".[] | .name", people()), vec![json!("Alice"), json!("Bob")]);
    // evaluate keeps only the first
    assert_eq!(eval(".[] | .name", people()), json!("Alice"));
}

#[test]
fn test_object_iteration_follows_document_order() {
    let doc = Value::from(json!({"b": 2, "a": 1, "c": 3}));
    assert_eq!(eval_all(".[]", doc), vec![json!(2), json!(1), json!(3)]);
}

#[test]
fn test_objects_keep_key_order() {
    let doc = Value::from(json!([{"name": "A", "age": 30}, {"name": "B", "age": 25}]));
    assert_eq!(eval(".[1]", doc.clone()).to_string(), r#"{"name":"B","age":25}"#);
    let pair = Value::from(json!([{"name": "A", "age": 30}, {"city": "Oslo", "name": "C"}]));
    assert_eq!(
        eval(".[0] + .[1]", pair).to_string(),
        r#"{"name":"C","age":30,"city":"Oslo"}"#
    );
    // `keys` is sorted regardless
    assert_eq!(eval(".[0] | keys", doc), json!(["age", "name"]));
}

#[test]
fn test_ordinal_over_nested_arrays() {
    let doc = Value::from(json!([[1, 2, 3], [4, 5, 6]]));
    assert_eq!(eval_all(".[] | .[1]", doc.clone()), vec![json!(2), json!(5)]);
    assert_eq!(eval(".[] | .[2]", doc), json!(3));
}

#[test]
fn test_optional_suppresses_errors() {
    assert_eq!(eval_all(".[]?", Value::from(json!(5))), Vec::<serde_json::Value>::new());
    assert!(matches!(
        eval_err(".name?", Value::from(json!(5))),
        EvalError::NoResult
    ));
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_average_age() {
    assert_eq!(eval("map(.age) | add / length", people()), json!(27.5));
}

#[test]
fn test_sum_age() {
    assert_eq!(eval("map(.age) | add", people()), json!(55));
}

#[test]
fn test_length() {
    assert_eq!(eval("length", people()), json!(2));
    assert_eq!(eval("length", Value::from(json!("héllo"))), json!(5));
    assert_eq!(eval("length", Value::from(json!({"a": 1}))), json!(1));
    assert_eq!(eval("length", Value::from(json!(null))), json!(0));
    assert_eq!(eval("length", Value::from(json!(-3))), json!(3));
}

#[test]
fn test_first_and_last() {
    assert_eq!(eval("first", people()), eval(".[0]", people()));
    assert_eq!(eval("last | .name", people()), json!("Bob"));
    assert_eq!(eval("first(.[] | .age)", people()), json!(30));
    assert_eq!(eval("last(.[] | .age)", people()), json!(25));
}

#[test]
fn test_first_over_iterated_objects_fails() {
    // `.[] | first` indexes each person with 0
    let err = eval_err(".[] | first", people());
    assert_eq!(err.to_string(), "Access error: Cannot index object with number");
}

#[test]
fn test_select() {
    assert_eq!(
        eval_all(".[] | select(.age > 28) | .name", people()),
        vec![json!("Alice")]
    );
    assert_eq!(
        eval("map(select(.address.country == \"UK\")) | length", people()),
        json!(1)
    );
}

#[test]
fn test_other_builtins() {
    let doc = Value::from(json!([3, 1, 2]));
    assert_eq!(eval("sort", doc.clone()), json!([1, 2, 3]));
    assert_eq!(eval("reverse", doc.clone()), json!([2, 1, 3]));
    assert_eq!(eval("min", doc.clone()), json!(1));
    assert_eq!(eval("max", doc.clone()), json!(3));
    assert_eq!(eval("type", doc), json!("array"));
    assert_eq!(eval(".[0] | keys", people()), json!(["address", "age", "name"]));
    assert_eq!(eval("map(.age > 26 | not)", people()), json!([false, true]));
    assert_eq!(eval("[.[] | .name, .age]", people()), json!(["Alice", 30, "Bob", 25]));
}

#[test]
fn test_empty_has_no_result() {
    assert_eq!(eval_err("empty", people()), EvalError::NoResult);
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_arithmetic() {
    let null = Value::Null;
    assert_eq!(eval("1 + 2 * 3", null.clone()), json!(7));
    assert_eq!(eval("7 / 2", null.clone()), json!(3.5));
    assert_eq!(eval("8 / 2", null.clone()), json!(4));
    assert_eq!(eval("7 % 3", null.clone()), json!(1));
    assert_eq!(eval("0.1 * 3", null.clone()), json!(0.3));
    assert_eq!(eval("\"a\" + \"b\"", null.clone()), json!("ab"));
    assert_eq!(eval("[1, 2, 3] - [2]", null.clone()), json!([1, 3]));
    assert_eq!(eval("null + 1", null), json!(1));
}

#[test]
fn test_integer_overflow_becomes_float() {
    assert_eq!(
        eval("9223372036854775807 + 1", Value::Null),
        json!(9223372036854775808.0)
    );
}

#[test]
fn test_division_by_zero() {
    assert!(matches!(
        eval_err("1 / 0", Value::Null),
        EvalError::DivisionByZero(_)
    ));
    assert!(matches!(
        eval_err("1 % 0", Value::Null),
        EvalError::DivisionByZero(_)
    ));
}

#[test]
fn test_comparison_and_logic() {
    let null = Value::Null;
    assert_eq!(eval("1 == 1.0", null.clone()), json!(true));
    assert_eq!(eval("\"a\" < \"b\"", null.clone()), json!(true));
    assert_eq!(eval("null < false", null.clone()), json!(true));
    assert_eq!(eval("[] > {}", null.clone()), json!(false));
    assert_eq!(eval("true and null", null.clone()), json!(false));
    assert_eq!(eval("false or 0", null.clone()), json!(true));
    assert_eq!(eval(".missing // \"default\"", null), json!("default"));
}

#[test]
fn test_logic_short_circuits() {
    // The right side would fail if evaluated
    assert_eq!(eval("false and (1 / 0)", Value::Null), json!(false));
    assert_eq!(eval("true or error", Value::Null), json!(true));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_index_array_with_string() {
    let err = eval_err(".sum.age", people());
    assert_eq!(
        err,
        EvalError::AccessError("Cannot index array with \"sum\"".to_string())
    );
}

#[test]
fn test_type_errors() {
    assert_eq!(
        eval_err("\"a\" + 1", Value::Null).to_string(),
        "Type error: string (\"a\") and number (1) cannot be added"
    );
    assert!(matches!(
        eval_err(".[]", Value::from(json!(true))),
        EvalError::TypeError(_)
    ));
    assert!(matches!(
        eval_err("length", Value::from(json!(false))),
        EvalError::TypeError(_)
    ));
}

#[test]
fn test_unknown_function() {
    assert_eq!(
        eval_err("frobnicate(1)", Value::Null),
        EvalError::UnknownFunction {
            name: "frobnicate".to_string(),
            arity: 1
        }
    );
}

#[test]
fn test_syntax_error_from_unclosed_filter() {
    assert!(matches!(
        eval_err(" | select(.age>", people()),
        EvalError::Syntax(_)
    ));
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
    assert!(matches!(
        eval_err(&"(".repeat(50_000), people()),
        EvalError::Syntax(nljq::jq::ParseError::TooDeep { .. })
    ));
}

#[test]
fn test_deep_but_allowed_expression_evaluates() {
    let nested = format!("{}.[0].age{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(eval(&nested, people()), json!(30));
    assert_eq!(eval(&format!("1{}", " + 1".repeat(100)), Value::Null), json!(101));
}
