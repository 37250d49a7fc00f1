//! A jq-subset interpreter.
//!
//! Runs the expressions produced by the compilers in this crate against a
//! JSON document. The supported language is described in [`ast`]; anything
//! outside it is reported as an [`EvalError`], never a panic.
//!
//! ```
//! use nljq::jq::{self, Value};
//!
//! let doc: serde_json::Value = serde_json::from_str(
//!     r#"[{"name":"Alice","age":30},{"name":"Bob","age":25}]"#,
//! ).unwrap();
//!
//! let result = jq::evaluate("map(.age) | add / length", &Value::from(doc)).unwrap();
//! assert_eq!(result, Value::Float(27.5));
//! ```

pub mod ast;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{BinOp, Expr, Token};
pub use evaluator::{EvalError, Evaluator};
pub use lexer::{LexError, Lexer, Position};
pub use parser::{MAX_DEPTH, ParseError, Parser};
pub use value::Value;

/// Parses a jq program into its syntax tree.
pub fn parse(program: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(program))?.parse()
}

/// Runs `program` against `input` and returns its first output.
///
/// Programs that produce several outputs (`.[]`) are cut to the first one;
/// programs that produce none are an [`EvalError::NoResult`].
pub fn evaluate(program: &str, input: &Value) -> Result<Value, EvalError> {
    let expr = parse(program)?;
    Evaluator::new().eval_first(&expr, input)
}

/// Runs `program` against `input` and returns every output.
pub fn evaluate_all(program: &str, input: &Value) -> Result<Vec<Value>, EvalError> {
    let expr = parse(program)?;
    Evaluator::new().eval(&expr, input)
}
