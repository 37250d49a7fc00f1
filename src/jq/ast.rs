//! # jq Subset - Abstract Syntax Tree
//!
//! This module defines the syntax tree for the slice of the jq language that
//! `nljq` evaluates: the expressions emitted by the rule compiler and the
//! short programs a completion model usually answers with.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (paths, literals, pipes, calls)
//! - **[operators]** - Binary operators (arithmetic, comparison, logical)
//!
//! ## Quick Start
//!
//! ```text
//! map(.age) | add / length
//! ```
//!
//! Maps every element to its `age`, sums them and divides by the count.
//!
//! ## Core Concepts
//!
//! ### Everything is a generator
//!
//! A jq program maps one input to zero or more outputs:
//!
//! ```text
//! .[]            // one output per array element
//! .name, .age    // two outputs
//! empty          // no output at all
//! ```
//!
//! Binary operators combine every output of the right operand with every
//! output of the left operand.
//!
//! ### Paths
//!
//! - `.` - the input itself
//! - `.field` / `."field"` / `.["field"]` - object field (null on null)
//! - `.[n]` - array index, negative counts from the end
//! - `.[]` - iterate array elements or object values
//! - `term?` - suppress errors raised by `term`
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::Expr;
pub use operators::BinOp;
pub use tokens::Token;
