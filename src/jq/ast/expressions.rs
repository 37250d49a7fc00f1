use crate::jq::ast::BinOp;

/// Syntax tree node for a jq expression.
///
/// Every node is a filter: evaluated against one input value it produces
/// zero or more output values.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The input itself (`.`)
    Identity,

    // Literals
    /// Literal floating point number
    Float(f64),

    /// Literal integer
    Integer(i64),

    /// String literal
    String(String),

    /// Boolean literal
    Boolean(bool),

    /// Null literal
    Null,

    /// Field or index access
    ///
    /// The `key` is evaluated against the same input as `object`, so
    /// `.items[.cursor]` indexes `items` with the input's `cursor`.
    ///
    /// # Examples
    /// ```text
    /// .name            // Access { Identity, String("name") }
    /// .address.city
    /// .[1]
    /// .["first name"]
    /// ```
    Access {
        object: Box<Expr>,
        key: Box<Expr>,
    },

    /// Iteration over array elements or object values (`.[]`)
    Iterate(Box<Expr>),

    /// Error suppression (`term?`)
    Optional(Box<Expr>),

    /// Pipe (`left | right`)
    Pipe(Box<Expr>, Box<Expr>),

    /// Output concatenation (`left, right`)
    Comma(Box<Expr>, Box<Expr>),

    /// Binary operation (arithmetic, comparison, logical, alternative)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Array construction, collecting every output of the body
    ///
    /// # Example
    /// ```text
    /// [.[] | .name]
    /// []
    /// ```
    Array(Option<Box<Expr>>),

    /// Builtin function call
    ///
    /// # Examples
    /// ```text
    /// length
    /// map(.age)
    /// select(.age > 28)
    /// ```
    Call {
        name: String,
        args: Vec<Expr>,
    },
}
