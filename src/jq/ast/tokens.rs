#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Floating-point number
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 0.5
    /// ```
    Float(f64),

    /// Integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 1
    /// ```
    Integer(i64),

    /// String literal enclosed in double quotes
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "first name"
    /// ```
    String(String),

    /// Boolean values
    Boolean(bool),

    /// Null value
    Null,

    // Identifiers and paths
    /// Bare identifier, always a builtin function name in this subset
    ///
    /// # Examples
    /// ```text
    /// length
    /// map
    /// select
    /// ```
    Identifier(String),

    /// Field access written as a single token
    ///
    /// # Examples
    /// ```text
    /// .name        // Field("name")
    /// .address     // Field("address")
    /// ```
    Field(String),

    /// Lone dot: identity, or the start of `.[`, `."key"`
    Dot,

    // Operators
    /// Pipe, feeds each output of the left side into the right side
    Pipe,

    /// Comma, concatenates the outputs of both sides
    Comma,

    /// Optional suffix, suppresses errors of the preceding term
    Question,

    /// Alternative operator (`//`)
    SlashSlash,

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Arithmetic
    /// Addition or concatenation
    Plus,

    /// Subtraction
    Minus,

    /// Multiplication
    Star,

    /// Division
    Slash,

    /// Modulo
    Percent,

    // Logical
    /// Logical AND (word, not symbol)
    And,

    /// Logical OR (word, not symbol)
    Or,

    // Delimiters
    /// Left bracket for index, iteration or array construction
    LBracket,

    /// Right bracket
    RBracket,

    /// Left parenthesis for grouping or function arguments
    LParen,

    /// Right parenthesis
    RParen,

    /// Separates function arguments
    Semicolon,

    /// End of input
    Eof,
}
