/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Comparison
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Arithmetic
    /// Addition, string/array concatenation, object merge (`+`)
    Add,
    /// Subtraction or array difference (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division or string split (`/`)
    Divide,
    /// Modulo (`%`)
    Modulo,

    // Logical
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,

    /// Alternative (`//`)
    ///
    /// Yields the truthy outputs of the left side, or the right side when
    /// there are none.
    Alternative,
}
