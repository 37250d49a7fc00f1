use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

use crate::jq::{
    ast::{BinOp, Expr},
    parser::ParseError,
    value::Value,
};

/// Errors that can occur while running a jq program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The program text is not valid jq
    #[error("Syntax error: {0}")]
    Syntax(#[from] ParseError),

    /// Type mismatch or invalid operation for the given type
    #[error("Type error: {0}")]
    TypeError(String),

    /// Invalid field access or array index
    #[error("Access error: {0}")]
    AccessError(String),

    /// Call to a builtin this evaluator does not provide
    #[error("{name}/{arity} is not defined")]
    UnknownFunction { name: String, arity: usize },

    /// Division or modulo by zero
    #[error("{0} cannot be divided because the divisor is zero")]
    DivisionByZero(String),

    /// The program ran but produced no output
    #[error("Expression produced no result")]
    NoResult,
}

/// `number (5)`, `string ("Alice")`: the way jq names a value in errors.
fn describe(v: &Value) -> String {
    let mut json = v.to_compact_json();
    if json.chars().count() > 30 {
        json = json.chars().take(27).collect::<String>() + "...";
    }
    format!("{} ({})", v.type_name(), json)
}

/// The program evaluator.
///
/// Every expression is a generator, so evaluation returns all outputs in
/// order; [`Evaluator::eval_first`] keeps only the first one.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Runs `expr` against `input`, returning every output.
    ///
    /// # Examples
    ///
    /// ```
    /// use nljq::jq::{Evaluator, Lexer, Parser, Value};
    ///
    /// let mut parser = Parser::new(Lexer::new(".[] | . * 2")).unwrap();
    /// let expr = parser.parse().unwrap();
    /// let input = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
    ///
    /// let outputs = Evaluator::new().eval(&expr, &input).unwrap();
    /// assert_eq!(outputs, vec![Value::Integer(2), Value::Integer(4)]);
    /// ```
    pub fn eval(&self, expr: &Expr, input: &Value) -> Result<Vec<Value>, EvalError> {
        self.eval_expr(expr, input)
    }

    /// Runs `expr` against `input` and keeps the first output.
    pub fn eval_first(&self, expr: &Expr, input: &Value) -> Result<Value, EvalError> {
        self.eval_expr(expr, input)?
            .into_iter()
            .next()
            .ok_or(EvalError::NoResult)
    }

    fn eval_expr(&self, expr: &Expr, input: &Value) -> Result<Vec<Value>, EvalError> {
        match expr {
            Expr::Identity => Ok(vec![input.clone()]),
            Expr::Float(n) => Ok(vec![Value::Float(*n)]),
            Expr::Integer(n) => Ok(vec![Value::Integer(*n)]),
            Expr::String(s) => Ok(vec![Value::String(s.clone())]),
            Expr::Boolean(b) => Ok(vec![Value::Boolean(*b)]),
            Expr::Null => Ok(vec![Value::Null]),
            Expr::Access { object, key } => {
                let objects = self.eval_expr(object, input)?;
                let keys = self.eval_expr(key, input)?;
                let mut out = Vec::with_capacity(objects.len() * keys.len());
                for obj in &objects {
                    for k in &keys {
                        out.push(self.apply_access(obj, k)?);
                    }
                }
                Ok(out)
            }
            Expr::Iterate(object) => {
                let mut out = Vec::new();
                for obj in self.eval_expr(object, input)? {
                    out.extend(self.iterate(&obj)?);
                }
                Ok(out)
            }
            Expr::Optional(inner) => Ok(self.eval_expr(inner, input).unwrap_or_default()),
            Expr::Pipe(left, right) => {
                let mut out = Vec::new();
                for value in self.eval_expr(left, input)? {
                    out.extend(self.eval_expr(right, &value)?);
                }
                Ok(out)
            }
            Expr::Comma(left, right) => {
                let mut out = self.eval_expr(left, input)?;
                out.extend(self.eval_expr(right, input)?);
                Ok(out)
            }
            Expr::BinaryOp { op, left, right } => match op {
                BinOp::And | BinOp::Or => self.eval_logical(*op, left, right, input),
                BinOp::Alternative => {
                    let truthy: Vec<Value> = self
                        .eval_expr(left, input)
                        .unwrap_or_default()
                        .into_iter()
                        .filter(Value::is_truthy)
                        .collect();
                    if truthy.is_empty() {
                        self.eval_expr(right, input)
                    } else {
                        Ok(truthy)
                    }
                }
                _ => {
                    // jq varies the left operand fastest
                    let rights = self.eval_expr(right, input)?;
                    let lefts = self.eval_expr(left, input)?;
                    let mut out = Vec::with_capacity(rights.len() * lefts.len());
                    for r in &rights {
                        for l in &lefts {
                            out.push(self.apply_binop(*op, l, r)?);
                        }
                    }
                    Ok(out)
                }
            },
            Expr::Array(None) => Ok(vec![Value::Array(Vec::new())]),
            Expr::Array(Some(body)) => Ok(vec![Value::Array(self.eval_expr(body, input)?)]),
            Expr::Call { name, args } => self.call_builtin(name, args, input),
        }
    }

    fn eval_logical(
        &self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        input: &Value,
    ) -> Result<Vec<Value>, EvalError> {
        let mut out = Vec::new();
        for l in self.eval_expr(left, input)? {
            match (op, l.is_truthy()) {
                (BinOp::And, false) => out.push(Value::Boolean(false)),
                (BinOp::Or, true) => out.push(Value::Boolean(true)),
                _ => {
                    for r in self.eval_expr(right, input)? {
                        out.push(Value::Boolean(r.is_truthy()));
                    }
                }
            }
        }
        Ok(out)
    }

    fn apply_access(&self, object: &Value, key: &Value) -> Result<Value, EvalError> {
        match (object, key) {
            (Value::Object(map), Value::String(k)) => {
                Ok(map.get(k).cloned().unwrap_or(Value::Null))
            }
            (Value::Null, Value::String(_) | Value::Integer(_) | Value::Float(_)) => {
                Ok(Value::Null)
            }
            (Value::Array(arr), Value::Integer(n)) => Ok(index_array(arr, *n)),
            (Value::Array(arr), Value::Float(n)) => Ok(index_array(arr, n.floor() as i64)),
            (Value::Object(_), k) => Err(EvalError::AccessError(format!(
                "Cannot index object with {}",
                k.type_name()
            ))),
            (Value::Array(_), Value::String(k)) => Err(EvalError::AccessError(format!(
                "Cannot index array with \"{}\"",
                k
            ))),
            (v, Value::String(k)) => Err(EvalError::AccessError(format!(
                "Cannot index {} with \"{}\"",
                v.type_name(),
                k
            ))),
            (v, k) => Err(EvalError::AccessError(format!(
                "Cannot index {} with {}",
                v.type_name(),
                k.type_name()
            ))),
        }
    }

    fn iterate(&self, value: &Value) -> Result<Vec<Value>, EvalError> {
        match value {
            Value::Array(arr) => Ok(arr.clone()),
            Value::Object(map) => Ok(map.values().cloned().collect()),
            v => Err(EvalError::TypeError(format!(
                "Cannot iterate over {}",
                describe(v)
            ))),
        }
    }

    fn apply_binop(&self, op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
        match op {
            BinOp::Add => match (left, right) {
                (Value::Null, v) | (v, Value::Null) => Ok(v.clone()),
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
                (Value::Array(a), Value::Array(b)) => {
                    Ok(Value::Array(a.iter().chain(b).cloned().collect()))
                }
                (Value::Object(a), Value::Object(b)) => {
                    let mut merged = a.clone();
                    merged.extend(b.iter().map(|(k, v)| (k.clone(), v.clone())));
                    Ok(Value::Object(merged))
                }
                (a, b) if is_number(a) && is_number(b) => numeric(op, a, b),
                (a, b) => Err(EvalError::TypeError(format!(
                    "{} and {} cannot be added",
                    describe(a),
                    describe(b)
                ))),
            },
            BinOp::Subtract => match (left, right) {
                (Value::Array(a), Value::Array(b)) => Ok(Value::Array(
                    a.iter().filter(|x| !b.contains(x)).cloned().collect(),
                )),
                (a, b) if is_number(a) && is_number(b) => numeric(op, a, b),
                (a, b) => Err(EvalError::TypeError(format!(
                    "{} and {} cannot be subtracted",
                    describe(a),
                    describe(b)
                ))),
            },
            BinOp::Multiply => match (left, right) {
                (a, b) if is_number(a) && is_number(b) => numeric(op, a, b),
                (a, b) => Err(EvalError::TypeError(format!(
                    "{} and {} cannot be multiplied",
                    describe(a),
                    describe(b)
                ))),
            },
            BinOp::Divide | BinOp::Modulo => match (left, right) {
                (Value::String(a), Value::String(b)) if op == BinOp::Divide => {
                    Ok(split_string(a, b))
                }
                (a, b) if is_number(a) && is_number(b) => numeric(op, a, b),
                (a, b) => Err(EvalError::TypeError(format!(
                    "{} and {} cannot be divided",
                    describe(a),
                    describe(b)
                ))),
            },
            BinOp::Equal => Ok(Value::Boolean(left == right)),
            BinOp::NotEqual => Ok(Value::Boolean(left != right)),
            BinOp::LessThan => Ok(Value::Boolean(left.compare(right).is_lt())),
            BinOp::GreaterThan => Ok(Value::Boolean(left.compare(right).is_gt())),
            BinOp::LessEqual => Ok(Value::Boolean(left.compare(right).is_le())),
            BinOp::GreaterEqual => Ok(Value::Boolean(left.compare(right).is_ge())),
            BinOp::And | BinOp::Or | BinOp::Alternative => {
                unreachable!("short-circuit operators are handled in eval_expr")
            }
        }
    }

    fn call_builtin(&self, name: &str, args: &[Expr], input: &Value) -> Result<Vec<Value>, EvalError> {
        match (name, args) {
            ("empty", []) => Ok(Vec::new()),
            ("not", []) => Ok(vec![Value::Boolean(!input.is_truthy())]),
            ("type", []) => Ok(vec![Value::String(input.type_name().to_string())]),
            ("length", []) => self.builtin_length(input).map(|v| vec![v]),
            ("add", []) => self.builtin_add(input).map(|v| vec![v]),
            ("keys", []) => self.builtin_keys(input).map(|v| vec![v]),
            ("reverse", []) => self.builtin_reverse(input).map(|v| vec![v]),
            ("sort", []) => {
                let mut items = self.expect_array("sorted", input)?;
                items.sort_by(|a, b| a.compare(b));
                Ok(vec![Value::Array(items)])
            }
            ("min", []) => {
                let items = self.expect_array("searched for a minimum", input)?;
                let min = items.into_iter().min_by(|a, b| a.compare(b));
                Ok(vec![min.unwrap_or(Value::Null)])
            }
            ("max", []) => {
                let items = self.expect_array("searched for a maximum", input)?;
                let max = items.into_iter().max_by(|a, b| a.compare(b));
                Ok(vec![max.unwrap_or(Value::Null)])
            }
            ("first", []) => Ok(vec![self.apply_access(input, &Value::Integer(0))?]),
            ("last", []) => Ok(vec![self.apply_access(input, &Value::Integer(-1))?]),
            ("first", [f]) => Ok(self.eval_expr(f, input)?.into_iter().take(1).collect()),
            ("last", [f]) => Ok(self.eval_expr(f, input)?.into_iter().last().into_iter().collect()),
            ("map", [f]) => {
                let mut mapped = Vec::new();
                for item in self.iterate(input)? {
                    mapped.extend(self.eval_expr(f, &item)?);
                }
                Ok(vec![Value::Array(mapped)])
            }
            ("select", [f]) => Ok(self
                .eval_expr(f, input)?
                .into_iter()
                .filter(Value::is_truthy)
                .map(|_| input.clone())
                .collect()),
            _ => Err(EvalError::UnknownFunction {
                name: name.to_string(),
                arity: args.len(),
            }),
        }
    }

    fn builtin_length(&self, input: &Value) -> Result<Value, EvalError> {
        match input {
            Value::Null => Ok(Value::Integer(0)),
            Value::Integer(n) => Ok(Value::Integer(n.saturating_abs())),
            Value::Float(n) => Ok(Value::Float(n.abs())),
            Value::String(s) => Ok(Value::Integer(s.chars().count() as i64)),
            Value::Array(arr) => Ok(Value::Integer(arr.len() as i64)),
            Value::Object(obj) => Ok(Value::Integer(obj.len() as i64)),
            v @ Value::Boolean(_) => Err(EvalError::TypeError(format!(
                "{} has no length",
                describe(v)
            ))),
        }
    }

    /// Folds `+` over the elements, starting from null.
    fn builtin_add(&self, input: &Value) -> Result<Value, EvalError> {
        if matches!(input, Value::Null) {
            return Ok(Value::Null);
        }
        self.iterate(input)?
            .iter()
            .try_fold(Value::Null, |acc, item| self.apply_binop(BinOp::Add, &acc, item))
    }

    fn builtin_keys(&self, input: &Value) -> Result<Value, EvalError> {
        match input {
            Value::Object(obj) => {
                let mut keys: Vec<_> = obj.keys().cloned().collect();
                keys.sort();
                Ok(Value::Array(keys.into_iter().map(Value::String).collect()))
            }
            Value::Array(arr) => Ok(Value::Array(
                (0..arr.len() as i64).map(Value::Integer).collect(),
            )),
            v => Err(EvalError::TypeError(format!("{} has no keys", describe(v)))),
        }
    }

    fn builtin_reverse(&self, input: &Value) -> Result<Value, EvalError> {
        match input {
            Value::Null => Ok(Value::Array(Vec::new())),
            Value::Array(arr) => Ok(Value::Array(arr.iter().rev().cloned().collect())),
            Value::String(s) => Ok(Value::String(s.chars().rev().collect())),
            v => Err(EvalError::TypeError(format!("Cannot reverse {}", describe(v)))),
        }
    }

    fn expect_array(&self, verb: &str, input: &Value) -> Result<Vec<Value>, EvalError> {
        match input {
            Value::Array(arr) => Ok(arr.clone()),
            v => Err(EvalError::TypeError(format!(
                "{} cannot be {}, as it is not an array",
                describe(v),
                verb
            ))),
        }
    }
}

fn is_number(v: &Value) -> bool {
    matches!(v, Value::Integer(_) | Value::Float(_))
}

fn index_array(arr: &[Value], n: i64) -> Value {
    let index = if n < 0 {
        // Negative index: count from end (-1 = last)
        let abs_idx = n.unsigned_abs() as usize;
        if abs_idx > arr.len() {
            return Value::Null;
        }
        arr.len() - abs_idx
    } else {
        n as usize
    };
    arr.get(index).cloned().unwrap_or(Value::Null)
}

fn split_string(s: &str, sep: &str) -> Value {
    if s.is_empty() {
        return Value::Array(Vec::new());
    }
    Value::Array(s.split(sep).map(|part| Value::String(part.to_string())).collect())
}

/// Arithmetic on two numbers.
///
/// Integer operands stay integers while the result is whole. Mixed
/// integer/float operands go through `Decimal` so `0.1 * 3` prints as `0.3`.
fn numeric(op: BinOp, a: &Value, b: &Value) -> Result<Value, EvalError> {
    let divisor_is_zero = match (op, b) {
        (BinOp::Divide, v) => v.as_float() == Some(0.0),
        (BinOp::Modulo, v) => v.as_float().is_some_and(|d| d.trunc() == 0.0),
        _ => false,
    };
    if divisor_is_zero {
        return Err(EvalError::DivisionByZero(format!(
            "{} and {}",
            describe(a),
            describe(b)
        )));
    }

    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(integer_op(op, *x, *y)),
        (Value::Integer(_), Value::Float(_)) | (Value::Float(_), Value::Integer(_)) => {
            Ok(decimal_op(op, a, b).unwrap_or_else(|| float_op(op, a, b)))
        }
        _ => Ok(float_op(op, a, b)),
    }
}

fn integer_op(op: BinOp, x: i64, y: i64) -> Value {
    let checked = match op {
        BinOp::Add => x.checked_add(y),
        BinOp::Subtract => x.checked_sub(y),
        BinOp::Multiply => x.checked_mul(y),
        BinOp::Divide if x.checked_rem(y) == Some(0) => x.checked_div(y),
        BinOp::Divide => return Value::Float(x as f64 / y as f64),
        BinOp::Modulo => x.checked_rem(y),
        _ => None,
    };
    checked
        .map(Value::Integer)
        .unwrap_or_else(|| float_op(op, &Value::Integer(x), &Value::Integer(y)))
}

fn decimal_op(op: BinOp, a: &Value, b: &Value) -> Option<Value> {
    let to_decimal = |v: &Value| match v {
        Value::Integer(n) => Decimal::from_i64(*n),
        Value::Float(n) => Decimal::from_f64(*n),
        _ => None,
    };
    let (ad, bd) = (to_decimal(a)?, to_decimal(b)?);

    let rd = match op {
        BinOp::Add => ad.checked_add(bd),
        BinOp::Subtract => ad.checked_sub(bd),
        BinOp::Multiply => ad.checked_mul(bd),
        BinOp::Divide => ad.checked_div(bd),
        BinOp::Modulo => ad.trunc().checked_rem(bd.trunc()),
        _ => None,
    }?;

    if rd.is_integer()
        && let Some(r) = rd.to_i64()
    {
        return Some(Value::Integer(r));
    }
    rd.to_f64().map(Value::Float)
}

fn float_op(op: BinOp, a: &Value, b: &Value) -> Value {
    let (x, y) = (a.as_float().unwrap_or(0.0), b.as_float().unwrap_or(0.0));
    let result = match op {
        BinOp::Add => x + y,
        BinOp::Subtract => x - y,
        BinOp::Multiply => x * y,
        BinOp::Divide => x / y,
        BinOp::Modulo => x.trunc() % y.trunc(),
        _ => f64::NAN,
    };
    Value::Float(result)
}
