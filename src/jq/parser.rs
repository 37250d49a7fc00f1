use std::mem;

use thiserror::Error;

use crate::jq::{
    ast::{BinOp, Expr, Token},
    lexer::{LexError, Lexer, Position},
};

/// Errors raised while building the syntax tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Expected {expected}, got {found:?} at {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: Token,
        position: Position,
    },

    #[error("Unexpected end of program at {position}: expected {expected}")]
    UnexpectedEof {
        expected: &'static str,
        position: Position,
    },

    #[error("Expression nests deeper than {limit} levels at {position}")]
    TooDeep { limit: usize, position: Position },
}

/// Deepest nesting the parser accepts. Bounds the recursion of both the
/// parser and the evaluator walking the resulting tree.
pub const MAX_DEPTH: usize = 128;

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            depth: 0,
        })
    }

    /// Enters one nesting level; undone by `self.depth -= n` on the way out.
    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                position: self.lexer.token_start(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let position = self.lexer.token_start();
        match &self.current_token {
            Token::Eof => ParseError::UnexpectedEof { expected, position },
            found => ParseError::UnexpectedToken {
                expected,
                found: found.clone(),
                position,
            },
        }
    }

    fn expect(&mut self, expected: Token, description: &'static str) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(description));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    /// Parse primary expressions (atoms): literals, paths, calls, groups
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let expr = match mem::replace(&mut self.current_token, Token::Eof) {
            // Literals
            Token::Float(n) => {
                self.advance()?;
                Expr::Float(n)
            }
            Token::Integer(n) => {
                self.advance()?;
                Expr::Integer(n)
            }
            Token::String(s) => {
                self.advance()?;
                Expr::String(s)
            }
            Token::Boolean(b) => {
                self.advance()?;
                Expr::Boolean(b)
            }
            Token::Null => {
                self.advance()?;
                Expr::Null
            }

            // Paths
            Token::Field(name) => {
                self.advance()?;
                access(Expr::Identity, Expr::String(name))
            }
            Token::Dot => {
                self.advance()?;
                // `."key"`; `.[` is picked up by the postfix loop
                match mem::replace(&mut self.current_token, Token::Eof) {
                    Token::String(key) => {
                        self.advance()?;
                        access(Expr::Identity, Expr::String(key))
                    }
                    other => {
                        self.current_token = other;
                        Expr::Identity
                    }
                }
            }

            Token::LParen => {
                self.advance()?;
                let expr = self.parse_pipe()?;
                self.expect(Token::RParen, "')'")?;
                expr
            }

            // Array construction
            Token::LBracket => {
                self.advance()?;
                if self.check(&Token::RBracket) {
                    self.advance()?;
                    Expr::Array(None)
                } else {
                    let body = self.parse_pipe()?;
                    self.expect(Token::RBracket, "']'")?;
                    Expr::Array(Some(Box::new(body)))
                }
            }

            Token::Identifier(name) => {
                self.advance()?;
                let args = if self.check(&Token::LParen) {
                    self.parse_arguments()?
                } else {
                    Vec::new()
                };
                Expr::Call { name, args }
            }

            // Unary minus, represented as 0 - operand
            Token::Minus => {
                self.advance()?;
                self.descend()?;
                let operand = self.parse_postfix()?;
                self.depth -= 1;
                Expr::BinaryOp {
                    op: BinOp::Subtract,
                    left: Box::new(Expr::Integer(0)),
                    right: Box::new(operand),
                }
            }

            token => {
                self.current_token = token;
                return Err(self.unexpected("an expression"));
            }
        };
        Ok(expr)
    }

    /// `(a; b; ...)` after a function name
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.advance()?; // '('
        let mut args = vec![self.parse_pipe()?];

        while self.check(&Token::Semicolon) {
            self.advance()?;
            args.push(self.parse_pipe()?);
        }

        self.expect(Token::RParen, "')' to close the argument list")?;
        Ok(args)
    }

    /// Parse suffixes: `.field`, `."key"`, `[index]`, `[]`, `?`
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        let mut links = 0;

        loop {
            if matches!(
                self.current_token,
                Token::Field(_) | Token::Dot | Token::LBracket | Token::Question
            ) {
                self.descend()?;
                links += 1;
            }
            match mem::replace(&mut self.current_token, Token::Eof) {
                Token::Field(name) => {
                    self.advance()?;
                    expr = access(expr, Expr::String(name));
                }
                Token::Dot => {
                    self.advance()?;
                    match mem::replace(&mut self.current_token, Token::Eof) {
                        Token::String(key) => {
                            self.advance()?;
                            expr = access(expr, Expr::String(key));
                        }
                        Token::LBracket => {
                            self.current_token = Token::LBracket;
                            expr = self.parse_bracket_suffix(expr)?;
                        }
                        other => {
                            self.current_token = other;
                            return Err(self.unexpected("a field name after '.'"));
                        }
                    }
                }
                Token::LBracket => {
                    self.current_token = Token::LBracket;
                    expr = self.parse_bracket_suffix(expr)?;
                }
                Token::Question => {
                    self.advance()?;
                    expr = Expr::Optional(Box::new(expr));
                }
                other => {
                    self.current_token = other;
                    break;
                }
            }
        }
        self.depth -= links;
        Ok(expr)
    }

    fn parse_bracket_suffix(&mut self, object: Expr) -> Result<Expr, ParseError> {
        self.advance()?; // '['

        if self.check(&Token::RBracket) {
            self.advance()?;
            return Ok(Expr::Iterate(Box::new(object)));
        }

        let key = self.parse_pipe()?;
        self.expect(Token::RBracket, "']'")?;
        Ok(access(object, key))
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_postfix()?;
        let mut links = 0;

        loop {
            let op = match &self.current_token {
                Token::Star => BinOp::Multiply,
                Token::Slash => BinOp::Divide,
                Token::Percent => BinOp::Modulo,
                _ => break,
            };

            self.advance()?;
            self.descend()?;
            links += 1;
            let right = self.parse_postfix()?;
            left = binary(op, left, right);
        }
        self.depth -= links;
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        let mut links = 0;

        loop {
            let op = match &self.current_token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Subtract,
                _ => break,
            };

            self.advance()?;
            self.descend()?;
            links += 1;
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        self.depth -= links;
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        // Non-associative: a second comparison is left for the caller to reject
        if let Some(op) = match &self.current_token {
            Token::EqEq => Some(BinOp::Equal),
            Token::NotEq => Some(BinOp::NotEqual),
            Token::Lt => Some(BinOp::LessThan),
            Token::Gt => Some(BinOp::GreaterThan),
            Token::LtEq => Some(BinOp::LessEqual),
            Token::GtEq => Some(BinOp::GreaterEqual),
            _ => None,
        } {
            self.advance()?;
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        let mut links = 0;

        while self.check(&Token::And) {
            self.advance()?;
            self.descend()?;
            links += 1;
            let right = self.parse_comparison()?;
            left = binary(BinOp::And, left, right);
        }
        self.depth -= links;
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        let mut links = 0;

        while self.check(&Token::Or) {
            self.advance()?;
            self.descend()?;
            links += 1;
            let right = self.parse_and()?;
            left = binary(BinOp::Or, left, right);
        }
        self.depth -= links;
        Ok(left)
    }

    fn parse_alternative(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_or()?;

        if self.check(&Token::SlashSlash) {
            self.advance()?;
            self.descend()?;
            let right = self.parse_alternative()?;
            self.depth -= 1;
            return Ok(binary(BinOp::Alternative, left, right));
        }
        Ok(left)
    }

    fn parse_comma(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_alternative()?;
        let mut links = 0;

        while self.check(&Token::Comma) {
            self.advance()?;
            self.descend()?;
            links += 1;
            let right = self.parse_alternative()?;
            left = Expr::Comma(Box::new(left), Box::new(right));
        }
        self.depth -= links;
        Ok(left)
    }

    /// Lowest precedence; right associative. Every group, index, argument
    /// and pipe stage passes through here, so this is where nesting is
    /// counted.
    fn parse_pipe(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let left = self.parse_comma()?;

        let expr = if self.check(&Token::Pipe) {
            self.advance()?;
            let right = self.parse_pipe()?;
            Expr::Pipe(Box::new(left), Box::new(right))
        } else {
            left
        };
        self.depth -= 1;
        Ok(expr)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_pipe()
    }

    /// Parse a complete program; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Eof, "end of program")?;
        Ok(expr)
    }
}

fn access(object: Expr, key: Expr) -> Expr {
    Expr::Access {
        object: Box::new(object),
        key: Box::new(key),
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
