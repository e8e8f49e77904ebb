//! Recursive-descent evaluator for the four basic operators over decimal
//! literals, with unary signs, parentheses and implicit multiplication
//! next to a parenthesis (`2(3+1)`, `(2)3`).

use thiserror::Error;

const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("expression is empty")]
    Empty,

    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("missing closing parenthesis")]
    UnbalancedParen,

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NonFinite,

    #[error("expression nests too deeply")]
    TooDeep,
}

pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let chars: Vec<char> = expression
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if chars.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut parser = Parser { chars, pos: 0, depth: 0 };
    let value = parser.expr()?;
    if let Some(c) = parser.peek() {
        return Err(EvalError::UnexpectedChar(c, parser.pos));
    }
    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Ok(value)
}

/// Integral values print without a fractional part; everything else uses
/// the shortest representation that round-trips.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn follows_paren(&self) -> bool {
        self.pos > 0 && self.chars[self.pos - 1] == ')'
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some('/') => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    if rhs == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value /= rhs;
                }
                Some('(') => {
                    value *= self.factor()?;
                }
                Some(c) if (c.is_ascii_digit() || c == '.') && self.follows_paren() => {
                    value *= self.factor()?;
                }
                _ => {
                    return Ok(value);
                }
            }
        }
    }

    fn factor(&mut self) -> Result<f64, EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }
        let result = match self.peek() {
            Some('-') => {
                self.pos += 1;
                self.factor().map(|v| -v)
            }
            Some('+') => {
                self.pos += 1;
                self.factor()
            }
            _ => self.primary(),
        };
        self.depth -= 1;
        result
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let value = self.expr()?;
                match self.bump() {
                    Some(')') => Ok(value),
                    Some(c) => Err(EvalError::UnexpectedChar(c, self.pos - 1)),
                    None => Err(EvalError::UnbalancedParen),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(EvalError::UnexpectedChar(c, self.pos)),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        if literal == "." || literal.matches('.').count() > 1 {
            return Err(EvalError::InvalidNumber(literal));
        }
        literal.parse::<f64>().map_err(|_| EvalError::InvalidNumber(literal))
    }
}
