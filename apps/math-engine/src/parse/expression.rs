//! Bounded arithmetic: `+ - * / ( )` over decimal numbers.
//!
//! Text is tokenized, reordered to postfix with the shunting-yard procedure
//! and evaluated on a fixed-point stack. Nothing is ever handed to an
//! interpreter; any character outside the grammar is rejected.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{MathError, ParseError};
use crate::numeric::{DEFAULT_SCALE, FixedDecimal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Neg,
}

impl Operator {
    const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Neg => 3,
        }
    }

    const fn is_right_associative(self) -> bool {
        matches!(self, Self::Neg)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(FixedDecimal),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn text(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
            Self::Star => "*".to_string(),
            Self::Slash => "/".to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Spanned {
    token: Token,
    position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Postfix {
    Number(FixedDecimal),
    Op(Operator),
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Op(Operator),
    LParen,
}

/// Whether `text` only uses characters the evaluator understands.
#[must_use]
pub fn is_expression_shaped(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || "+-*/().".contains(c))
}

/// Evaluate an arithmetic expression exactly.
///
/// Supports `+ - * /`, parentheses and unary minus with the usual
/// precedence. Numbers are decimal literals without exponents.
///
/// # Errors
///
/// - [`MathError::Parse`] for an empty expression, an unknown character, a
///   malformed number, mismatched parentheses, a misplaced token or a
///   missing operand.
/// - [`MathError::DivisionByZero`] when a divisor evaluates to zero.
/// - [`MathError::Overflow`] when an intermediate leaves the fixed-point range.
pub fn evaluate_expression(text: &str) -> Result<FixedDecimal, MathError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty.into());
    }
    let postfix = to_postfix(&tokens)?;
    evaluate_postfix(&postfix)
}

fn tokenize(text: &str) -> Result<Vec<Spanned>, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut index = 0;

    while index < chars.len() {
        let ch = chars[index];
        let token = match ch {
            c if c.is_whitespace() => {
                index += 1;
                continue;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = index;
                while index < chars.len() && (chars[index].is_ascii_digit() || chars[index] == '.') {
                    index += 1;
                }
                let run: String = chars[start..index].iter().collect();
                tokens.push(Spanned {
                    token: Token::Number(parse_number(&run, start)?),
                    position: start,
                });
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(ParseError::UnknownCharacter {
                    ch: other,
                    position: index,
                });
            }
        };
        tokens.push(Spanned {
            token,
            position: index,
        });
        index += 1;
    }

    Ok(tokens)
}

fn parse_number(run: &str, position: usize) -> Result<FixedDecimal, ParseError> {
    let malformed = || ParseError::MalformedNumber {
        text: run.to_string(),
        position,
    };
    let dots = run.chars().filter(|c| *c == '.').count();
    if dots > 1 || !run.chars().any(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }
    let decimal = Decimal::from_str(run).map_err(|_| malformed())?;
    FixedDecimal::from_decimal(decimal, DEFAULT_SCALE).map_err(|_| malformed())
}

fn to_postfix(tokens: &[Spanned]) -> Result<Vec<Postfix>, ParseError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut pending: Vec<Pending> = Vec::new();
    let mut expect_operand = true;

    for spanned in tokens {
        let unexpected = || ParseError::UnexpectedToken {
            token: spanned.token.text(),
            position: spanned.position,
        };
        match (&spanned.token, expect_operand) {
            (Token::Number(value), true) => {
                output.push(Postfix::Number(*value));
                expect_operand = false;
            }
            (Token::LParen, true) => pending.push(Pending::LParen),
            (Token::Minus, true) => push_operator(Operator::Neg, &mut pending, &mut output),
            (Token::Plus, false) => {
                push_operator(Operator::Add, &mut pending, &mut output);
                expect_operand = true;
            }
            (Token::Minus, false) => {
                push_operator(Operator::Sub, &mut pending, &mut output);
                expect_operand = true;
            }
            (Token::Star, false) => {
                push_operator(Operator::Mul, &mut pending, &mut output);
                expect_operand = true;
            }
            (Token::Slash, false) => {
                push_operator(Operator::Div, &mut pending, &mut output);
                expect_operand = true;
            }
            (Token::RParen, false) => loop {
                match pending.pop() {
                    Some(Pending::Op(op)) => output.push(Postfix::Op(op)),
                    Some(Pending::LParen) => break,
                    None => return Err(ParseError::MismatchedParentheses),
                }
            },
            _ => return Err(unexpected()),
        }
    }

    if expect_operand {
        return Err(ParseError::MissingOperand);
    }

    while let Some(item) = pending.pop() {
        match item {
            Pending::Op(op) => output.push(Postfix::Op(op)),
            Pending::LParen => return Err(ParseError::MismatchedParentheses),
        }
    }

    Ok(output)
}

fn push_operator(op: Operator, pending: &mut Vec<Pending>, output: &mut Vec<Postfix>) {
    while let Some(Pending::Op(top)) = pending.last().copied() {
        let binds_tighter = top.precedence() > op.precedence()
            || (top.precedence() == op.precedence() && !op.is_right_associative());
        if !binds_tighter {
            break;
        }
        pending.pop();
        output.push(Postfix::Op(top));
    }
    pending.push(Pending::Op(op));
}

fn evaluate_postfix(postfix: &[Postfix]) -> Result<FixedDecimal, MathError> {
    let mut stack: Vec<FixedDecimal> = Vec::with_capacity(postfix.len());

    for item in postfix {
        match *item {
            Postfix::Number(value) => stack.push(value),
            Postfix::Op(Operator::Neg) => {
                let value = stack.pop().ok_or(ParseError::MissingOperand)?;
                stack.push(-value);
            }
            Postfix::Op(op) => {
                let rhs = stack.pop().ok_or(ParseError::MissingOperand)?;
                let lhs = stack.pop().ok_or(ParseError::MissingOperand)?;
                let value = match op {
                    Operator::Add => lhs.try_add(rhs)?,
                    Operator::Sub => lhs.try_sub(rhs)?,
                    Operator::Mul => lhs.try_mul(rhs)?,
                    Operator::Div => {
                        if rhs.is_zero() {
                            return Err(MathError::DivisionByZero {
                                context: "expression",
                            });
                        }
                        lhs.try_div(rhs)?
                    }
                    Operator::Neg => unreachable!("unary minus handled above"),
                };
                stack.push(value);
            }
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(value), true) => Ok(value),
        _ => Err(ParseError::MissingOperand.into()),
    }
}
