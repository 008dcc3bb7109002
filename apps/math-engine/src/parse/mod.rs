//! Percent and arithmetic answers for free-text chat questions.
//!
//! [`parse_math_question`] recognises three shapes, tried in order:
//!
//! 1. `<n>% of <m>` / `<n> percent of <m>`
//! 2. `what percent is <a> of <b>` / `what percent of <b> is <a>`
//! 3. a bounded arithmetic expression, optionally wrapped as
//!    `what is ...?` / `calculate ...` / `compute ... =`
//!
//! Anything else is [`ParseOutcome::Declined`] so the caller can fall back
//! to its own handling.

mod expression;
mod percent;

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::MathError;
use crate::numeric::{DEFAULT_SCALE, FixedDecimal};

pub use expression::{evaluate_expression, is_expression_shaped};
pub use percent::{percent_of, percent_of_fixed, what_percent_is, what_percent_is_fixed};

const NUMBER: &str = r"(-?\d[\d,]*(?:\.\d+)?|-?\.\d+)";
const CURRENCY: &str = r"(?:[$€£¥₹]\s*)?";

/// The question a parsed answer responds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MathQuestion {
    /// `percent`% of `total`.
    PercentOf {
        /// Percentage.
        percent: FixedDecimal,
        /// Base amount.
        total: FixedDecimal,
    },
    /// What percent `part` is of `whole`.
    Ratio {
        /// Numerator.
        part: FixedDecimal,
        /// Denominator.
        whole: FixedDecimal,
    },
    /// Bounded arithmetic expression.
    Expression {
        /// Expression text as evaluated.
        expression: String,
    },
}

impl fmt::Display for MathQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PercentOf { percent, total } => write!(f, "{percent}% of {total}"),
            Self::Ratio { part, whole } => write!(f, "{part} as a percent of {whole}"),
            Self::Expression { expression } => write!(f, "{expression}"),
        }
    }
}

/// An exact answer to a recognised question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedAnswer {
    /// What was recognised.
    pub question: MathQuestion,
    /// Exact result.
    pub value: FixedDecimal,
    /// Ready-to-splice text, e.g. `15% of 200 = 30`.
    pub display: String,
}

impl ParsedAnswer {
    fn new(question: MathQuestion, value: FixedDecimal) -> Self {
        let suffix = if matches!(question, MathQuestion::Ratio { .. }) {
            "%"
        } else {
            ""
        };
        let display = format!("{question} = {}{suffix}", value.round_dp(6));
        Self {
            question,
            value,
            display,
        }
    }
}

/// Result of [`parse_math_question`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ParseOutcome {
    /// The text matched a supported shape.
    Answered(ParsedAnswer),
    /// Nothing matched; not an error.
    Declined,
}

impl ParseOutcome {
    /// The answer, if any.
    #[must_use]
    pub const fn answer(&self) -> Option<&ParsedAnswer> {
        match self {
            Self::Answered(answer) => Some(answer),
            Self::Declined => None,
        }
    }
}

#[allow(clippy::expect_used)]
fn percent_of_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i){NUMBER}\s*(?:%|percent|per\s+cent)\s+of\s+(?:an?\s+|the\s+)?{CURRENCY}{NUMBER}"
        ))
        .expect("percent-of regex is valid")
    })
}

#[allow(clippy::expect_used)]
fn ratio_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)what\s+(?:percent(?:age)?|%)\s+is\s+{CURRENCY}{NUMBER}\s+(?:of|out\s+of|from)\s+{CURRENCY}{NUMBER}"
        ))
        .expect("ratio regex is valid")
    })
}

/// `what percent of <whole> is <part>`: captures come whole first.
#[allow(clippy::expect_used)]
fn ratio_whole_first_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)what\s+(?:percent(?:age)?|%)\s+of\s+{CURRENCY}{NUMBER}\s+is\s+{CURRENCY}{NUMBER}"
        ))
        .expect("whole-first ratio regex is valid")
    })
}

#[allow(clippy::expect_used)]
fn question_wrapper_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:what\s+is|what's|calculate|compute)\s+(.*?)[\s?=]*$")
            .expect("question wrapper regex is valid")
    })
}

fn number(text: &str) -> FixedDecimal {
    FixedDecimal::from_str_lossy(text, DEFAULT_SCALE)
}

fn match_percent_of(text: &str) -> Result<Option<ParsedAnswer>, MathError> {
    let Some(caps) = percent_of_regex().captures(text) else {
        return Ok(None);
    };
    let percent = number(&caps[1]);
    let total = number(&caps[2]);
    let value = percent_of_fixed(percent, total)?;
    Ok(Some(ParsedAnswer::new(
        MathQuestion::PercentOf { percent, total },
        value,
    )))
}

fn match_ratio(text: &str) -> Result<Option<ParsedAnswer>, MathError> {
    let (part, whole) = if let Some(caps) = ratio_regex().captures(text) {
        (number(&caps[1]), number(&caps[2]))
    } else if let Some(caps) = ratio_whole_first_regex().captures(text) {
        (number(&caps[2]), number(&caps[1]))
    } else {
        return Ok(None);
    };
    let value = what_percent_is_fixed(part, whole)?;
    Ok(Some(ParsedAnswer::new(MathQuestion::Ratio { part, whole }, value)))
}

/// Strip a leading `what is`/`calculate`/`compute` and trailing `?`/`=`.
fn expression_candidate(text: &str) -> Option<&str> {
    let body = question_wrapper_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or_else(
            || text.trim().trim_end_matches(['?', '=']).trim_end(),
            |m| m.as_str(),
        )
        .trim();

    let has_digit = body.chars().any(|c| c.is_ascii_digit());
    let has_operator = body.chars().any(|c| "+-*/".contains(c));
    (has_digit && has_operator && is_expression_shaped(body)).then_some(body)
}

/// Answer a free-text percent or arithmetic question exactly.
///
/// # Errors
///
/// A recognised question whose arithmetic fails (zero denominator,
/// malformed expression, overflow). Text that matches nothing is
/// `Ok(ParseOutcome::Declined)`.
pub fn parse_math_question(text: &str) -> Result<ParseOutcome, MathError> {
    if let Some(answer) = match_percent_of(text)? {
        return Ok(ParseOutcome::Answered(answer));
    }
    if let Some(answer) = match_ratio(text)? {
        return Ok(ParseOutcome::Answered(answer));
    }
    if let Some(body) = expression_candidate(text) {
        let value = evaluate_expression(body)?;
        return Ok(ParseOutcome::Answered(ParsedAnswer::new(
            MathQuestion::Expression {
                expression: body.to_string(),
            },
            value,
        )));
    }
    Ok(ParseOutcome::Declined)
}
