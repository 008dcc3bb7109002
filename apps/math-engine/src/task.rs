//! Task dispatch.
//!
//! Every calculation the engine offers is a variant of the closed
//! [`MathTask`] enum. On the wire a task is `{"type": <tag>, "input": {...}}`
//! and its result is `{"type": <tag>, "output": {...}}`; an unknown tag is a
//! deserialization error, never a runtime branch.

use serde::{Deserialize, Serialize};

use crate::compounding::{
    CompoundingPlanInput, CompoundingPlanResult, CompoundingProjector, DEFAULT_MAX_TRADES,
};
use crate::error::MathError;
use crate::parse::{ParseOutcome, parse_math_question};
use crate::prop_firm::{PropFirmPlanInput, PropFirmPlanResult, build_prop_firm_plan};
use crate::sizing::{PositionSizeInput, PositionSizeResult, calculate_position_size};

/// Default cap on free-text question length, in characters.
pub const DEFAULT_MAX_QUESTION_LENGTH: usize = 512;

/// A calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "input", rename_all = "kebab-case")]
pub enum MathTask {
    /// Units to trade for a given account risk.
    PositionSize(PositionSizeInput),
    /// Prop-firm loss limits and safe per-trade risk.
    PropFirmPlan(PropFirmPlanInput),
    /// Compounding growth projection.
    CompoundingPlan(CompoundingPlanInput),
}

impl MathTask {
    /// Wire tag of this task.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PositionSize(_) => "position-size",
            Self::PropFirmPlan(_) => "prop-firm-plan",
            Self::CompoundingPlan(_) => "compounding-plan",
        }
    }
}

/// Result of a [`MathTask`], tagged with the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "output", rename_all = "kebab-case")]
pub enum MathTaskResult {
    /// Position sizing output.
    PositionSize(PositionSizeResult),
    /// Prop-firm plan output.
    PropFirmPlan(PropFirmPlanResult),
    /// Compounding projection output.
    CompoundingPlan(CompoundingPlanResult),
}

/// Run a task with the default limits.
pub fn run_math_task(task: &MathTask) -> Result<MathTaskResult, MathError> {
    MathEngine::default().run(task)
}

/// Bounds on the work a single request may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLimits {
    /// Largest `numberOfTrades` for a compounding plan.
    pub max_compounding_trades: u32,
    /// Longest free-text question accepted, in characters.
    pub max_question_length: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_compounding_trades: DEFAULT_MAX_TRADES,
            max_question_length: DEFAULT_MAX_QUESTION_LENGTH,
        }
    }
}

/// Stateless dispatcher shared by all request handlers.
#[derive(Debug, Clone, Default)]
pub struct MathEngine {
    limits: EngineLimits,
    projector: CompoundingProjector,
}

impl MathEngine {
    /// Create an engine with the given limits.
    #[must_use]
    pub const fn new(limits: EngineLimits) -> Self {
        Self {
            limits,
            projector: CompoundingProjector::with_max_trades(limits.max_compounding_trades),
        }
    }

    /// Limits this engine enforces.
    #[must_use]
    pub const fn limits(&self) -> &EngineLimits {
        &self.limits
    }

    /// Run one task.
    pub fn run(&self, task: &MathTask) -> Result<MathTaskResult, MathError> {
        tracing::debug!(task = task.kind(), "Running math task");

        let result = match task {
            MathTask::PositionSize(input) => {
                calculate_position_size(input).map(MathTaskResult::PositionSize)
            }
            MathTask::PropFirmPlan(input) => {
                build_prop_firm_plan(input).map(MathTaskResult::PropFirmPlan)
            }
            MathTask::CompoundingPlan(input) => self
                .projector
                .project(input)
                .map(MathTaskResult::CompoundingPlan),
        };

        if let Err(ref error) = result {
            tracing::debug!(task = task.kind(), error = %error, "Math task rejected");
        }
        result
    }

    /// Answer a free-text percent or arithmetic question.
    ///
    /// # Errors
    ///
    /// [`MathError::InvalidInput`] on field `text` when the question is longer
    /// than the configured limit, plus anything [`parse_math_question`] returns.
    pub fn parse_question(&self, text: &str) -> Result<ParseOutcome, MathError> {
        let length = text.chars().count();
        if length > self.limits.max_question_length {
            return Err(MathError::InvalidInput {
                field: "text",
                reason: format!(
                    "question is {length} characters, limit is {}",
                    self.limits.max_question_length
                ),
            });
        }

        let outcome = parse_math_question(text)?;
        tracing::debug!(
            answered = matches!(outcome, ParseOutcome::Answered(_)),
            "Parsed math question"
        );
        Ok(outcome)
    }
}
