//! Position sizing from account risk.
//!
//! # Example
//!
//! ```rust
//! use math_engine::sizing::{PositionSizeInput, calculate_position_size};
//!
//! let input = PositionSizeInput {
//!     account_size: 100_000.0,
//!     risk_percent: 1.0,
//!     stop_loss_distance: 50.0,
//!     value_per_unit: 10.0,
//! };
//!
//! let result = calculate_position_size(&input)?;
//! assert_eq!(result.risk_amount, 1000.0);
//! assert_eq!(result.position_size, 2.0);
//! # Ok::<(), math_engine::MathError>(())
//! ```

mod calculator;
mod types;

pub use calculator::calculate_position_size;
pub use types::{PositionSizeInput, PositionSizeResult};
