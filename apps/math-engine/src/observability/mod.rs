//! Logging for the math engine.

mod tracing;

pub use self::tracing::{TracingError, build_filter, init_tracing};
