//! Logging utilities
//!
//! Thin wrappers over the `log` facade plus `env_logger` setup.

pub mod log;

// Re-export commonly used functions for convenience
pub use self::log::{init_logging, init_test_logging, log_operation_complete, log_operation_start, log_warning};
