//! Shared utilities for the runtime client SDK.

pub mod logging;

pub use logging::{init_logging, try_init_logging, LogFormat, LoggingError};
