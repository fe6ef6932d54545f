//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or plain-text record formatting
//! - Fan-out to stdout and a log file
//! - Size-based log rotation with backup retention and compression

pub mod logger;
pub mod rotation;

pub use logger::{effective_level, log_file_path, parse_log_level, LoggerImpl};
pub use rotation::{RotatingFileWriter, RotationPolicy};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, trace, warn};
