//! Tracing and logging setup shared by the binaries.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{LogFormat, UnknownLogFormat};

/// Initialize process-wide tracing with the given default filter and format.
///
/// `RUST_LOG`, when set, takes precedence over `default_filter`. Safe to call
/// multiple times; subsequent calls are no-ops.
pub fn init(default_filter: &str, format: LogFormat) {
    tracing::init(default_filter, format);
}
