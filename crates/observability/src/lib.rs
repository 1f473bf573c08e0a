//! Tracing and logging setup shared by the POS binaries.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{DEFAULT_FILTER, LogFormat, LogFormatError};

/// Initialize process-wide logging in the given format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    self::tracing::init(format);
}
