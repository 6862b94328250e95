//! Process-wide logging setup shared by every tokengate binary.

/// Initialize tracing/logging with the format named by `LOG_FORMAT`.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Subscriber construction (filters, formatters).
pub mod tracing;
