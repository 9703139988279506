//! Process-wide tracing setup shared by the console binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide observability with the default `info` filter.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init("info");
}
