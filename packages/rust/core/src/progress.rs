//! Progress reporting hooks.
//!
//! The pipeline reports through this trait so the CLI can drive a spinner
//! while library users and tests stay silent.

pub trait ProgressReporter: Send + Sync {
    /// Called once the leaf count is known, before any page loads.
    fn begin(&self, _total: usize) {}

    /// Called after each page load attempt, in navigation order.
    fn page_done(&self, _path: &str) {}

    /// Called once the merged document is assembled.
    fn finish(&self, _message: &str) {}
}

/// No-op reporter for library use and tests.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {}
