//! Progress reporting for sync operations.
//!
//! Library progress events are turned into structured log lines.

mod logging;

use prpulse::sync::ProgressCallback;

pub use logging::LoggingReporter;

/// A library callback that logs every event.
pub fn logging_callback() -> ProgressCallback {
    let reporter = LoggingReporter::new();
    Box::new(move |event| reporter.handle(event))
}
