//! Playback and quiz progress tracking
//!
//! The throttle that decides which player events become network reports,
//! and the best-effort reporter that sends them.

pub mod reporter;
pub mod watch;

// Re-export commonly used types
pub use reporter::{ProgressReporter, ReportStatus};
pub use watch::WatchTracker;
