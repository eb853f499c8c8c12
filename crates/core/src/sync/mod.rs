//! Description sync: directory resolution, window fetch, rewrite decision,
//! batched submission and the pass engine tying them together.

pub mod directory;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod replacement;
pub mod report;
pub mod submitter;

pub use directory::{select_calendars, CalendarDirectory};
pub use engine::SyncEngine;
pub use error::{SyncError, SyncResult};
pub use fetcher::EventWindowFetcher;
pub use replacement::{decide, ReplacementDecision};
pub use report::{CalendarReport, PassSummary};
pub use submitter::BatchUpdateSubmitter;
