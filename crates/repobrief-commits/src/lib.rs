//! Commit history pipeline: collect → deduplicate → summarize → store.

pub mod collector;
pub mod dedup;
pub mod error;
pub mod poller;
pub mod summarizer;

pub use collector::{CommitCollector, MAX_COMMITS};
pub use dedup::unprocessed_commits;
pub use error::{CommitError, Result};
pub use poller::{CommitPoller, PollReport};
pub use summarizer::CommitSummarizer;
