//! Configuration, client wiring and project-level operations.

pub mod bootstrap;
pub mod config;
pub mod project;
pub mod secret;

pub use config::Config;
pub use project::{CommitsView, ProjectService, ProjectSummary};
pub use repobrief_index::{Answer, DEFAULT_TOP_K};
pub use secret::Secret;
