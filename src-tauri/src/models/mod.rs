pub mod project;
pub mod replay;

pub use project::{CatalogStats, Project, ProjectSummary};
pub use replay::{FileChange, FileDiff, Replay};
