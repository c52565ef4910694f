pub mod commands;
pub mod draft;

pub use draft::{FileDraft, ProjectDraft, ReplayDraft, ReplayDraftPatch};
