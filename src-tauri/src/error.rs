use thiserror::Error;

/// Result type for catalog and player operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes of the core. Out-of-bounds navigation is deliberately
/// not represented here: `next`/`previous` at the edges are no-ops.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),
}
