use thiserror::Error;

use crate::session::JobStatus;

/// Errors surfaced by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown chapter: {0}")]
    UnknownChapter(String),
    #[error("invalid job status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
}
