use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one remote translation run.
pub type JobId = String;

/// Job status as reported by the translation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

/// One translated chapter on the wire: delivered by polls, sent back out on
/// export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterPayload {
    pub id: String,
    pub content: String,
}

/// Everything one poll round-trip reports. The chapter list may be empty if
/// nothing new finished since the previous poll.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PollSnapshot {
    pub status: RemoteStatus,
    #[serde(default)]
    pub translated_chapters: Vec<ChapterPayload>,
    /// Chapters finished so far, when the service reports it.
    #[serde(default)]
    pub completed: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
}

/// Events emitted by the job controller while a job runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// The start call was accepted.
    Started { job_id: JobId },
    /// The start call failed; no poll loop was created.
    StartFailed { error: ApiError },
    /// One successful poll, terminal or not.
    Poll { snapshot: PollSnapshot },
    /// A poll failed in transport or parsing. Terminal: the loop stops.
    PollFailed { error: ApiError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiFailure,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFailure {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Malformed,
    Network,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::InvalidUrl => write!(f, "invalid url"),
            ApiFailure::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailure::Timeout => write!(f, "timeout"),
            ApiFailure::Malformed => write!(f, "malformed response"),
            ApiFailure::Network => write!(f, "network error"),
        }
    }
}
