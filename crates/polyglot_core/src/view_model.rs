use crate::merge::{Revision, WriteOrigin};
use crate::session::JobStatus;

/// Characters the reference translation pipeline handles per second; feeds
/// the upfront time estimate shown before a job starts.
pub const TRANSLATION_CHARS_PER_SECOND: usize = 500;

/// User-facing feedback produced by the most recent message, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoDocument,
    InvalidDocument(String),
    JobAlreadyRunning,
    JobStartFailed(String),
    TranslationFailed(String),
    UnknownChapter(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionViewModel {
    pub has_document: bool,
    pub session_id: String,
    pub language: String,
    pub job_status: JobStatus,
    pub chapter_count: usize,
    pub translated_count: usize,
    pub total_chars: usize,
    pub estimated_seconds: usize,
    pub chapters: Vec<ChapterRowView>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRowView {
    pub chapter_id: String,
    pub title: String,
    pub original_chars: usize,
    pub translated: bool,
    pub origin: Option<WriteOrigin>,
    pub revision: Option<Revision>,
    /// The job can no longer overwrite this chapter; edits are durable.
    pub final_for_job: bool,
}
