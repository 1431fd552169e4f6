use crate::session::Chapter;

/// Job status as reported by one poll of the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

/// One chapter's translated content as delivered by a poll or restored from
/// a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterUpdate {
    pub chapter_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A parsed document arrived from the upload adapter; replaces any
    /// current session wholesale.
    DocumentLoaded {
        session_id: String,
        chapters: Vec<Chapter>,
        language: String,
    },
    /// User picked a different target language (idle sessions only).
    LanguageSelected(String),
    /// User asked to translate the current document.
    TranslateRequested,
    /// The start-job call was accepted; the job id is owned by the
    /// controller, carried here for operator visibility only.
    JobAccepted { job_id: String },
    /// The start-job call failed; the session rolls back to idle.
    JobStartFailed { reason: String },
    /// One poll round-trip finished. Delivered chapters are ingested
    /// regardless of the reported status.
    PollArrived {
        status: RemoteStatus,
        chapters: Vec<ChapterUpdate>,
    },
    /// A poll failed in transport or parsing; terminal by design, already
    /// ingested translations are retained.
    PollFailed { reason: String },
    /// User edited a chapter's translation in place.
    ChapterEdited { chapter_id: String, content: String },
    /// A saved session snapshot was loaded from disk.
    SnapshotRestored {
        session_id: String,
        chapters: Vec<Chapter>,
        translated: Vec<ChapterUpdate>,
        language: String,
    },
    /// Drop the current session and stop any active polling.
    Reset,
}
