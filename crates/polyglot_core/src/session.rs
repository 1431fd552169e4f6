use std::collections::{BTreeMap, BTreeSet};

use crate::error::CoreError;
use crate::merge::{self, ChapterWrite, Revision, WriteOrigin, WriteOutcome};

/// An original-language unit of the uploaded document. Write-once: produced
/// by the upload adapter and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// The current translation of one chapter, together with the bookkeeping
/// the merge policy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedChapter {
    pub id: String,
    pub content: String,
    pub origin: WriteOrigin,
    pub revision: Revision,
}

/// Lifecycle of the translation job attached to a session.
///
/// Monotonic within one job instance: Idle -> Queued -> InProgress ->
/// {Completed, Failed}. A failed start call rolls Queued back to Idle, and
/// starting a new job moves a terminal status back to Queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Idle,
    Queued,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// A poll loop exists (or is being created) for the session.
    pub fn is_active(self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::InProgress)
    }

    /// Once terminal, polling has stopped for good.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    fn can_move_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Idle, Queued)
                | (Queued, Idle)
                | (Queued, InProgress)
                | (Queued, Completed)
                | (Queued, Failed)
                | (InProgress, Completed)
                | (InProgress, Failed)
                | (Completed, Queued)
                | (Failed, Queued)
        )
    }
}

/// One uploaded document and its translation state. Exactly one session is
/// live at a time; a new upload replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    session_id: String,
    language: String,
    chapters: Vec<Chapter>,
    translated: BTreeMap<String, TranslatedChapter>,
    job_status: JobStatus,
}

impl Session {
    /// Build a session from an upload result. Rejects an empty chapter list
    /// and duplicate chapter ids.
    pub fn new(
        session_id: impl Into<String>,
        chapters: Vec<Chapter>,
        language: &str,
    ) -> Result<Self, CoreError> {
        if chapters.is_empty() {
            return Err(CoreError::InvalidInput("document has no chapters".into()));
        }
        let mut seen = BTreeSet::new();
        for chapter in &chapters {
            if !seen.insert(chapter.id.as_str()) {
                return Err(CoreError::InvalidInput(format!(
                    "duplicate chapter id: {}",
                    chapter.id
                )));
            }
        }
        Ok(Self {
            session_id: session_id.into(),
            language: normalize_language_code(language),
            chapters,
            translated: BTreeMap::new(),
            job_status: JobStatus::Idle,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: &str) {
        self.language = normalize_language_code(language);
    }

    /// Chapters in document order.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn translation(&self, chapter_id: &str) -> Option<&TranslatedChapter> {
        self.translated.get(chapter_id)
    }

    /// Translations keyed by chapter id. Keys are always a subset of the
    /// session's chapter ids.
    pub fn translated(&self) -> &BTreeMap<String, TranslatedChapter> {
        &self.translated
    }

    pub fn job_status(&self) -> JobStatus {
        self.job_status
    }

    /// Stamp the next revision for `chapter_id` and store the write. This is
    /// the live-write path: poll ingestion and user edits both pass through
    /// here, so whichever arrives later wins the chapter.
    pub fn set_translated(
        &mut self,
        chapter_id: &str,
        content: impl Into<String>,
        origin: WriteOrigin,
    ) -> Result<TranslatedChapter, CoreError> {
        let revision = self
            .translation(chapter_id)
            .map(|entry| entry.revision)
            .unwrap_or(0)
            + 1;
        let write = ChapterWrite {
            chapter_id: chapter_id.to_string(),
            content: content.into(),
            origin,
            revision,
        };
        let entry = TranslatedChapter {
            id: write.chapter_id.clone(),
            content: write.content.clone(),
            origin,
            revision,
        };
        // A freshly stamped revision is strictly greater by construction.
        self.apply_write(write)?;
        Ok(entry)
    }

    /// Offer a write carrying an externally stamped revision. Stale writes
    /// (revision not strictly greater than the stored one) are discarded,
    /// which keeps replayed or racing polls order-independent.
    pub fn apply_write(&mut self, write: ChapterWrite) -> Result<WriteOutcome, CoreError> {
        if !self.has_chapter(&write.chapter_id) {
            return Err(CoreError::UnknownChapter(write.chapter_id));
        }
        let stored = self.translated.get(&write.chapter_id).map(|t| t.revision);
        let outcome = merge::resolve(stored, write.revision);
        if outcome == WriteOutcome::Applied {
            self.translated.insert(
                write.chapter_id.clone(),
                TranslatedChapter {
                    id: write.chapter_id,
                    content: write.content,
                    origin: write.origin,
                    revision: write.revision,
                },
            );
        }
        Ok(outcome)
    }

    /// Advance the job status. Rejects anything outside the transition
    /// relation documented on [`JobStatus`].
    pub fn set_job_status(&mut self, next: JobStatus) -> Result<(), CoreError> {
        if !self.job_status.can_move_to(next) {
            return Err(CoreError::InvalidTransition {
                from: self.job_status,
                to: next,
            });
        }
        self.job_status = next;
        Ok(())
    }

    /// Sum of original chapter lengths in characters, feeding the
    /// translation-time estimate.
    pub fn total_char_count(&self) -> usize {
        self.chapters
            .iter()
            .map(|chapter| chapter.content.chars().count())
            .sum()
    }

    /// Whether a chapter's translation can no longer be overwritten by the
    /// job: it has one, and no poll loop is active. While a job runs, any
    /// chapter may still receive server writes.
    pub fn chapter_is_final(&self, chapter_id: &str) -> bool {
        self.translated.contains_key(chapter_id) && !self.job_status.is_active()
    }

    fn has_chapter(&self, chapter_id: &str) -> bool {
        self.chapters.iter().any(|chapter| chapter.id == chapter_id)
    }
}

/// Trim and lowercase a target-language code; anything outside 2-5 ASCII
/// letters falls back to "en".
pub fn normalize_language_code(raw: &str) -> String {
    let lang = raw.trim().to_ascii_lowercase();
    if (2..=5).contains(&lang.len()) && lang.bytes().all(|b| b.is_ascii_lowercase()) {
        lang
    } else {
        "en".to_string()
    }
}
