use crate::session::Session;
use crate::view_model::{
    ChapterRowView, Notice, SessionViewModel, TRANSLATION_CHARS_PER_SECOND,
};

/// Top-level client state: at most one live session plus render bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: Option<Session>,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub(crate) fn replace_session(&mut self, session: Session) {
        self.session = Some(session);
        self.notice = None;
        self.dirty = true;
    }

    pub(crate) fn clear_session(&mut self) {
        if self.session.take().is_some() {
            self.dirty = true;
        }
        self.notice = None;
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// True once since the last call if anything render-relevant changed.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> SessionViewModel {
        let Some(session) = &self.session else {
            return SessionViewModel {
                notice: self.notice.clone(),
                dirty: self.dirty,
                ..SessionViewModel::default()
            };
        };

        let total_chars = session.total_char_count();
        let chapters = session
            .chapters()
            .iter()
            .map(|chapter| {
                let translation = session.translation(&chapter.id);
                ChapterRowView {
                    chapter_id: chapter.id.clone(),
                    title: chapter.title.clone(),
                    original_chars: chapter.content.chars().count(),
                    translated: translation.is_some(),
                    origin: translation.map(|entry| entry.origin),
                    revision: translation.map(|entry| entry.revision),
                    final_for_job: session.chapter_is_final(&chapter.id),
                }
            })
            .collect();

        SessionViewModel {
            has_document: true,
            session_id: session.session_id().to_string(),
            language: session.language().to_string(),
            job_status: session.job_status(),
            chapter_count: session.chapters().len(),
            translated_count: session.translated().len(),
            total_chars,
            estimated_seconds: total_chars.div_ceil(TRANSLATION_CHARS_PER_SECOND),
            chapters,
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }
}
