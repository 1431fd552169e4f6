//! Polyglot core: pure session state machine and view-model helpers.
mod effect;
mod error;
mod merge;
mod msg;
mod session;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::CoreError;
pub use merge::{ChapterWrite, Revision, WriteOrigin, WriteOutcome};
pub use msg::{ChapterUpdate, Msg, RemoteStatus};
pub use session::{normalize_language_code, Chapter, JobStatus, Session, TranslatedChapter};
pub use state::AppState;
pub use update::update;
pub use view_model::{
    ChapterRowView, Notice, SessionViewModel, TRANSLATION_CHARS_PER_SECOND,
};
