//! Polyglot engine: translation service adapters and the job poll loop.
mod api;
mod controller;
mod export;
mod persist;
mod snapshot;
mod types;
mod upload;

pub use api::{ApiSettings, HttpTranslationApi, TranslationApi};
pub use controller::{JobControllerHandle, JobError, DEFAULT_POLL_INTERVAL};
pub use export::{
    DocumentExporter, ExportError, HttpDocumentExporter, DEFAULT_ARTIFACT_FILENAME,
};
pub use persist::{OutputDir, PersistError};
pub use snapshot::{SessionSnapshot, SnapshotChapter, SnapshotStore, SnapshotTranslation};
pub use types::{
    ApiError, ApiFailure, ChapterPayload, JobEvent, JobId, PollSnapshot, RemoteStatus,
};
pub use upload::{
    ChapterSeed, DocumentFormat, DocumentUploader, HttpDocumentUploader, UploadError,
    UploadedDocument,
};
