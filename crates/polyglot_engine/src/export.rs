use bytes::Bytes;
use serde::Serialize;

use crate::api::{build_client, check_status, endpoint, map_reqwest_error, ApiSettings};
use crate::{ApiError, ApiFailure, ChapterPayload};

/// Default name of the merged artifact written to disk.
pub const DEFAULT_ARTIFACT_FILENAME: &str = "translated-document.md";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export rejected: {0}")]
    Rejected(String),
    #[error("export failed: {0}")]
    Transport(ApiError),
}

#[derive(Debug, Serialize)]
struct ExportRequest<'a> {
    session_id: &'a str,
    chapters: &'a [ChapterPayload],
}

#[async_trait::async_trait]
pub trait DocumentExporter: Send + Sync {
    /// Merge the given chapters server-side, in the order given, and return
    /// the artifact bytes.
    async fn export(
        &self,
        session_id: &str,
        chapters: &[ChapterPayload],
    ) -> Result<Bytes, ExportError>;
}

pub struct HttpDocumentExporter {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl HttpDocumentExporter {
    pub fn new(settings: ApiSettings) -> Result<Self, ExportError> {
        let client = build_client(&settings).map_err(ExportError::Transport)?;
        Ok(Self { client, settings })
    }
}

#[async_trait::async_trait]
impl DocumentExporter for HttpDocumentExporter {
    async fn export(
        &self,
        session_id: &str,
        chapters: &[ChapterPayload],
    ) -> Result<Bytes, ExportError> {
        let response = self
            .client
            .post(endpoint(&self.settings, "export"))
            .json(&ExportRequest {
                session_id,
                chapters,
            })
            .send()
            .await
            .map_err(|err| ExportError::Transport(map_reqwest_error(err)))?;
        let response = check_status(response).await.map_err(|error| match error.kind {
            ApiFailure::HttpStatus(_) => ExportError::Rejected(error.message),
            _ => ExportError::Transport(error),
        })?;
        response
            .bytes()
            .await
            .map_err(|err| ExportError::Transport(map_reqwest_error(err)))
    }
}
