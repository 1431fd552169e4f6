use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::api::{build_client, check_status, endpoint, map_reqwest_error, ApiSettings};
use crate::{ApiError, ApiFailure};

/// Document formats the upload endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Markdown,
    WordDocument,
    Pdf,
}

impl DocumentFormat {
    /// Derive the format from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "md" => Some(Self::Markdown),
            "docx" => Some(Self::WordDocument),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown",
            Self::WordDocument => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Pdf => "application/pdf",
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported document format: {file_name} (expected .md, .docx or .pdf)")]
    UnsupportedFormat { file_name: String },
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("upload failed: {0}")]
    Transport(ApiError),
}

/// One chapter as produced by the server-side document split.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChapterSeed {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub content: String,
}

/// Result of a successful upload: a fresh session and its chapter list in
/// document order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedDocument {
    pub session_id: String,
    pub chapters: Vec<ChapterSeed>,
}

#[async_trait::async_trait]
pub trait DocumentUploader: Send + Sync {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>)
        -> Result<UploadedDocument, UploadError>;
}

/// Multipart HTTP implementation against the upload endpoint.
pub struct HttpDocumentUploader {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl HttpDocumentUploader {
    pub fn new(settings: ApiSettings) -> Result<Self, UploadError> {
        let client = build_client(&settings).map_err(UploadError::Transport)?;
        Ok(Self { client, settings })
    }
}

#[async_trait::async_trait]
impl DocumentUploader for HttpDocumentUploader {
    async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedDocument, UploadError> {
        // The format gate runs before any network traffic.
        let format = DocumentFormat::from_file_name(file_name).ok_or_else(|| {
            UploadError::UnsupportedFormat {
                file_name: file_name.to_string(),
            }
        })?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(format.mime_type())
            .map_err(|err| {
                UploadError::Transport(ApiError::new(ApiFailure::Malformed, err.to_string()))
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(endpoint(&self.settings, "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| UploadError::Transport(map_reqwest_error(err)))?;
        let response = check_status(response).await.map_err(classify_rejection)?;
        response.json().await.map_err(|err| {
            UploadError::Transport(ApiError::new(ApiFailure::Malformed, err.to_string()))
        })
    }
}

/// A non-2xx answer is the service refusing the document; everything else is
/// a transport problem.
fn classify_rejection(error: ApiError) -> UploadError {
    match error.kind {
        ApiFailure::HttpStatus(_) => UploadError::Rejected(error.message),
        _ => UploadError::Transport(error),
    }
}
