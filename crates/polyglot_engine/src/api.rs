use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiFailure, JobId, PollSnapshot};

/// Connection settings for the translation service.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct StartJobRequest<'a> {
    session_id: &'a str,
    target_language: &'a str,
}

#[derive(Debug, Deserialize)]
struct StartJobResponse {
    job_id: JobId,
}

/// The two calls the job controller depends on. Implemented over HTTP in
/// production, faked in tests.
#[async_trait::async_trait]
pub trait TranslationApi: Send + Sync {
    async fn start_job(
        &self,
        session_id: &str,
        target_language: &str,
    ) -> Result<JobId, ApiError>;

    async fn poll_job(&self, job_id: &str) -> Result<PollSnapshot, ApiError>;
}

/// reqwest-backed client for the translation service endpoints.
#[derive(Debug, Clone)]
pub struct HttpTranslationApi {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl HttpTranslationApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = build_client(&settings)?;
        Ok(Self { client, settings })
    }
}

#[async_trait::async_trait]
impl TranslationApi for HttpTranslationApi {
    async fn start_job(
        &self,
        session_id: &str,
        target_language: &str,
    ) -> Result<JobId, ApiError> {
        let response = self
            .client
            .post(endpoint(&self.settings, "translate"))
            .json(&StartJobRequest {
                session_id,
                target_language,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        let body: StartJobResponse = response
            .json()
            .await
            .map_err(|err| ApiError::new(ApiFailure::Malformed, err.to_string()))?;
        Ok(body.job_id)
    }

    async fn poll_job(&self, job_id: &str) -> Result<PollSnapshot, ApiError> {
        let response = self
            .client
            .get(endpoint(&self.settings, &format!("status/{job_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|err| ApiError::new(ApiFailure::Malformed, err.to_string()))
    }
}

pub(crate) fn build_client(settings: &ApiSettings) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|err| ApiError::new(ApiFailure::Network, err.to_string()))
}

pub(crate) fn endpoint(settings: &ApiSettings, path: &str) -> String {
    format!("{}/{}", settings.base_url.trim_end_matches('/'), path)
}

/// Reject non-2xx responses, preferring the service's `detail` message over
/// the bare status line.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = error_detail(response)
        .await
        .unwrap_or_else(|| status.to_string());
    Err(ApiError::new(ApiFailure::HttpStatus(status.as_u16()), message))
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

async fn error_detail(response: reqwest::Response) -> Option<String> {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .map(|body| body.detail)
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailure::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(ApiFailure::InvalidUrl, err.to_string());
    }
    ApiError::new(ApiFailure::Network, err.to_string())
}
