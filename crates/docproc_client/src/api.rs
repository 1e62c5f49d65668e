use std::time::Duration;

use client_logging::client_warn;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};

use crate::filename::artifact_filename;
use crate::types::{
    ApiError, ArtifactKind, DownloadedArtifact, FailureKind, StatusSnapshot, UploadAccepted,
};

/// Tunables for the HTTP client and poll loop.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Consecutive transient poll failures tolerated before giving up.
    pub max_poll_failures: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(2),
            max_poll_failures: 3,
        }
    }
}

/// A file staged for upload: name, body, optional metadata fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
    pub section: Option<String>,
}

/// The backend HTTP contract, as a seam for the poll loop and tests.
#[async_trait::async_trait]
pub trait DocumentApi: Send + Sync {
    /// One multipart POST carrying every staged file.
    async fn upload(&self, files: &[UploadFile]) -> Result<UploadAccepted, ApiError>;
    /// One status snapshot for the job.
    async fn status(&self, job_id: &str) -> Result<StatusSnapshot, ApiError>;
    /// One artifact body for a processed file.
    async fn download(
        &self,
        file_id: &str,
        kind: ArtifactKind,
    ) -> Result<DownloadedArtifact, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpDocumentApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDocumentApi {
    pub fn new(base_url: &str, settings: &ApiSettings) -> Result<Self, ApiError> {
        // Probe the base URL once up front so a typo fails fast, not on
        // the first poll tick.
        reqwest::Url::parse(base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidBaseUrl, err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_form(files: &[UploadFile]) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.filename.clone())
                .mime_str(mime_for(&file.filename))
                .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
            form = form.part("files", part);
        }
        // Metadata rides along as repeated text fields, in file order.
        for file in files {
            if let Some(title) = &file.title {
                form = form.text("titles", title.clone());
            }
        }
        for file in files {
            if let Some(section) = &file.section {
                form = form.text("sections", section.clone());
            }
        }
        Ok(form)
    }
}

#[async_trait::async_trait]
impl DocumentApi for HttpDocumentApi {
    async fn upload(&self, files: &[UploadFile]) -> Result<UploadAccepted, ApiError> {
        let form = Self::build_form(files)?;
        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        response
            .json::<UploadAccepted>()
            .await
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }

    async fn status(&self, job_id: &str) -> Result<StatusSnapshot, ApiError> {
        let response = self
            .client
            .get(format!("{}/status/{}", self.base_url, job_id))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let snapshot = response
            .json::<StatusSnapshot>()
            .await
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;

        if snapshot.completed_files > snapshot.total_files {
            client_warn!(
                "status for job {} violates completed<=total ({} > {})",
                job_id,
                snapshot.completed_files,
                snapshot.total_files
            );
        }
        Ok(snapshot)
    }

    async fn download(
        &self,
        file_id: &str,
        kind: ArtifactKind,
    ) -> Result<DownloadedArtifact, ApiError> {
        let response = self
            .client
            .get(format!(
                "{}/download/{}/{}",
                self.base_url,
                file_id,
                kind.path_segment()
            ))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let filename = artifact_filename(disposition.as_deref(), kind);

        let bytes = response
            .bytes()
            .await
            .map_err(map_reqwest_error)?
            .to_vec();

        Ok(DownloadedArtifact { filename, bytes })
    }
}

fn mime_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_decode() {
        FailureKind::Decode
    } else {
        FailureKind::Network
    };
    ApiError::new(kind, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::mime_for;

    #[test]
    fn mime_follows_extension_case_insensitively() {
        assert_eq!(mime_for("a.PDF"), "application/pdf");
        assert_eq!(mime_for("b.txt"), "text/plain");
        assert_eq!(mime_for("weird.bin"), "application/octet-stream");
        assert_eq!(mime_for("noext"), "application/octet-stream");
    }
}
