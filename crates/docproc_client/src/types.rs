use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Overall job phase on the wire (lowercase strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Failed)
    }
}

/// Per-file status on the wire (lowercase strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub filename: String,
    pub status: FileStatus,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
}

/// The `GET /status/{job_id}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: JobPhase,
    pub files: Vec<FileEntry>,
    pub total_files: usize,
    pub completed_files: usize,
    pub started_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The `POST /upload` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAccepted {
    pub job_id: String,
}

/// The two artifacts derivable per processed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Plain,
    Summary,
}

impl ArtifactKind {
    /// Path segment used by the download endpoint.
    pub fn path_segment(self) -> &'static str {
        match self {
            ArtifactKind::Plain => "plain",
            ArtifactKind::Summary => "summary",
        }
    }
}

/// A downloaded artifact body plus the filename the backend suggested
/// (or the generated default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidBaseUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidBaseUrl => write!(f, "invalid base url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Events emitted by the engine toward the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    UploadFinished {
        result: Result<UploadAccepted, ApiError>,
    },
    SnapshotReceived {
        job_id: String,
        snapshot: StatusSnapshot,
    },
    /// The poll loop gave up after its bounded retries.
    PollFailed { job_id: String, reason: String },
    DownloadFinished {
        file_id: String,
        kind: ArtifactKind,
        result: Result<PathBuf, String>,
    },
}
