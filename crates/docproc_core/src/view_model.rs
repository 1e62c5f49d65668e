use crate::{ArtifactLinks, FileId, FileStatus, JobId, SessionState};

/// Render-ready snapshot of the controller state. The view layer reads
/// this and never mutates controller state directly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub job_id: Option<JobId>,
    pub files: Vec<FileRowView>,
    pub total_files: usize,
    pub completed_files: usize,
    /// Files dropped at intake for an unsupported extension.
    pub skipped_at_intake: usize,
    /// Backend-reported timestamps, passed through verbatim.
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    /// Paths of artifacts saved to disk this session.
    pub completed_downloads: Vec<String>,
    pub last_error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub filename: String,
    pub status: FileStatus,
    pub error: Option<String>,
    pub file_id: Option<FileId>,
    pub links: Option<ArtifactLinks>,
}
