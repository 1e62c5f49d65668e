#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked files for upload; replaces the staged intake list.
    FilesSelected(Vec<crate::PendingFile>),
    /// User submitted the staged files for processing.
    SubmitClicked,
    /// Engine finished the upload request and the backend issued a job id.
    UploadSucceeded { job_id: crate::JobId },
    /// Engine upload failed (network error or non-2xx); no job exists.
    UploadFailed { reason: String },
    /// Engine delivered a fresh status snapshot for a job.
    SnapshotReceived {
        job_id: crate::JobId,
        snapshot: crate::StatusSnapshot,
    },
    /// Engine gave up polling after its bounded retries were exhausted.
    PollFailed {
        job_id: crate::JobId,
        reason: String,
    },
    /// User requested one artifact of a completed file.
    DownloadClicked {
        file_id: crate::FileId,
        kind: crate::ArtifactKind,
    },
    /// Engine finished a download attempt; `Ok` carries the saved path.
    DownloadFinished {
        file_id: crate::FileId,
        kind: crate::ArtifactKind,
        result: Result<String, String>,
    },
    /// User discarded the current job and staged files.
    ResetClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
