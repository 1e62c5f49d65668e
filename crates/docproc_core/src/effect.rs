#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit one multipart upload carrying all staged files.
    Upload { files: Vec<crate::PendingFile> },
    /// Start the status poll loop for the given job.
    StartPolling { job_id: crate::JobId },
    /// Cancel the live poll loop, if any.
    StopPolling,
    /// Fetch one artifact of a completed file.
    Download {
        file_id: crate::FileId,
        kind: crate::ArtifactKind,
    },
}
