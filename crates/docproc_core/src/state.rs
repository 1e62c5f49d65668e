use std::collections::BTreeMap;

use crate::view_model::{AppViewModel, FileRowView};

/// Opaque job identifier issued by the backend on upload.
pub type JobId = String;
/// Opaque per-file identifier, assigned once processing has produced an artifact.
pub type FileId = String;

/// File extensions accepted for upload (lowercase, without the dot).
const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

/// Returns true if `filename` carries an accepted extension (case-insensitive).
pub fn supported_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(stem, ext)| !stem.is_empty() && ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Per-file processing status as last reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl FileStatus {
    /// `Completed` and `Error` are terminal; no later snapshot may undo them.
    pub fn is_terminal(self) -> bool {
        matches!(self, FileStatus::Completed | FileStatus::Error)
    }
}

/// Overall job phase as last reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

/// One entry in a status snapshot. Entries are positional; filenames are
/// not a dedup key (two same-named uploads yield two entries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub filename: String,
    pub status: FileStatus,
    pub error: Option<String>,
    pub file_id: Option<FileId>,
}

/// Aggregate job status returned by each poll. Replaces the previous
/// snapshot wholesale; the backend is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: JobPhase,
    pub files: Vec<FileEntry>,
    pub total_files: usize,
    pub completed_files: usize,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub error: Option<String>,
}

/// The two derived artifacts produced per processed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Plain-English rewrite.
    Plain,
    /// Bullet-point summary.
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

/// Download URLs for a completed file, derived from the backend base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLinks {
    pub plain_english: String,
    pub summary: String,
}

/// A file staged for upload, with optional per-file metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub filename: String,
    pub title: Option<String>,
    pub section: Option<String>,
}

/// Lifecycle of the (single) tracked job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Uploading,
    Polling,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// Backend base URL used to derive download links.
    download_base: String,
    session: SessionState,
    pending: Vec<PendingFile>,
    skipped_at_intake: usize,
    active_job: Option<JobId>,
    snapshot: Option<StatusSnapshot>,
    /// Append-only within a session; BTreeMap for deterministic iteration.
    links: BTreeMap<FileId, ArtifactLinks>,
    completed_downloads: Vec<String>,
    last_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new(download_base: impl Into<String>) -> Self {
        let mut base = download_base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            download_base: base,
            session: SessionState::Idle,
            pending: Vec::new(),
            skipped_at_intake: 0,
            active_job: None,
            snapshot: None,
            links: BTreeMap::new(),
            completed_downloads: Vec::new(),
            last_error: None,
            dirty: false,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn active_job(&self) -> Option<&JobId> {
        self.active_job.as_ref()
    }

    pub fn links(&self) -> &BTreeMap<FileId, ArtifactLinks> {
        &self.links
    }

    /// Returns the dirty flag and clears it. The shell renders only when
    /// this returns true, coalescing bursts of messages into one render.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let files: Vec<FileRowView> = match &self.snapshot {
            Some(snapshot) => snapshot
                .files
                .iter()
                .map(|entry| FileRowView {
                    filename: entry.filename.clone(),
                    status: entry.status,
                    error: entry.error.clone(),
                    file_id: entry.file_id.clone(),
                    links: entry
                        .file_id
                        .as_ref()
                        .and_then(|id| self.links.get(id).cloned()),
                })
                .collect(),
            // Before the first poll answer, show the staged files as queued.
            None => self
                .pending
                .iter()
                .map(|file| FileRowView {
                    filename: file.filename.clone(),
                    status: FileStatus::Queued,
                    error: None,
                    file_id: None,
                    links: None,
                })
                .collect(),
        };

        let (total_files, completed_files) = match &self.snapshot {
            Some(snapshot) => (snapshot.total_files, snapshot.completed_files),
            None => (self.pending.len(), 0),
        };

        AppViewModel {
            session: self.session,
            job_id: self.active_job.clone(),
            files,
            total_files,
            completed_files,
            skipped_at_intake: self.skipped_at_intake,
            started_at: self.snapshot.as_ref().map(|s| s.started_at.clone()),
            completed_at: self
                .snapshot
                .as_ref()
                .and_then(|s| s.completed_at.clone()),
            completed_downloads: self.completed_downloads.clone(),
            last_error: self.last_error.clone(),
            dirty: self.dirty,
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_pending(&mut self, files: Vec<PendingFile>, skipped: usize) {
        self.pending = files;
        self.skipped_at_intake = skipped;
        self.mark_dirty();
    }

    pub(crate) fn pending(&self) -> &[PendingFile] {
        &self.pending
    }

    pub(crate) fn begin_upload(&mut self) {
        self.session = SessionState::Uploading;
        self.last_error = None;
        self.mark_dirty();
    }

    pub(crate) fn upload_failed(&mut self, reason: String) {
        self.session = SessionState::Idle;
        self.last_error = Some(reason);
        self.mark_dirty();
    }

    pub(crate) fn begin_polling(&mut self, job_id: JobId) {
        self.session = SessionState::Polling;
        self.active_job = Some(job_id);
        self.mark_dirty();
    }

    /// Replace the current snapshot with a fresh one from the backend.
    ///
    /// A per-file monotonic guard keeps any locally-terminal entry if the
    /// incoming snapshot would move it back to a non-terminal status.
    /// Every entry observed `Completed` with a `file_id` gets download
    /// links derived; the link map is append-only. Returns true when the
    /// snapshot's overall phase is terminal.
    pub(crate) fn apply_snapshot(&mut self, mut snapshot: StatusSnapshot) -> bool {
        if let Some(previous) = &self.snapshot {
            for (index, entry) in snapshot.files.iter_mut().enumerate() {
                let Some(old) = previous.files.get(index) else {
                    continue;
                };
                if old.status.is_terminal() && !entry.status.is_terminal() {
                    *entry = old.clone();
                }
            }
        }

        for entry in &snapshot.files {
            if entry.status != FileStatus::Completed {
                continue;
            }
            let Some(file_id) = &entry.file_id else {
                continue;
            };
            if !self.links.contains_key(file_id) {
                let links = self.derive_links(file_id);
                self.links.insert(file_id.clone(), links);
            }
        }

        let terminal = snapshot.status.is_terminal();
        if terminal {
            self.session = match snapshot.status {
                JobPhase::Failed => SessionState::Failed,
                _ => SessionState::Completed,
            };
            if let Some(error) = &snapshot.error {
                self.last_error = Some(error.clone());
            }
        }
        self.snapshot = Some(snapshot);
        self.mark_dirty();
        terminal
    }

    pub(crate) fn fail_job(&mut self, reason: String) {
        self.session = SessionState::Failed;
        self.last_error = Some(reason);
        self.mark_dirty();
    }

    pub(crate) fn record_download(&mut self, saved_path: String) {
        self.completed_downloads.push(saved_path);
        self.mark_dirty();
    }

    pub(crate) fn download_failed(&mut self, reason: String) {
        self.last_error = Some(reason);
        self.mark_dirty();
    }

    pub(crate) fn reset(&mut self) {
        self.session = SessionState::Idle;
        self.pending.clear();
        self.skipped_at_intake = 0;
        self.active_job = None;
        self.snapshot = None;
        self.links.clear();
        self.completed_downloads.clear();
        self.last_error = None;
        self.mark_dirty();
    }

    fn derive_links(&self, file_id: &FileId) -> ArtifactLinks {
        ArtifactLinks {
            plain_english: format!(
                "{}/download/{}/{}",
                self.download_base,
                file_id,
                ArtifactKind::Plain.path_segment()
            ),
            summary: format!(
                "{}/download/{}/{}",
                self.download_base,
                file_id,
                ArtifactKind::Summary.path_segment()
            ),
        }
    }
}
