use std::sync::mpsc;
use std::thread;

use client_logging::{client_info, client_warn};
use docproc_core::{Effect, Msg};

use docproc_client::{ClientEvent, EngineConfig, EngineHandle, UploadFile};

/// A document read from disk and staged for upload.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
    pub section: Option<String>,
}

/// Executes core effects against the engine and feeds engine events back
/// into the update loop as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    staged: Vec<LoadedFile>,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(
        config: EngineConfig,
        staged: Vec<LoadedFile>,
        msg_tx: mpsc::Sender<Msg>,
    ) -> anyhow::Result<Self> {
        let (engine, event_rx) = EngineHandle::new(config)?;
        spawn_event_loop(event_rx, msg_tx.clone());
        Ok(Self {
            engine,
            staged,
            msg_tx,
        })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Upload { files } => {
                    client_info!("uploading {} file(s) in one batch", files.len());
                    match self.collect_uploads(&files) {
                        Ok(uploads) => self.engine.upload(uploads),
                        Err(reason) => {
                            client_warn!("upload aborted: {}", reason);
                            let _ = self.msg_tx.send(Msg::UploadFailed { reason });
                        }
                    }
                }
                Effect::StartPolling { job_id } => {
                    client_info!("starting status polls for job {}", job_id);
                    self.engine.start_polling(job_id);
                }
                Effect::StopPolling => {
                    self.engine.stop_polling();
                }
                Effect::Download { file_id, kind } => {
                    self.engine.download(file_id, map_kind_out(kind));
                }
            }
        }
    }

    /// Match the effect's file list back to staged bytes, consuming each
    /// staged entry once so duplicate filenames pair up positionally.
    fn collect_uploads(
        &self,
        files: &[docproc_core::PendingFile],
    ) -> Result<Vec<UploadFile>, String> {
        let mut used = vec![false; self.staged.len()];
        let mut uploads = Vec::with_capacity(files.len());
        for file in files {
            let Some(index) = (0..self.staged.len())
                .find(|&i| !used[i] && self.staged[i].filename == file.filename)
            else {
                return Err(format!("no staged bytes for {}", file.filename));
            };
            used[index] = true;
            let loaded = &self.staged[index];
            uploads.push(UploadFile {
                filename: loaded.filename.clone(),
                bytes: loaded.bytes.clone(),
                title: file.title.clone(),
                section: file.section.clone(),
            });
        }
        Ok(uploads)
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<ClientEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let msg = match event {
                ClientEvent::UploadFinished { result } => match result {
                    Ok(accepted) => Msg::UploadSucceeded {
                        job_id: accepted.job_id,
                    },
                    Err(err) => Msg::UploadFailed {
                        reason: err.to_string(),
                    },
                },
                ClientEvent::SnapshotReceived { job_id, snapshot } => Msg::SnapshotReceived {
                    job_id,
                    snapshot: map_snapshot(snapshot),
                },
                ClientEvent::PollFailed { job_id, reason } => {
                    client_warn!("polling for job {} failed: {}", job_id, reason);
                    Msg::PollFailed { job_id, reason }
                }
                ClientEvent::DownloadFinished {
                    file_id,
                    kind,
                    result,
                } => Msg::DownloadFinished {
                    file_id,
                    kind: map_kind_in(kind),
                    result: result.map(|path| path.display().to_string()),
                },
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

fn map_snapshot(snapshot: docproc_client::StatusSnapshot) -> docproc_core::StatusSnapshot {
    docproc_core::StatusSnapshot {
        status: map_phase(snapshot.status),
        files: snapshot.files.into_iter().map(map_entry).collect(),
        total_files: snapshot.total_files,
        completed_files: snapshot.completed_files,
        started_at: snapshot.started_at,
        completed_at: snapshot.completed_at,
        error: snapshot.error,
    }
}

fn map_entry(entry: docproc_client::FileEntry) -> docproc_core::FileEntry {
    docproc_core::FileEntry {
        filename: entry.filename,
        status: map_file_status(entry.status),
        error: entry.error,
        file_id: entry.file_id,
    }
}

fn map_phase(phase: docproc_client::JobPhase) -> docproc_core::JobPhase {
    match phase {
        docproc_client::JobPhase::Queued => docproc_core::JobPhase::Queued,
        docproc_client::JobPhase::Processing => docproc_core::JobPhase::Processing,
        docproc_client::JobPhase::Completed => docproc_core::JobPhase::Completed,
        docproc_client::JobPhase::Failed => docproc_core::JobPhase::Failed,
    }
}

fn map_file_status(status: docproc_client::FileStatus) -> docproc_core::FileStatus {
    match status {
        docproc_client::FileStatus::Queued => docproc_core::FileStatus::Queued,
        docproc_client::FileStatus::Processing => docproc_core::FileStatus::Processing,
        docproc_client::FileStatus::Completed => docproc_core::FileStatus::Completed,
        docproc_client::FileStatus::Error => docproc_core::FileStatus::Error,
    }
}

fn map_kind_out(kind: docproc_core::ArtifactKind) -> docproc_client::ArtifactKind {
    match kind {
        docproc_core::ArtifactKind::Plain => docproc_client::ArtifactKind::Plain,
        docproc_core::ArtifactKind::Summary => docproc_client::ArtifactKind::Summary,
    }
}

fn map_kind_in(kind: docproc_client::ArtifactKind) -> docproc_core::ArtifactKind {
    match kind {
        docproc_client::ArtifactKind::Plain => docproc_core::ArtifactKind::Plain,
        docproc_client::ArtifactKind::Summary => docproc_core::ArtifactKind::Summary,
    }
}
