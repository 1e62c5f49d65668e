use crate::state::supported_extension;
use crate::{AppState, Effect, Msg, PendingFile, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(files) => {
            // Intake is frozen while a job is in flight.
            if !matches!(state.session(), SessionState::Idle) {
                return (state, Vec::new());
            }
            let (kept, skipped) = partition_supported(files);
            state.set_pending(kept, skipped);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // One job at a time: submission is rejected unless idle.
            if state.session() != SessionState::Idle || state.pending().is_empty() {
                return (state, Vec::new());
            }
            let files = state.pending().to_vec();
            state.begin_upload();
            vec![Effect::Upload { files }]
        }
        Msg::UploadSucceeded { job_id } => {
            if state.session() != SessionState::Uploading {
                return (state, Vec::new());
            }
            state.begin_polling(job_id.clone());
            vec![Effect::StartPolling { job_id }]
        }
        Msg::UploadFailed { reason } => {
            if state.session() != SessionState::Uploading {
                return (state, Vec::new());
            }
            state.upload_failed(reason);
            Vec::new()
        }
        Msg::SnapshotReceived { job_id, snapshot } => {
            // Stale-job guard: only the live loop's snapshots are applied,
            // and nothing is applied past the first terminal snapshot.
            if state.session() != SessionState::Polling
                || state.active_job() != Some(&job_id)
            {
                return (state, Vec::new());
            }
            if state.apply_snapshot(snapshot) {
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::PollFailed { job_id, reason } => {
            if state.session() != SessionState::Polling
                || state.active_job() != Some(&job_id)
            {
                return (state, Vec::new());
            }
            state.fail_job(reason);
            vec![Effect::StopPolling]
        }
        Msg::DownloadClicked { file_id, kind } => {
            if !state.links().contains_key(&file_id) {
                return (state, Vec::new());
            }
            vec![Effect::Download { file_id, kind }]
        }
        Msg::DownloadFinished {
            file_id,
            kind,
            result,
        } => {
            match result {
                Ok(saved_path) => state.record_download(saved_path),
                Err(reason) => state.download_failed(format!(
                    "download of {} artifact for {} failed: {}",
                    kind.path_segment(),
                    file_id,
                    reason
                )),
            }
            Vec::new()
        }
        Msg::ResetClicked => {
            let was_polling = state.session() == SessionState::Polling;
            state.reset();
            if was_polling {
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn partition_supported(files: Vec<PendingFile>) -> (Vec<PendingFile>, usize) {
    let total = files.len();
    let kept: Vec<PendingFile> = files
        .into_iter()
        .filter(|file| supported_extension(&file.filename))
        .collect();
    let skipped = total - kept.len();
    (kept, skipped)
}
