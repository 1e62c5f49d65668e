//! Drives the update loop: feeds messages through the pure core, hands
//! the resulting effects to the engine, and renders on every dirty pass.

use std::sync::mpsc;
use std::time::Duration;

use anyhow::bail;
use client_logging::client_info;
use docproc_core::{update, AppState, ArtifactKind, Msg, PendingFile, SessionState};

use crate::effects::{EffectRunner, LoadedFile};
use crate::render;
use docproc_client::EngineConfig;

const RECV_TICK: Duration = Duration::from_millis(250);

pub fn run(
    backend_url: &str,
    config: EngineConfig,
    staged: Vec<LoadedFile>,
    no_download: bool,
) -> anyhow::Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel();
    let runner = EffectRunner::new(config, staged.clone(), msg_tx)?;

    let mut state = AppState::new(backend_url);

    let selected = staged
        .iter()
        .map(|file| PendingFile {
            filename: file.filename.clone(),
            title: file.title.clone(),
            section: file.section.clone(),
        })
        .collect();
    state = dispatch(state, Msg::FilesSelected(selected), &runner);
    if state.view().total_files == 0 {
        bail!("no supported documents to upload (.pdf, .docx, .txt)");
    }
    state = dispatch(state, Msg::SubmitClicked, &runner);
    if state.session() == SessionState::Idle {
        bail!("upload was not started");
    }

    let mut downloads_requested = false;
    let mut downloads_expected = 0usize;
    let mut downloads_finished = 0usize;

    loop {
        match msg_rx.recv_timeout(RECV_TICK) {
            Ok(msg) => {
                if matches!(msg, Msg::DownloadFinished { .. }) {
                    downloads_finished += 1;
                }
                state = dispatch(state, msg, &runner);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                bail!("engine stopped unexpectedly");
            }
        }

        match state.session() {
            SessionState::Failed => {
                let reason = state
                    .view()
                    .last_error
                    .unwrap_or_else(|| "job failed".to_string());
                bail!("{reason}");
            }
            SessionState::Idle => {
                // Only an upload failure sends an active session back here.
                let reason = state
                    .view()
                    .last_error
                    .unwrap_or_else(|| "upload failed".to_string());
                bail!("upload failed: {reason}");
            }
            SessionState::Completed => {
                if no_download {
                    report(&state);
                    return Ok(());
                }
                if !downloads_requested {
                    downloads_requested = true;
                    let ids: Vec<_> = state.links().keys().cloned().collect();
                    downloads_expected = ids.len() * 2;
                    client_info!("fetching {} artifact(s)", downloads_expected);
                    for file_id in ids {
                        for kind in [ArtifactKind::Plain, ArtifactKind::Summary] {
                            state = dispatch(
                                state,
                                Msg::DownloadClicked {
                                    file_id: file_id.clone(),
                                    kind,
                                },
                                &runner,
                            );
                        }
                    }
                }
                if downloads_finished >= downloads_expected {
                    report(&state);
                    return Ok(());
                }
            }
            SessionState::Uploading | SessionState::Polling => {}
        }
    }
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (mut state, effects) = update(state, msg);
    runner.run(effects);
    if state.consume_dirty() {
        render::print_view(&state.view());
    }
    state
}

fn report(state: &AppState) {
    let view = state.view();
    println!(
        "Done: {}/{} file(s) processed.",
        view.completed_files, view.total_files
    );
    for path in &view.completed_downloads {
        println!("  saved {path}");
    }
    if let Some(error) = &view.last_error {
        println!("  with errors: {error}");
    }
}
