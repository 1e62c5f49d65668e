use docproc_core::{
    update, AppState, FileEntry, FileStatus, JobPhase, Msg, PendingFile, StatusSnapshot,
};

fn entry(name: &str, status: FileStatus, file_id: Option<&str>) -> FileEntry {
    FileEntry {
        filename: name.to_string(),
        status,
        error: None,
        file_id: file_id.map(ToOwned::to_owned),
    }
}

fn snapshot(status: JobPhase, files: Vec<FileEntry>, completed: usize) -> StatusSnapshot {
    let total = files.len();
    StatusSnapshot {
        status,
        files,
        total_files: total,
        completed_files: completed,
        started_at: "2026-08-29T10:00:00Z".to_string(),
        completed_at: None,
        error: None,
    }
}

fn polling_state(names: &[&str]) -> AppState {
    let state = AppState::new("http://localhost:8000");
    let files = names
        .iter()
        .map(|n| PendingFile {
            filename: n.to_string(),
            title: None,
            section: None,
        })
        .collect();
    let (state, _) = update(state, Msg::FilesSelected(files));
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::UploadSucceeded {
            job_id: "J1".to_string(),
        },
    );
    state
}

fn receive(state: AppState, snapshot: StatusSnapshot) -> AppState {
    let (state, _effects) = update(
        state,
        Msg::SnapshotReceived {
            job_id: "J1".to_string(),
            snapshot,
        },
    );
    state
}

#[test]
fn snapshot_replaces_wholesale() {
    let state = polling_state(&["a.pdf", "b.pdf"]);

    let state = receive(
        state,
        snapshot(
            JobPhase::Processing,
            vec![
                entry("a.pdf", FileStatus::Processing, None),
                entry("b.pdf", FileStatus::Queued, None),
            ],
            0,
        ),
    );
    let state = receive(
        state,
        snapshot(
            JobPhase::Processing,
            vec![
                entry("a.pdf", FileStatus::Queued, None),
                entry("b.pdf", FileStatus::Processing, None),
            ],
            0,
        ),
    );

    // Non-terminal statuses track the backend exactly, even when they move
    // backward; only terminal statuses are pinned.
    let view = state.view();
    assert_eq!(view.files[0].status, FileStatus::Queued);
    assert_eq!(view.files[1].status, FileStatus::Processing);
}

#[test]
fn terminal_file_status_is_never_regressed() {
    let state = polling_state(&["a.pdf", "b.pdf"]);

    let state = receive(
        state,
        snapshot(
            JobPhase::Processing,
            vec![
                entry("a.pdf", FileStatus::Completed, Some("F1")),
                entry("b.pdf", FileStatus::Processing, None),
            ],
            1,
        ),
    );
    // Backend misreports the completed file as processing again.
    let state = receive(
        state,
        snapshot(
            JobPhase::Processing,
            vec![
                entry("a.pdf", FileStatus::Processing, None),
                entry("b.pdf", FileStatus::Processing, None),
            ],
            0,
        ),
    );

    let view = state.view();
    assert_eq!(view.files[0].status, FileStatus::Completed);
    assert_eq!(view.files[0].file_id.as_deref(), Some("F1"));
    assert_eq!(view.files[1].status, FileStatus::Processing);
}

#[test]
fn links_appear_once_completed_and_are_never_removed() {
    let state = polling_state(&["a.pdf", "b.pdf"]);

    let state = receive(
        state,
        snapshot(
            JobPhase::Processing,
            vec![
                entry("a.pdf", FileStatus::Completed, Some("F1")),
                entry("b.pdf", FileStatus::Processing, None),
            ],
            1,
        ),
    );
    assert_eq!(state.links().len(), 1);

    // A second completion of the same file does not duplicate or rewrite.
    let before = state.links()["F1"].clone();
    let state = receive(
        state,
        snapshot(
            JobPhase::Completed,
            vec![
                entry("a.pdf", FileStatus::Completed, Some("F1")),
                entry("b.pdf", FileStatus::Completed, Some("F2")),
            ],
            2,
        ),
    );
    assert_eq!(state.links().len(), 2);
    assert_eq!(state.links()["F1"], before);
}

#[test]
fn completed_without_file_id_derives_no_link() {
    let state = polling_state(&["a.pdf"]);

    let state = receive(
        state,
        snapshot(
            JobPhase::Completed,
            vec![entry("a.pdf", FileStatus::Completed, None)],
            1,
        ),
    );

    assert!(state.links().is_empty());
    assert!(state.view().files[0].links.is_none());
}

#[test]
fn duplicate_filenames_are_tracked_positionally() {
    let state = polling_state(&["a.pdf", "a.pdf"]);

    let state = receive(
        state,
        snapshot(
            JobPhase::Completed,
            vec![
                entry("a.pdf", FileStatus::Completed, Some("F1")),
                entry("a.pdf", FileStatus::Completed, Some("F2")),
            ],
            2,
        ),
    );

    let view = state.view();
    assert_eq!(view.files.len(), 2);
    assert_eq!(view.files[0].file_id.as_deref(), Some("F1"));
    assert_eq!(view.files[1].file_id.as_deref(), Some("F2"));
    assert_eq!(state.links().len(), 2);
}

#[test]
fn trailing_slash_on_base_url_is_normalized() {
    let state = AppState::new("http://localhost:8000/");
    let files = vec![PendingFile {
        filename: "a.pdf".to_string(),
        title: None,
        section: None,
    }];
    let (state, _) = update(state, Msg::FilesSelected(files));
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::UploadSucceeded {
            job_id: "J1".to_string(),
        },
    );
    let state = receive(
        state,
        snapshot(
            JobPhase::Completed,
            vec![entry("a.pdf", FileStatus::Completed, Some("F1"))],
            1,
        ),
    );

    assert_eq!(
        state.links()["F1"].plain_english,
        "http://localhost:8000/download/F1/plain"
    );
}
