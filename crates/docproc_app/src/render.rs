//! Terminal rendering of the controller view model.

use chrono::DateTime;
use docproc_core::{AppViewModel, FileStatus, SessionState};

pub fn print_view(view: &AppViewModel) {
    println!("{}", status_line(view));
    for line in file_lines(view) {
        println!("{line}");
    }
    if let Some(error) = &view.last_error {
        println!("  ! {error}");
    }
}

pub fn status_line(view: &AppViewModel) -> String {
    let session_label = match view.session {
        SessionState::Idle => "Idle",
        SessionState::Uploading => "Uploading",
        SessionState::Polling => "Processing",
        SessionState::Completed => "Completed",
        SessionState::Failed => "Failed",
    };

    let mut line = match &view.job_id {
        Some(job_id) => format!(
            "[{}] job {} | {}/{} files done",
            session_label, job_id, view.completed_files, view.total_files
        ),
        None => format!(
            "[{}] {}/{} files done",
            session_label, view.completed_files, view.total_files
        ),
    };
    if view.skipped_at_intake > 0 {
        line.push_str(&format!(
            " | {} skipped (unsupported type)",
            view.skipped_at_intake
        ));
    }
    if let Some(elapsed) = elapsed_secs(view) {
        line.push_str(&format!(" | {elapsed}s elapsed"));
    }
    line
}

pub fn file_lines(view: &AppViewModel) -> Vec<String> {
    view.files
        .iter()
        .map(|row| {
            let marker = match row.status {
                FileStatus::Queued => "queued    ",
                FileStatus::Processing => "processing",
                FileStatus::Completed => "completed ",
                FileStatus::Error => "error     ",
            };
            let mut line = format!("  {marker} {}", row.filename);
            if let Some(file_id) = &row.file_id {
                line.push_str(&format!(" ({file_id})"));
            }
            if let Some(error) = &row.error {
                line.push_str(&format!(": {error}"));
            }
            line
        })
        .collect()
}

/// Seconds between the backend's started/completed stamps, or from
/// start until now while the job is still running.
fn elapsed_secs(view: &AppViewModel) -> Option<i64> {
    let started = DateTime::parse_from_rfc3339(view.started_at.as_deref()?).ok()?;
    let end = match view.completed_at.as_deref() {
        Some(stamp) => DateTime::parse_from_rfc3339(stamp).ok()?.with_timezone(&chrono::Utc),
        None => chrono::Utc::now(),
    };
    let secs = (end - started.with_timezone(&chrono::Utc)).num_seconds();
    (secs >= 0).then_some(secs)
}
