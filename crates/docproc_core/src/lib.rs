//! Docproc core: pure job-lifecycle state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    supported_extension, AppState, ArtifactKind, ArtifactLinks, FileEntry, FileId, FileStatus,
    JobId, JobPhase, PendingFile, SessionState, StatusSnapshot,
};
pub use update::update;
pub use view_model::{AppViewModel, FileRowView};
