//! Docproc client: HTTP engine for the document-processing backend.
//!
//! Owns the upload, status-poll and download calls plus the cancellable
//! polling loop. The app shell talks to it through [`EngineHandle`] and
//! receives [`ClientEvent`]s on a channel.
mod api;
mod engine;
mod filename;
mod persist;
mod poll;
mod types;

pub use api::{ApiSettings, DocumentApi, HttpDocumentApi, UploadFile};
pub use engine::{EngineConfig, EngineHandle};
pub use filename::artifact_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use poll::{run_poll_loop, ChannelEventSink, EventSink};
pub use types::{
    ApiError, ArtifactKind, ClientEvent, DownloadedArtifact, FailureKind, FileEntry, FileStatus,
    JobPhase, StatusSnapshot, UploadAccepted,
};
