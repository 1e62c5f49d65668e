use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use client_logging::client_info;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiSettings, DocumentApi, HttpDocumentApi, UploadFile};
use crate::persist::AtomicFileWriter;
use crate::poll::{run_poll_loop, ChannelEventSink, EventSink};
use crate::types::{ApiError, ArtifactKind, ClientEvent};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub base_url: String,
    /// Directory downloaded artifacts are written into.
    pub output_dir: PathBuf,
    pub settings: ApiSettings,
}

enum EngineCommand {
    Upload { files: Vec<UploadFile> },
    StartPolling { job_id: String },
    StopPolling,
    Download { file_id: String, kind: ArtifactKind },
}

/// Handle to the engine thread. Commands go in via the handle; events
/// come back on the receiver returned by [`EngineHandle::new`].
///
/// The engine owns its own tokio runtime on a dedicated thread so the
/// app shell stays free of async concerns. Dropping every handle clone
/// shuts the thread down and cancels any live poll loop.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<(Self, mpsc::Receiver<ClientEvent>), ApiError> {
        let api = Arc::new(HttpDocumentApi::new(&config.base_url, &config.settings)?);
        let writer = Arc::new(AtomicFileWriter::new(config.output_dir.clone()));
        let settings = config.settings.clone();

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let root = CancellationToken::new();
            let mut poll_token: Option<CancellationToken> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Upload { files } => {
                        let api = api.clone();
                        let sink = ChannelEventSink::new(event_tx.clone());
                        runtime.spawn(async move {
                            let result = api.upload(&files).await;
                            sink.emit(ClientEvent::UploadFinished { result });
                        });
                    }
                    EngineCommand::StartPolling { job_id } => {
                        // One poll loop at a time: starting a new one
                        // cancels whatever loop is still live.
                        if let Some(previous) = poll_token.take() {
                            previous.cancel();
                        }
                        let token = root.child_token();
                        poll_token = Some(token.clone());

                        let api = api.clone();
                        let settings = settings.clone();
                        let sink = ChannelEventSink::new(event_tx.clone());
                        runtime.spawn(async move {
                            run_poll_loop(api.as_ref(), &job_id, &settings, &sink, token).await;
                        });
                    }
                    EngineCommand::StopPolling => {
                        if let Some(token) = poll_token.take() {
                            token.cancel();
                        }
                    }
                    EngineCommand::Download { file_id, kind } => {
                        let api = api.clone();
                        let writer = writer.clone();
                        let sink = ChannelEventSink::new(event_tx.clone());
                        runtime.spawn(async move {
                            let result = match api.download(&file_id, kind).await {
                                Ok(artifact) => writer
                                    .write(&artifact.filename, &artifact.bytes)
                                    .map_err(|err| err.to_string()),
                                Err(err) => Err(err.to_string()),
                            };
                            sink.emit(ClientEvent::DownloadFinished {
                                file_id,
                                kind,
                                result,
                            });
                        });
                    }
                }
            }

            // Command channel closed: every handle is gone. Cancel any
            // live loop before the runtime is torn down.
            root.cancel();
            client_info!("engine thread shutting down");
        });

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn upload(&self, files: Vec<UploadFile>) {
        let _ = self.cmd_tx.send(EngineCommand::Upload { files });
    }

    pub fn start_polling(&self, job_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling {
            job_id: job_id.into(),
        });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling);
    }

    pub fn download(&self, file_id: impl Into<String>, kind: ArtifactKind) {
        let _ = self.cmd_tx.send(EngineCommand::Download {
            file_id: file_id.into(),
            kind,
        });
    }
}
