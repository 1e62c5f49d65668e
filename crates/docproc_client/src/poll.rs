use client_logging::{client_debug, client_warn};
use tokio_util::sync::CancellationToken;

use crate::api::{ApiSettings, DocumentApi};
use crate::types::ClientEvent;

/// Sink for events produced by the engine side.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

/// Forwards events into a std mpsc channel for the app shell to drain.
pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// Poll `GET /status/{job_id}` until the job reaches a terminal phase.
///
/// The first tick fires immediately, then once per `poll_interval`. A
/// transient failure is retried on the next tick; `max_poll_failures`
/// consecutive failures end the loop with a fatal [`ClientEvent::PollFailed`]
/// (never silently abandoned). The counter resets on any success. Every
/// await point honors `cancel`, so stopping the loop leaves no timer
/// behind.
pub async fn run_poll_loop(
    api: &dyn DocumentApi,
    job_id: &str,
    settings: &ApiSettings,
    sink: &dyn EventSink,
    cancel: CancellationToken,
) {
    let mut consecutive_failures: u32 = 0;

    loop {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = api.status(job_id) => result,
        };

        match result {
            Ok(snapshot) => {
                consecutive_failures = 0;
                let terminal = snapshot.status.is_terminal();
                sink.emit(ClientEvent::SnapshotReceived {
                    job_id: job_id.to_string(),
                    snapshot,
                });
                if terminal {
                    client_debug!("job {} reached a terminal phase, poll loop done", job_id);
                    return;
                }
            }
            Err(err) => {
                consecutive_failures += 1;
                client_warn!(
                    "status poll for job {} failed ({}/{}): {}",
                    job_id,
                    consecutive_failures,
                    settings.max_poll_failures,
                    err
                );
                if consecutive_failures >= settings.max_poll_failures {
                    sink.emit(ClientEvent::PollFailed {
                        job_id: job_id.to_string(),
                        reason: format!(
                            "{} consecutive poll failures, last: {}",
                            consecutive_failures, err
                        ),
                    });
                    return;
                }
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(settings.poll_interval) => {}
        }
    }
}
