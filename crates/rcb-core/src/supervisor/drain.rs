use futures::StreamExt;
use tracing::{debug, error, info, warn};

use crate::{LineFramer, LineSink, runtime::ContainerRuntime};

use super::{BackupSupervisor, WorkerHandle};

impl<R: ContainerRuntime> BackupSupervisor<R> {
    /// Drain the worker's output into `sink`, one line at a time, until the stream ends or shutdown is requested.
    ///
    /// Shutdown is checked before every read and before every line; a pending read is abandoned
    /// as soon as shutdown is requested. Unterminated output left in the buffer is dropped.
    /// Read errors end the drain and are only logged.
    pub async fn drain_logs<S>(&self, handle: &mut WorkerHandle<'_>, sink: &mut S)
    where
        S: LineSink + ?Sized,
    {
        let Some(mut logs) = handle.take_logs() else {
            warn!(target: "rcb.core.supervisor", name = handle.name(), "log stream already drained");
            return;
        };
        let mut framer = LineFramer::new();
        let mut lines = 0usize;

        'read: loop {
            if self.shutdown.is_requested() {
                info!(target: "rcb.core.supervisor", "exiting log reading loop due to signal");
                break;
            }

            let next = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!(target: "rcb.core.supervisor", "exiting log reading loop due to signal");
                    break 'read;
                }
                next = logs.next() => next,
            };

            match next {
                Some(Ok(chunk)) => {
                    framer.push(&chunk);
                    while let Some(line) = framer.next_line() {
                        if self.shutdown.is_requested() {
                            info!(target: "rcb.core.supervisor", "exiting log reading loop due to signal");
                            break 'read;
                        }
                        emit(sink, &line).await;
                        lines += 1;
                    }
                }
                Some(Err(e)) => {
                    error!(target: "rcb.core.supervisor", error = %e, "exception reading log stream");
                    break;
                }
                None => break,
            }
        }

        let dropped = framer.discard();
        if dropped > 0 {
            debug!(target: "rcb.core.supervisor", bytes = dropped, "discarding unterminated output");
        }
        debug!(target: "rcb.core.supervisor", lines, "log stream drained");
    }
}

async fn emit<S: LineSink + ?Sized>(sink: &mut S, line: &str) {
    if let Err(e) = sink.write_line(line).await {
        warn!(target: "rcb.core.supervisor", error = %e, "failed to write durable log line");
    }
    info!(target: "rcb.worker", "{line}");
}
