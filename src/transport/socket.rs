use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::net::unix::OwnedWriteHalf;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{EnvDiagnostics, Subscription};
use crate::errors::TransportError;
use crate::message::BehaviorTreeLog;

/// One-line subscribe request sent to the forwarding endpoint.
#[derive(Serialize)]
struct SubscribeRequest<'a> {
    op: &'static str,
    topic: &'a str,
    depth: usize,
}

/// Production transport: a Unix-socket connection to the middleware
/// forwarding endpoint.
///
/// The endpoint speaks newline-delimited JSON in both directions: the
/// bridge sends one subscribe request, then receives a stream of
/// [`BehaviorTreeLog`] objects, one per line. A spawned reader task feeds
/// them into the subscription's bounded queue in arrival order.
#[derive(Debug)]
pub struct SocketTransport {
    endpoint: PathBuf,
    stream: UnixStream,
}

impl SocketTransport {
    /// Connects to the forwarding endpoint.
    ///
    /// Failure is fatal to the process; the returned error carries an
    /// environment snapshot for the stderr diagnostic block.
    pub async fn connect(endpoint: impl Into<PathBuf>) -> Result<Self, TransportError> {
        let endpoint = endpoint.into();
        let stream =
            UnixStream::connect(&endpoint)
                .await
                .map_err(|source| TransportError::Connect {
                    path: endpoint.display().to_string(),
                    source,
                    diagnostics: Box::new(EnvDiagnostics::capture()),
                })?;
        debug!(endpoint = %endpoint.display(), "connected to middleware endpoint");
        Ok(Self { endpoint, stream })
    }

    /// Endpoint path this transport is connected to.
    pub fn endpoint(&self) -> &Path {
        &self.endpoint
    }

    /// Subscribes to `topic` with a bounded delivery queue of `depth`.
    ///
    /// Consumes the connection: the bridge serves exactly one topic per
    /// process. Returns the subscription plus a handle that owns the
    /// reader task.
    pub async fn subscribe(
        self,
        topic: &str,
        depth: usize,
    ) -> Result<(Subscription, SocketHandle), TransportError> {
        let (read_half, mut write_half) = self.stream.into_split();

        let request = SubscribeRequest {
            op: "subscribe",
            topic,
            depth,
        };
        let mut line = serde_json::to_string(&request).map_err(|source| {
            TransportError::Handshake {
                topic: topic.to_string(),
                source: source.into(),
                diagnostics: Box::new(EnvDiagnostics::capture()),
            }
        })?;
        line.push('\n');
        write_half
            .write_all(line.as_bytes())
            .await
            .map_err(|source| TransportError::Handshake {
                topic: topic.to_string(),
                source,
                diagnostics: Box::new(EnvDiagnostics::capture()),
            })?;

        let (sender, subscription) = Subscription::channel(topic, depth);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let task_topic = topic.to_string();

        let reader = tokio::spawn(async move {
            let mut lines = BufReader::new(read_half).lines();
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    next = lines.next_line() => match next {
                        Ok(Some(raw)) => {
                            match serde_json::from_str::<BehaviorTreeLog>(&raw) {
                                Ok(message) => {
                                    if !sender.deliver(message) {
                                        break;
                                    }
                                }
                                Err(error) => {
                                    warn!(topic = %task_topic, %error, "dropping malformed line from endpoint");
                                }
                            }
                        }
                        Ok(None) => {
                            debug!(topic = %task_topic, "endpoint closed the stream");
                            break;
                        }
                        Err(error) => {
                            warn!(topic = %task_topic, %error, "endpoint read failed");
                            break;
                        }
                    }
                }
            }
        });

        Ok((
            subscription,
            SocketHandle {
                state: Some(HandleState {
                    shutdown_tx,
                    reader,
                    write_half,
                }),
            },
        ))
    }
}

struct HandleState {
    shutdown_tx: oneshot::Sender<()>,
    reader: JoinHandle<()>,
    write_half: OwnedWriteHalf,
}

/// Owns the reader task and connection for one socket subscription.
///
/// [`SocketHandle::shutdown`] runs on every exit path; `Drop` aborts the
/// reader as a backstop if shutdown was never awaited.
pub struct SocketHandle {
    state: Option<HandleState>,
}

impl SocketHandle {
    /// Stops the reader task and closes the connection.
    ///
    /// Teardown errors are logged and swallowed: they cannot change the
    /// outcome of a process that is already exiting.
    pub async fn shutdown(mut self) {
        let Some(state) = self.state.take() else {
            return;
        };
        let _ = state.shutdown_tx.send(());
        if let Err(error) = state.reader.await {
            warn!(%error, "transport reader task did not stop cleanly");
        }
        let mut write_half = state.write_half;
        if let Err(error) = write_half.shutdown().await {
            warn!(%error, "endpoint connection did not close cleanly");
        }
    }
}

impl Drop for SocketHandle {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            let _ = state.shutdown_tx.send(());
            state.reader.abort();
        }
    }
}
