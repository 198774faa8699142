//! Push channel for server-side invalidation events.
//!
//! Maintains a persistent WebSocket to the API host. The server sends a bare
//! `update` text frame whenever anything changed; the event carries no diff,
//! so the only valid reaction is a fresh snapshot load. The channel
//! reconnects on its own with capped exponential backoff and exposes the
//! connection state as a `watch` value. Reconnects do not replay missed
//! events; consumers force one load on every reconnect edge to close the gap.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::debug;

use crate::config::SyncConfig;

/// The entire wire contract: a payload-less "something changed" signal.
pub const UPDATE_EVENT: &str = "update";

const EVENT_BUFFER: usize = 8;

/// Scoped handle to the push channel. Dropping it (or calling [`close`])
/// aborts the socket task, releasing the connection on every exit path.
///
/// [`close`]: LiveChannel::close
#[derive(Debug)]
pub struct LiveChannel {
    connected: watch::Receiver<bool>,
    events: mpsc::Receiver<()>,
    task: JoinHandle<()>,
}

impl LiveChannel {
    /// Open the channel and start the reconnect loop in the background.
    pub fn connect(ws_url: String, sync: &SyncConfig) -> Self {
        let (connected_tx, connected) = watch::channel(false);
        let (events_tx, events) = mpsc::channel(EVENT_BUFFER);
        let min = Duration::from_secs(sync.reconnect_min_secs);
        let max = Duration::from_secs(sync.reconnect_max_secs);
        let task = tokio::spawn(run(ws_url, min, max, connected_tx, events_tx));
        Self {
            connected,
            events,
            task,
        }
    }

    /// Observable connection state; starts false until the first connect.
    pub fn connected(&self) -> watch::Receiver<bool> {
        self.connected.clone()
    }

    /// Next invalidation event. `None` once the channel is closed.
    pub async fn recv(&mut self) -> Option<()> {
        self.events.recv().await
    }

    pub fn close(self) {
        self.task.abort();
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    url: String,
    min: Duration,
    max: Duration,
    connected_tx: watch::Sender<bool>,
    events_tx: mpsc::Sender<()>,
) {
    let mut backoff = min;
    loop {
        match connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                let _ = connected_tx.send(true);
                backoff = min;

                let (mut sink, mut source) = stream.split();
                while let Some(message) = source.next().await {
                    match message {
                        Ok(Message::Text(text)) if text.trim() == UPDATE_EVENT => {
                            // try_send coalesces: a full buffer already
                            // guarantees a pending reload
                            let _ = events_tx.try_send(());
                        }
                        Ok(Message::Ping(payload)) => {
                            if sink.send(Message::Pong(payload)).await.is_err() {
                                break;
                            }
                        }
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {}
                        Err(err) => {
                            debug!(error = %err, "push channel read failed");
                            break;
                        }
                    }
                }
                let _ = connected_tx.send(false);
            }
            Err(err) => {
                debug!(error = %err, url = %url, "push channel connect failed");
            }
        }

        tokio::time::sleep(backoff).await;
        backoff = next_backoff(backoff, max);
    }
}

fn next_backoff(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}
