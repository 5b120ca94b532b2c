//! Push-based status channel.
//!
//! Connects once to the backend's status endpoint and forwards
//! `status_update` events through a [`tokio::sync::broadcast`] channel.
//! Deliberately minimal: no reconnection, no backoff, no deduplication —
//! messages surface in arrival order for the lifetime of the connection,
//! and teardown happens through the [`CancellationToken`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ingresso_api::status::StatusChannel;
//! use tokio_util::sync::CancellationToken;
//! use url::Url;
//!
//! let cancel = CancellationToken::new();
//! let url = Url::parse("ws://localhost:5000/status")?;
//!
//! let channel = StatusChannel::connect(url, cancel.clone()).await?;
//! let mut rx = channel.subscribe();
//!
//! while let Ok(update) = rx.recv().await {
//!     println!("{}", update.message);
//! }
//!
//! channel.shutdown();
//! ```

use std::sync::Arc;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;

// ── Broadcast channel capacity ───────────────────────────────────────

const UPDATE_CHANNEL_CAPACITY: usize = 64;

// ── StatusUpdate ─────────────────────────────────────────────────────

/// Payload of a `status_update` event.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    /// Human-readable progress text, displayed as-is.
    pub message: String,
}

/// Envelope for every frame the backend pushes.
///
/// Frames carry `{ "event": "...", "data": { ... } }`; only
/// `status_update` events are forwarded.
#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    event: String,
    data: StatusUpdate,
}

// ── StatusChannel ────────────────────────────────────────────────────

/// Handle to a running status subscription.
///
/// Dropping the handle does not close the connection — call
/// [`shutdown`](Self::shutdown) (or cancel the token) to tear it down.
pub struct StatusChannel {
    update_rx: broadcast::Receiver<Arc<StatusUpdate>>,
    cancel: CancellationToken,
}

impl StatusChannel {
    /// Connect to the status endpoint and spawn the read loop.
    ///
    /// The connection is attempted eagerly so a dead endpoint surfaces
    /// as an error instead of a silently empty feed. There is exactly
    /// one connection per channel; when it drops, the feed goes quiet.
    pub async fn connect(url: Url, cancel: CancellationToken) -> Result<Self, Error> {
        tracing::info!(%url, "connecting to status channel");

        let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| Error::ChannelConnect(e.to_string()))?;

        tracing::info!("status channel connected");

        let (update_tx, update_rx) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            read_loop(ws_stream, &update_tx, &task_cancel).await;
        });

        Ok(Self { update_rx, cancel })
    }

    /// Get a new broadcast receiver for the update stream.
    ///
    /// Multiple consumers can subscribe concurrently. A consumer that
    /// falls behind receives [`broadcast::error::RecvError::Lagged`].
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<StatusUpdate>> {
        self.update_rx.resubscribe()
    }

    /// Signal the read loop to shut down — the unmount path.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Read loop ────────────────────────────────────────────────────────

/// Read frames until the connection drops or the token is cancelled.
async fn read_loop(
    mut ws_stream: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    update_tx: &broadcast::Sender<Arc<StatusUpdate>>,
    cancel: &CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        parse_and_forward(&text, update_tx);
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite handles pong replies automatically
                        tracing::trace!("status channel ping");
                    }
                    Some(Ok(tungstenite::Message::Close(_))) => {
                        tracing::info!("status channel closed by server");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "status channel read error");
                        break;
                    }
                    None => {
                        tracing::info!("status channel stream ended");
                        break;
                    }
                    _ => {
                        // Binary, Pong, Frame -- ignore
                    }
                }
            }
        }
    }

    tracing::debug!("status channel read loop exiting");
}

// ── Frame parsing ────────────────────────────────────────────────────

/// Parse a pushed frame and forward it if it is a `status_update` event.
fn parse_and_forward(text: &str, update_tx: &broadcast::Sender<Arc<StatusUpdate>>) {
    let envelope: StatusEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unparseable status frame");
            return;
        }
    };

    if envelope.event != "status_update" {
        tracing::trace!(event = %envelope.event, "ignoring non-status event");
        return;
    }

    // Send errors only mean there is no active subscriber right now.
    let _ = update_tx.send(Arc::new(envelope.data));
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_status_update_events() {
        let (tx, mut rx) = broadcast::channel(16);

        let raw = serde_json::json!({
            "event": "status_update",
            "data": { "message": "Procurando secao: ARQUIBANCADA NORTE OREO" }
        });

        parse_and_forward(&raw.to_string(), &tx);

        let update = rx.try_recv().expect("one update forwarded");
        assert_eq!(update.message, "Procurando secao: ARQUIBANCADA NORTE OREO");
    }

    #[test]
    fn ignores_other_event_names() {
        let (tx, mut rx) = broadcast::channel::<Arc<StatusUpdate>>(16);

        let raw = serde_json::json!({
            "event": "heartbeat",
            "data": { "message": "still alive" }
        });

        parse_and_forward(&raw.to_string(), &tx);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn ignores_malformed_frames() {
        let (tx, mut rx) = broadcast::channel::<Arc<StatusUpdate>>(16);

        parse_and_forward("not json at all", &tx);
        parse_and_forward(r#"{"event": "status_update"}"#, &tx);

        // Should not panic, should just log and skip
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn deserialize_status_update() {
        let update: StatusUpdate =
            serde_json::from_str(r#"{"message": "Cookies aceitos"}"#).expect("parses");
        assert_eq!(update.message, "Cookies aceitos");
    }
}
