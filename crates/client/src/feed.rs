//! Reconnecting WebSocket notification feed.
//!
//! [`NotificationFeed`] connects to the backend's notification endpoint,
//! deserializes each frame into a
//! [`NotificationEvent`](salesdesk_core::notifications::NotificationEvent),
//! invalidates the shared [`QueryCache`] scopes the event touches, and
//! re-broadcasts the event for UI consumption (badge counts, toasts).
//!
//! When the connection drops, [`NotificationFeed::run`] retries with
//! exponential backoff until the [`CancellationToken`] is triggered.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::StreamExt;
use salesdesk_core::notifications::NotificationEvent;
use salesdesk_core::query_cache::QueryCache;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::connect_async;
use tokio_util::sync::CancellationToken;

/// Connection and backoff settings for the feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// WebSocket base URL, e.g. `ws://host:3000`.
    pub ws_url: String,
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl FeedConfig {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay, clamped to [`FeedConfig::max_delay`].
pub fn next_delay(current: Duration, config: &FeedConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Errors from the feed connection.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Failed to establish the WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The established connection failed mid-stream.
    #[error("Stream error: {0}")]
    Stream(String),
}

/// The notification feed client.
pub struct NotificationFeed {
    config: FeedConfig,
    cache: Arc<Mutex<QueryCache>>,
    events: broadcast::Sender<NotificationEvent>,
}

impl NotificationFeed {
    /// Create a feed that invalidates the given shared cache.
    pub fn new(config: FeedConfig, cache: Arc<Mutex<QueryCache>>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            config,
            cache,
            events,
        }
    }

    /// Subscribe to the re-broadcast event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }

    /// Run the feed until cancelled: connect, pump frames, and on any
    /// disconnect retry with exponential backoff (reset after a successful
    /// connection ends cleanly).
    pub async fn run(&self, cancel: CancellationToken) {
        let mut delay = self.config.initial_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Notification feed cancelled");
                    return;
                }
                result = self.connect_and_pump() => {
                    match result {
                        Ok(()) => {
                            // Server closed the stream cleanly; reconnect
                            // promptly and start the backoff over.
                            delay = self.config.initial_delay;
                            attempt = 0;
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                "Notification feed disconnected",
                            );
                        }
                    }
                }
            }

            // Wait before the next attempt, respecting cancellation.
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            delay = next_delay(delay, &self.config);
        }
    }

    /// Connect once and pump frames until the stream ends.
    async fn connect_and_pump(&self) -> Result<(), FeedError> {
        let client_id = uuid::Uuid::new_v4();
        let url = format!(
            "{}/ws/notifications?clientId={client_id}",
            self.config.ws_url
        );

        let (mut stream, _response) = connect_async(&url).await.map_err(|e| {
            FeedError::Connection(format!(
                "Failed to connect to {}: {e}",
                self.config.ws_url
            ))
        })?;

        tracing::info!(client_id = %client_id, "Notification feed connected");

        while let Some(frame) = stream.next().await {
            match frame.map_err(|e| FeedError::Stream(e.to_string()))? {
                Message::Text(text) => self.handle_frame(&text),
                Message::Close(_) => break,
                // Ping/pong handled by the library; binary frames unused.
                _ => {}
            }
        }

        Ok(())
    }

    /// Deserialize one text frame and apply it. Unparseable frames are
    /// dropped without killing the connection.
    fn handle_frame(&self, text: &str) {
        match serde_json::from_str::<NotificationEvent>(text) {
            Ok(event) => self.apply(event),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unparseable feed frame");
            }
        }
    }

    /// Invalidate the scopes the event touches, then re-broadcast it.
    pub fn apply(&self, event: NotificationEvent) {
        let scopes = event.invalidation_scopes();
        match self.cache.lock() {
            Ok(mut cache) => {
                let removed: usize = scopes
                    .iter()
                    .map(|scope| cache.invalidate_scope(*scope))
                    .sum();
                tracing::debug!(
                    event_type = %event.event_type,
                    removed,
                    "Invalidated cached queries",
                );
            }
            Err(_) => {
                tracing::error!("Query cache lock poisoned; skipping invalidation");
            }
        }

        // No subscribers is fine; the cache invalidation already happened.
        let _ = self.events.send(event);
    }
}
