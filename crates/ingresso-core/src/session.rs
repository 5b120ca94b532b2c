// ── Booking session ──
//
// The unified form component. The submission controller is always
// present; the live status subscriber is attached only when configured.
// The two are uncoordinated — they share nothing but the feed, and both
// only append.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use ingresso_api::{BotClient, StatusChannel};

use crate::draft::{BookingDraft, Field};
use crate::section::Section;
use crate::status::{self, StatusFeed};

// ── User-facing outcome messages ─────────────────────────────────────

/// Posted when the backend acknowledges the request.
pub const MSG_STARTED: &str = "Bot started successfully.";
/// Posted when the call completes without an acknowledgment.
pub const MSG_REJECTED: &str = "The bot could not be started.";
/// Posted when the call itself fails.
pub const MSG_SEND_FAILED: &str = "Something went wrong sending the request.";

// ── SubmitOutcome ────────────────────────────────────────────────────

/// How a [`BookingSession::submit`] call settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend acknowledged the request.
    Accepted,
    /// The call completed but carried no acknowledgment.
    Rejected,
    /// The call itself failed (connectivity, backend error response).
    Failed,
    /// A submission was already outstanding; this call was a no-op.
    Busy,
}

// ── SessionConfig ────────────────────────────────────────────────────

/// Session tuning, built by the binary from config and flags.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Endpoint for the push-based status channel.
    pub status_url: Url,
    /// Attach the live status subscriber on startup. Also selects the
    /// message surface: a 5-entry feed when live, a single replaced
    /// message otherwise.
    pub live_updates: bool,
}

// ── BookingSession ───────────────────────────────────────────────────

/// The booking component: form state, submission, optional live status.
///
/// Cheaply cloneable via an `Arc` inner; clones share all state. The
/// session is created fresh per run, never persisted, and torn down with
/// [`shutdown`](Self::shutdown).
#[derive(Clone)]
pub struct BookingSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: BotClient,
    config: SessionConfig,
    draft: Mutex<BookingDraft>,
    feed: Mutex<StatusFeed>,
    /// Serializes submissions: set on entry, cleared on every settle path.
    submitting: AtomicBool,
    cancel: CancellationToken,
    channel: Mutex<Option<StatusChannel>>,
    bridge: Mutex<Option<JoinHandle<()>>>,
}

impl BookingSession {
    /// Create a session. Does not touch the network — call
    /// [`start_live_updates`](Self::start_live_updates) to attach the
    /// push subscription.
    pub fn new(client: BotClient, config: SessionConfig) -> Self {
        let capacity = if config.live_updates {
            status::DEFAULT_CAPACITY
        } else {
            1
        };

        Self {
            inner: Arc::new(SessionInner {
                client,
                config,
                draft: Mutex::new(BookingDraft::new()),
                feed: Mutex::new(StatusFeed::new(capacity)),
                submitting: AtomicBool::new(false),
                cancel: CancellationToken::new(),
                channel: Mutex::new(None),
                bridge: Mutex::new(None),
            }),
        }
    }

    /// Whether the live status subscriber is configured for this session.
    pub fn live_updates(&self) -> bool {
        self.inner.config.live_updates
    }

    // ── Form state ───────────────────────────────────────────────────

    /// Overwrite one scalar field of the draft.
    pub fn set_field(&self, field: Field, value: &str) {
        self.inner
            .draft
            .lock()
            .expect("draft lock poisoned")
            .set_field(field, value);
    }

    /// Include or remove a section in the excluded set.
    pub fn toggle_section(&self, section: Section, included: bool) {
        self.inner
            .draft
            .lock()
            .expect("draft lock poisoned")
            .toggle_section(section, included);
    }

    /// A copy of the current draft, for rendering.
    pub fn draft_snapshot(&self) -> BookingDraft {
        self.inner.draft.lock().expect("draft lock poisoned").clone()
    }

    // ── Message surface ──────────────────────────────────────────────

    /// Current feed contents, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.inner
            .feed
            .lock()
            .expect("feed lock poisoned")
            .entries()
            .map(String::from)
            .collect()
    }

    /// The most recent message, if any.
    pub fn latest_message(&self) -> Option<String> {
        self.inner
            .feed
            .lock()
            .expect("feed lock poisoned")
            .latest()
            .map(String::from)
    }

    /// Append a status line to the feed (the live subscriber's path, also
    /// used by the submission controller for its outcome messages).
    pub fn record_status(&self, message: impl Into<String>) {
        self.inner
            .feed
            .lock()
            .expect("feed lock poisoned")
            .push(message);
    }

    /// Whether a submission is currently outstanding.
    pub fn is_submitting(&self) -> bool {
        self.inner.submitting.load(Ordering::Acquire)
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Submit the current draft to the backend.
    ///
    /// Re-entrant calls while a submission is outstanding are no-ops
    /// ([`SubmitOutcome::Busy`]). Every settle path appends exactly one
    /// message to the feed and clears the busy flag. There is no retry
    /// and no cancellation — an abandoned call simply never settles.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .inner
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("submission already in flight, ignoring");
            return SubmitOutcome::Busy;
        }

        let request = self
            .inner
            .draft
            .lock()
            .expect("draft lock poisoned")
            .to_request();
        debug!(
            tickets = request.number_of_tickets,
            excluded = request.sections_without_discount.len(),
            "submitting booking request"
        );

        let outcome = match self.inner.client.start_bot(&request).await {
            Ok(ack) if ack.is_acknowledged() => {
                info!("backend acknowledged the booking request");
                self.record_status(MSG_STARTED);
                SubmitOutcome::Accepted
            }
            Ok(_) => {
                warn!("backend answered without an acknowledgment");
                self.record_status(MSG_REJECTED);
                SubmitOutcome::Rejected
            }
            Err(e) => {
                warn!(error = %e, "booking submission failed");
                self.record_status(MSG_SEND_FAILED);
                SubmitOutcome::Failed
            }
        };

        // Cleared on every settle path, whatever the outcome.
        self.inner.submitting.store(false, Ordering::Release);
        outcome
    }

    // ── Live status subscription ─────────────────────────────────────

    /// Attach the push subscription, when enabled.
    ///
    /// One channel per session; calling again is a no-op. Connection
    /// failure surfaces to the caller — there is no retry and no
    /// reconnection once attached.
    pub async fn start_live_updates(&self) -> Result<(), ingresso_api::Error> {
        if !self.inner.config.live_updates {
            return Ok(());
        }
        if self
            .inner
            .channel
            .lock()
            .expect("channel lock poisoned")
            .is_some()
        {
            return Ok(());
        }

        let cancel = self.inner.cancel.child_token();
        let channel =
            StatusChannel::connect(self.inner.config.status_url.clone(), cancel.clone()).await?;

        // Bridge task: pushed updates → feed. Nothing ties an update to
        // a particular submission attempt; arrival order is the only
        // ordering guarantee.
        let mut rx = channel.subscribe();
        let session = self.clone();
        let bridge = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    update = rx.recv() => {
                        match update {
                            Ok(update) => session.record_status(update.message.clone()),
                            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                                warn!(skipped, "status bridge lagged behind the channel");
                            }
                            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                        }
                    }
                }
            }
        });

        *self.inner.channel.lock().expect("channel lock poisoned") = Some(channel);
        *self.inner.bridge.lock().expect("bridge lock poisoned") = Some(bridge);
        info!("live status subscription attached");
        Ok(())
    }

    /// Tear the session down: cancel the subscription and join the
    /// bridge. Safe to call on every exit path; idempotent.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        if let Some(channel) = self
            .inner
            .channel
            .lock()
            .expect("channel lock poisoned")
            .take()
        {
            channel.shutdown();
        }

        let bridge = self
            .inner
            .bridge
            .lock()
            .expect("bridge lock poisoned")
            .take();
        if let Some(bridge) = bridge {
            let _ = bridge.await;
        }

        debug!("session shut down");
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use ingresso_api::TransportConfig;

    use super::*;

    fn session_with(uri: &str, status_url: &str, live_updates: bool) -> BookingSession {
        let base_url: Url = uri.parse().expect("mock server URL parses");
        let client =
            BotClient::new(base_url, &TransportConfig::default()).expect("client builds");
        let config = SessionConfig {
            status_url: status_url.parse().expect("status URL parses"),
            live_updates,
        };
        BookingSession::new(client, config)
    }

    fn session_for(uri: &str, live_updates: bool) -> BookingSession {
        session_with(uri, "ws://localhost:5000/status", live_updates)
    }

    async fn mock_start_bot(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/start-bot"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn submit_accepted_posts_the_success_message() {
        let server = MockServer::start().await;
        mock_start_bot(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})),
        )
        .await;

        let session = session_for(&server.uri(), true);
        session.set_field(Field::TicketCount, "3");
        session.toggle_section(Section::ArquibancadaNorte, true);
        session.toggle_section(Section::CamaroteCorporativo, true);
        session.toggle_section(Section::ArquibancadaNorte, false);

        let outcome = session.submit().await;

        assert_eq!(outcome, SubmitOutcome::Accepted);
        assert_eq!(session.latest_message().as_deref(), Some(MSG_STARTED));
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn submit_without_ack_is_a_logical_failure() {
        let server = MockServer::start().await;
        mock_start_bot(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

        let session = session_for(&server.uri(), true);
        let outcome = session.submit().await;

        // Distinct from the success message AND from the transport one.
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(session.latest_message().as_deref(), Some(MSG_REJECTED));
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn submit_transport_failure_clears_the_busy_flag() {
        // Nothing listens on port 1.
        let session = session_for("http://127.0.0.1:1", true);

        let outcome = session.submit().await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(session.latest_message().as_deref(), Some(MSG_SEND_FAILED));
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn backend_error_response_counts_as_transport_failure() {
        let server = MockServer::start().await;
        mock_start_bot(
            &server,
            ResponseTemplate::new(400).set_body_json(json!({"error": "Nenhuma secao disponivel."})),
        )
        .await;

        let session = session_for(&server.uri(), true);
        let outcome = session.submit().await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(session.latest_message().as_deref(), Some(MSG_SEND_FAILED));
    }

    #[tokio::test]
    async fn reentrant_submit_is_a_no_op() {
        let server = MockServer::start().await;
        mock_start_bot(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "ok"}))
                .set_delay(Duration::from_millis(250)),
        )
        .await;

        let session = session_for(&server.uri(), true);

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.submit().await })
        };

        // Give the first call time to take the flag and park on the mock.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(session.is_submitting());
        assert_eq!(session.submit().await, SubmitOutcome::Busy);

        let outcome = first.await.expect("first submit task completes");
        assert_eq!(outcome, SubmitOutcome::Accepted);
        assert!(!session.is_submitting());

        // The no-op must not have posted a message of its own.
        assert_eq!(session.messages(), vec![MSG_STARTED.to_string()]);
    }

    #[tokio::test]
    async fn non_live_surface_keeps_a_single_message() {
        let server = MockServer::start().await;
        mock_start_bot(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

        let session = session_for(&server.uri(), false);
        session.submit().await;
        session.submit().await;

        assert_eq!(session.messages(), vec![MSG_REJECTED.to_string()]);
    }

    #[tokio::test]
    async fn live_feed_trims_to_five() {
        let session = session_for("http://127.0.0.1:1", true);
        for n in 1..=6 {
            session.record_status(n.to_string());
        }

        assert_eq!(session.messages(), vec!["2", "3", "4", "5", "6"]);
    }

    #[tokio::test]
    async fn start_live_updates_is_a_no_op_when_disabled() {
        let session = session_for("http://127.0.0.1:1", false);
        session.start_live_updates().await.expect("no-op succeeds");
        session.shutdown().await;
    }

    #[tokio::test]
    async fn start_live_updates_surfaces_connection_failure() {
        let session = session_with("http://127.0.0.1:1", "ws://127.0.0.1:1/status", true);

        let result = session.start_live_updates().await;
        assert!(matches!(
            result,
            Err(ingresso_api::Error::ChannelConnect(_))
        ));
    }
}
