// Bot backend HTTP client
//
// Wraps `reqwest::Client` with backend URL construction and response
// interpretation. The three-way outcome policy (acknowledged / answered
// without acknowledgment / failed) lives in `ingresso-core`; this module
// only distinguishes "the call produced a parsed body" from "it did not".

use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::models::{BookingRequest, StartAck};
use crate::transport::TransportConfig;

/// HTTP client for the bot backend.
///
/// Stateless beyond the base URL — serializing submissions is the
/// session's job, not the client's.
#[derive(Debug, Clone)]
pub struct BotClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BotClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:5000`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a full URL for a backend path.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    /// Submit a booking request.
    ///
    /// Returns the parsed acknowledgment on HTTP success. The backend's
    /// error responses (`{"error": "..."}` with 4xx/5xx) become
    /// [`Error::Api`]; a 2xx body that does not parse becomes
    /// [`Error::Deserialization`].
    pub async fn start_bot(&self, request: &BookingRequest) -> Result<StartAck, Error> {
        let url = self.api_url("start-bot");
        debug!(%url, tickets = request.number_of_tickets, "POST /start-bot");

        let resp = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<StartAck>(&body)
                .ok()
                .and_then(|ack| ack.error)
                .unwrap_or_else(|| format!("HTTP {status}"));
            warn!(status = status.as_u16(), %message, "bot backend rejected the request");
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}
