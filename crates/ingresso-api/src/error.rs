use thiserror::Error;

/// Top-level error type for the `ingresso-api` crate.
///
/// Covers both API surfaces: the booking submission call and the status
/// push channel. `ingresso-core` maps these into user-facing outcome
/// messages — nothing here is shown to the user verbatim.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Bot backend ─────────────────────────────────────────────────
    /// The backend answered with an error body (`{"error": "..."}`) or a
    /// non-2xx status.
    #[error("Bot backend error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Status channel ──────────────────────────────────────────────
    /// The push channel could not be established.
    #[error("Status channel connection failed: {0}")]
    ChannelConnect(String),
}

impl Error {
    /// Returns `true` if this is a transient error that might clear on
    /// its own (the caller decides whether to care — nothing retries).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::ChannelConnect(_) => true,
            _ => false,
        }
    }

    /// Returns `true` when the backend itself rejected the request, as
    /// opposed to the request never completing.
    pub fn is_backend_rejection(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}
