//! Wire types for the bot backend.

use serde::{Deserialize, Serialize};

/// Payload for `POST /start-bot`.
///
/// Field names are the backend's contract — the `camelCase` renames are
/// load-bearing, do not touch them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Event page URL. Opaque to the client; the backend drives it.
    pub url: String,
    /// Buyer's CPF. No checksum or format validation on this side.
    pub cpf: String,
    /// Number of tickets to add to the cart. At least 1.
    pub number_of_tickets: u32,
    /// Ticketing-site login (email).
    pub username: String,
    /// Ticketing-site password, sent in cleartext in the body.
    pub password: String,
    /// Display names of the sections excluded from discount eligibility.
    pub sections_without_discount: Vec<String>,
}

/// Response body of `POST /start-bot`.
///
/// The backend acknowledges a started bot with a non-empty `message`;
/// failure responses carry `error` instead (with a 4xx/5xx status).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StartAck {
    /// Whether the response carries the acknowledgment field.
    ///
    /// An empty string does not count — the success signal is a
    /// non-empty `message`.
    pub fn is_acknowledged(&self) -> bool {
        self.message.as_deref().is_some_and(|m| !m.is_empty())
    }
}
