//! Async client for the ticket-bot backend.
//!
//! Two surfaces, mirroring the backend's two endpoints:
//!
//! - [`BotClient`] submits a [`BookingRequest`] to `POST /start-bot` and
//!   returns the backend's [`StartAck`]. One request at a time is the
//!   caller's concern — the client itself is stateless.
//! - [`StatusChannel`] holds a push subscription to the backend's status
//!   endpoint and forwards `status_update` events through a broadcast
//!   channel for the lifetime of the session.
//!
//! `ingresso-core` maps the error taxonomy defined here into user-facing
//! outcome messages.

pub mod client;
pub mod error;
pub mod models;
pub mod status;
pub mod transport;

pub use client::BotClient;
pub use error::Error;
pub use models::{BookingRequest, StartAck};
pub use status::{StatusChannel, StatusUpdate};
pub use transport::TransportConfig;
