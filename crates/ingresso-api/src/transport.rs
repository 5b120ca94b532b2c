// Shared transport configuration for building reqwest::Client instances.
//
// Kept separate from the client so the binary can construct it from
// configuration without knowing reqwest builder details.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("ingresso/", env!("CARGO_PKG_VERSION"));

/// Transport configuration for the HTTP client.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Request timeout. `None` means the submission waits indefinitely —
    /// the busy flag stays set until the call settles.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(Error::Transport)
    }

    /// Set a request timeout from whole seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }
}
