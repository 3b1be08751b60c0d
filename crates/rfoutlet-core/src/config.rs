// ── Runtime connection configuration ──
//
// Describes *where* the outlet server lives and how eagerly to talk to
// it. Never touches disk; the CLI builds a `ClientConfig` from its
// profile and hands it in.

use std::time::Duration;

use url::Url;

/// Configuration for one outlet server session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket endpoint (e.g., `ws://raspberrypi.local:3333/ws`).
    pub url: Url,
    /// Upper bound on the WebSocket handshake.
    pub connect_timeout: Duration,
    /// Send a status request every time the link opens, so a fresh
    /// snapshot arrives without waiting for another client's change.
    pub request_status_on_connect: bool,
}

impl ClientConfig {
    /// Config for `url` with a 10s connect timeout and status requests on.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            connect_timeout: Duration::from_secs(10),
            request_status_on_connect: true,
        }
    }
}
