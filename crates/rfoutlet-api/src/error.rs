use thiserror::Error;

/// Top-level error type for the `rfoutlet-api` crate.
///
/// Covers every failure mode of the WebSocket transport and the JSON
/// wire format. `rfoutlet-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Connection ──────────────────────────────────────────────────
    /// WebSocket handshake or TCP connect failed.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// WebSocket closed by the server.
    #[error("WebSocket closed (code {code}): {reason}")]
    WebSocketClosed { code: u16, reason: String },

    /// The link dropped before a queued frame could be written.
    #[error("WebSocket connection is closed")]
    ConnectionClosed,

    /// Writing a frame to the socket failed.
    #[error("WebSocket send failed: {0}")]
    Send(String),

    /// Opening the connection took longer than the configured timeout.
    #[error("Connection timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// An outbound envelope could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An inbound frame was not valid JSON, with the raw text for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if sending again later (which reopens the link) might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::WebSocketConnect(_)
                | Self::WebSocketClosed { .. }
                | Self::ConnectionClosed
                | Self::Send(_)
                | Self::Timeout { .. }
        )
    }
}
