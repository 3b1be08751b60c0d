// ── Core error types ──
//
// User-facing errors from rfoutlet-core. Consumers never see raw socket
// or JSON failures directly; the `From<rfoutlet_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to outlet server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Connection to outlet server was lost")]
    Disconnected,

    #[error("Outlet server did not respond within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Group not found: {identifier}")]
    GroupNotFound { identifier: String },

    #[error("Outlet not found: {identifier}")]
    OutletNotFound { identifier: String },

    #[error("Interval not found: {identifier}")]
    IntervalNotFound { identifier: String },

    #[error("Malformed snapshot: {message}")]
    MalformedSnapshot { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Outlet {outlet_id} is under schedule control; disable its intervals to toggle it manually")]
    ScheduleControlled { outlet_id: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSnapshot {
            message: message.into(),
        }
    }

    /// Like `From`, but records which server a connect failure was for.
    pub(crate) fn from_transport(err: rfoutlet_api::Error, url: &url::Url) -> Self {
        match Self::from(err) {
            Self::ConnectionFailed { reason, .. } => Self::ConnectionFailed {
                url: url.to_string(),
                reason,
            },
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<rfoutlet_api::Error> for CoreError {
    fn from(err: rfoutlet_api::Error) -> Self {
        use rfoutlet_api::Error as ApiError;

        match err {
            ApiError::WebSocketConnect(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason,
            },
            ApiError::WebSocketClosed { code, reason } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("WebSocket closed (code {code}): {reason}"),
            },
            ApiError::ConnectionClosed | ApiError::Send(_) => CoreError::Disconnected,
            ApiError::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Serialization(message) => CoreError::Internal(message),
            ApiError::Deserialization { message, body: _ } => {
                CoreError::MalformedSnapshot { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_timeout_keeps_duration() {
        let err = CoreError::from(rfoutlet_api::Error::Timeout { timeout_secs: 7 });
        assert!(matches!(err, CoreError::Timeout { timeout_secs: 7 }));
    }

    #[test]
    fn dropped_link_maps_to_disconnected() {
        let err = CoreError::from(rfoutlet_api::Error::ConnectionClosed);
        assert!(matches!(err, CoreError::Disconnected));
    }
}
