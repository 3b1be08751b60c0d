//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use rfoutlet_config::ConfigError;
use rfoutlet_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to outlet server at {url}")]
    #[diagnostic(
        code(rfoutlet::connection_failed),
        help(
            "Check that the rfoutlet server is running and reachable.\n\
             Reason: {reason}\n\
             Try: rfoutlet --url ws://<host>:3333/ws status"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Connection to the outlet server was lost")]
    #[diagnostic(code(rfoutlet::disconnected))]
    Disconnected,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(rfoutlet::not_found),
        help("Run: rfoutlet {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Outlet '{outlet_id}' is controlled by its schedule")]
    #[diagnostic(
        code(rfoutlet::schedule_controlled),
        help(
            "Disable its intervals first.\n\
             Run: rfoutlet interval list --outlet {outlet_id}"
        )
    )]
    ScheduleControlled { outlet_id: String },

    #[error("Server sent a snapshot that could not be read: {message}")]
    #[diagnostic(code(rfoutlet::malformed_snapshot))]
    MalformedSnapshot { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rfoutlet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(rfoutlet::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: rfoutlet config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(rfoutlet::config_exists),
        help("Use --force to overwrite it, or edit it with: rfoutlet config set")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(rfoutlet::config))]
    Config(ConfigError),

    #[error("Interactive prompt failed: {0}")]
    #[diagnostic(code(rfoutlet::prompt))]
    Prompt(#[from] dialoguer::Error),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Outlet server did not answer within {seconds}s")]
    #[diagnostic(
        code(rfoutlet::timeout),
        help("Increase timeout with --timeout or check the server.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(rfoutlet::render))]
    Render(String),

    #[error("{0}")]
    #[diagnostic(code(rfoutlet::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Disconnected => exit_code::CONNECTION,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::ScheduleControlled { .. } | Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::MalformedSnapshot { .. }
            | Self::Config(_)
            | Self::Prompt(_)
            | Self::Io(_)
            | Self::Render(_)
            | Self::Internal(_) => exit_code::GENERAL,
        }
    }
}

// ── Conversion from core errors ──────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Disconnected => Self::Disconnected,
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::GroupNotFound { identifier } => Self::NotFound {
                resource_type: "group".into(),
                identifier,
                list_command: "status".into(),
            },
            CoreError::OutletNotFound { identifier } => Self::NotFound {
                resource_type: "outlet".into(),
                identifier,
                list_command: "status".into(),
            },
            CoreError::IntervalNotFound { identifier } => Self::NotFound {
                resource_type: "interval".into(),
                identifier,
                list_command: "interval list".into(),
            },
            CoreError::MalformedSnapshot { message } => Self::MalformedSnapshot { message },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "interval".into(),
                reason: message,
            },
            CoreError::ScheduleControlled { outlet_id } => Self::ScheduleControlled { outlet_id },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => Self::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::ConnectionFailed {
                    url: "ws://127.0.0.1:1/ws".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::ScheduleControlled {
                    outlet_id: "pump".into(),
                },
                exit_code::CONFLICT,
            ),
            (
                CoreError::IntervalNotFound {
                    identifier: "x".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (CoreError::Timeout { timeout_secs: 3 }, exit_code::TIMEOUT),
            (
                CoreError::ValidationFailed {
                    message: "missing from".into(),
                },
                exit_code::USAGE,
            ),
        ];

        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn unknown_profile_is_not_found() {
        let err = CliError::from(ConfigError::ProfileNotFound {
            name: "garage".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}
