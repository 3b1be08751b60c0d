// ── Command API ──
//
// Every outbound intent is a `Command`. The dispatcher validates it,
// turns it into a wire envelope and queues it on the shared connection.

pub mod requests;

use serde::Serialize;

use rfoutlet_api::{Envelope, MessageType};

use crate::convert::encode_interval;
use crate::error::CoreError;
use crate::model::Interval;

pub use requests::{
    GroupAction, GroupRequest, IntervalAction, IntervalRequest, OutletAction, OutletRequest,
    StatusRequest,
};

/// A command queued for the dispatcher worker, with an optional channel
/// for the send result.
pub(crate) struct CommandEnvelope {
    pub envelope: Envelope,
    pub response_tx: Option<tokio::sync::oneshot::Sender<Result<(), CoreError>>>,
}

/// All messages a client can send to the outlet server.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Ask for a full snapshot.
    RequestStatus,
    Group {
        id: String,
        action: GroupAction,
    },
    Outlet {
        id: String,
        action: OutletAction,
    },
    Interval {
        outlet_id: String,
        action: IntervalAction,
        interval: Interval,
    },
}

impl Command {
    /// The envelope discriminator this command travels under.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::RequestStatus => MessageType::Status,
            Self::Group { .. } => MessageType::Group,
            Self::Outlet { .. } => MessageType::Outlet,
            Self::Interval { .. } => MessageType::Interval,
        }
    }

    /// Local checks a well-formed command must pass before it is sent.
    ///
    /// Create and update need a complete interval; update and delete need
    /// the interval's id.
    pub fn validate(&self) -> Result<(), CoreError> {
        let Self::Interval {
            action, interval, ..
        } = self
        else {
            return Ok(());
        };

        if matches!(action, IntervalAction::Create | IntervalAction::Update)
            && !interval.is_complete()
        {
            return Err(CoreError::validation(
                "interval needs at least one weekday and both from and to times",
            ));
        }
        if matches!(action, IntervalAction::Update | IntervalAction::Delete)
            && interval.id.is_none()
        {
            return Err(CoreError::validation(format!(
                "interval {action} requires an interval id"
            )));
        }
        Ok(())
    }

    /// Build the wire envelope. Does not validate.
    pub fn to_envelope(&self) -> Result<Envelope, CoreError> {
        match self {
            Self::RequestStatus => envelope(MessageType::Status, &StatusRequest {}),
            Self::Group { id, action } => envelope(
                MessageType::Group,
                &GroupRequest {
                    id: id.clone(),
                    action: *action,
                },
            ),
            Self::Outlet { id, action } => envelope(
                MessageType::Outlet,
                &OutletRequest {
                    id: id.clone(),
                    action: *action,
                },
            ),
            Self::Interval {
                outlet_id,
                action,
                interval,
            } => envelope(
                MessageType::Interval,
                &IntervalRequest {
                    id: outlet_id.clone(),
                    action: *action,
                    interval: encode_interval(interval),
                },
            ),
        }
    }
}

fn envelope<T: Serialize>(kind: MessageType, data: &T) -> Result<Envelope, CoreError> {
    let data = serde_json::to_value(data).map_err(|e| CoreError::Internal(e.to_string()))?;
    Ok(Envelope::new(kind, data))
}
