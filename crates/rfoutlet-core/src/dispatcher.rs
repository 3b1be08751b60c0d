// ── Dispatcher ──
//
// Typed front door to the shared connection. Turns domain intents into
// envelopes, enforces local validation, and queues sends on a single
// worker so they reach the server in call order.

use std::sync::Arc;

use rfoutlet_api::{Connection, Envelope, ListenerId};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::command::{Command, CommandEnvelope, GroupAction, IntervalAction, OutletAction};
use crate::convert::decode_payload;
use crate::error::CoreError;
use crate::model::{Group, Interval, Outlet};

/// Sends commands and routes decoded snapshots to listeners.
///
/// Cheaply cloneable; all clones share one send queue. Must be created
/// inside a Tokio runtime since it spawns its send worker immediately.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    connection: Connection,
    command_tx: mpsc::UnboundedSender<CommandEnvelope>,
    cancel: CancellationToken,
}

impl Drop for DispatcherInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Dispatcher {
    pub fn new(connection: Connection) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        tokio::spawn(send_task(connection.clone(), command_rx, cancel.clone()));

        Self {
            inner: Arc::new(DispatcherInner {
                connection,
                command_tx,
                cancel,
            }),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.inner.connection
    }

    // ── Envelope builders ────────────────────────────────────────────

    pub fn build_status() -> Result<Envelope, CoreError> {
        Command::RequestStatus.to_envelope()
    }

    pub fn build_group(id: impl Into<String>, action: GroupAction) -> Result<Envelope, CoreError> {
        Command::Group {
            id: id.into(),
            action,
        }
        .to_envelope()
    }

    pub fn build_outlet(
        id: impl Into<String>,
        action: OutletAction,
    ) -> Result<Envelope, CoreError> {
        Command::Outlet {
            id: id.into(),
            action,
        }
        .to_envelope()
    }

    /// Validated like [`dispatch_interval`](Self::dispatch_interval).
    pub fn build_interval(
        outlet_id: impl Into<String>,
        action: IntervalAction,
        interval: Interval,
    ) -> Result<Envelope, CoreError> {
        let cmd = Command::Interval {
            outlet_id: outlet_id.into(),
            action,
            interval,
        };
        cmd.validate()?;
        cmd.to_envelope()
    }

    // ── Fire-and-forget sends ────────────────────────────────────────

    /// Ask the server for a full snapshot.
    pub fn dispatch_status(&self) {
        self.fire(Command::RequestStatus);
    }

    pub fn dispatch_group(&self, id: impl Into<String>, action: GroupAction) {
        self.fire(Command::Group {
            id: id.into(),
            action,
        });
    }

    pub fn dispatch_outlet(&self, id: impl Into<String>, action: OutletAction) {
        self.fire(Command::Outlet {
            id: id.into(),
            action,
        });
    }

    /// Queue a schedule change. Validation failures are returned
    /// synchronously and nothing is sent.
    pub fn dispatch_interval(
        &self,
        outlet_id: impl Into<String>,
        action: IntervalAction,
        interval: Interval,
    ) -> Result<(), CoreError> {
        self.dispatch(Command::Interval {
            outlet_id: outlet_id.into(),
            action,
            interval,
        })
    }

    /// Flip `enabled` on an existing interval and send it as an update.
    pub fn toggle_interval(
        &self,
        outlet_id: impl Into<String>,
        interval: &Interval,
    ) -> Result<(), CoreError> {
        self.dispatch_interval(outlet_id, IntervalAction::Update, interval.toggled())
    }

    /// Toggle an outlet by hand, refused while its schedule is in control.
    pub fn toggle_outlet(&self, outlet: &Outlet) -> Result<(), CoreError> {
        if !outlet.manual_toggle_enabled() {
            return Err(CoreError::ScheduleControlled {
                outlet_id: outlet.id.clone(),
            });
        }
        self.dispatch_outlet(outlet.id.clone(), OutletAction::Toggle);
        Ok(())
    }

    /// Validate and queue any command without waiting for the write.
    pub fn dispatch(&self, command: Command) -> Result<(), CoreError> {
        command.validate()?;
        let envelope = command.to_envelope()?;
        self.enqueue(envelope, None)
    }

    /// Validate, queue and wait until the frame has been written.
    pub async fn send(&self, command: Command) -> Result<(), CoreError> {
        command.validate()?;
        let envelope = command.to_envelope()?;
        let (tx, rx) = oneshot::channel();
        self.enqueue(envelope, Some(tx))?;
        rx.await.map_err(|_| CoreError::Disconnected)?
    }

    // ── Inbound ──────────────────────────────────────────────────────

    /// Register `listener` for every snapshot the server pushes.
    ///
    /// Payloads that fail to decode are logged and dropped; the listener
    /// only ever sees complete, valid snapshots.
    pub fn add_message_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Vec<Group>) + Send + Sync + 'static,
    {
        self.inner
            .connection
            .on_message(move |payload| match decode_payload(payload.clone()) {
                Ok(groups) => listener(groups),
                Err(e) => warn!(error = %e, "Dropping undecodable snapshot"),
            })
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.connection.remove_listener(id)
    }

    /// Stop the send worker. Queued commands are discarded.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn fire(&self, command: Command) {
        if let Err(e) = self.dispatch(command) {
            warn!(error = %e, "Failed to queue command");
        }
    }

    fn enqueue(
        &self,
        envelope: Envelope,
        response_tx: Option<oneshot::Sender<Result<(), CoreError>>>,
    ) -> Result<(), CoreError> {
        debug!(kind = ?envelope.kind, "Queueing command");
        self.inner
            .command_tx
            .send(CommandEnvelope {
                envelope,
                response_tx,
            })
            .map_err(|_| CoreError::Disconnected)
    }
}

// ── Background task ──────────────────────────────────────────────────

/// Drain the command queue one envelope at a time.
async fn send_task(
    connection: Connection,
    mut rx: mpsc::UnboundedReceiver<CommandEnvelope>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = rx.recv() => {
                let Some(CommandEnvelope { envelope, response_tx }) = next else { break };
                let result = connection
                    .send_message(&envelope)
                    .await
                    .map_err(|e| CoreError::from_transport(e, connection.url()));
                match response_tx {
                    Some(tx) => {
                        let _ = tx.send(result);
                    }
                    None => {
                        if let Err(e) = result {
                            warn!(error = %e, kind = ?envelope.kind, "Command not delivered");
                        }
                    }
                }
            }
        }
    }
    debug!("Dispatcher send worker exiting");
}
