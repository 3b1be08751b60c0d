// ── Session ──
//
// Owns the one shared connection for an application and wires it up:
// default logging listeners, snapshot decoding into the store, and an
// observable connection state.

use std::sync::Arc;
use std::time::Duration;

use rfoutlet_api::{Connection, ConnectionConfig, Error, ListenerId};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::command::Command;
use crate::config::ClientConfig;
use crate::dispatcher::Dispatcher;
use crate::error::CoreError;
use crate::model::Group;
use crate::store::SnapshotStore;
use crate::stream::SnapshotStream;

// ── ConnectionState ──────────────────────────────────────────────────

/// Link state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Session ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable. Creating a session does not connect; the link
/// opens on [`connect`](Self::connect) or on the first command.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: ClientConfig,
    connection: Connection,
    dispatcher: Dispatcher,
    store: Arc<SnapshotStore>,
    connection_state: Arc<watch::Sender<ConnectionState>>,
    listener_ids: Vec<ListenerId>,
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        // The open listener holds a dispatcher clone; removing it lets the
        // connection and its worker wind down.
        for id in &self.listener_ids {
            self.connection.remove_listener(*id);
        }
        self.dispatcher.shutdown();
    }
}

impl Session {
    /// Build a session for `config`. Must be called inside a Tokio runtime.
    pub fn new(config: ClientConfig) -> Self {
        let connection = Connection::new(
            config.url.clone(),
            ConnectionConfig {
                connect_timeout: config.connect_timeout,
            },
        );
        let dispatcher = Dispatcher::new(connection.clone());
        let store = Arc::new(SnapshotStore::new());
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let connection_state = Arc::new(state_tx);

        let mut listener_ids = connection.attach_default_listeners();

        let sink = Arc::clone(&store);
        listener_ids.push(dispatcher.add_message_listener(move |groups| {
            debug!(groups = groups.len(), "Snapshot received");
            sink.replace(groups);
        }));

        let state = Arc::clone(&connection_state);
        let status_on_open = config.request_status_on_connect.then(|| dispatcher.clone());
        listener_ids.push(connection.on_open(move || {
            state.send_replace(ConnectionState::Connected);
            if let Some(dispatcher) = &status_on_open {
                dispatcher.dispatch_status();
            }
        }));

        let state = Arc::clone(&connection_state);
        listener_ids.push(connection.on_close(move |_| {
            state.send_replace(ConnectionState::Disconnected);
        }));

        // Lazy opens from a dispatch never pass through `connect`
        let state = Arc::clone(&connection_state);
        listener_ids.push(connection.on_error(move |err| {
            if matches!(err, Error::WebSocketConnect(_) | Error::Timeout { .. }) {
                state.send_if_modified(|current| {
                    let opening = matches!(
                        current,
                        ConnectionState::Connecting | ConnectionState::Disconnected
                    );
                    if opening {
                        *current = ConnectionState::Failed;
                    }
                    opening
                });
            }
        }));

        Self {
            inner: Arc::new(SessionInner {
                config,
                connection,
                dispatcher,
                store,
                connection_state,
                listener_ids,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.inner.store
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Open the link now rather than on the first command.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let state = &self.inner.connection_state;
        state.send_replace(ConnectionState::Connecting);

        match self.inner.connection.open().await {
            Ok(()) => {
                state.send_replace(ConnectionState::Connected);
                info!(url = %self.inner.config.url, "connected to outlet server");
                Ok(())
            }
            Err(e) => {
                state.send_replace(ConnectionState::Failed);
                Err(CoreError::from_transport(e, &self.inner.config.url))
            }
        }
    }

    /// Close the link. Any later command reopens it.
    pub async fn disconnect(&self) {
        self.inner.connection.close().await;
        self.inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("session disconnected");
    }

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Send `command`, then wait up to `timeout` for the next snapshot.
    ///
    /// The server broadcasts a fresh snapshot after every accepted
    /// command, so the returned list reflects the change.
    pub async fn execute(
        &self,
        command: Command,
        timeout: Duration,
    ) -> Result<Arc<Vec<Group>>, CoreError> {
        let mut stream = self.inner.store.subscribe();
        self.inner.dispatcher.send(command).await?;

        match tokio::time::timeout(timeout, stream.changed()).await {
            Ok(Some(snapshot)) => Ok(snapshot),
            Ok(None) => Err(CoreError::Disconnected),
            Err(_) => Err(CoreError::Timeout {
                timeout_secs: timeout.as_secs(),
            }),
        }
    }

    /// Request and wait for a full snapshot.
    pub async fn refresh(&self, timeout: Duration) -> Result<Arc<Vec<Group>>, CoreError> {
        self.execute(Command::RequestStatus, timeout).await
    }

    // ── Data access ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<Vec<Group>> {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        self.inner.store.subscribe()
    }
}
