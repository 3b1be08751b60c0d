//! Lazily-opened WebSocket connection with broadcast listeners.
//!
//! A [`Connection`] owns at most one physical socket to the outlet server.
//! The socket is opened on the first [`send_message`](Connection::send_message)
//! and reopened on demand after it drops; there is no timed reconnect.
//! Inbound frames and lifecycle events are fanned out to every registered
//! listener.
//!
//! # Example
//!
//! ```rust,ignore
//! use rfoutlet_api::websocket::{Connection, ConnectionConfig};
//! use url::Url;
//!
//! let conn = Connection::new(Url::parse("ws://127.0.0.1:3333/ws")?, ConnectionConfig::default());
//! conn.attach_default_listeners();
//! conn.on_message(|snapshot| println!("{snapshot}"));
//!
//! conn.send_message(&serde_json::json!({ "type": "status", "data": {} })).await?;
//! ```

use std::sync::{Arc, Weak};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::listeners::{ListenerId, ListenerIds, ListenerSet};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, Message>;
type WsReader = SplitStream<WsStream>;

// ── ConnectionConfig ─────────────────────────────────────────────────

/// Tuning for a [`Connection`].
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Upper bound on the WebSocket handshake. Default: 10s.
    pub connect_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

// ── CloseEvent ───────────────────────────────────────────────────────

/// Passed to close listeners when a link goes down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEvent {
    /// Close code from the server's close frame, if one was received.
    pub code: Option<u16>,
    pub reason: String,
}

// ── Connection ───────────────────────────────────────────────────────

/// Handle to the shared duplex connection.
///
/// Cheaply cloneable; every clone talks to the same socket and the same
/// listener registry. Dropping the last clone tears the socket down.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

struct ConnectionInner {
    url: Url,
    config: ConnectionConfig,
    /// Guards opening: whoever holds the lock while no link exists opens
    /// it, everyone queued behind reuses the result.
    link: Mutex<Option<Link>>,
    ids: ListenerIds,
    on_message: ListenerSet<Value>,
    on_open: ListenerSet<()>,
    on_close: ListenerSet<CloseEvent>,
    on_error: ListenerSet<Error>,
    cancel: CancellationToken,
}

impl Drop for ConnectionInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// One physical socket: the writer task's queue plus its shutdown token.
struct Link {
    outbound: mpsc::UnboundedSender<Outbound>,
    cancel: CancellationToken,
}

impl Link {
    fn is_alive(&self) -> bool {
        !self.outbound.is_closed() && !self.cancel.is_cancelled()
    }
}

/// A frame queued for the writer, with a channel for the write result.
struct Outbound {
    frame: Message,
    ack: oneshot::Sender<Result<(), Error>>,
}

impl Connection {
    /// Create a connection to `url`. Nothing is opened until the first send.
    pub fn new(url: Url, config: ConnectionConfig) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                url,
                config,
                link: Mutex::new(None),
                ids: ListenerIds::new(),
                on_message: ListenerSet::new(),
                on_open: ListenerSet::new(),
                on_close: ListenerSet::new(),
                on_error: ListenerSet::new(),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    /// Returns `true` while a socket is up.
    pub async fn is_open(&self) -> bool {
        self.inner.link.lock().await.as_ref().is_some_and(Link::is_alive)
    }

    /// Open the socket now instead of waiting for the first send.
    pub async fn open(&self) -> Result<(), Error> {
        self.ensure_open().await.map(drop)
    }

    /// Serialize `payload` as JSON and write it as one text frame.
    ///
    /// Opens the socket first if needed. Concurrent callers racing the
    /// first open all wait for that single handshake.
    pub async fn send_message<T>(&self, payload: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        let text =
            serde_json::to_string(payload).map_err(|e| Error::Serialization(e.to_string()))?;
        let outbound = self.ensure_open().await?;
        self.write_frame(&outbound, Message::text(text)).await
    }

    /// Close the current socket, if any. A later send reopens it.
    pub async fn close(&self) {
        if let Some(link) = self.inner.link.lock().await.take() {
            link.cancel.cancel();
        }
    }

    // ── Listener registration ────────────────────────────────────────

    /// Called with every inbound JSON payload.
    pub fn on_message<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = self.inner.ids.next();
        self.inner.on_message.add(id, listener);
        id
    }

    /// Called each time a socket finishes its handshake.
    pub fn on_open<F>(&self, listener: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.inner.ids.next();
        self.inner.on_open.add(id, move |_: &()| listener());
        id
    }

    /// Called each time a socket goes down, whoever closed it.
    pub fn on_close<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&CloseEvent) + Send + Sync + 'static,
    {
        let id = self.inner.ids.next();
        self.inner.on_close.add(id, listener);
        id
    }

    /// Called for connect, send, read and decode failures.
    pub fn on_error<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        let id = self.inner.ids.next();
        self.inner.on_error.add(id, listener);
        id
    }

    /// Unregister a listener added by any `on_*` method.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let inner = &self.inner;
        inner.on_message.remove(id)
            || inner.on_open.remove(id)
            || inner.on_close.remove(id)
            || inner.on_error.remove(id)
    }

    /// Register listeners that log lifecycle events through `tracing`.
    pub fn attach_default_listeners(&self) -> Vec<ListenerId> {
        let url = self.inner.url.clone();
        vec![
            self.on_open(move || tracing::info!(url = %url, "Opened websocket connection")),
            self.on_close(|event| {
                tracing::info!(code = ?event.code, reason = %event.reason, "Closed websocket connection");
            }),
            self.on_error(|err| tracing::error!(error = %err, "Websocket error")),
        ]
    }

    // ── Private helpers ──────────────────────────────────────────────

    async fn ensure_open(&self) -> Result<mpsc::UnboundedSender<Outbound>, Error> {
        let mut link = self.inner.link.lock().await;
        if let Some(existing) = link.as_ref().filter(|l| l.is_alive()) {
            return Ok(existing.outbound.clone());
        }

        match self.establish().await {
            Ok(fresh) => {
                let outbound = fresh.outbound.clone();
                *link = Some(fresh);
                Ok(outbound)
            }
            Err(e) => {
                *link = None;
                self.inner.on_error.emit(&e);
                Err(e)
            }
        }
    }

    /// Hand one frame to the writer and wait for its result. A closed
    /// queue or a dropped ack means the link went away mid-send.
    async fn write_frame(
        &self,
        outbound: &mpsc::UnboundedSender<Outbound>,
        frame: Message,
    ) -> Result<(), Error> {
        let (ack, ack_rx) = oneshot::channel();
        let result = match outbound.send(Outbound { frame, ack }) {
            Ok(()) => ack_rx.await.unwrap_or(Err(Error::ConnectionClosed)),
            Err(_) => Err(Error::ConnectionClosed),
        };
        if let Err(e) = &result {
            self.inner.on_error.emit(e);
        }
        result
    }

    async fn establish(&self) -> Result<Link, Error> {
        let url = &self.inner.url;
        let timeout = self.inner.config.connect_timeout;
        tracing::debug!(url = %url, "Connecting to WebSocket");

        let (ws_stream, _response) =
            match tokio::time::timeout(timeout, tokio_tungstenite::connect_async(url.as_str()))
                .await
            {
                Ok(Ok(pair)) => pair,
                Ok(Err(e)) => return Err(Error::WebSocketConnect(e.to_string())),
                Err(_) => {
                    return Err(Error::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
            };

        let (write, read) = ws_stream.split();
        let cancel = self.inner.cancel.child_token();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();

        // Open listeners run before the reader starts, so nobody sees a
        // message for a link they have not heard about.
        self.inner.on_open.emit(&());

        tokio::spawn(write_loop(write, outbound_rx, cancel.clone()));
        tokio::spawn(read_loop(read, Arc::downgrade(&self.inner), cancel.clone()));

        Ok(Link { outbound, cancel })
    }
}

// ── Writer task ──────────────────────────────────────────────────────

async fn write_loop(
    mut write: WsWriter,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                let _ = write.send(Message::Close(None)).await;
                break;
            }
            next = outbound.recv() => {
                let Some(Outbound { frame, ack }) = next else { break };
                let result = write
                    .send(frame)
                    .await
                    .map_err(|e| Error::Send(e.to_string()));
                let failed = result.is_err();
                let _ = ack.send(result);
                if failed {
                    cancel.cancel();
                    break;
                }
            }
        }
    }
    tracing::trace!("WebSocket writer exiting");
}

// ── Reader task ──────────────────────────────────────────────────────

async fn read_loop(mut read: WsReader, inner: Weak<ConnectionInner>, cancel: CancellationToken) {
    let close = loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                break CloseEvent {
                    code: None,
                    reason: "closed by client".into(),
                };
            }
            frame = read.next() => {
                let Some(inner) = inner.upgrade() else { return };
                match frame {
                    Some(Ok(Message::Text(text))) => dispatch_text(&inner, text.as_str()),
                    Some(Ok(Message::Ping(_))) => {
                        // tungstenite queues the pong itself
                        tracing::trace!("WebSocket ping");
                    }
                    Some(Ok(Message::Close(frame))) => {
                        break match frame {
                            Some(cf) => {
                                let code = u16::from(cf.code);
                                if !matches!(cf.code, CloseCode::Normal | CloseCode::Away) {
                                    inner.on_error.emit(&Error::WebSocketClosed {
                                        code,
                                        reason: cf.reason.as_str().to_owned(),
                                    });
                                }
                                CloseEvent { code: Some(code), reason: cf.reason.as_str().to_owned() }
                            }
                            None => CloseEvent { code: None, reason: String::new() },
                        };
                    }
                    Some(Err(e)) => {
                        inner.on_error.emit(&Error::WebSocketConnect(e.to_string()));
                        break CloseEvent { code: None, reason: e.to_string() };
                    }
                    None => {
                        break CloseEvent {
                            code: None,
                            reason: "stream ended".into(),
                        };
                    }
                    Some(Ok(_)) => {
                        // Binary, Pong, Frame -- not part of the protocol
                    }
                }
            }
        }
    };

    cancel.cancel();
    if let Some(inner) = inner.upgrade() {
        inner.on_close.emit(&close);
    }
}

/// Unpack one text frame and hand it to message listeners.
fn dispatch_text(inner: &ConnectionInner, text: &str) {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => inner.on_message.emit(&value),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to parse WebSocket frame");
            inner.on_error.emit(&Error::Deserialization {
                message: e.to_string(),
                body: text.to_owned(),
            });
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
