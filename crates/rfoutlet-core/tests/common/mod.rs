// Shared fixtures: an in-process outlet server speaking the JSON protocol.
#![allow(dead_code, clippy::unwrap_used)]

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use rfoutlet_core::ClientConfig;

/// Run `handler` for every accepted WebSocket and return the `ws://` URL.
pub async fn spawn_server<F, Fut>(handler: F) -> Url
where
    F: Fn(WebSocketStream<TcpStream>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                if let Ok(ws) = tokio_tungstenite::accept_async(stream).await {
                    handler(ws).await;
                }
            });
        }
    });

    Url::parse(&format!("ws://{addr}/ws")).unwrap()
}

/// A minimal outlet server: records every envelope, applies group and
/// outlet actions to its state, and answers each message with the
/// current snapshot.
pub struct FakeServer {
    pub url: Url,
    pub received: mpsc::UnboundedReceiver<Value>,
}

pub async fn fake_outlet_server(initial: Value) -> FakeServer {
    let state = Arc::new(Mutex::new(initial));
    let (tx, received) = mpsc::unbounded_channel();

    let url = spawn_server(move |mut ws| {
        let state = Arc::clone(&state);
        let tx = tx.clone();
        async move {
            while let Some(Ok(msg)) = ws.next().await {
                let Message::Text(text) = msg else { continue };
                let envelope: Value = serde_json::from_str(text.as_str()).unwrap();
                let _ = tx.send(envelope.clone());

                let reply = {
                    let mut snapshot = state.lock().unwrap();
                    apply(&mut snapshot, &envelope);
                    snapshot.to_string()
                };
                if ws.send(Message::text(reply)).await.is_err() {
                    break;
                }
            }
        }
    })
    .await;

    FakeServer { url, received }
}

fn apply(snapshot: &mut Value, envelope: &Value) {
    let data = &envelope["data"];
    let id = data["id"].as_str().unwrap_or_default();
    let action = data["action"].as_str().unwrap_or_default();

    let Some(groups) = snapshot.as_array_mut() else { return };
    match envelope["type"].as_str() {
        Some("group") => {
            for group in groups.iter_mut().filter(|g| g["id"] == id) {
                for outlet in group["outlets"].as_array_mut().into_iter().flatten() {
                    let next = match action {
                        "on" => 1,
                        "off" => 0,
                        _ => 1 - outlet["state"].as_i64().unwrap_or(0),
                    };
                    outlet["state"] = json!(next);
                }
            }
        }
        Some("outlet") => {
            for outlet in groups
                .iter_mut()
                .flat_map(|g| g["outlets"].as_array_mut().into_iter().flatten())
                .filter(|o| o["id"] == id)
            {
                outlet["state"] = json!(1 - outlet["state"].as_i64().unwrap_or(0));
            }
        }
        _ => {}
    }
}

/// Two groups, one outlet scheduled, one null collection.
pub fn sample_snapshot() -> Value {
    json!([
        { "id": "living", "name": "Living room", "outlets": [
            { "id": "lamp", "name": "Lamp", "state": 0, "schedule": null },
            { "id": "tv", "name": "TV", "state": 0, "schedule": [] }
        ]},
        { "id": "garden", "name": "Garden", "outlets": [
            { "id": "pump", "name": "Pump", "state": 1, "schedule": [
                { "id": "morning", "enabled": true, "weekdays": [1, 3, 5],
                  "from": { "hour": 6, "minute": 0 },
                  "to": { "hour": 6, "minute": 30 } }
            ]}
        ]},
        { "id": "attic", "name": "Attic", "outlets": null }
    ])
}

pub fn config(url: Url) -> ClientConfig {
    ClientConfig {
        connect_timeout: Duration::from_secs(5),
        request_status_on_connect: false,
        ..ClientConfig::new(url)
    }
}

pub async fn recv<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("channel closed")
}

pub const TIMEOUT: Duration = Duration::from_secs(5);
