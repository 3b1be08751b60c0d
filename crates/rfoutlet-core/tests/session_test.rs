#![allow(clippy::unwrap_used)]
// End-to-end tests for `Session` and `Dispatcher` against a fake outlet server.

mod common;

use futures_util::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

use common::{TIMEOUT, config, fake_outlet_server, recv, sample_snapshot, spawn_server};
use rfoutlet_core::{
    ClientConfig, Command, ConnectionState, CoreError, GroupAction, Interval, IntervalAction,
    OutletAction, OutletState, Session,
};

// ── Snapshots ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_populates_store() {
    let mut server = fake_outlet_server(sample_snapshot()).await;
    let session = Session::new(config(server.url.clone()));

    let groups = session.refresh(TIMEOUT).await.unwrap();

    assert_eq!(
        recv(&mut server.received).await,
        json!({ "type": "status", "data": {} })
    );
    assert_eq!(groups.len(), 3);
    assert!(groups[0].outlets[0].schedule.is_empty());
    assert!(groups[2].outlets.is_empty());
    assert_eq!(session.store().version(), 1);

    let pump = session.store().outlet("pump").unwrap();
    assert!(pump.is_scheduled());
    assert_eq!(pump.schedule[0].weekdays.indices(), vec![1, 3, 5]);
}

#[tokio::test]
async fn test_group_toggle_sends_envelope_and_store_replaces_snapshot() {
    let mut server = fake_outlet_server(sample_snapshot()).await;
    let session = Session::new(config(server.url.clone()));

    let before = session.refresh(TIMEOUT).await.unwrap();
    recv(&mut server.received).await;
    assert_eq!(before[0].outlets[0].state, OutletState::Off);

    let after = session
        .execute(
            Command::Group {
                id: "living".into(),
                action: GroupAction::Toggle,
            },
            TIMEOUT,
        )
        .await
        .unwrap();

    assert_eq!(
        recv(&mut server.received).await,
        json!({ "type": "group", "data": { "id": "living", "action": "toggle" } })
    );
    assert!(after[0].outlets.iter().all(|o| o.state == OutletState::On));
    assert_eq!(session.store().version(), 2);
    // The previous snapshot is untouched; the store swapped in a new one.
    assert_eq!(before[0].outlets[0].state, OutletState::Off);
}

#[tokio::test]
async fn test_undecodable_snapshot_is_dropped() {
    let url = spawn_server(|mut ws| async move {
        let mut replies = vec![
            json!([{ "id": "g", "name": "ok", "outlets": [] }]),
            json!([{ "id": "g", "name": "bad", "outlets": [
                { "id": "o", "name": "o", "state": 9, "schedule": null }
            ]}]),
        ]
        .into_iter();
        while let Some(Ok(msg)) = ws.next().await {
            if !msg.is_text() {
                continue;
            }
            let Some(reply) = replies.next() else { break };
            ws.send(Message::text(reply.to_string())).await.unwrap();
        }
    })
    .await;
    let session = Session::new(config(url));

    session.refresh(TIMEOUT).await.unwrap();
    let err = session.refresh(std::time::Duration::from_millis(300)).await;

    assert!(matches!(err, Err(CoreError::Timeout { .. })));
    assert_eq!(session.store().version(), 1);
    assert_eq!(session.snapshot()[0].name, "ok");
}

// ── Dispatching ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_fire_and_forget_commands_arrive_in_order() {
    let mut server = fake_outlet_server(sample_snapshot()).await;
    let session = Session::new(config(server.url.clone()));
    let dispatcher = session.dispatcher();

    dispatcher.dispatch_group("living", GroupAction::On);
    dispatcher.dispatch_outlet("tv", OutletAction::Toggle);
    dispatcher.dispatch_group("garden", GroupAction::Off);
    dispatcher.dispatch_status();

    let mut seen = Vec::new();
    for _ in 0..4 {
        let env = recv(&mut server.received).await;
        seen.push(format!(
            "{}:{}",
            env["type"].as_str().unwrap(),
            env["data"]["id"].as_str().unwrap_or("-")
        ));
    }
    assert_eq!(seen, vec!["group:living", "outlet:tv", "group:garden", "status:-"]);
}

#[tokio::test]
async fn test_invalid_interval_is_never_sent() {
    let mut server = fake_outlet_server(sample_snapshot()).await;
    let session = Session::new(config(server.url.clone()));

    let err = session
        .dispatcher()
        .dispatch_interval("lamp", IntervalAction::Create, Interval::draft())
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));

    session.dispatcher().dispatch_status();
    assert_eq!(recv(&mut server.received).await["type"], "status");
}

#[tokio::test]
async fn test_toggle_interval_sends_flipped_update() {
    let mut server = fake_outlet_server(sample_snapshot()).await;
    let session = Session::new(config(server.url.clone()));
    session.refresh(TIMEOUT).await.unwrap();
    recv(&mut server.received).await;

    let (outlet_id, interval) = session.store().interval("morning").unwrap();
    session
        .dispatcher()
        .toggle_interval(outlet_id, &interval)
        .unwrap();

    let env = recv(&mut server.received).await;
    assert_eq!(env["type"], "interval");
    assert_eq!(env["data"]["id"], "pump");
    assert_eq!(env["data"]["action"], "update");
    assert_eq!(env["data"]["interval"]["id"], "morning");
    assert_eq!(env["data"]["interval"]["enabled"], false);
    assert_eq!(env["data"]["interval"]["weekdays"], json!([1, 3, 5]));
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_connection_state_follows_link() {
    let server = fake_outlet_server(sample_snapshot()).await;
    let session = Session::new(config(server.url.clone()));
    let state = session.connection_state();
    assert_eq!(*state.borrow(), ConnectionState::Disconnected);

    session.connect().await.unwrap();
    assert_eq!(*state.borrow(), ConnectionState::Connected);

    session.disconnect().await;
    assert_eq!(*state.borrow(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_connect_failure_marks_failed() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = url::Url::parse(&format!("ws://{addr}/ws")).unwrap();
    let session = Session::new(config(url));

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, CoreError::ConnectionFailed { .. }), "got {err:?}");
    assert_eq!(*session.connection_state().borrow(), ConnectionState::Failed);
}

#[tokio::test]
async fn test_failed_lazy_open_marks_failed() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = url::Url::parse(&format!("ws://{addr}/ws")).unwrap();
    let session = Session::new(config(url));

    let err = session.refresh(TIMEOUT).await.unwrap_err();
    assert!(matches!(err, CoreError::ConnectionFailed { .. }), "got {err:?}");
    assert_eq!(*session.connection_state().borrow(), ConnectionState::Failed);
}

#[tokio::test]
async fn test_status_requested_on_connect() {
    let mut server = fake_outlet_server(sample_snapshot()).await;
    let session = Session::new(ClientConfig {
        request_status_on_connect: true,
        ..config(server.url.clone())
    });
    let mut stream = session.subscribe();

    session.connect().await.unwrap();

    assert_eq!(recv(&mut server.received).await["type"], "status");
    let snapshot = tokio::time::timeout(TIMEOUT, stream.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.len(), 3);
}
