//! WebSocket client tests against an in-process `tokio-tungstenite` server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use optiongreek::error::OptionGreekError;
use optiongreek::ws::client::{ConnectionStatus, WsClient, WsConfig};
use optiongreek::ws::messages::ServerMessage;
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

const WAIT: Duration = Duration::from_secs(5);

async fn listen() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/api/v1/ws/market", listener.local_addr().unwrap());
    (listener, url)
}

async fn accept(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    tokio_tungstenite::accept_async(stream).await.unwrap()
}

/// Next text frame as JSON, skipping control frames.
async fn next_json(ws: &mut WebSocketStream<TcpStream>) -> Value {
    loop {
        let msg = timeout(WAIT, ws.next())
            .await
            .expect("no frame from client")
            .expect("client closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn send_json(ws: &mut WebSocketStream<TcpStream>, value: Value) {
    ws.send(Message::text(value.to_string())).await.unwrap();
}

fn tick(symbol: &str, ltp: f64) -> Value {
    json!({"type": "market_update", "data": {"symbol": symbol, "ltp": ltp, "chp": 0.4}})
}

fn config(url: &str) -> WsConfig {
    WsConfig::new(url)
        .initial_backoff(Duration::from_millis(20))
        .max_backoff(Duration::from_millis(100))
        .heartbeat(Duration::from_secs(60))
}

#[tokio::test]
async fn subscribes_and_receives_ticks() {
    let (listener, url) = listen().await;
    let (client, mut rx) = WsClient::spawn(config(&url));
    client.subscribe(["NSE:NIFTY50-INDEX"]).unwrap();

    let mut server = accept(&listener).await;
    assert_eq!(
        next_json(&mut server).await,
        json!({"action": "subscribe", "symbols": ["NSE:NIFTY50-INDEX"]})
    );
    timeout(WAIT, client.connected()).await.unwrap().unwrap();

    send_json(
        &mut server,
        json!({"type": "subscription_status", "status": "success", "symbols": ["NSE:NIFTY50-INDEX"]}),
    )
    .await;
    send_json(&mut server, tick("NSE:NIFTY50-INDEX", 24012.5)).await;
    send_json(&mut server, json!({"type": "news_flash", "data": {}})).await;

    let ack = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert!(matches!(ack, ServerMessage::SubscriptionStatus { ref status, .. } if status == "success"));

    let msg = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    let tick = msg.as_tick().expect("market update");
    assert_eq!(tick.symbol.as_deref(), Some("NSE:NIFTY50-INDEX"));
    assert_eq!(tick.ltp, Some(24012.5));

    let unknown = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(unknown, ServerMessage::Unknown);

    client.shutdown().await;
}

#[tokio::test]
async fn unsubscribe_is_forwarded() {
    let (listener, url) = listen().await;
    let (client, _rx) = WsClient::spawn(config(&url));
    let mut server = accept(&listener).await;
    timeout(WAIT, client.connected()).await.unwrap().unwrap();

    client.subscribe(["NSE:SBIN-EQ", "NSE:TCS-EQ"]).unwrap();
    assert_eq!(
        next_json(&mut server).await,
        json!({"action": "subscribe", "symbols": ["NSE:SBIN-EQ", "NSE:TCS-EQ"]})
    );

    client.unsubscribe(["NSE:TCS-EQ", "NSE:INFY-EQ"]).unwrap();
    assert_eq!(
        next_json(&mut server).await,
        json!({"action": "unsubscribe", "symbols": ["NSE:TCS-EQ"]})
    );
    assert_eq!(client.subscribed(), vec!["NSE:SBIN-EQ".to_owned()]);

    client.shutdown().await;
}

#[tokio::test]
async fn resubscribes_after_server_close() {
    let (listener, url) = listen().await;
    let (client, mut rx) = WsClient::spawn(config(&url));
    client.subscribe(["NSE:SBIN-EQ"]).unwrap();

    let mut first = accept(&listener).await;
    assert_eq!(next_json(&mut first).await["action"], "subscribe");
    first.close(None).await.unwrap();

    let mut second = accept(&listener).await;
    assert_eq!(
        next_json(&mut second).await,
        json!({"action": "subscribe", "symbols": ["NSE:SBIN-EQ"]})
    );
    send_json(&mut second, tick("NSE:SBIN-EQ", 812.3)).await;

    let msg = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(msg.as_tick().unwrap().ltp, Some(812.3));
    assert_eq!(client.current_status(), ConnectionStatus::Connected);

    client.shutdown().await;
}

#[tokio::test]
async fn successful_connect_resets_attempt_budget() {
    let (listener, url) = listen().await;
    // One failed attempt would exhaust the budget unless each connect resets it.
    let (client, mut rx) = WsClient::spawn(config(&url).max_reconnect_attempts(1));
    client.subscribe(["NSE:SBIN-EQ"]).unwrap();

    let mut status = client.status();
    let watcher = tokio::spawn(async move {
        let mut seen_failed = false;
        while status.changed().await.is_ok() {
            seen_failed |= matches!(*status.borrow(), ConnectionStatus::Failed { .. });
        }
        seen_failed
    });

    for _ in 0..4 {
        let mut ws = accept(&listener).await;
        assert_eq!(next_json(&mut ws).await["action"], "subscribe");
        ws.close(None).await.unwrap();
    }

    let mut last = accept(&listener).await;
    assert_eq!(
        next_json(&mut last).await,
        json!({"action": "subscribe", "symbols": ["NSE:SBIN-EQ"]})
    );
    send_json(&mut last, tick("NSE:SBIN-EQ", 815.0)).await;

    let msg = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(msg.as_tick().unwrap().ltp, Some(815.0));
    assert_eq!(client.current_status(), ConnectionStatus::Connected);

    client.shutdown().await;
    assert!(!timeout(WAIT, watcher).await.unwrap().unwrap(), "client reported Failed");
}

#[tokio::test]
async fn alerts_channel_sends_bare_subscribe() {
    let (listener, url) = listen().await;
    let (client, mut rx) = WsClient::spawn_alerts(config(&url));

    let mut server = accept(&listener).await;
    assert_eq!(next_json(&mut server).await, json!({"action": "subscribe"}));

    send_json(
        &mut server,
        json!({"type": "alert", "data": {"kind": "order", "status": "FILLED", "symbol": "NSE:SBIN-EQ"}}),
    )
    .await;
    match timeout(WAIT, rx.recv()).await.unwrap().unwrap() {
        ServerMessage::Alert { data } => assert_eq!(data["status"], "FILLED"),
        other => panic!("expected alert, got {other:?}"),
    }

    client.shutdown().await;
}

#[tokio::test]
async fn heartbeat_sends_ping() {
    let (listener, url) = listen().await;
    let (client, _rx) = WsClient::spawn(config(&url).heartbeat(Duration::from_millis(50)));

    let mut server = accept(&listener).await;
    assert_eq!(next_json(&mut server).await, json!({"action": "ping"}));

    client.shutdown().await;
}

#[tokio::test]
async fn lagging_receiver_does_not_stall_commands() {
    let (listener, url) = listen().await;
    let (client, mut rx) = WsClient::spawn(
        config(&url)
            .channel_capacity(1)
            .heartbeat(Duration::from_millis(50)),
    );
    let mut server = accept(&listener).await;
    timeout(WAIT, client.connected()).await.unwrap().unwrap();

    // Nobody reads `rx` while the feed floods it.
    for i in 0..50 {
        send_json(&mut server, tick("NSE:SBIN-EQ", 800.0 + f64::from(i))).await;
    }
    assert_eq!(next_json(&mut server).await, json!({"action": "ping"}));

    client.subscribe(["NSE:TCS-EQ"]).unwrap();
    let mut frame = next_json(&mut server).await;
    while frame["action"] == "ping" {
        frame = next_json(&mut server).await;
    }
    assert_eq!(frame, json!({"action": "subscribe", "symbols": ["NSE:TCS-EQ"]}));

    // The first tick filled the channel; later ones were dropped.
    let first = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(first.as_tick().unwrap().ltp, Some(800.0));
    assert_eq!(client.current_status(), ConnectionStatus::Connected);

    client.shutdown().await;
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    // Bind then drop so the port refuses connections.
    let (listener, url) = listen().await;
    drop(listener);

    let (client, _rx) = WsClient::spawn(
        WsConfig::new(url)
            .max_reconnect_attempts(2)
            .initial_backoff(Duration::from_millis(10))
            .max_backoff(Duration::from_millis(20)),
    );

    let err = timeout(WAIT, client.connected()).await.unwrap().unwrap_err();
    assert!(matches!(err, OptionGreekError::ReconnectExhausted { attempts: 2 }));
    assert_eq!(client.current_status(), ConnectionStatus::Failed { attempts: 2 });

    // The task is gone; commands can no longer be delivered.
    assert!(matches!(
        client.subscribe(["NSE:SBIN-EQ"]),
        Err(OptionGreekError::ChannelClosed)
    ));
}
