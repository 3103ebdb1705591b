// End-to-end: the real axum app on a loopback port, browser-like websocket clients.

use std::sync::Arc;
use std::time::Duration;

use colab_room::models::ServerEvent;
use colab_room::{create_app, AppState, Config};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> (String, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::default()));
    let app = create_app(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("ws://{addr}/ws"), state)
}

async fn connect(url: &str) -> Socket {
    let (socket, _) = connect_async(url).await.unwrap();
    socket
}

async fn send(socket: &mut Socket, frame: serde_json::Value) {
    socket.send(Message::text(frame.to_string())).await.unwrap();
}

async fn next_event(socket: &mut Socket) -> ServerEvent {
    loop {
        let frame = timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for an event")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

#[tokio::test]
async fn alice_and_bob_over_websocket() {
    let (url, state) = spawn_server().await;
    let mut alice = connect(&url).await;
    let mut bob = connect(&url).await;

    send(&mut alice, json!({"event": "createRoom", "data": {"roomId": "room-x", "username": "Alice"}})).await;
    assert_eq!(next_event(&mut alice).await, ServerEvent::RoomCreated("room-x".into()));

    send(&mut bob, json!({"event": "joinRoom", "data": {"roomId": "room-x", "username": "Bob"}})).await;
    match next_event(&mut bob).await {
        ServerEvent::RoomJoined(joined) => assert_eq!(joined.room_id, "room-x"),
        other => panic!("expected roomJoined, got {other:?}"),
    }
    assert_eq!(next_event(&mut alice).await, ServerEvent::UserJoined("Bob".into()));

    send(&mut alice, json!({"event": "codeChange", "data": {"room": "room-x", "code": "print(1)"}})).await;
    assert_eq!(next_event(&mut bob).await, ServerEvent::CodeUpdate("print(1)".into()));

    send(
        &mut bob,
        json!({"event": "chatMessage", "data": {"room": "room-x", "message": "hi", "sender": "Bob"}}),
    )
    .await;
    match next_event(&mut alice).await {
        ServerEvent::NewChatMessage(chat) => {
            assert_eq!(chat.message, "hi");
            assert_eq!(chat.sender, "Bob");
        }
        other => panic!("expected newChatMessage, got {other:?}"),
    }

    // Bob's next event is the pong, so his own chat was not echoed back.
    send(&mut bob, json!({"event": "ping"})).await;
    assert!(matches!(next_event(&mut bob).await, ServerEvent::Pong(_)));

    assert_eq!(state.registry.snapshot("room-x").await.unwrap().code, "print(1)");
}

#[tokio::test]
async fn closing_socket_leaves_room() {
    let (url, state) = spawn_server().await;
    let mut alice = connect(&url).await;
    let mut bob = connect(&url).await;

    send(&mut alice, json!({"event": "createRoom", "data": {"roomId": "room-x", "username": "Alice"}})).await;
    next_event(&mut alice).await;
    send(&mut bob, json!({"event": "joinRoom", "data": {"roomId": "room-x", "username": "Bob"}})).await;
    next_event(&mut bob).await;
    next_event(&mut alice).await;

    bob.close(None).await.unwrap();
    assert_eq!(next_event(&mut alice).await, ServerEvent::UserLeft("Bob".into()));

    alice.close(None).await.unwrap();
    timeout(Duration::from_secs(5), async {
        while state.registry.contains("room-x").await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("room was not destroyed after the last member disconnected");
}
