// Room flows driven through the dispatcher with in-memory connections.

use std::sync::Arc;

use colab_room::models::{ChatMessage, RoomJoinedMessage, ServerEvent};
use colab_room::websocket::Dispatcher;
use colab_room::ws::{Outbox, RoomRegistry, Session};
use serde_json::json;
use tokio::sync::mpsc::Receiver;

struct Client {
    session: Session,
    rx: Receiver<ServerEvent>,
}

impl Client {
    fn new(id: &str) -> Self {
        let (tx, rx) = Outbox::channel(1024);
        Self {
            session: Session::with_id(id, tx),
            rx,
        }
    }

    async fn send(&mut self, dispatcher: &Dispatcher, frame: serde_json::Value) {
        dispatcher
            .dispatch_text(&mut self.session, &frame.to_string())
            .await;
    }

    fn events(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

fn setup() -> (Arc<RoomRegistry>, Dispatcher) {
    let registry = Arc::new(RoomRegistry::default());
    let dispatcher = Dispatcher::new(registry.clone());
    (registry, dispatcher)
}

#[tokio::test]
async fn alice_and_bob_share_code_and_chat() {
    let (_registry, dispatcher) = setup();
    let mut alice = Client::new("alice-conn");
    let mut bob = Client::new("bob-conn");

    alice
        .send(&dispatcher, json!({"event": "createRoom", "data": {"roomId": "room-x", "username": "Alice"}}))
        .await;
    assert_eq!(alice.events(), vec![ServerEvent::RoomCreated("room-x".into())]);

    bob.send(&dispatcher, json!({"event": "joinRoom", "data": {"roomId": "room-x", "username": "Bob"}}))
        .await;
    match bob.events().as_slice() {
        [ServerEvent::RoomJoined(RoomJoinedMessage { room_id, code })] => {
            assert_eq!(room_id, "room-x");
            assert!(code.starts_with("# Sample Python program"));
        }
        other => panic!("unexpected events for Bob: {other:?}"),
    }
    assert_eq!(alice.events(), vec![ServerEvent::UserJoined("Bob".into())]);

    alice
        .send(&dispatcher, json!({"event": "codeChange", "data": {"room": "room-x", "code": "print(1)"}}))
        .await;
    assert_eq!(bob.events(), vec![ServerEvent::CodeUpdate("print(1)".into())]);
    assert!(alice.events().is_empty());

    bob.send(
        &dispatcher,
        json!({"event": "chatMessage", "data": {
            "room": "room-x",
            "message": "hi",
            "timestamp": "2024-05-01T10:00:00.000Z",
            "id": "spoofed",
            "sender": "Bob"
        }}),
    )
    .await;
    assert_eq!(
        alice.events(),
        vec![ServerEvent::NewChatMessage(ChatMessage {
            message: "hi".into(),
            timestamp: "2024-05-01T10:00:00.000Z".into(),
            id: "bob-conn".into(),
            sender: "Bob".into(),
        })]
    );
    assert!(bob.events().is_empty());
}

#[tokio::test]
async fn joining_missing_room_reports_error_only_to_requester() {
    let (registry, dispatcher) = setup();
    let mut carol = Client::new("carol-conn");

    carol
        .send(&dispatcher, json!({"event": "joinRoom", "data": "room-missing"}))
        .await;
    assert_eq!(
        carol.events(),
        vec![ServerEvent::JoinError("Room 'room-missing' does not exist".into())]
    );
    assert_eq!(registry.room_count().await, 0);
    assert_eq!(carol.session.room_id(), None);
}

#[tokio::test]
async fn failed_join_keeps_current_room() {
    let (registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut bob = Client::new("b");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    alice.events();
    alice.send(&dispatcher, json!({"event": "joinRoom", "data": "room-missing"})).await;

    assert_eq!(
        alice.events(),
        vec![ServerEvent::JoinError("Room 'room-missing' does not exist".into())]
    );
    assert_eq!(alice.session.room_id(), Some("room-x"));
    assert!(registry.contains("room-x").await);
    assert!(!registry.contains("room-missing").await);

    // Still a member: edits from others keep arriving.
    bob.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;
    bob.send(&dispatcher, json!({"event": "codeChange", "data": {"room": "room-x", "code": "y = 2"}}))
        .await;
    assert_eq!(
        alice.events(),
        vec![
            ServerEvent::UserJoined("Guest".into()),
            ServerEvent::CodeUpdate("y = 2".into()),
        ]
    );
}

#[tokio::test]
async fn failed_create_keeps_current_room() {
    let (registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut carol = Client::new("c");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-y"})).await;
    carol.send(&dispatcher, json!({"event": "createRoom", "data": "room-z"})).await;
    carol.send(&dispatcher, json!({"event": "createRoom", "data": "room-y"})).await;

    assert_eq!(
        carol.events(),
        vec![
            ServerEvent::RoomCreated("room-z".into()),
            ServerEvent::JoinError("Room 'room-y' already exists".into()),
        ]
    );
    assert_eq!(carol.session.room_id(), Some("room-z"));
    assert!(registry.contains("room-z").await);
    assert_eq!(registry.snapshot("room-y").await.unwrap().members.len(), 1);
}

#[tokio::test]
async fn successful_join_moves_between_rooms() {
    let (registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut bob = Client::new("b");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    bob.send(&dispatcher, json!({"event": "createRoom", "data": "room-z"})).await;
    bob.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;

    assert_eq!(bob.session.room_id(), Some("room-x"));
    assert!(!registry.contains("room-z").await);
    assert_eq!(registry.snapshot("room-x").await.unwrap().members.len(), 2);
}

#[tokio::test]
async fn second_creator_gets_join_error() {
    let (_registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut bob = Client::new("b");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    bob.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;

    assert_eq!(alice.events(), vec![ServerEvent::RoomCreated("room-x".into())]);
    assert_eq!(
        bob.events(),
        vec![ServerEvent::JoinError("Room 'room-x' already exists".into())]
    );
    assert_eq!(bob.session.room_id(), None);
}

#[tokio::test]
async fn join_after_edits_returns_current_buffer() {
    let (_registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut bob = Client::new("b");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    for code in ["a", "ab", "abc"] {
        alice
            .send(&dispatcher, json!({"event": "codeChange", "data": {"room": "room-x", "code": code}}))
            .await;
    }
    bob.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;
    assert_eq!(
        bob.events(),
        vec![ServerEvent::RoomJoined(RoomJoinedMessage {
            room_id: "room-x".into(),
            code: "abc".into(),
        })]
    );
}

#[tokio::test]
async fn code_change_reaches_members_only() {
    let (_registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut bob = Client::new("b");
    let mut carol = Client::new("c");
    let mut outsider = Client::new("o");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    bob.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;
    carol.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;
    outsider.send(&dispatcher, json!({"event": "createRoom", "data": "room-y"})).await;
    for client in [&mut alice, &mut bob, &mut carol, &mut outsider] {
        client.events();
    }

    bob.send(&dispatcher, json!({"event": "codeChange", "data": {"room": "room-x", "code": "X"}}))
        .await;
    assert_eq!(alice.events(), vec![ServerEvent::CodeUpdate("X".into())]);
    assert_eq!(carol.events(), vec![ServerEvent::CodeUpdate("X".into())]);
    assert!(bob.events().is_empty());
    assert!(outsider.events().is_empty());
}

#[tokio::test]
async fn non_member_code_change_is_dropped() {
    let (registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut intruder = Client::new("i");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    alice.events();

    intruder
        .send(&dispatcher, json!({"event": "codeChange", "data": {"room": "room-x", "code": "pwned"}}))
        .await;
    assert!(alice.events().is_empty());
    assert!(intruder.events().is_empty());
    assert_ne!(registry.snapshot("room-x").await.unwrap().code, "pwned");
}

#[tokio::test]
async fn leaving_stops_further_writes() {
    let (registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut bob = Client::new("b");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    bob.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;
    alice.events();
    bob.events();

    bob.send(&dispatcher, json!({"event": "leaveRoom", "data": "room-x"})).await;
    assert_eq!(alice.events(), vec![ServerEvent::UserLeft("Guest".into())]);
    assert_eq!(bob.session.room_id(), None);

    bob.send(&dispatcher, json!({"event": "codeChange", "data": {"room": "room-x", "code": "late"}}))
        .await;
    assert!(alice.events().is_empty());
    assert_ne!(registry.snapshot("room-x").await.unwrap().code, "late");

    // Leaving twice is harmless.
    bob.send(&dispatcher, json!({"event": "leaveRoom", "data": "room-x"})).await;
    assert!(alice.events().is_empty());
}

#[tokio::test]
async fn emptied_room_cannot_be_rejoined() {
    let (registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut bob = Client::new("b");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    dispatcher.disconnect(&mut alice.session).await;
    assert!(!registry.contains("room-x").await);

    bob.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;
    assert_eq!(
        bob.events(),
        vec![ServerEvent::JoinError("Room 'room-x' does not exist".into())]
    );

    bob.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    assert_eq!(bob.events(), vec![ServerEvent::RoomCreated("room-x".into())]);
}

#[tokio::test]
async fn disconnect_announces_departure() {
    let (_registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut bob = Client::new("b");

    alice
        .send(&dispatcher, json!({"event": "createRoom", "data": {"roomId": "room-x", "username": "Alice"}}))
        .await;
    bob.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;
    bob.events();

    dispatcher.disconnect(&mut alice.session).await;
    assert_eq!(bob.events(), vec![ServerEvent::UserLeft("Alice".into())]);
}

#[tokio::test]
async fn chat_from_one_sender_keeps_order() {
    let (_registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut bob = Client::new("b");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    bob.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;
    alice.events();

    for i in 0..20 {
        bob.send(
            &dispatcher,
            json!({"event": "chatMessage", "data": {"room": "room-x", "message": format!("msg {i}")}}),
        )
        .await;
    }
    let received: Vec<String> = alice
        .events()
        .into_iter()
        .map(|event| match event {
            ServerEvent::NewChatMessage(chat) => chat.message,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    let expected: Vec<String> = (0..20).map(|i| format!("msg {i}")).collect();
    assert_eq!(received, expected);
}

#[tokio::test]
async fn blank_chat_is_not_relayed() {
    let (_registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut bob = Client::new("b");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    bob.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;
    alice.events();
    bob.events();

    bob.send(&dispatcher, json!({"event": "chatMessage", "data": {"room": "room-x", "message": "   "}}))
        .await;
    assert!(alice.events().is_empty());
    assert!(bob.events().is_empty());
}

#[tokio::test]
async fn typing_is_relayed_with_server_identity() {
    let (registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    let mut bob = Client::new("b");

    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;
    bob.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;
    alice.events();

    bob.send(
        &dispatcher,
        json!({"event": "typing", "data": {"room": "room-x", "username": "Bob", "userId": "someone-else"}}),
    )
    .await;
    let events = alice.events();
    assert_eq!(events.len(), 1);
    let ServerEvent::UserTyping(typing) = &events[0] else {
        panic!("expected userTyping, got {events:?}");
    };
    assert_eq!(typing.user_id, "b");
    assert_eq!(typing.username, "Bob");
    assert_eq!(registry.snapshot("room-x").await.unwrap().typing, vec!["Bob"]);

    bob.send(&dispatcher, json!({"event": "stopTyping", "data": {"room": "room-x", "userId": "b"}}))
        .await;
    assert!(matches!(
        alice.events().as_slice(),
        [ServerEvent::UserStoppedTyping(stopped)] if stopped.user_id == "b"
    ));
    assert!(registry.snapshot("room-x").await.unwrap().typing.is_empty());
    assert!(bob.events().is_empty());
}

#[tokio::test]
async fn concurrent_editors_converge_on_last_write() {
    let (registry, dispatcher) = setup();
    let mut alice = Client::new("a");
    alice.send(&dispatcher, json!({"event": "createRoom", "data": "room-x"})).await;

    let mut editors = Vec::new();
    for i in 0..8 {
        let mut editor = Client::new(&format!("e{i}"));
        editor.send(&dispatcher, json!({"event": "joinRoom", "data": "room-x"})).await;
        editors.push(editor);
    }
    alice.events();
    for editor in editors.iter_mut() {
        editor.events();
    }

    let mut tasks = Vec::new();
    for (i, mut editor) in editors.into_iter().enumerate() {
        let dispatcher = dispatcher.clone();
        tasks.push(tokio::spawn(async move {
            for n in 0..10 {
                editor
                    .send(&dispatcher, json!({"event": "codeChange", "data": {"room": "room-x", "code": format!("{i}:{n}")}}))
                    .await;
            }
            editor
        }));
    }
    let mut editors = Vec::new();
    for task in tasks {
        editors.push(task.await.unwrap());
    }

    // Alice saw every update, in the order the room applied them; the last one is the buffer.
    let updates: Vec<String> = alice
        .events()
        .into_iter()
        .filter_map(|event| match event {
            ServerEvent::CodeUpdate(code) => Some(code),
            _ => None,
        })
        .collect();
    assert_eq!(updates.len(), 80);
    let final_code = registry.snapshot("room-x").await.unwrap().code;
    assert_eq!(updates.last(), Some(&final_code));
}
