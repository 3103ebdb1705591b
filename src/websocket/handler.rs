use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{error, info, warn};

use crate::state::AppState;
use crate::ws::{Outbox, Session};

/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Every event for this connection funnels through one outbox
    let (outbox, mut inbox) = Outbox::channel(state.config.outbox_capacity);
    let overflow = outbox.clone();
    let mut session = Session::new(outbox);
    let connection_id = session.connection_id().to_string();
    let open = state.connections.fetch_add(1, Ordering::Relaxed) + 1;
    info!(
        "WebSocket connection established with connection_id: {} ({} open)",
        connection_id, open
    );

    let (mut sender, mut receiver) = socket.split();

    // Writer: drain the outbox into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = inbox.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize {:?}: {}", event, e);
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Reader: events are handled one at a time, in arrival order
    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    state.dispatcher.dispatch_text(&mut session, &text).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!("WebSocket error on {}: {}", connection_id, e);
                    break;
                }
            },
            _ = &mut send_task => break,
            _ = overflow.overflowed() => {
                warn!("Connection {} cannot keep up with its rooms, closing it", connection_id);
                break;
            }
        }
    }

    state.dispatcher.disconnect(&mut session).await;
    send_task.abort();
    state.connections.fetch_sub(1, Ordering::Relaxed);
    info!("WebSocket connection {} terminated", connection_id);
}
