use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::console::{ConsoleController, ConsoleSession};
use crate::handlers;
use crate::llm::ChatBackend;
use crate::state::{AppState, ClientContext};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let client_uid = state.generate_client_uid();
    info!("New console connection: {}", client_uid);

    state.client_contexts.insert(
        client_uid.clone(),
        ClientContext {
            client_uid: client_uid.clone(),
        },
    );

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Pump console updates out to the socket; ends when the controller and
    // its refresh tasks have dropped every sender.
    tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            match serde_json::to_string(&update) {
                Ok(frame) => {
                    if sender.send(Message::Text(frame)).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!("Failed to encode update frame: {}", e),
            }
        }
    });

    let backend: Arc<dyn ChatBackend> = state.backend.clone();
    let console = ConsoleController::new(
        ConsoleSession::new(state.config.translator_config.clone()),
        backend,
        tx,
    );
    console.hello().await;

    // One message at a time; a translation in flight holds the loop, which
    // is what the disabled translate control reflects on the surface.
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) = handlers::handle_message(&console, &text).await {
                    error!("Error handling message: {}", e);
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", client_uid);
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    state.client_contexts.remove(&client_uid);
    info!("Cleaned up client {}", client_uid);
}
