//! WebSocket endpoint for the realtime product feed.

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{
    notifier::ObserverId,
    protocol::{ClientEvent, ServerEvent},
};
use crate::{
    error::{AppError, AppResult},
    services::{parse_id, product_service},
    state::AppState,
};

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    // Registering pushes the initial list into `rx` before the writer starts,
    // so it is the first frame the observer sees.
    let observer = state.notifier.connect(tx).await;

    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to encode realtime event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = ws_rx.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(err) => {
                warn!(observer = %observer, error = %err, "websocket error");
                break;
            }
        };
        match msg {
            Message::Text(text) => handle_frame(&state, observer, text.as_bytes()).await,
            Message::Binary(data) => handle_frame(&state, observer, &data).await,
            // Pings are answered by the websocket layer itself.
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => break,
        }
    }

    state.notifier.disconnect(&observer);
    send_task.abort();
}

/// Runs one inbound frame; failures go back to the sender as `products:error`.
pub async fn handle_frame(state: &AppState, observer: ObserverId, raw: &[u8]) {
    let result = match serde_json::from_slice::<ClientEvent>(raw) {
        Ok(event) => handle_event(state, event).await,
        Err(err) => Err(AppError::validation(format!("malformed message: {err}"))),
    };

    if let Err(err) = result {
        debug!(observer = %observer, error = %err, "realtime request failed");
        state
            .notifier
            .send_to(&observer, ServerEvent::Error(err.to_string()));
    }
}

/// Catalog mutations broadcast the product list themselves, to every observer.
pub async fn handle_event(state: &AppState, event: ClientEvent) -> AppResult<()> {
    match event {
        ClientEvent::CreateProduct(fields) => {
            product_service::create_product(state, fields).await?;
        }
        ClientEvent::DeleteProduct(raw_id) => {
            let id = parse_id(&raw_id).ok_or_else(product_service::product_not_found)?;
            product_service::delete_product(state, id).await?;
        }
    }
    Ok(())
}
