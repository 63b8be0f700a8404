use crate::driver::slider::SliderState;
use crate::state::{AppState, ClientMessage, WsMessage};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{Sink, SinkExt, StreamExt};
use portable_atomic::Ordering;
use std::sync::Arc;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One slider per connection. Messages are handled strictly in arrival
/// order; each reply is sent before the next message is read.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let connection = state.counters.ws_connections.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::info!(connection, "dashboard client connected");

    let mut slider = SliderState::new(state.scenario, state.slider);

    // Initial evaluation at the price the user typed in
    let initial = WsMessage::DisplayUpdate(slider.current());
    state.record_update();
    if send(&mut sender, &state, &initial).await.is_err() {
        return;
    }

    while let Some(msg) = receiver.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => continue,
        };

        let reply = handle_client_text(&mut slider, text.as_str(), &state);
        if send(&mut sender, &state, &reply).await.is_err() {
            break;
        }
    }

    tracing::info!(connection, last_price = slider.current_price, "dashboard client disconnected");
}

/// Decode one client message and run the change handler.
pub fn handle_client_text(slider: &mut SliderState, text: &str, state: &AppState) -> WsMessage {
    let reject = |reason: String| {
        state.counters.rejected_messages.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(%reason, "rejected dashboard message");
        WsMessage::Error { reason }
    };

    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::PriceChanged { price }) => match slider.on_slider_input(price) {
            Some(update) => {
                state.record_update();
                WsMessage::DisplayUpdate(update)
            }
            None => reject(format!("price must be finite, got {price}")),
        },
        Err(e) => reject(format!("bad message: {e}")),
    }
}

/// Encodes and sends one message. Either failure ends the connection; the
/// sent counter only moves once the sink accepted the frame.
async fn send<S, T>(sender: &mut S, state: &AppState, msg: &T) -> Result<(), ()>
where
    S: Sink<Message> + Unpin,
    T: serde::Serialize,
{
    let json = serde_json::to_string(msg).map_err(|e| {
        tracing::error!(error = %e, "failed to encode ws message, closing connection");
    })?;
    sender.send(Message::Text(json.into())).await.map_err(|_| ())?;
    state.counters.ws_messages_sent.fetch_add(1, Ordering::Relaxed);
    Ok(())
}
