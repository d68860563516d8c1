use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tracing::{info, warn};

use crate::hub::NotificationHub;

/// Text frame pushed for every broadcast. Clients re-query the message
/// log with their last-seen cursor when they see it.
const REFRESH_FRAME: &str = "refresh";

/// Drive one notification connection: register with the hub, forward
/// each refresh signal as a text frame, and unregister as soon as the
/// socket closes or a write fails.
pub async fn handle_connection(socket: WebSocket, hub: NotificationHub, username: String) {
    let (mut sender, mut receiver) = socket.split();
    let (conn_id, mut refresh_rx) = hub.register().await;

    info!("{} connected to notifications ({})", username, conn_id);

    loop {
        tokio::select! {
            signal = refresh_rx.recv() => {
                if signal.is_none() {
                    break;
                }
                if sender.send(Message::Text(REFRESH_FRAME.into())).await.is_err() {
                    warn!("Failed to push refresh to {} ({}), dropping", username, conn_id);
                    break;
                }
            }
            frame = receiver.next() => {
                match frame {
                    // The channel carries no inbound content; only Close
                    // (or a transport error) matters.
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    hub.unregister(conn_id).await;
    info!("{} disconnected from notifications ({})", username, conn_id);
}
