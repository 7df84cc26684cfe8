use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, warn};
use vaultex_core::notifications::{ConnectionId, Identity};
use vaultex_core::{AppState, SecurityConfig};
use vaultex_primitives::models::dtos::notification_dto::{
    AuthenticatePayload, AuthenticatedAck, ClientMessage, ErrorNotice, ServerEvent,
};

/// Push channel. Send `{"type":"authenticate","data":{"userId":..,"isAdmin":..}}`
/// first; market updates arrive before that, user events only after.
#[utoipa::path(
    get,
    path = "/ws",
    responses(
        (status = 101, description = "Switching to the push protocol")
    ),
    tag = "Notifications"
)]
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (id, mut events) = state.hub.register();
    let (mut sink, mut stream) = socket.split();

    let outgoing = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!(connection = id, kind = event.kind(), "ws: encode failed: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => handle_message(&state, id, text.as_str()),
            Ok(Message::Binary(_)) => reply_error(&state, id, "Binary frames are not supported"),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(connection = id, "ws: read failed: {}", e);
                break;
            }
        }
    }

    state.hub.unregister(id);
    outgoing.abort();
}

fn handle_message(state: &AppState, id: ConnectionId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            debug!(connection = id, "ws: unreadable message: {}", e);
            reply_error(state, id, "Unrecognized message");
            return;
        }
    };

    match message {
        ClientMessage::Authenticate(payload) => match resolve_identity(state, payload) {
            Ok(identity) => {
                state.hub.authenticate(id, identity);
                state.hub.send_to(
                    id,
                    ServerEvent::Authenticated(AuthenticatedAck {
                        user_id: identity.user_id,
                        is_admin: identity.is_admin,
                    }),
                );
            }
            Err(reason) => {
                warn!(connection = id, "ws: authentication refused: {}", reason);
                reply_error(state, id, reason);
            }
        },
        ClientMessage::Ping => {
            state.hub.send_to(id, ServerEvent::Pong);
        }
    }
}

/// With `ws_require_token` the token decides the identity and admin flag;
/// otherwise the client's claim is taken as given.
fn resolve_identity(
    state: &AppState,
    payload: AuthenticatePayload,
) -> Result<Identity, &'static str> {
    if !state.config.ws_require_token {
        return Ok(Identity {
            user_id: payload.user_id,
            is_admin: payload.is_admin,
        });
    }

    let token = payload.token.as_deref().ok_or("Session token required")?;
    let claims =
        SecurityConfig::verify_token(state, token).map_err(|_| "Invalid or expired token")?;

    if claims.sub != payload.user_id.to_string() {
        return Err("Token does not belong to this user");
    }

    Ok(Identity {
        user_id: payload.user_id,
        is_admin: claims.admin,
    })
}

fn reply_error(state: &AppState, id: ConnectionId, message: &str) {
    state.hub.send_to(
        id,
        ServerEvent::Error(ErrorNotice {
            message: message.to_string(),
        }),
    );
}
