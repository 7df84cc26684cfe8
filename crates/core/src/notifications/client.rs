use crate::notifications::reconnect::{ConnectionState, ReconnectPolicy, Reconnector};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vaultex_primitives::models::dtos::notification_dto::{
    AuthenticatePayload, ClientMessage, ServerEvent,
};

#[derive(Debug, Clone)]
pub struct HubClientConfig {
    /// e.g. `ws://localhost:8080/ws`
    pub url: String,
    pub user_id: Uuid,
    pub is_admin: bool,
    pub token: Option<String>,
    pub policy: ReconnectPolicy,
}

enum SessionEnd {
    Clean,
    Abnormal,
    Shutdown,
}

/// Reconnecting subscriber for the notification hub.
///
/// Each (re)connection sends `authenticate` first. Events missed while
/// disconnected are not replayed; callers should re-fetch state whenever the
/// client reaches [`ConnectionState::Authenticated`] again.
pub struct HubClient {
    events: mpsc::UnboundedReceiver<ServerEvent>,
    state: watch::Receiver<ConnectionState>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl HubClient {
    pub fn spawn(config: HubClientConfig) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(ConnectionState::Disconnected);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(run(config, events_tx, state_tx, shutdown_rx));

        Self {
            events,
            state,
            shutdown,
            task,
        }
    }

    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        self.events.recv().await
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Sends a close frame and waits for the background task to stop.
    pub async fn close(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    /// Resolves once the background task has stopped on its own, either
    /// after a clean close or after the retry budget ran out.
    pub async fn finished(self) {
        let _ = self.task.await;
    }
}

async fn run(
    config: HubClientConfig,
    events: mpsc::UnboundedSender<ServerEvent>,
    state: watch::Sender<ConnectionState>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut reconnector = Reconnector::new(config.policy);

    loop {
        reconnector.on_connecting();
        state.send_replace(reconnector.state());

        let end = session(&config, &events, &state, &mut reconnector, &mut shutdown).await;

        let clean = match end {
            SessionEnd::Shutdown => {
                state.send_replace(ConnectionState::Disconnected);
                info!(user_id = %config.user_id, "hub client: shut down");
                return;
            }
            SessionEnd::Clean => true,
            SessionEnd::Abnormal => false,
        };

        let next = reconnector.on_disconnected(clean);
        state.send_replace(reconnector.state());

        let Some(delay) = next else {
            if clean {
                info!(user_id = %config.user_id, "hub client: connection closed");
            } else {
                warn!(
                    user_id = %config.user_id,
                    attempts = reconnector.attempts(),
                    "hub client: giving up on reconnect"
                );
            }
            return;
        };

        debug!(
            attempt = reconnector.attempts(),
            delay_ms = delay.as_millis() as u64,
            "hub client: reconnect scheduled"
        );

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => {
                info!(user_id = %config.user_id, "hub client: shut down");
                return;
            }
        }
    }
}

async fn session(
    config: &HubClientConfig,
    events: &mpsc::UnboundedSender<ServerEvent>,
    state: &watch::Sender<ConnectionState>,
    reconnector: &mut Reconnector,
    shutdown: &mut watch::Receiver<bool>,
) -> SessionEnd {
    let (socket, _) = match connect_async(config.url.as_str()).await {
        Ok(connected) => connected,
        Err(e) => {
            warn!(error = %e, url = %config.url, "hub client: connect failed");
            return SessionEnd::Abnormal;
        }
    };
    let (mut sink, mut stream) = socket.split();

    let authenticate = ClientMessage::Authenticate(AuthenticatePayload {
        user_id: config.user_id,
        is_admin: config.is_admin,
        token: config.token.clone(),
    });
    let text = match serde_json::to_string(&authenticate) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "hub client: could not encode authenticate");
            return SessionEnd::Shutdown;
        }
    };
    if sink.send(Message::text(text)).await.is_err() {
        return SessionEnd::Abnormal;
    }

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                let _ = sink.send(Message::Close(None)).await;
                return SessionEnd::Shutdown;
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let event = match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            warn!(error = %e, "hub client: undecodable event");
                            continue;
                        }
                    };

                    if matches!(event, ServerEvent::Authenticated(_)) {
                        reconnector.on_authenticated();
                        state.send_replace(reconnector.state());
                    }

                    if events.send(event).is_err() {
                        // receiver gone, nobody to deliver to
                        let _ = sink.send(Message::Close(None)).await;
                        return SessionEnd::Shutdown;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    return match frame {
                        Some(frame) if frame.code == CloseCode::Normal => SessionEnd::Clean,
                        other => {
                            warn!(
                                code = ?other.map(|f| f.code),
                                "hub client: server closed abnormally"
                            );
                            SessionEnd::Abnormal
                        }
                    };
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "hub client: connection error");
                    return SessionEnd::Abnormal;
                }
                None => return SessionEnd::Abnormal,
            }
        }
    }
}
