use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;
use vaultex_primitives::models::dtos::notification_dto::ServerEvent;

pub type ConnectionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub is_admin: bool,
}

struct Connection {
    identity: Option<Identity>,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

/// Registry of live push connections.
///
/// A connection starts anonymous and becomes addressable by user once it
/// authenticates. One user may hold several connections at once. Events are
/// queued per connection, so each connection sees them in send order.
#[derive(Default)]
pub struct NotificationHub {
    next_id: AtomicU64,
    connections: DashMap<ConnectionId, Connection>,
    by_user: DashMap<Uuid, HashSet<ConnectionId>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (sender, receiver) = mpsc::unbounded_channel();

        self.connections.insert(
            id,
            Connection {
                identity: None,
                sender,
            },
        );

        debug!(connection_id = id, "hub: connection registered");
        (id, receiver)
    }

    /// Binds `id` to `identity`, replacing any earlier binding. Returns false
    /// when the connection is no longer registered.
    pub fn authenticate(&self, id: ConnectionId, identity: Identity) -> bool {
        let previous = match self.connections.get_mut(&id) {
            Some(mut conn) => conn.identity.replace(identity),
            None => return false,
        };

        if let Some(previous) = previous {
            self.unindex(previous.user_id, id);
        }
        if !self.index(identity.user_id, id) {
            debug!(connection_id = id, "hub: connection closed while authenticating");
            return false;
        }

        info!(
            connection_id = id,
            user_id = %identity.user_id,
            is_admin = identity.is_admin,
            "hub: connection authenticated"
        );
        true
    }

    pub fn unregister(&self, id: ConnectionId) {
        if let Some((_, conn)) = self.connections.remove(&id) {
            if let Some(identity) = conn.identity {
                self.unindex(identity.user_id, id);
            }
            debug!(connection_id = id, "hub: connection removed");
        }
    }

    pub fn identity(&self, id: ConnectionId) -> Option<Identity> {
        self.connections.get(&id).and_then(|conn| conn.identity)
    }

    /// Queues `event` on a single connection.
    pub fn send_to(&self, id: ConnectionId, event: ServerEvent) -> bool {
        let delivered = self
            .connections
            .get(&id)
            .map(|conn| conn.sender.send(event).is_ok())
            .unwrap_or(false);

        if !delivered {
            self.unregister(id);
        }
        delivered
    }

    /// Returns how many connections the event was queued on.
    pub fn send_to_user(&self, user_id: Uuid, event: ServerEvent) -> usize {
        let targets: Vec<ConnectionId> = self
            .by_user
            .get(&user_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();

        self.deliver(targets, event)
    }

    pub fn send_to_admins(&self, event: ServerEvent) -> usize {
        let targets: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|conn| conn.identity.is_some_and(|identity| identity.is_admin))
            .map(|conn| *conn.key())
            .collect();

        self.deliver(targets, event)
    }

    /// Every registered connection, authenticated or not.
    pub fn broadcast(&self, event: ServerEvent) -> usize {
        let targets: Vec<ConnectionId> = self.connections.iter().map(|c| *c.key()).collect();
        self.deliver(targets, event)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn authenticated_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|conn| conn.identity.is_some())
            .count()
    }

    pub fn user_connection_count(&self, user_id: Uuid) -> usize {
        self.by_user.get(&user_id).map(|ids| ids.len()).unwrap_or(0)
    }

    fn deliver(&self, targets: Vec<ConnectionId>, event: ServerEvent) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for id in targets {
            let sent = match self.connections.get(&id) {
                Some(conn) => conn.sender.send(event.clone()).is_ok(),
                None => continue,
            };

            if sent {
                delivered += 1;
            } else {
                closed.push(id);
            }
        }

        for id in closed {
            self.unregister(id);
        }

        debug!(kind = event.kind(), delivered, "hub: event fanned out");
        delivered
    }

    /// Adds `id` under `user_id`. An `unregister` that ran in between the
    /// identity write and this insert would have missed the entry, so it is
    /// withdrawn again when the connection is already gone.
    fn index(&self, user_id: Uuid, id: ConnectionId) -> bool {
        self.by_user.entry(user_id).or_default().insert(id);

        if self.connections.contains_key(&id) {
            return true;
        }
        self.unindex(user_id, id);
        false
    }

    fn unindex(&self, user_id: Uuid, id: ConnectionId) {
        let now_empty = match self.by_user.get_mut(&user_id) {
            Some(mut ids) => {
                ids.remove(&id);
                ids.is_empty()
            }
            None => false,
        };

        if now_empty {
            self.by_user.remove_if(&user_id, |_, ids| ids.is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultex_primitives::models::dtos::notification_dto::ErrorNotice;

    fn notice(text: &str) -> ServerEvent {
        ServerEvent::Error(ErrorNotice {
            message: text.to_string(),
        })
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[test]
    fn user_events_reach_every_connection_of_that_user_only() {
        let hub = NotificationHub::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let (tab_one, mut rx_one) = hub.register();
        let (tab_two, mut rx_two) = hub.register();
        let (other, mut rx_other) = hub.register();

        hub.authenticate(tab_one, Identity { user_id: alice, is_admin: false });
        hub.authenticate(tab_two, Identity { user_id: alice, is_admin: false });
        hub.authenticate(other, Identity { user_id: bob, is_admin: false });

        assert_eq!(hub.send_to_user(alice, notice("hi")), 2);
        assert_eq!(drain(&mut rx_one).len(), 1);
        assert_eq!(drain(&mut rx_two).len(), 1);
        assert!(drain(&mut rx_other).is_empty());
    }

    #[test]
    fn admin_events_skip_regular_and_anonymous_connections() {
        let hub = NotificationHub::new();

        let (admin, mut rx_admin) = hub.register();
        let (user, mut rx_user) = hub.register();
        let (_anon, mut rx_anon) = hub.register();

        hub.authenticate(admin, Identity { user_id: Uuid::new_v4(), is_admin: true });
        hub.authenticate(user, Identity { user_id: Uuid::new_v4(), is_admin: false });

        assert_eq!(hub.send_to_admins(notice("audit")), 1);
        assert_eq!(drain(&mut rx_admin).len(), 1);
        assert!(drain(&mut rx_user).is_empty());
        assert!(drain(&mut rx_anon).is_empty());
    }

    #[test]
    fn broadcast_includes_anonymous_connections() {
        let hub = NotificationHub::new();
        let (_a, mut rx_a) = hub.register();
        let (b, mut rx_b) = hub.register();
        hub.authenticate(b, Identity { user_id: Uuid::new_v4(), is_admin: false });

        assert_eq!(hub.broadcast(ServerEvent::MarketDataUpdate(vec![])), 2);
        assert_eq!(drain(&mut rx_a).len(), 1);
        assert_eq!(drain(&mut rx_b).len(), 1);
    }

    #[test]
    fn closed_connections_are_pruned() {
        let hub = NotificationHub::new();
        let user_id = Uuid::new_v4();

        let (id, rx) = hub.register();
        hub.authenticate(id, Identity { user_id, is_admin: false });
        drop(rx);

        assert_eq!(hub.send_to_user(user_id, notice("gone")), 0);
        assert_eq!(hub.connection_count(), 0);
        assert_eq!(hub.user_connection_count(user_id), 0);
    }

    #[test]
    fn reauthentication_moves_the_index() {
        let hub = NotificationHub::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let (id, mut rx) = hub.register();
        hub.authenticate(id, Identity { user_id: first, is_admin: false });
        hub.authenticate(id, Identity { user_id: second, is_admin: true });

        assert_eq!(hub.user_connection_count(first), 0);
        assert_eq!(hub.send_to_user(second, notice("moved")), 1);
        assert_eq!(drain(&mut rx).len(), 1);
        assert_eq!(
            hub.identity(id),
            Some(Identity { user_id: second, is_admin: true })
        );

        hub.unregister(id);
        assert_eq!(hub.authenticated_count(), 0);
        assert!(!hub.authenticate(id, Identity { user_id: first, is_admin: false }));
    }

    #[test]
    fn index_written_after_unregister_is_withdrawn() {
        let hub = NotificationHub::new();
        let user_id = Uuid::new_v4();
        let (id, _rx) = hub.register();
        hub.unregister(id);

        // the tail of an authenticate that lost the race with unregister
        assert!(!hub.index(user_id, id));
        assert_eq!(hub.user_connection_count(user_id), 0);
        assert_eq!(hub.send_to_user(user_id, notice("gone")), 0);
    }

    #[test]
    fn racing_authenticate_and_unregister_leave_no_index_entries() {
        let hub = NotificationHub::new();
        let user_id = Uuid::new_v4();

        for _ in 0..200 {
            let (id, _rx) = hub.register();
            std::thread::scope(|scope| {
                scope.spawn(|| hub.authenticate(id, Identity { user_id, is_admin: false }));
                scope.spawn(|| hub.unregister(id));
            });
        }

        assert_eq!(hub.connection_count(), 0);
        assert_eq!(hub.user_connection_count(user_id), 0);
    }
}
