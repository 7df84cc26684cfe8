pub mod client;
pub mod hub;
pub mod reconnect;

pub use client::{HubClient, HubClientConfig};
pub use hub::{ConnectionId, Identity, NotificationHub};
pub use reconnect::{ConnectionState, ReconnectPolicy, Reconnector};
