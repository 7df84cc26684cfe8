pub mod app_state;
pub mod clients;
pub mod market;
pub mod notifications;
pub mod repositories;
pub mod security;
pub mod services;

pub use app_state::AppState;
pub use security::{Claims, SecurityConfig};
