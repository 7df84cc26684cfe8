pub mod admin_service;
pub mod auth_service;
pub mod balance_service;
pub mod market_service;
pub mod profile_service;
pub mod transaction_service;
