pub mod app_config;
pub mod jwt_details;
pub mod price_feed_details;

pub use app_config::*;
pub use jwt_details::*;
pub use price_feed_details::*;
