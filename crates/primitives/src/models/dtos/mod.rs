pub mod admin_dto;
pub mod auth_dto;
pub mod market_dto;
pub mod notification_dto;
pub mod profile_dto;
pub mod transaction_dto;
pub mod wallet_dto;

pub use admin_dto::*;
pub use auth_dto::*;
pub use market_dto::*;
pub use notification_dto::*;
pub use profile_dto::*;
pub use transaction_dto::*;
pub use wallet_dto::*;
