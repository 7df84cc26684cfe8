pub mod cryptocurrency;
pub mod enum_types;
pub mod fiat_balance;
pub mod market_data;
pub mod transaction;
pub mod user;
pub mod wallet;

pub use cryptocurrency::*;
pub use enum_types::*;
pub use fiat_balance::*;
pub use market_data::*;
pub use transaction::*;
pub use user::*;
pub use wallet::*;
