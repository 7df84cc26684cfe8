pub mod cache;
pub mod fallback;

pub use cache::MarketDataCache;
pub use fallback::fallback_quote;
