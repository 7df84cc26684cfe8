use eyre::{eyre, Report};
use secrecy::SecretString;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PriceFeedInfo {
    pub api_url: String,
    pub api_key: Option<SecretString>,
    pub refresh_interval: Duration,
    pub broadcast_interval: Duration,
    pub request_timeout: Duration,
}

impl PriceFeedInfo {
    pub fn new() -> Result<Self, Report> {
        Ok(Self {
            api_url: env::var("PRICE_FEED_URL")
                .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".into()),
            api_key: env::var("PRICE_FEED_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            refresh_interval: Duration::from_secs(secs_from_env("PRICE_REFRESH_SECS", 60)?),
            broadcast_interval: Duration::from_secs(secs_from_env("MARKET_BROADCAST_SECS", 30)?),
            request_timeout: Duration::from_secs(10),
        })
    }
}

fn secs_from_env(key: &str, default: u64) -> Result<u64, Report> {
    match env::var(key) {
        Ok(raw) => {
            let secs: u64 = raw
                .parse()
                .map_err(|e| eyre!("Invalid {}: {}", key, e))?;
            if secs == 0 {
                return Err(eyre!("{} must be greater than zero", key));
            }
            Ok(secs)
        }
        Err(_) => Ok(default),
    }
}
