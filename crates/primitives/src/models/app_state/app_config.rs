use crate::models::app_state::jwt_details::JWTInfo;
use crate::models::app_state::price_feed_details::PriceFeedInfo;
use crate::models::entities::enum_types::FiatCurrency;
use eyre::{eyre, Report};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_env: String,

    pub jwt_details: JWTInfo,

    pub price_feed: PriceFeedInfo,

    /// Fiat balance opened for every new user.
    pub default_fiat: FiatCurrency,

    /// When set, hub `authenticate` messages must carry a valid session token.
    pub ws_require_token: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let is_production = app_env == "production";

        let default_fiat = FiatCurrency::parse(
            &env::var("DEFAULT_FIAT").unwrap_or_else(|_| "ZAR".into()),
        )
        .map_err(|e| eyre!("Invalid DEFAULT_FIAT: {}", e))?;

        let ws_require_token = match env::var("WS_REQUIRE_TOKEN") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| eyre!("Invalid WS_REQUIRE_TOKEN: {}", e))?,
            Err(_) => is_production,
        };

        Ok(Self {
            jwt_details: JWTInfo::new(is_production)?,

            price_feed: PriceFeedInfo::new()?,

            default_fiat,

            ws_require_token,

            app_env,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}
