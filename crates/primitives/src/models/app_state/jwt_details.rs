use eyre::{eyre, Report};
use secrecy::SecretString;
use std::env;
use tracing::warn;

const DEV_JWT_SECRET: &str = "vaultex-development-secret-do-not-use-in-production";

#[derive(Clone, Debug)]
pub struct JWTInfo {
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub jwt_issuer: String,
    pub jwt_audience: String,
}

impl JWTInfo {
    pub fn new(is_production: bool) -> Result<JWTInfo, Report> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if is_production => {
                return Err(eyre!("JWT_SECRET must be set in production"));
            }
            Err(_) => {
                warn!("JWT_SECRET not set, falling back to the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        if jwt_secret.len() < 32 {
            return Err(eyre!("JWT_SECRET must be at least 32 characters long"));
        }

        Ok(Self {
            jwt_secret: SecretString::from(jwt_secret),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".into())
                .parse()
                .map_err(|e| eyre!("Invalid JWT_EXPIRATION_HOURS: {}", e))?,
            jwt_issuer: env::var("ISSUER").unwrap_or_else(|_| "vaultex".into()),
            jwt_audience: env::var("AUDIENCE").unwrap_or_else(|_| "vaultex_api".into()),
        })
    }
}
