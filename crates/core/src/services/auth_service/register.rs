use crate::app_state::AppState;
use crate::repositories::ledger_store::run_atomic;
use crate::security::SecurityConfig;
use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::{Argon2, Params};
use secrecy::{ExposeSecret, SecretString};
use tracing::{error, info};
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::dtos::auth_dto::{AuthResponse, RegisterRequest, UserDto};
use vaultex_primitives::models::entities::{NewWallet, UpsertUser};

pub struct RegisterService;

impl RegisterService {
    /// Creates the account, one empty wallet per active cryptocurrency and an
    /// empty balance in the default fiat currency, all in one unit.
    pub async fn register(
        state: &AppState,
        payload: RegisterRequest,
    ) -> Result<AuthResponse, ApiError> {
        let password = SecretString::from(payload.password);
        let password_hash = Self::hash_password(&password)?;

        let new_user = UpsertUser {
            id: Uuid::new_v4(),
            username: payload.username,
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            country: payload.country,
            city: payload.city,
            is_admin: false,
            is_active: true,
        };
        let default_fiat = state.config.default_fiat;

        let (user, wallet_count) = run_atomic(state.ledger.as_ref(), |tx| {
            let user = tx.insert_user(&new_user)?;

            let cryptos = tx.active_cryptocurrencies()?;
            for crypto in &cryptos {
                tx.create_wallet(&NewWallet {
                    user_id: user.id,
                    crypto_id: crypto.id,
                    address: Self::generate_address(&crypto.symbol),
                })?;
            }

            tx.lock_fiat_balance(user.id, default_fiat)?;
            Ok((user, cryptos.len()))
        })?;

        let token = SecurityConfig::create_token(state, &user).map_err(|_| {
            error!("auth.register: jwt generation failed");
            ApiError::Internal("Authentication service error".into())
        })?;

        info!(
            user_id = %user.id,
            email = %user.email,
            wallets = wallet_count,
            "User registered successfully"
        );

        Ok(AuthResponse {
            token,
            user: UserDto::from(&user),
        })
    }

    pub fn hash_password(password: &SecretString) -> Result<String, ApiError> {
        let argon2 = Self::create_argon2()?;
        let salt = SaltString::generate(&mut OsRng);

        argon2
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| {
                error!("auth.register: password hashing failed");
                ApiError::Internal("Credential processing failed".into())
            })
    }

    pub fn create_argon2() -> Result<Argon2<'static>, ApiError> {
        let params = Params::new(
            65536, // 64 MiB memory
            3,     // iterations
            1,     // parallelism
            None,
        )
        .map_err(|e| {
            error!("Argon2 params error: {}", e);
            ApiError::Internal("Encryption configuration error".to_string())
        })?;
        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }

    /// Display-only receiving address; nothing is derived from a key.
    pub fn generate_address(symbol: &str) -> String {
        let bytes: [u8; 20] = rand::random();
        let prefix = match symbol {
            "BTC" => "bc1q",
            "XRP" => "r",
            "SOL" => "",
            _ => "0x",
        };
        format!("{}{}", prefix, hex::encode(bytes))
    }
}
