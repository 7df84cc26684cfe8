use crate::app_state::AppState;
use crate::security::SecurityConfig;
use crate::services::auth_service::register::RegisterService;
use argon2::{password_hash::PasswordHash, PasswordVerifier};
use tracing::{error, info, warn};
use vaultex_primitives::error::{ApiError, AuthError};
use vaultex_primitives::models::dtos::auth_dto::{AuthResponse, LoginRequest, UserDto};
use vaultex_primitives::models::entities::User;

pub struct LoginService;

impl LoginService {
    pub async fn login(state: &AppState, payload: LoginRequest) -> Result<AuthResponse, ApiError> {
        let user = state.ledger.get_user_by_email(&payload.email)?;
        Self::verify_password(&payload.password, user.as_ref())?;

        let user = user.ok_or(ApiError::Auth(AuthError::InvalidCredentials))?;

        if !user.is_active {
            warn!(user_id = %user.id, "auth.login: inactive account");
            return Err(ApiError::Auth(AuthError::InactiveAccount));
        }

        let token = SecurityConfig::create_token(state, &user).map_err(|_| {
            error!("auth.login: jwt creation failed");
            ApiError::Internal("Authentication service unavailable".into())
        })?;

        info!(user_id = %user.id, "User logged in successfully");

        Ok(AuthResponse {
            token,
            user: UserDto::from(&user),
        })
    }

    fn verify_password(password: &str, user: Option<&User>) -> Result<(), ApiError> {
        // verify against something even for unknown emails
        let hash = user
            .map(|u| u.password_hash.as_str())
            .unwrap_or(Self::dummy_hash());

        let parsed = PasswordHash::new(hash).map_err(|_| {
            error!("auth.login: invalid password hash");
            ApiError::Internal("Authentication failure".into())
        })?;

        let argon2 = RegisterService::create_argon2()?;

        if argon2.verify_password(password.as_bytes(), &parsed).is_err() || user.is_none() {
            warn!("auth.login: invalid credentials");
            return Err(ApiError::Auth(AuthError::InvalidCredentials));
        }

        Ok(())
    }

    fn dummy_hash() -> &'static str {
        "$argon2id$v=19$m=65536,t=3,p=1$\
         c29tZXNhbHRzb21lc2FsdA$\
         Zm9vYmFyZm9vYmFyZm9vYmFyZm9vYmFyZm9vYmFy"
    }
}
