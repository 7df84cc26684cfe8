use crate::app_state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{Duration, Utc};
use http::HeaderMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;
use vaultex_primitives::error::{ApiError, AuthError};
use vaultex_primitives::models::entities::user::User;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
    #[serde(default)]
    pub admin: bool,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.sub).map_err(|e| {
            error!("Invalid user ID in claims: {}", e);
            ApiError::Auth(AuthError::InvalidToken("Invalid user ID".to_string()))
        })
    }
}

pub struct SecurityConfig;

impl SecurityConfig {
    pub fn create_token(state: &AppState, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let jwt = &state.config.jwt_details;

        let claims = Claims {
            sub: user.id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(jwt.jwt_expiration_hours)).timestamp(),
            iss: jwt.jwt_issuer.clone(),
            aud: jwt.jwt_audience.clone(),
            jti: Uuid::new_v4().to_string(),
            admin: user.is_admin,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        encode(
            &header,
            &claims,
            &EncodingKey::from_secret(jwt.jwt_secret.expose_secret().as_bytes()),
        )
        .map_err(|e| {
            error!("JWT encoding error: {}", e);
            ApiError::Token("Token creation failed".into())
        })
    }

    fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
        let auth_header = headers
            .get("Authorization")
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidFormat)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidFormat)?
            .trim();

        if token.is_empty() {
            return Err(AuthError::InvalidFormat);
        }

        Ok(token.to_string())
    }

    pub fn verify_token(state: &AppState, token: &str) -> Result<Claims, AuthError> {
        let jwt = &state.config.jwt_details;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[jwt.jwt_issuer.as_str()]);
        validation.set_audience(&[jwt.jwt_audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(jwt.jwt_secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken("Invalid or expired token".into()))
    }

    /// Resolves the bearer token to a live, active account. The admin flag on
    /// the inserted claims reflects the stored account, not the token.
    pub async fn auth_middleware(
        State(state): State<Arc<AppState>>,
        mut req: Request,
        next: Next,
    ) -> Result<Response, Response> {
        let token = Self::extract_bearer_token(req.headers())
            .map_err(|e| ApiError::from(e).into_response())?;

        let mut claims =
            Self::verify_token(&state, &token).map_err(|e| ApiError::from(e).into_response())?;

        let user_id = claims.user_id().map_err(|e| e.into_response())?;

        let user = state
            .ledger
            .get_user(user_id)
            .map_err(|e| e.into_response())?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "auth: token subject no longer exists");
                ApiError::from(AuthError::InvalidToken("Unknown account".into())).into_response()
            })?;

        if !user.is_active {
            return Err(ApiError::from(AuthError::InactiveAccount).into_response());
        }

        claims.admin = user.is_admin;
        req.extensions_mut().insert(claims);
        Ok(next.run(req).await)
    }

    /// Layered after [`SecurityConfig::auth_middleware`].
    pub async fn admin_middleware(req: Request, next: Next) -> Result<Response, Response> {
        let is_admin = req
            .extensions()
            .get::<Claims>()
            .map(|claims| claims.admin)
            .unwrap_or(false);

        if !is_admin {
            return Err(ApiError::Forbidden("Administrator access required".into()).into_response());
        }

        Ok(next.run(req).await)
    }
}
