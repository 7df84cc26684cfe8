use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};
use http::StatusCode;
use serde_json::json;
use std::fmt;
use uuid::Uuid;

#[derive(Debug)]
pub enum ApiError {
    Database(diesel::result::Error),
    DatabaseConnection(String),
    Validation(validator::ValidationErrors),
    InvalidAmount(String),
    BadRequest(String),
    NotFound(String),
    WalletNotFound { user_id: Uuid, crypto_id: i32 },
    InsufficientBalance(String),
    Conflict(String),
    Auth(AuthError),
    Forbidden(String),
    Upstream(String),
    Token(String),
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MissingHeader,
    InvalidFormat,
    InvalidToken(String),
    InvalidCredentials,
    InactiveAccount,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "Authorization header required"),
            AuthError::InvalidFormat => write!(f, "Invalid Authorization format"),
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::InactiveAccount => write!(f, "Account is disabled"),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Database(e) => write!(f, "Database error: {}", e),
            ApiError::DatabaseConnection(e) => write!(f, "Database connection error: {}", e),
            ApiError::Validation(e) => write!(f, "Validation error: {}", e),
            ApiError::InvalidAmount(e) => write!(f, "Invalid amount: {}", e),
            ApiError::BadRequest(e) => write!(f, "Bad request: {}", e),
            ApiError::NotFound(e) => write!(f, "Not found: {}", e),
            ApiError::WalletNotFound { user_id, crypto_id } => write!(
                f,
                "Wallet not found for user {} and cryptocurrency {}",
                user_id, crypto_id
            ),
            ApiError::InsufficientBalance(e) => write!(f, "Insufficient balance: {}", e),
            ApiError::Conflict(e) => write!(f, "Conflict: {}", e),
            ApiError::Auth(e) => write!(f, "Authentication error: {}", e),
            ApiError::Forbidden(e) => write!(f, "Forbidden: {}", e),
            ApiError::Upstream(e) => write!(f, "Upstream unavailable: {}", e),
            ApiError::Token(e) => write!(f, "Token error: {}", e),
            ApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Database(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PoolError> for ApiError {
    fn from(err: PoolError) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                ApiError::Conflict(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                ApiError::NotFound(info.message().to_string())
            }
            other => ApiError::Database(other),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Database(diesel::result::Error::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Validation(_) | ApiError::InvalidAmount(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) | ApiError::WalletNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InsufficientBalance(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Auth(AuthError::InvalidFormat) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Token(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ApiError> for (StatusCode, String) {
    fn from(err: ApiError) -> Self {
        let status = err.status();
        let message = match err {
            // storage internals never leak to clients
            ApiError::Database(diesel::result::Error::NotFound) => "Resource not found".to_string(),
            ApiError::Database(_) => "Database error".to_string(),
            ApiError::DatabaseConnection(_) => "Storage temporarily unavailable".to_string(),
            ApiError::Auth(e) => format!("Auth error: {}", e),
            other => other.to_string(),
        };
        (status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let (status, message): (StatusCode, String) = self.into();
        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        assert_eq!(
            ApiError::InvalidAmount("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::WalletNotFound {
                user_id: Uuid::nil(),
                crypto_id: 1
            }
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InsufficientBalance("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Auth(AuthError::MissingHeader).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("admin only".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::DatabaseConnection("pool exhausted".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn connection_details_are_not_exposed() {
        let (_, body): (StatusCode, String) =
            ApiError::DatabaseConnection("postgres://secret@host".into()).into();
        assert!(!body.contains("secret"));
    }
}
