use crate::config::swagger_config::ApiDoc;
use crate::handlers::{
    admin, cryptocurrencies::list_cryptocurrencies, health::health_check, login::login,
    market_data::{get_market_data, get_market_data_for},
    profile::{get_profile, update_profile},
    register::register,
    transactions::{create_transaction, list_transactions},
    ws::ws_handler,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use vaultex_core::{AppState, SecurityConfig};

pub fn create_router(state: Arc<AppState>) -> Router {
    // public routes (no authentication)
    let public_router = create_public_routers();

    // user routes (require a session token)
    let secured_router = create_secured_routers(&state);

    // administrator routes
    let admin_router = create_admin_routers(&state);

    Router::new()
        .merge(public_router)
        .merge(secured_router)
        .merge(admin_router)
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

fn create_secured_routers(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/profile", get(get_profile).put(update_profile))
        .route(
            "/api/transactions",
            get(list_transactions).post(create_transaction),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            SecurityConfig::auth_middleware,
        ))
}

fn create_admin_routers(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    // auth_middleware is outermost so claims exist for the admin check
    Router::new()
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}/credit", post(admin::credit_user))
        .route("/api/admin/users/{id}/debit", post(admin::debit_user))
        .route("/api/admin/transactions", get(admin::list_transactions))
        .route("/api/admin/stats", get(admin::stats))
        .layer(middleware::from_fn(SecurityConfig::admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            SecurityConfig::auth_middleware,
        ))
}

fn create_public_routers() -> Router<Arc<AppState>> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/health", get(health_check))
        .route("/api/cryptocurrencies", get(list_cryptocurrencies))
        .route("/api/market-data", get(get_market_data))
        .route("/api/market-data/{crypto_id}", get(get_market_data_for))
        .route("/ws", get(ws_handler))
}
