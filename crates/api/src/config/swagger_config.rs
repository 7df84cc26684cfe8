use crate::handlers::{
    admin, cryptocurrencies, health, login, market_data, profile, register, transactions, ws,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use vaultex_primitives::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        register::register, login::login, health::health_check,
        cryptocurrencies::list_cryptocurrencies,
        market_data::get_market_data, market_data::get_market_data_for,
        profile::get_profile, profile::update_profile,
        transactions::list_transactions, transactions::create_transaction,
        admin::list_users, admin::credit_user, admin::debit_user,
        admin::list_transactions, admin::stats, ws::ws_handler
    ),
    components(schemas(
        RegisterRequest, LoginRequest, UpdateProfileRequest, AuthResponse, UserDto,
        HealthStatus, WalletDto, FiatBalanceDto, TransactionDto, CreateTransactionRequest,
        TransactionsResponse, MarketDataDto, UserProfileResponse, AdminAdjustRequest,
        AdminAdjustResponse, AdminUserDto, AdminStats, Cryptocurrency, TransactionKind,
        TransactionStatus, FiatCurrency, KindDisplay, Direction
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "Profile endpoints"),
        (name = "Transactions", description = "Trades, deposits, withdrawals and history"),
        (name = "Market", description = "Cryptocurrencies and cached market data"),
        (name = "Admin", description = "Administrator-only endpoints"),
        (name = "Notifications", description = "Push connection"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
