use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::entities::wallet::{NewWallet, Wallet};
use vaultex_primitives::schema::wallets;

pub struct WalletRepository;

impl WalletRepository {
    pub fn find_all_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<Wallet>, ApiError> {
        wallets::table
            .filter(wallets::user_id.eq(user_id))
            .order(wallets::crypto_id.asc())
            .load::<Wallet>(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_user_and_crypto(
        conn: &mut PgConnection,
        user_id: Uuid,
        crypto_id: i32,
    ) -> Result<Option<Wallet>, ApiError> {
        wallets::table
            .filter(wallets::user_id.eq(user_id))
            .filter(wallets::crypto_id.eq(crypto_id))
            .first::<Wallet>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_user_and_crypto_with_lock(
        conn: &mut PgConnection,
        user_id: Uuid,
        crypto_id: i32,
    ) -> Result<Option<Wallet>, ApiError> {
        wallets::table
            .filter(wallets::user_id.eq(user_id))
            .filter(wallets::crypto_id.eq(crypto_id))
            .for_update()
            .first::<Wallet>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn create(conn: &mut PgConnection, new_wallet: &NewWallet) -> Result<Wallet, ApiError> {
        diesel::insert_into(wallets::table)
            .values(new_wallet)
            .get_result::<Wallet>(conn)
            .map_err(ApiError::from)
    }

    pub fn set_balance(
        conn: &mut PgConnection,
        wallet_id: Uuid,
        balance: Decimal,
    ) -> Result<Wallet, ApiError> {
        diesel::update(wallets::table.find(wallet_id))
            .set((
                wallets::balance.eq(balance),
                wallets::updated_at.eq(Utc::now()),
            ))
            .get_result::<Wallet>(conn)
            .optional()
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::NotFound(format!("wallet {}", wallet_id)))
    }
}
