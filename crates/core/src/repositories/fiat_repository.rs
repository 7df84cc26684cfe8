use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::entities::enum_types::FiatCurrency;
use vaultex_primitives::models::entities::fiat_balance::{FiatBalance, NewFiatBalance};
use vaultex_primitives::schema::fiat_balances;

pub struct FiatRepository;

impl FiatRepository {
    pub fn find_all_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<FiatBalance>, ApiError> {
        fiat_balances::table
            .filter(fiat_balances::user_id.eq(user_id))
            .order(fiat_balances::currency.asc())
            .load::<FiatBalance>(conn)
            .map_err(ApiError::from)
    }

    fn find_with_lock(
        conn: &mut PgConnection,
        user_id: Uuid,
        currency: FiatCurrency,
    ) -> Result<Option<FiatBalance>, ApiError> {
        fiat_balances::table
            .filter(fiat_balances::user_id.eq(user_id))
            .filter(fiat_balances::currency.eq(currency))
            .for_update()
            .first::<FiatBalance>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    /// Locks the (user, currency) row, inserting a zero balance first when
    /// it doesn't exist.
    pub fn create_if_not_exists(
        conn: &mut PgConnection,
        user_id: Uuid,
        currency: FiatCurrency,
    ) -> Result<FiatBalance, ApiError> {
        if let Some(existing) = Self::find_with_lock(conn, user_id, currency)? {
            return Ok(existing);
        }

        diesel::insert_into(fiat_balances::table)
            .values(&NewFiatBalance { user_id, currency })
            .on_conflict((fiat_balances::user_id, fiat_balances::currency))
            .do_nothing()
            .execute(conn)
            .map_err(ApiError::from)?;

        Self::find_with_lock(conn, user_id, currency)?
            .ok_or_else(|| ApiError::NotFound(format!("{} balance", currency)))
    }

    pub fn set_balance(
        conn: &mut PgConnection,
        user_id: Uuid,
        currency: FiatCurrency,
        balance: Decimal,
    ) -> Result<FiatBalance, ApiError> {
        let row = Self::create_if_not_exists(conn, user_id, currency)?;

        diesel::update(fiat_balances::table.find(row.id))
            .set((
                fiat_balances::balance.eq(balance),
                fiat_balances::updated_at.eq(Utc::now()),
            ))
            .get_result::<FiatBalance>(conn)
            .map_err(ApiError::from)
    }
}
