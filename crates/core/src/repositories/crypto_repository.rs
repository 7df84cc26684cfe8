use diesel::prelude::*;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::entities::cryptocurrency::Cryptocurrency;
use vaultex_primitives::schema::cryptocurrencies;

pub struct CryptoRepository;

impl CryptoRepository {
    pub fn find_active(conn: &mut PgConnection) -> Result<Vec<Cryptocurrency>, ApiError> {
        cryptocurrencies::table
            .filter(cryptocurrencies::is_active.eq(true))
            .order(cryptocurrencies::id.asc())
            .load::<Cryptocurrency>(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_id(
        conn: &mut PgConnection,
        crypto_id: i32,
    ) -> Result<Option<Cryptocurrency>, ApiError> {
        cryptocurrencies::table
            .find(crypto_id)
            .first::<Cryptocurrency>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn insert_missing(
        conn: &mut PgConnection,
        cryptos: &[Cryptocurrency],
    ) -> Result<usize, ApiError> {
        diesel::insert_into(cryptocurrencies::table)
            .values(cryptos)
            .on_conflict_do_nothing()
            .execute(conn)
            .map_err(ApiError::from)
    }
}
