use diesel::prelude::*;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::entities::market_data::MarketData;
use vaultex_primitives::schema::market_data;

pub struct MarketRepository;

impl MarketRepository {
    pub fn find_all(conn: &mut PgConnection) -> Result<Vec<MarketData>, ApiError> {
        market_data::table
            .order(market_data::crypto_id.asc())
            .load::<MarketData>(conn)
            .map_err(ApiError::from)
    }

    pub fn upsert(conn: &mut PgConnection, data: &MarketData) -> Result<MarketData, ApiError> {
        diesel::insert_into(market_data::table)
            .values(data)
            .on_conflict(market_data::crypto_id)
            .do_update()
            .set(data)
            .get_result::<MarketData>(conn)
            .map_err(ApiError::from)
    }
}
