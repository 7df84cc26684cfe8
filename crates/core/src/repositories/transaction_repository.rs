use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::entities::transaction::{NewTransaction, Transaction};
use vaultex_primitives::schema::transactions;

pub struct TransactionRepository;

impl TransactionRepository {
    pub fn create(
        conn: &mut PgConnection,
        new_tx: &NewTransaction,
    ) -> Result<Transaction, ApiError> {
        diesel::insert_into(transactions::table)
            .values(new_tx)
            .get_result::<Transaction>(conn)
            .map_err(ApiError::from)
    }

    pub fn find_recent_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>, ApiError> {
        let mut query = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .order(transactions::created_at.desc())
            .into_boxed::<Pg>();

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query.load::<Transaction>(conn).map_err(ApiError::from)
    }

    pub fn find_recent(
        conn: &mut PgConnection,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>, ApiError> {
        let mut query = transactions::table
            .order(transactions::created_at.desc())
            .into_boxed::<Pg>();

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query.load::<Transaction>(conn).map_err(ApiError::from)
    }
}
