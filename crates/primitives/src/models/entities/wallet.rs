use chrono::{DateTime, Utc};
use diesel::{Associations, Identifiable, Insertable, Queryable};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::wallets)]
#[diesel(belongs_to(crate::models::entities::user::User))]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub crypto_id: i32,
    pub balance: Decimal,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::wallets)]
pub struct NewWallet {
    pub user_id: Uuid,
    pub crypto_id: i32,
    pub address: String,
}
