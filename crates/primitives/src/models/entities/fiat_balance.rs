use crate::models::entities::enum_types::FiatCurrency;
use chrono::{DateTime, Utc};
use diesel::{Associations, Identifiable, Insertable, Queryable};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::fiat_balances)]
#[diesel(belongs_to(crate::models::entities::user::User))]
pub struct FiatBalance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub currency: FiatCurrency,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::fiat_balances)]
pub struct NewFiatBalance {
    pub user_id: Uuid,
    pub currency: FiatCurrency,
}
