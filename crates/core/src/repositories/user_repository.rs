use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;
use vaultex_primitives::error::ApiError;
use vaultex_primitives::models::entities::user::{UpsertUser, User};
use vaultex_primitives::schema::users;

pub struct UserRepository;

impl UserRepository {
    pub fn find_by_id(conn: &mut PgConnection, user_id: Uuid) -> Result<Option<User>, ApiError> {
        users::table
            .find(user_id)
            .first::<User>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_email(
        conn: &mut PgConnection,
        user_email: &str,
    ) -> Result<Option<User>, ApiError> {
        users::table
            .filter(users::email.eq(user_email))
            .first::<User>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_all(conn: &mut PgConnection) -> Result<Vec<User>, ApiError> {
        users::table
            .order(users::created_at.desc())
            .load::<User>(conn)
            .map_err(ApiError::from)
    }

    /// Plain insert; an existing email or username surfaces as `Conflict`.
    pub fn create(conn: &mut PgConnection, new_user: &UpsertUser) -> Result<User, ApiError> {
        diesel::insert_into(users::table)
            .values(new_user)
            .get_result::<User>(conn)
            .map_err(ApiError::from)
    }

    pub fn upsert(conn: &mut PgConnection, user: &UpsertUser) -> Result<User, ApiError> {
        diesel::insert_into(users::table)
            .values(user)
            .on_conflict(users::id)
            .do_update()
            .set((
                users::username.eq(&user.username),
                users::email.eq(&user.email),
                users::password_hash.eq(&user.password_hash),
                users::first_name.eq(&user.first_name),
                users::last_name.eq(&user.last_name),
                users::country.eq(&user.country),
                users::city.eq(&user.city),
                users::is_admin.eq(user.is_admin),
                users::is_active.eq(user.is_active),
                users::updated_at.eq(Utc::now()),
            ))
            .get_result::<User>(conn)
            .map_err(ApiError::from)
    }
}
