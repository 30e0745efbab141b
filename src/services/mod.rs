use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PrimaryKeyTrait, SqlErr};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub mod category_service;
pub mod order_service;
pub mod product_service;
pub mod seller_product_service;
pub mod seller_service;
pub mod shipping_address_service;
pub mod user_service;

/// Timestamp written by inserts and updates.
///
/// `created` / `order_date` take this value once on insert; `updated` takes it on
/// every write.
pub fn now() -> DateTimeWithTimeZone {
    Utc::now().fixed_offset()
}

/// Fails with an integrity error when the referenced row is missing.
pub(crate) async fn ensure_exists<E, C>(conn: &C, id: Uuid, what: &str) -> AppResult<()>
where
    E: EntityTrait,
    E::Model: Sync,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    C: ConnectionTrait,
{
    match E::find_by_id(id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(AppError::integrity(format!("{what} {id} does not exist"))),
    }
}

/// Foreign key and unique violations raised by a write surface as integrity
/// errors; anything else stays an ORM error.
pub(crate) fn constraint_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(msg))
        | Some(SqlErr::UniqueConstraintViolation(msg)) => AppError::integrity(msg),
        _ => AppError::OrmError(err),
    }
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
