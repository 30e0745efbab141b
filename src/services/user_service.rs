use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    dto::users::CreateUserRequest,
    entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::{CascadeSummary, User},
    services::{constraint_error, now, product_service},
    state::AppState,
    validation::{self, USERNAME_MAX_LEN},
};

pub async fn create_user(state: &AppState, payload: CreateUserRequest) -> AppResult<User> {
    validation::required_text("username", &payload.username, USERNAME_MAX_LEN)?;
    if !payload.email.is_empty() {
        validation::email("email", &payload.email)?;
    }
    validation::not_blank("password_hash", &payload.password_hash)?;

    if find_by_username(state, &payload.username).await?.is_some() {
        return Err(AppError::integrity(format!(
            "username {} is already taken",
            payload.username
        )));
    }

    let user = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(payload.username),
        email: Set(payload.email),
        password_hash: Set(payload.password_hash),
        created_at: Set(now()),
    }
    .insert(&state.orm)
    .await
    .map_err(constraint_error)?;

    Ok(user_from_entity(user))
}

pub async fn get_user(state: &AppState, id: Uuid) -> AppResult<User> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(user_from_entity)
        .ok_or(AppError::NotFound)
}

pub async fn find_by_username(state: &AppState, username: &str) -> AppResult<Option<User>> {
    let user = Users::find()
        .filter(Column::Username.eq(username))
        .one(&state.orm)
        .await?
        .map(user_from_entity);
    Ok(user)
}

/// Delete a user and every product they created.
pub async fn delete_user(state: &AppState, id: Uuid) -> AppResult<CascadeSummary> {
    let txn = state.orm.begin().await?;

    if Users::find_by_id(id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let mut summary = CascadeSummary::default();
    product_service::delete_products_created_by(&txn, id, &mut summary).await?;
    summary.users = Users::delete_by_id(id).exec(&txn).await?.rows_affected;

    txn.commit().await?;

    tracing::info!(user_id = %id, products = summary.products, "user deleted");
    Ok(summary)
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
