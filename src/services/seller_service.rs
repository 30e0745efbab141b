use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::sellers::{CreateSellerRequest, UpdateSellerRequest},
    entity::{
        seller_products::{Column as LinkCol, Entity as SellerProducts},
        sellers::{ActiveModel, Column, Entity as Sellers, Model as SellerModel},
    },
    error::{AppError, AppResult},
    models::{CascadeSummary, Seller},
    page::{Meta, Page},
    params::SellerQuery,
    state::AppState,
    validation::{self, NAME_MAX_LEN, PHONE_MAX_LEN},
};

pub async fn create_seller(state: &AppState, payload: CreateSellerRequest) -> AppResult<Seller> {
    validation::required_text("name", &payload.name, NAME_MAX_LEN)?;
    validation::email("email", &payload.email)?;
    validation::required_text("phone_number", &payload.phone_number, PHONE_MAX_LEN)?;

    let seller = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        email: Set(payload.email),
        phone_number: Set(payload.phone_number),
        is_active: Set(payload.is_active.unwrap_or(true)),
    }
    .insert(&state.orm)
    .await?;

    tracing::debug!(seller_id = %seller.id, "seller created");
    Ok(seller_from_entity(seller))
}

pub async fn get_seller(state: &AppState, id: Uuid) -> AppResult<Seller> {
    Sellers::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(seller_from_entity)
        .ok_or(AppError::NotFound)
}

pub async fn list_sellers(state: &AppState, query: SellerQuery) -> AppResult<Page<Seller>> {
    let (page, limit, offset) = query.pagination.normalize();
    let condition =
        Condition::all().add_option(query.is_active.map(|flag| Column::IsActive.eq(flag)));

    let finder = Sellers::find()
        .filter(condition)
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(seller_from_entity)
        .collect();

    Ok(Page::new(items, Meta::new(page, limit, total)))
}

pub async fn update_seller(
    state: &AppState,
    id: Uuid,
    payload: UpdateSellerRequest,
) -> AppResult<Seller> {
    let existing = Sellers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        validation::required_text("name", &name, NAME_MAX_LEN)?;
        active.name = Set(name);
    }
    if let Some(email) = payload.email {
        validation::email("email", &email)?;
        active.email = Set(email);
    }
    if let Some(phone_number) = payload.phone_number {
        validation::required_text("phone_number", &phone_number, PHONE_MAX_LEN)?;
        active.phone_number = Set(phone_number);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }

    let seller = active.update(&state.orm).await?;
    Ok(seller_from_entity(seller))
}

/// Delete a seller and its product links. The products stay.
pub async fn delete_seller(state: &AppState, id: Uuid) -> AppResult<CascadeSummary> {
    let txn = state.orm.begin().await?;

    if Sellers::find_by_id(id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let seller_products = SellerProducts::delete_many()
        .filter(LinkCol::SellerId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    let sellers = Sellers::delete_by_id(id).exec(&txn).await?.rows_affected;

    txn.commit().await?;

    tracing::info!(seller_id = %id, seller_products, "seller deleted");
    Ok(CascadeSummary {
        sellers,
        seller_products,
        ..Default::default()
    })
}

pub(crate) fn seller_from_entity(model: SellerModel) -> Seller {
    Seller {
        id: model.id,
        name: model.name,
        email: model.email,
        phone_number: model.phone_number,
        is_active: model.is_active,
    }
}
