use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::shipping_addresses::{CreateShippingAddressRequest, UpdateShippingAddressRequest},
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        shipping_addresses::{
            ActiveModel, Column, Entity as ShippingAddresses, Model as ShippingAddressModel,
        },
    },
    error::{AppError, AppResult},
    models::{CascadeSummary, ShippingAddress},
    page::{Meta, Page},
    params::Pagination,
    state::AppState,
    validation::{self, NAME_MAX_LEN},
};

pub async fn create_shipping_address(
    state: &AppState,
    payload: CreateShippingAddressRequest,
) -> AppResult<ShippingAddress> {
    validation::required_text("name", &payload.name, NAME_MAX_LEN)?;
    validation::not_blank("address", &payload.address)?;
    validation::required_text("city", &payload.city, NAME_MAX_LEN)?;

    let address = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        address: Set(payload.address),
        city: Set(payload.city),
    }
    .insert(&state.orm)
    .await?;

    Ok(address_from_entity(address))
}

pub async fn get_shipping_address(state: &AppState, id: Uuid) -> AppResult<ShippingAddress> {
    ShippingAddresses::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(address_from_entity)
        .ok_or(AppError::NotFound)
}

pub async fn list_shipping_addresses(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<Page<ShippingAddress>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = ShippingAddresses::find()
        .order_by_asc(Column::City)
        .order_by_asc(Column::Name);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(address_from_entity)
        .collect();

    Ok(Page::new(items, Meta::new(page, limit, total)))
}

pub async fn update_shipping_address(
    state: &AppState,
    id: Uuid,
    payload: UpdateShippingAddressRequest,
) -> AppResult<ShippingAddress> {
    let existing = ShippingAddresses::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        validation::required_text("name", &name, NAME_MAX_LEN)?;
        active.name = Set(name);
    }
    if let Some(address) = payload.address {
        validation::not_blank("address", &address)?;
        active.address = Set(address);
    }
    if let Some(city) = payload.city {
        validation::required_text("city", &city, NAME_MAX_LEN)?;
        active.city = Set(city);
    }

    let address = active.update(&state.orm).await?;
    Ok(address_from_entity(address))
}

/// Delete an address and every order shipped to it.
pub async fn delete_shipping_address(state: &AppState, id: Uuid) -> AppResult<CascadeSummary> {
    let txn = state.orm.begin().await?;

    if ShippingAddresses::find_by_id(id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let orders = Orders::delete_many()
        .filter(OrderCol::ShippingAddressId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    let shipping_addresses = ShippingAddresses::delete_by_id(id)
        .exec(&txn)
        .await?
        .rows_affected;
    let summary = CascadeSummary {
        orders,
        shipping_addresses,
        ..Default::default()
    };

    txn.commit().await?;

    tracing::info!(shipping_address_id = %id, orders = summary.orders, "shipping address deleted");
    Ok(summary)
}

pub(crate) fn address_from_entity(model: ShippingAddressModel) -> ShippingAddress {
    ShippingAddress {
        id: model.id,
        name: model.name,
        address: model.address,
        city: model.city,
    }
}
