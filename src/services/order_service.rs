use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderWithAddress, UpdateOrderRequest},
    entity::{
        orders::{ActiveModel, Column, Entity as Orders, Model as OrderModel},
        shipping_addresses::Entity as ShippingAddresses,
    },
    error::{AppError, AppResult},
    models::{CascadeSummary, Order},
    page::{Meta, Page},
    params::{OrderListQuery, SortOrder},
    services::{
        constraint_error, ensure_exists, now, shipping_address_service::address_from_entity,
    },
    state::AppState,
    validation::{self, NAME_MAX_LEN},
};

pub async fn create_order(state: &AppState, payload: CreateOrderRequest) -> AppResult<Order> {
    validation::required_text("customer_name", &payload.customer_name, NAME_MAX_LEN)?;
    validation::email("customer_email", &payload.customer_email)?;
    let txn = state.orm.begin().await?;
    ensure_exists::<ShippingAddresses, _>(&txn, payload.shipping_address_id, "shipping address")
        .await?;

    let order = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_name: Set(payload.customer_name),
        customer_email: Set(payload.customer_email),
        order_date: Set(now()),
        shipping_address_id: Set(payload.shipping_address_id),
    }
    .insert(&txn)
    .await
    .map_err(constraint_error)?;
    txn.commit().await?;

    tracing::debug!(order_id = %order.id, shipping_address_id = %order.shipping_address_id, "order created");
    Ok(order_from_entity(order))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<Order> {
    Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(order_from_entity)
        .ok_or(AppError::NotFound)
}

pub async fn get_order_with_address(state: &AppState, id: Uuid) -> AppResult<OrderWithAddress> {
    let (order, address) = Orders::find_by_id(id)
        .find_also_related(ShippingAddresses)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let address = address.ok_or_else(|| {
        AppError::integrity(format!(
            "shipping address {} of order {} is missing",
            order.shipping_address_id, order.id
        ))
    })?;

    Ok(OrderWithAddress {
        order: order_from_entity(order),
        shipping_address: address_from_entity(address),
    })
}

pub async fn list_orders(state: &AppState, query: OrderListQuery) -> AppResult<Page<Order>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if let Some(email) = query.customer_email.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::CustomerEmail.eq(email.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(Column::OrderDate).order_by_asc(Column::Id),
        SortOrder::Desc => finder.order_by_desc(Column::OrderDate).order_by_asc(Column::Id),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok(Page::new(orders, Meta::new(page, limit, total)))
}

/// `order_date` keeps its insert-time value.
pub async fn update_order(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<Order> {
    let txn = state.orm.begin().await?;
    let existing = Orders::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.customer_name {
        validation::required_text("customer_name", &name, NAME_MAX_LEN)?;
        active.customer_name = Set(name);
    }
    if let Some(email) = payload.customer_email {
        validation::email("customer_email", &email)?;
        active.customer_email = Set(email);
    }
    if let Some(address_id) = payload.shipping_address_id {
        ensure_exists::<ShippingAddresses, _>(&txn, address_id, "shipping address").await?;
        active.shipping_address_id = Set(address_id);
    }

    let order = active.update(&txn).await.map_err(constraint_error)?;
    txn.commit().await?;
    Ok(order_from_entity(order))
}

pub async fn delete_order(state: &AppState, id: Uuid) -> AppResult<CascadeSummary> {
    let result = Orders::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(CascadeSummary {
        orders: result.rows_affected,
        ..Default::default()
    })
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        order_date: model.order_date.with_timezone(&Utc),
        shipping_address_id: model.shipping_address_id,
    }
}
