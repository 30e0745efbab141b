#![allow(dead_code)]

use ecommerce_catalog::{
    config::AppConfig,
    dto::{
        categories::CreateCategoryRequest,
        orders::CreateOrderRequest,
        products::CreateProductRequest,
        sellers::CreateSellerRequest,
        shipping_addresses::CreateShippingAddressRequest,
        users::CreateUserRequest,
    },
    models::{Category, Order, Product, Seller, ShippingAddress, User},
    services::{
        category_service, order_service, product_service, seller_service,
        shipping_address_service, user_service,
    },
    state::AppState,
};
use uuid::Uuid;

/// Fresh in-memory database with the full schema applied.
pub async fn setup_state() -> anyhow::Result<AppState> {
    AppState::connect(&AppConfig::in_memory()).await
}

pub async fn create_user(state: &AppState, username: &str) -> anyhow::Result<User> {
    let user = user_service::create_user(
        state,
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "dummy".into(),
        },
    )
    .await?;
    Ok(user)
}

pub async fn create_category(
    state: &AppState,
    name: &str,
    parent_id: Option<Uuid>,
) -> anyhow::Result<Category> {
    let category = category_service::create_category(
        state,
        CreateCategoryRequest {
            name: name.to_string(),
            parent_id,
        },
    )
    .await?;
    Ok(category)
}

pub async fn create_product(
    state: &AppState,
    category_id: Uuid,
    created_by: Uuid,
    title: &str,
    price: &str,
) -> anyhow::Result<Product> {
    let request = CreateProductRequest::new(
        category_id,
        created_by,
        title,
        "cover.png",
        price.parse()?,
    );
    Ok(product_service::create_product(state, request).await?)
}

pub async fn create_seller(state: &AppState, name: &str) -> anyhow::Result<Seller> {
    let seller = seller_service::create_seller(
        state,
        CreateSellerRequest {
            name: name.to_string(),
            email: "seller@example.com".into(),
            phone_number: "+1 555 0199".into(),
            is_active: None,
        },
    )
    .await?;
    Ok(seller)
}

pub async fn create_address(state: &AppState, name: &str) -> anyhow::Result<ShippingAddress> {
    let address = shipping_address_service::create_shipping_address(
        state,
        CreateShippingAddressRequest {
            name: name.to_string(),
            address: "1 Main Street".into(),
            city: "Springfield".into(),
        },
    )
    .await?;
    Ok(address)
}

pub async fn create_order(
    state: &AppState,
    shipping_address_id: Uuid,
    email: &str,
) -> anyhow::Result<Order> {
    let order = order_service::create_order(
        state,
        CreateOrderRequest {
            customer_name: "Jane Reader".into(),
            customer_email: email.to_string(),
            shipping_address_id,
        },
    )
    .await?;
    Ok(order)
}
