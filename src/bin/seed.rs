use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
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
    models::{Category, User},
    services::{
        category_service, order_service, product_service, seller_product_service, seller_service,
        shipping_address_service, user_service,
    },
    state::AppState,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = AppConfig::from_env()?;

    // Ensure migrations are applied.
    let state = AppState::connect(&config).await?;

    let admin = ensure_admin(&state, "admin", "admin@example.com", "admin123").await?;

    let roots = category_service::list_roots(&state).await?;
    if roots.iter().any(|c| c.name == "Books") {
        tracing::info!("catalog already seeded");
        return Ok(());
    }

    let (books, fiction) = seed_categories(&state).await?;
    seed_products(&state, &admin, &books, &fiction).await?;
    seed_order(&state).await?;

    tracing::info!(admin_id = %admin.id, "seed completed");
    Ok(())
}

async fn ensure_admin(
    state: &AppState,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<User> {
    if let Some(existing) = user_service::find_by_username(state, username).await? {
        tracing::info!(%username, "user already present");
        return Ok(existing);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let user = user_service::create_user(
        state,
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        },
    )
    .await?;
    tracing::info!(%username, "ensured user");
    Ok(user)
}

async fn seed_categories(state: &AppState) -> anyhow::Result<(Category, Category)> {
    let books = category_service::create_category(
        state,
        CreateCategoryRequest {
            name: "Books".into(),
            parent_id: None,
        },
    )
    .await?;
    let fiction = category_service::create_category(
        state,
        CreateCategoryRequest {
            name: "Fiction".into(),
            parent_id: Some(books.id),
        },
    )
    .await?;
    tracing::info!("seeded categories");
    Ok((books, fiction))
}

async fn seed_products(
    state: &AppState,
    admin: &User,
    books: &Category,
    fiction: &Category,
) -> anyhow::Result<()> {
    let products = vec![
        (books.id, "The Rust Programming Language", "rust-book.png", "39.95"),
        (books.id, "Zero To Production", "zero2prod.png", "45.00"),
        (fiction.id, "The Left Hand of Darkness", "left-hand.jpg", "12.99"),
        (fiction.id, "Piranesi", "piranesi.jpg", "9.50"),
    ];

    let seller = seller_service::create_seller(
        state,
        CreateSellerRequest {
            name: "Corner Bookshop".into(),
            email: "sales@corner-bookshop.example".into(),
            phone_number: "+1 555 0100".into(),
            is_active: None,
        },
    )
    .await?;

    for (category_id, title, image, price) in products {
        let request =
            CreateProductRequest::new(category_id, admin.id, title, image, price.parse()?);
        let product = product_service::create_product(state, request).await?;
        seller_product_service::link(state, seller.id, product.id).await?;
    }

    tracing::info!("seeded products");
    Ok(())
}

async fn seed_order(state: &AppState) -> anyhow::Result<()> {
    let address = shipping_address_service::create_shipping_address(
        state,
        CreateShippingAddressRequest {
            name: "Jane Reader".into(),
            address: "12 Library Lane".into(),
            city: "Springfield".into(),
        },
    )
    .await?;

    order_service::create_order(
        state,
        CreateOrderRequest {
            customer_name: "Jane Reader".into(),
            customer_email: "jane@example.com".into(),
            shipping_address_id: address.id,
        },
    )
    .await?;

    tracing::info!("seeded order");
    Ok(())
}
