use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, DEFAULT_AUTHOR, UpdateProductRequest, image_path},
    entity::{
        categories::Entity as Categories,
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
        seller_products::{Column as LinkCol, Entity as SellerProducts},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    models::{CascadeSummary, Product},
    page::{Meta, Page},
    params::{ProductQuery, ProductSortBy, SortOrder},
    price::Price,
    services::{constraint_error, ensure_exists, now},
    state::AppState,
    validation::{self, IMAGE_MAX_LEN, NAME_MAX_LEN},
};

pub async fn create_product(state: &AppState, payload: CreateProductRequest) -> AppResult<Product> {
    validation::required_text("title", &payload.title, NAME_MAX_LEN)?;
    let author = payload.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
    validation::required_text("author", &author, NAME_MAX_LEN)?;
    let image = checked_image(&payload.image)?;

    let txn = state.orm.begin().await?;
    ensure_exists::<Categories, _>(&txn, payload.category_id, "category").await?;
    ensure_exists::<Users, _>(&txn, payload.created_by, "user").await?;

    let timestamp = now();
    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(payload.category_id),
        created_by: Set(payload.created_by),
        title: Set(payload.title),
        author: Set(author),
        description: Set(payload.description.unwrap_or_default()),
        image: Set(image),
        price: Set(payload.price.cents()),
        in_stock: Set(payload.in_stock.unwrap_or(true)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created: Set(timestamp),
        updated: Set(timestamp),
    }
    .insert(&txn)
    .await
    .map_err(constraint_error)?;
    txn.commit().await?;

    tracing::debug!(product_id = %product.id, category_id = %product.category_id, "product created");
    product_from_entity(product)
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    product_from_entity(product)
}

pub async fn list_products(state: &AppState, query: ProductQuery) -> AppResult<Page<Product>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(Column::Title.contains(search))
                .add(Column::Author.contains(search)),
        );
    }

    condition = condition
        .add_option(query.category_id.map(|id| Column::CategoryId.eq(id)))
        .add_option(query.created_by.map(|id| Column::CreatedBy.eq(id)))
        .add_option(query.in_stock.map(|flag| Column::InStock.eq(flag)))
        .add_option(query.is_active.map(|flag| Column::IsActive.eq(flag)))
        .add_option(query.min_price.map(|p| Column::Price.gte(p.cents())))
        .add_option(query.max_price.map(|p| Column::Price.lte(p.cents())));

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::Created);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::Created => Column::Created,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Title => Column::Title,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col).order_by_asc(Column::Id),
        SortOrder::Desc => finder.order_by_desc(sort_col).order_by_asc(Column::Id),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Page::new(items, Meta::new(page, limit, total)))
}

/// Apply the given fields and refresh `updated`. `created` is never touched.
pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    let txn = state.orm.begin().await?;
    let existing = Products::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(category_id) = payload.category_id {
        ensure_exists::<Categories, _>(&txn, category_id, "category").await?;
        active.category_id = Set(category_id);
    }
    if let Some(title) = payload.title {
        validation::required_text("title", &title, NAME_MAX_LEN)?;
        active.title = Set(title);
    }
    if let Some(author) = payload.author {
        validation::required_text("author", &author, NAME_MAX_LEN)?;
        active.author = Set(author);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(image) = payload.image {
        active.image = Set(checked_image(&image)?);
    }
    if let Some(price) = payload.price {
        active.price = Set(price.cents());
    }
    if let Some(in_stock) = payload.in_stock {
        active.in_stock = Set(in_stock);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated = Set(now());

    let product = active.update(&txn).await.map_err(constraint_error)?;
    txn.commit().await?;
    product_from_entity(product)
}

/// Flip the stock / active flags without touching anything else.
pub async fn set_availability(
    state: &AppState,
    id: Uuid,
    in_stock: Option<bool>,
    is_active: Option<bool>,
) -> AppResult<Product> {
    update_product(
        state,
        id,
        UpdateProductRequest {
            in_stock,
            is_active,
            ..Default::default()
        },
    )
    .await
}

/// Delete a product and its seller links.
pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<CascadeSummary> {
    let txn = state.orm.begin().await?;

    if Products::find_by_id(id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let mut summary = CascadeSummary::default();
    delete_products_by_id(&txn, vec![id], &mut summary).await?;
    txn.commit().await?;

    tracing::info!(
        product_id = %id,
        seller_products = summary.seller_products,
        "product deleted"
    );
    Ok(summary)
}

pub(crate) async fn delete_products_in_categories<C: ConnectionTrait>(
    conn: &C,
    category_ids: &[Uuid],
    summary: &mut CascadeSummary,
) -> AppResult<()> {
    if category_ids.is_empty() {
        return Ok(());
    }
    let product_ids: Vec<Uuid> = Products::find()
        .select_only()
        .column(Column::Id)
        .filter(Column::CategoryId.is_in(category_ids.to_vec()))
        .into_tuple()
        .all(conn)
        .await?;
    delete_products_by_id(conn, product_ids, summary).await
}

pub(crate) async fn delete_products_created_by<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    summary: &mut CascadeSummary,
) -> AppResult<()> {
    let product_ids: Vec<Uuid> = Products::find()
        .select_only()
        .column(Column::Id)
        .filter(Column::CreatedBy.eq(user_id))
        .into_tuple()
        .all(conn)
        .await?;
    delete_products_by_id(conn, product_ids, summary).await
}

async fn delete_products_by_id<C: ConnectionTrait>(
    conn: &C,
    product_ids: Vec<Uuid>,
    summary: &mut CascadeSummary,
) -> AppResult<()> {
    if product_ids.is_empty() {
        return Ok(());
    }
    summary.seller_products += SellerProducts::delete_many()
        .filter(LinkCol::ProductId.is_in(product_ids.clone()))
        .exec(conn)
        .await?
        .rows_affected;
    summary.products += Products::delete_many()
        .filter(Column::Id.is_in(product_ids))
        .exec(conn)
        .await?
        .rows_affected;
    Ok(())
}

fn checked_image(image: &str) -> AppResult<String> {
    validation::not_blank("image", image)?;
    let path = image_path(image.trim());
    validation::max_length("image", &path, IMAGE_MAX_LEN)?;
    Ok(path)
}

pub(crate) fn product_from_entity(model: ProductModel) -> AppResult<Product> {
    Ok(Product {
        id: model.id,
        category_id: model.category_id,
        created_by: model.created_by,
        title: model.title,
        author: model.author,
        description: model.description,
        image: model.image,
        price: Price::from_cents(model.price)?,
        in_stock: model.in_stock,
        is_active: model.is_active,
        created: model.created.with_timezone(&Utc),
        updated: model.updated.with_timezone(&Utc),
    })
}
