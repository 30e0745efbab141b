use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{
        products::{Column as ProdCol, Entity as Products},
        seller_products::{ActiveModel, Column, Entity as SellerProducts, Model as SellerProductModel},
        sellers::{Column as SellerCol, Entity as Sellers},
    },
    error::{AppError, AppResult},
    models::{CascadeSummary, Product, Seller, SellerProduct},
    services::{
        constraint_error, ensure_exists, is_unique_violation, product_service::product_from_entity,
        seller_service::seller_from_entity,
    },
    state::AppState,
};

/// Link a seller to a product. Linking an existing pair returns the existing row.
pub async fn link(state: &AppState, seller_id: Uuid, product_id: Uuid) -> AppResult<SellerProduct> {
    let txn = state.orm.begin().await?;
    ensure_exists::<Sellers, _>(&txn, seller_id, "seller").await?;
    ensure_exists::<Products, _>(&txn, product_id, "product").await?;

    if let Some(existing) = find_link(&txn, seller_id, product_id).await? {
        txn.commit().await?;
        return Ok(link_from_entity(existing));
    }

    let inserted = ActiveModel {
        id: Set(Uuid::new_v4()),
        seller_id: Set(seller_id),
        product_id: Set(product_id),
    }
    .insert(&txn)
    .await;

    let link = match inserted {
        Ok(link) => {
            txn.commit().await?;
            link
        }
        // Another writer linked the same pair after our lookup.
        Err(err) if is_unique_violation(&err) => {
            txn.rollback().await?;
            find_link(&state.orm, seller_id, product_id)
                .await?
                .ok_or_else(|| constraint_error(err))?
        }
        Err(err) => return Err(constraint_error(err)),
    };

    tracing::debug!(%seller_id, %product_id, "seller linked to product");
    Ok(link_from_entity(link))
}

pub async fn unlink(state: &AppState, seller_id: Uuid, product_id: Uuid) -> AppResult<CascadeSummary> {
    let result = SellerProducts::delete_many()
        .filter(
            Condition::all()
                .add(Column::SellerId.eq(seller_id))
                .add(Column::ProductId.eq(product_id)),
        )
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(CascadeSummary {
        seller_products: result.rows_affected,
        ..Default::default()
    })
}

pub async fn products_for_seller(state: &AppState, seller_id: Uuid) -> AppResult<Vec<Product>> {
    let seller = Sellers::find_by_id(seller_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    seller
        .find_related(Products)
        .order_by_asc(ProdCol::Title)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect()
}

pub async fn sellers_for_product(state: &AppState, product_id: Uuid) -> AppResult<Vec<Seller>> {
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let sellers = product
        .find_related(Sellers)
        .order_by_asc(SellerCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(seller_from_entity)
        .collect();
    Ok(sellers)
}

async fn find_link<C: ConnectionTrait>(
    conn: &C,
    seller_id: Uuid,
    product_id: Uuid,
) -> AppResult<Option<SellerProductModel>> {
    let link = SellerProducts::find()
        .filter(Column::SellerId.eq(seller_id))
        .filter(Column::ProductId.eq(product_id))
        .one(conn)
        .await?;
    Ok(link)
}

fn link_from_entity(model: SellerProductModel) -> SellerProduct {
    SellerProduct {
        id: model.id,
        seller_id: model.seller_id,
        product_id: model.product_id,
    }
}
