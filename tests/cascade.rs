mod common;

use ecommerce_catalog::{
    entity::{
        Categories, Orders, Products, SellerProducts, Sellers, ShippingAddresses, orders, products,
    },
    error::AppError,
    services::{
        category_service, order_service, product_service, seller_product_service, seller_service,
        shipping_address_service, user_service,
    },
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use common::{
    create_address, create_category, create_order, create_product, create_seller, create_user,
    setup_state,
};

#[tokio::test]
async fn deleting_a_category_removes_its_subtree_and_products() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "editor").await?;
    let books = create_category(&state, "Books", None).await?;
    let fiction = create_category(&state, "Fiction", Some(books.id)).await?;
    let sci_fi = create_category(&state, "Science Fiction", Some(fiction.id)).await?;
    let music = create_category(&state, "Music", None).await?;

    let manual = create_product(&state, books.id, user.id, "Manual", "5.00").await?;
    let novel = create_product(&state, fiction.id, user.id, "Novel", "7.00").await?;
    create_product(&state, sci_fi.id, user.id, "Dune", "9.99").await?;
    let album = create_product(&state, music.id, user.id, "Album", "11.00").await?;

    let seller = create_seller(&state, "Corner Shop").await?;
    seller_product_service::link(&state, seller.id, manual.id).await?;
    seller_product_service::link(&state, seller.id, novel.id).await?;
    seller_product_service::link(&state, seller.id, album.id).await?;

    let summary = category_service::delete_category(&state, books.id).await?;
    assert_eq!(summary.categories, 3);
    assert_eq!(summary.products, 3);
    assert_eq!(summary.seller_products, 2);

    assert_eq!(Categories::find().count(&state.orm).await?, 1);
    assert_eq!(Products::find().count(&state.orm).await?, 1);
    assert_eq!(SellerProducts::find().count(&state.orm).await?, 1);
    assert!(product_service::get_product(&state, album.id).await.is_ok());
    assert!(seller_service::get_seller(&state, seller.id).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn deleting_a_child_category_leaves_the_parent() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "editor").await?;
    let books = create_category(&state, "Books", None).await?;
    let fiction = create_category(&state, "Fiction", Some(books.id)).await?;
    let manual = create_product(&state, books.id, user.id, "Manual", "5.00").await?;
    create_product(&state, fiction.id, user.id, "Novel", "7.00").await?;

    let summary = category_service::delete_category(&state, fiction.id).await?;
    assert_eq!(summary.categories, 1);
    assert_eq!(summary.products, 1);

    assert!(category_service::get_category(&state, books.id).await.is_ok());
    assert!(product_service::get_product(&state, manual.id).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn deleting_a_seller_removes_only_its_links() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "editor").await?;
    let books = create_category(&state, "Books", None).await?;
    let dune = create_product(&state, books.id, user.id, "Dune", "9.99").await?;
    let shop = create_seller(&state, "Corner Shop").await?;
    let market = create_seller(&state, "Market").await?;
    seller_product_service::link(&state, shop.id, dune.id).await?;
    seller_product_service::link(&state, market.id, dune.id).await?;

    let summary = seller_service::delete_seller(&state, shop.id).await?;
    assert_eq!(summary.sellers, 1);
    assert_eq!(summary.seller_products, 1);

    let sellers = seller_product_service::sellers_for_product(&state, dune.id).await?;
    let ids: Vec<_> = sellers.iter().map(|s| s.id).collect();
    assert_eq!(ids, [market.id]);
    assert!(product_service::get_product(&state, dune.id).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn deleting_a_product_removes_its_links() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "editor").await?;
    let books = create_category(&state, "Books", None).await?;
    let dune = create_product(&state, books.id, user.id, "Dune", "9.99").await?;
    let emma = create_product(&state, books.id, user.id, "Emma", "4.50").await?;
    let shop = create_seller(&state, "Corner Shop").await?;
    let market = create_seller(&state, "Market").await?;
    seller_product_service::link(&state, shop.id, dune.id).await?;
    seller_product_service::link(&state, market.id, dune.id).await?;
    seller_product_service::link(&state, shop.id, emma.id).await?;

    let summary = product_service::delete_product(&state, dune.id).await?;
    assert_eq!(summary.products, 1);
    assert_eq!(summary.seller_products, 2);

    assert_eq!(SellerProducts::find().count(&state.orm).await?, 1);
    assert_eq!(Sellers::find().count(&state.orm).await?, 2);
    let remaining = seller_product_service::products_for_seller(&state, shop.id).await?;
    let ids: Vec<_> = remaining.iter().map(|p| p.id).collect();
    assert_eq!(ids, [emma.id]);
    Ok(())
}

#[tokio::test]
async fn deleting_a_shipping_address_removes_its_orders() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let home = create_address(&state, "Home").await?;
    let office = create_address(&state, "Office").await?;
    let first = create_order(&state, home.id, "jane@example.com").await?;
    create_order(&state, home.id, "jane@example.com").await?;
    let kept = create_order(&state, office.id, "jane@example.com").await?;

    let summary = shipping_address_service::delete_shipping_address(&state, home.id).await?;
    assert_eq!(summary.shipping_addresses, 1);
    assert_eq!(summary.orders, 2);

    let err = order_service::get_order(&state, first.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert!(order_service::get_order(&state, kept.id).await.is_ok());
    assert_eq!(ShippingAddresses::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn deleting_an_order_keeps_its_address() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let home = create_address(&state, "Home").await?;
    let order = create_order(&state, home.id, "jane@example.com").await?;

    let summary = order_service::delete_order(&state, order.id).await?;
    assert_eq!(summary.orders, 1);
    assert_eq!(Orders::find().count(&state.orm).await?, 0);
    assert!(shipping_address_service::get_shipping_address(&state, home.id).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn deleting_a_user_removes_their_products() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let editor = create_user(&state, "editor").await?;
    let other = create_user(&state, "other").await?;
    let books = create_category(&state, "Books", None).await?;
    let dune = create_product(&state, books.id, editor.id, "Dune", "9.99").await?;
    let emma = create_product(&state, books.id, other.id, "Emma", "4.50").await?;
    let shop = create_seller(&state, "Corner Shop").await?;
    seller_product_service::link(&state, shop.id, dune.id).await?;

    let summary = user_service::delete_user(&state, editor.id).await?;
    assert_eq!(summary.users, 1);
    assert_eq!(summary.products, 1);
    assert_eq!(summary.seller_products, 1);
    assert_eq!(summary.total(), 3);

    assert!(product_service::get_product(&state, emma.id).await.is_ok());
    assert!(category_service::get_category(&state, books.id).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn deleting_missing_rows_is_not_found() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let id = uuid::Uuid::new_v4();

    assert!(matches!(
        category_service::delete_category(&state, id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        product_service::delete_product(&state, id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        seller_service::delete_seller(&state, id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        shipping_address_service::delete_shipping_address(&state, id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        order_service::delete_order(&state, id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        user_service::delete_user(&state, id).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn foreign_keys_cascade_on_raw_deletes() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "editor").await?;
    let books = create_category(&state, "Books", None).await?;
    let fiction = create_category(&state, "Fiction", Some(books.id)).await?;
    let music = create_category(&state, "Music", None).await?;
    let novel = create_product(&state, fiction.id, user.id, "Novel", "7.00").await?;
    create_product(&state, books.id, user.id, "Manual", "5.00").await?;
    create_product(&state, music.id, user.id, "Album", "11.00").await?;
    let shop = create_seller(&state, "Corner Shop").await?;
    seller_product_service::link(&state, shop.id, novel.id).await?;

    // Bypass the service routines: the schema alone must clean up.
    Categories::delete_by_id(books.id).exec(&state.orm).await?;
    assert_eq!(Categories::find().count(&state.orm).await?, 1);
    assert_eq!(Products::find().count(&state.orm).await?, 1);
    assert_eq!(
        Products::find()
            .filter(products::Column::CategoryId.eq(music.id))
            .count(&state.orm)
            .await?,
        1
    );
    assert_eq!(SellerProducts::find().count(&state.orm).await?, 0);

    let home = create_address(&state, "Home").await?;
    let office = create_address(&state, "Office").await?;
    create_order(&state, home.id, "jane@example.com").await?;
    create_order(&state, home.id, "jane@example.com").await?;
    create_order(&state, office.id, "jane@example.com").await?;

    ShippingAddresses::delete_by_id(home.id).exec(&state.orm).await?;
    assert_eq!(
        Orders::find()
            .filter(orders::Column::ShippingAddressId.eq(home.id))
            .count(&state.orm)
            .await?,
        0
    );
    assert_eq!(Orders::find().count(&state.orm).await?, 1);
    Ok(())
}
