mod common;

use ecommerce_catalog::{
    dto::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    error::AppError,
    params::Pagination,
    services::category_service,
};
use uuid::Uuid;

use common::{create_category, setup_state};

#[tokio::test]
async fn categories_form_a_forest() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let books = create_category(&state, "Books", None).await?;
    let music = create_category(&state, "Music", None).await?;
    let fiction = create_category(&state, "Fiction", Some(books.id)).await?;
    let poetry = create_category(&state, "Poetry", Some(books.id)).await?;
    let sci_fi = create_category(&state, "Science Fiction", Some(fiction.id)).await?;

    assert!(books.is_root());
    assert!(!fiction.is_root());

    let roots = category_service::list_roots(&state).await?;
    let names: Vec<_> = roots.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Books", "Music"]);

    let children = category_service::list_children(&state, books.id).await?;
    let ids: Vec<_> = children.iter().map(|c| c.id).collect();
    assert_eq!(ids, [fiction.id, poetry.id]);
    assert!(category_service::list_children(&state, music.id).await?.is_empty());

    let path = category_service::ancestors(&state, sci_fi.id).await?;
    let ids: Vec<_> = path.iter().map(|c| c.id).collect();
    assert_eq!(ids, [fiction.id, books.id]);

    let mut below = category_service::descendant_ids(&state, books.id).await?;
    below.sort();
    let mut expected = vec![fiction.id, poetry.id, sci_fi.id];
    expected.sort();
    assert_eq!(below, expected);

    let page = category_service::list_categories(&state, Pagination::new(1, 2)).await?;
    assert_eq!(page.meta.total, 5);
    assert_eq!(page.items.len(), 2);
    Ok(())
}

#[tokio::test]
async fn unknown_parent_is_rejected() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let err = category_service::create_category(
        &state,
        CreateCategoryRequest {
            name: "Lost".into(),
            parent_id: Some(Uuid::new_v4()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Integrity(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn name_length_is_capped() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let ok = create_category(&state, &"n".repeat(255), None).await?;
    assert_eq!(ok.name.chars().count(), 255);

    let err = category_service::create_category(
        &state,
        CreateCategoryRequest {
            name: "n".repeat(256),
            parent_id: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.field(), Some("name"));
    Ok(())
}

#[tokio::test]
async fn moves_that_create_cycles_are_rejected() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let books = create_category(&state, "Books", None).await?;
    let fiction = create_category(&state, "Fiction", Some(books.id)).await?;
    let sci_fi = create_category(&state, "Science Fiction", Some(fiction.id)).await?;

    let err = category_service::move_category(&state, books.id, Some(books.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Integrity(_)), "got {err:?}");

    let err = category_service::move_category(&state, books.id, Some(sci_fi.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Integrity(_)), "got {err:?}");

    // Rejected moves leave the tree untouched.
    let books_after = category_service::get_category(&state, books.id).await?;
    assert!(books_after.is_root());

    let moved = category_service::move_category(&state, sci_fi.id, Some(books.id)).await?;
    assert_eq!(moved.parent_id, Some(books.id));

    let detached = category_service::move_category(&state, fiction.id, None).await?;
    assert!(detached.is_root());
    Ok(())
}

#[tokio::test]
async fn update_renames_without_touching_parent() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let books = create_category(&state, "Books", None).await?;
    let fiction = create_category(&state, "Fiction", Some(books.id)).await?;

    let renamed = category_service::update_category(
        &state,
        fiction.id,
        UpdateCategoryRequest {
            name: Some("Novels".into()),
            parent_id: None,
        },
    )
    .await?;
    assert_eq!(renamed.name, "Novels");
    assert_eq!(renamed.parent_id, Some(books.id));

    let err = category_service::update_category(
        &state,
        Uuid::new_v4(),
        UpdateCategoryRequest::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[test]
fn parent_field_distinguishes_absent_from_null() {
    let absent: UpdateCategoryRequest = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
    assert_eq!(absent.parent_id, None);

    let null: UpdateCategoryRequest = serde_json::from_str(r#"{"parent_id":null}"#).unwrap();
    assert_eq!(null.parent_id, Some(None));
}
