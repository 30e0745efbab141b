use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    entity::categories::{ActiveModel, Column, Entity as Categories, Model as CategoryModel},
    error::{AppError, AppResult},
    models::{CascadeSummary, Category},
    page::{Meta, Page},
    params::Pagination,
    services::{constraint_error, product_service},
    state::AppState,
    validation::{self, NAME_MAX_LEN},
};

pub async fn create_category(
    state: &AppState,
    payload: CreateCategoryRequest,
) -> AppResult<Category> {
    validation::required_text("name", &payload.name, NAME_MAX_LEN)?;
    let txn = state.orm.begin().await?;
    if let Some(parent_id) = payload.parent_id {
        ensure_parent_exists(&txn, parent_id).await?;
    }

    let category = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        parent_id: Set(payload.parent_id),
    }
    .insert(&txn)
    .await
    .map_err(constraint_error)?;
    txn.commit().await?;

    tracing::debug!(category_id = %category.id, parent_id = ?category.parent_id, "category created");
    Ok(category_from_entity(category))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<Category> {
    Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(category_from_entity)
        .ok_or(AppError::NotFound)
}

pub async fn list_categories(state: &AppState, pagination: Pagination) -> AppResult<Page<Category>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Categories::find().order_by_asc(Column::Name);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();

    Ok(Page::new(items, Meta::new(page, limit, total)))
}

/// Categories without a parent.
pub async fn list_roots(state: &AppState) -> AppResult<Vec<Category>> {
    let roots = Categories::find()
        .filter(Column::ParentId.is_null())
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();
    Ok(roots)
}

pub async fn list_children(state: &AppState, parent_id: Uuid) -> AppResult<Vec<Category>> {
    if Categories::find_by_id(parent_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let children = Categories::find()
        .filter(Column::ParentId.eq(parent_id))
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();
    Ok(children)
}

/// Path from the direct parent up to the root.
pub async fn ancestors(state: &AppState, id: Uuid) -> AppResult<Vec<Category>> {
    let start = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut path = Vec::new();
    let mut seen = HashSet::from([start.id]);
    let mut next = start.parent_id;
    while let Some(parent_id) = next {
        if !seen.insert(parent_id) {
            break;
        }
        let Some(parent) = Categories::find_by_id(parent_id).one(&state.orm).await? else {
            break;
        };
        next = parent.parent_id;
        path.push(category_from_entity(parent));
    }
    Ok(path)
}

/// Every category below `id`, nearest levels first. `id` itself is excluded.
pub async fn descendant_ids(state: &AppState, id: Uuid) -> AppResult<Vec<Uuid>> {
    if Categories::find_by_id(id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let levels = subtree_levels(&state.orm, id).await?;
    Ok(levels.into_iter().skip(1).flatten().collect())
}

pub async fn update_category(
    state: &AppState,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<Category> {
    let txn = state.orm.begin().await?;

    let existing = Categories::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        validation::required_text("name", &name, NAME_MAX_LEN)?;
        active.name = Set(name);
    }
    if let Some(parent_id) = payload.parent_id {
        if let Some(parent_id) = parent_id {
            ensure_no_cycle(&txn, id, parent_id).await?;
        }
        active.parent_id = Set(parent_id);
    }

    let category = active.update(&txn).await.map_err(constraint_error)?;
    txn.commit().await?;

    Ok(category_from_entity(category))
}

/// Reparent a category. `None` makes it a root.
pub async fn move_category(
    state: &AppState,
    id: Uuid,
    new_parent: Option<Uuid>,
) -> AppResult<Category> {
    update_category(
        state,
        id,
        UpdateCategoryRequest {
            name: None,
            parent_id: Some(new_parent),
        },
    )
    .await
}

/// Delete a category together with its subtree, their products and those
/// products' seller links.
pub async fn delete_category(state: &AppState, id: Uuid) -> AppResult<CascadeSummary> {
    let txn = state.orm.begin().await?;

    if Categories::find_by_id(id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let levels = subtree_levels(&txn, id).await?;
    let category_ids: Vec<Uuid> = levels.iter().flatten().copied().collect();

    let mut summary = CascadeSummary::default();
    product_service::delete_products_in_categories(&txn, &category_ids, &mut summary).await?;

    // Leaves first so no row is removed while a child still points at it.
    for level in levels.into_iter().rev() {
        summary.categories += Categories::delete_many()
            .filter(Column::Id.is_in(level))
            .exec(&txn)
            .await?
            .rows_affected;
    }

    txn.commit().await?;

    tracing::info!(
        category_id = %id,
        categories = summary.categories,
        products = summary.products,
        seller_products = summary.seller_products,
        "category deleted"
    );
    Ok(summary)
}

async fn ensure_parent_exists<C: ConnectionTrait>(conn: &C, parent_id: Uuid) -> AppResult<()> {
    if Categories::find_by_id(parent_id).one(conn).await?.is_none() {
        return Err(AppError::integrity(format!(
            "parent category {parent_id} does not exist"
        )));
    }
    Ok(())
}

/// Walks up from `parent_id`; reaching `id` means the move would close a loop.
async fn ensure_no_cycle<C: ConnectionTrait>(conn: &C, id: Uuid, parent_id: Uuid) -> AppResult<()> {
    if parent_id == id {
        return Err(AppError::integrity("a category cannot be its own parent"));
    }
    ensure_parent_exists(conn, parent_id).await?;

    let mut seen = HashSet::new();
    let mut current = Some(parent_id);
    while let Some(ancestor_id) = current {
        if ancestor_id == id {
            return Err(AppError::integrity(format!(
                "category {parent_id} is a descendant of {id}"
            )));
        }
        if !seen.insert(ancestor_id) {
            break;
        }
        current = Categories::find_by_id(ancestor_id)
            .one(conn)
            .await?
            .and_then(|c| c.parent_id);
    }
    Ok(())
}

/// Breadth-first walk over the parent index; level 0 is `[root]`.
async fn subtree_levels<C: ConnectionTrait>(conn: &C, root: Uuid) -> AppResult<Vec<Vec<Uuid>>> {
    let mut levels = Vec::new();
    let mut seen = HashSet::from([root]);
    let mut frontier = vec![root];

    while !frontier.is_empty() {
        let children: Vec<Uuid> = Categories::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::ParentId.is_in(frontier.clone()))
            .into_tuple()
            .all(conn)
            .await?;
        levels.push(frontier);
        frontier = children.into_iter().filter(|c| seen.insert(*c)).collect();
    }
    Ok(levels)
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        parent_id: model.parent_id,
    }
}
