use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    entity::categories::{ActiveModel, Column, Entity as Categories, Model as CategoryModel},
    error::{AppError, AppResult},
    models::Category,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn create_category(
    state: &AppState,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let name = required_name(payload.name)?;
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description),
        created_at: NotSet,
    };
    let category = active.insert(&state.orm).await?;

    tracing::info!(category = %category.name, "category created");
    Ok(ApiResponse::success(
        "Category created",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = Categories::find()
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(meta),
    ))
}

pub async fn get_category(state: &AppState, name: &str) -> AppResult<ApiResponse<Category>> {
    let category = find_by_name(state, name).await?;
    Ok(ApiResponse::success(
        "Category",
        category_from_entity(category),
        None,
    ))
}

pub async fn update_category(
    state: &AppState,
    name: &str,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let existing = find_by_name(state, name).await?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(new_name) = payload.name {
        active.name = Set(required_name(Some(new_name))?);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }

    let category = if active.is_changed() {
        active.update(&state.orm).await?
    } else {
        existing
    };

    tracing::info!(from = %name, to = %category.name, "category updated");
    Ok(ApiResponse::success(
        "Category updated",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

/// Matches on the trimmed, lower-cased name, so " shoes " removes "Shoes".
pub async fn delete_category(state: &AppState, name: &str) -> AppResult<ApiResponse<Category>> {
    let deleted: Vec<Category> = sqlx::query_as(
        r#"
        DELETE FROM categories
        WHERE LOWER(TRIM(name)) = LOWER(TRIM($1))
        RETURNING id, name, description, created_at
        "#,
    )
    .bind(name)
    .fetch_all(&state.pool)
    .await?;

    if deleted.len() > 1 {
        tracing::warn!(name = %name, count = deleted.len(), "delete matched several categories");
    }

    let category = deleted
        .into_iter()
        .next()
        .ok_or_else(|| AppError::not_found(format!("category '{name}'")))?;

    tracing::info!(category = %category.name, "category deleted");
    Ok(ApiResponse::success(
        "Category deleted",
        category,
        Some(Meta::empty()),
    ))
}

/// Exact-name lookup shared with the product handlers.
pub async fn find_by_name(state: &AppState, name: &str) -> AppResult<CategoryModel> {
    Categories::find()
        .filter(Column::Name.eq(name))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found(format!("category '{name}'")))
}

fn required_name(name: Option<String>) -> AppResult<String> {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::bad_request("name is required"))
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
