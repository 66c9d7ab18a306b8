use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    catalog::{BRANDS_WITH_PRODUCTS_SQL, BrandProductRow, group_brands},
    dto::brands::{BrandForm, BrandList, BrandTree},
    entity::brands::{ActiveModel, Column, Entity as Brands, Model as BrandModel},
    error::{AppError, AppResult},
    models::Brand,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn create_brand(state: &AppState, payload: BrandForm) -> AppResult<ApiResponse<Brand>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("name is required"));
    }
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        logo: Set(payload.logo),
        created_at: NotSet,
    };
    let brand = active.insert(&state.orm).await?;

    tracing::info!(brand = %brand.name, "brand created");
    Ok(ApiResponse::success(
        "Brand created",
        brand_from_entity(brand),
        Some(Meta::empty()),
    ))
}

pub async fn list_brands(state: &AppState) -> AppResult<ApiResponse<BrandList>> {
    let items: Vec<Brand> = Brands::find()
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(brand_from_entity)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Brands", BrandList { items }, Some(meta)))
}

pub async fn brands_with_products(state: &AppState) -> AppResult<ApiResponse<BrandTree>> {
    let rows: Vec<BrandProductRow> = sqlx::query_as(BRANDS_WITH_PRODUCTS_SQL)
        .fetch_all(&state.pool)
        .await?;
    tracing::debug!(rows = rows.len(), "brand catalog rows loaded");

    let items = group_brands(rows);
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Brands with products",
        BrandTree { items },
        Some(meta),
    ))
}

fn brand_from_entity(model: BrandModel) -> Brand {
    Brand {
        id: model.id,
        name: model.name,
        logo: model.logo,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
