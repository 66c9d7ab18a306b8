use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    dto::products::{ProductForm, ProductList, ProductQuery},
    entity::{
        brands::{Entity as Brands, Model as BrandModel},
        categories::{Entity as Categories, Model as CategoryModel},
        products::{ActiveModel, Entity as Products, Model as ProductModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    services::category_service,
    state::AppState,
};

const PRODUCT_VIEW_SQL: &str = r#"
    SELECT p.id, p.name, p.price, p.photo, p.user_id, p.brand_id, p.category_id,
           c.name AS category_name, c.description AS category_description,
           b.name AS brand_name, p.created_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN brands b ON b.id = p.brand_id
"#;

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let mut builder = QueryBuilder::<Postgres>::new(PRODUCT_VIEW_SQL);
    builder.push(" WHERE TRUE");

    if let Some(user_id) = query.user_id {
        builder.push(" AND p.user_id = ").push_bind(user_id);
    }
    if let Some(category) = query.category.as_ref().filter(|s| !s.trim().is_empty()) {
        builder
            .push(" AND LOWER(c.name) = LOWER(")
            .push_bind(category.trim().to_string())
            .push(")");
    }
    if let Some(brand_id) = query.brand_id {
        builder.push(" AND p.brand_id = ").push_bind(brand_id);
    }
    builder.push(" ORDER BY p.created_at, p.id");

    let items = builder
        .build_query_as::<Product>()
        .fetch_all(&state.pool)
        .await?;

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = fetch_product(state, id).await?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn create_product(
    state: &AppState,
    payload: ProductForm,
) -> AppResult<ApiResponse<Product>> {
    let name = payload
        .name
        .ok_or_else(|| AppError::bad_request("name is required"))?;
    let price = payload
        .price
        .ok_or_else(|| AppError::bad_request("price is required"))?;
    let category_name = payload
        .category
        .ok_or_else(|| AppError::bad_request("category is required"))?;

    let category = category_service::find_by_name(state, &category_name).await?;
    let brand = match payload.brand_id {
        Some(brand_id) => Some(find_brand(state, brand_id).await?),
        None => None,
    };
    if let Some(user_id) = payload.user_id {
        ensure_user(state, user_id).await?;
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        price: Set(price),
        category_id: Set(Some(category.id)),
        brand_id: Set(payload.brand_id),
        user_id: Set(payload.user_id),
        photo: Set(payload.photo),
        created_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;
    tracing::info!(product_id = %product.id, category = %category.name, "product created");

    Ok(ApiResponse::success(
        "Product created",
        product_view(product, Some(category), brand),
        Some(Meta::empty()),
    ))
}

/// Partial update: absent fields keep their stored value. A new photo replaces
/// the old reference and the old file is dropped.
///
/// Every lookup happens before the write, so an error returned from here means
/// nothing was stored and an uploaded photo can be discarded.
pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: ProductForm,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("product"))?;
    let previous_photo = existing.photo.clone();

    let category = match (&payload.category, existing.category_id) {
        (Some(name), _) => Some(category_service::find_by_name(state, name).await?),
        (None, Some(category_id)) => Categories::find_by_id(category_id).one(&state.orm).await?,
        (None, None) => None,
    };
    let brand = match (payload.brand_id, existing.brand_id) {
        (Some(brand_id), _) => Some(find_brand(state, brand_id).await?),
        (None, Some(brand_id)) => Brands::find_by_id(brand_id).one(&state.orm).await?,
        (None, None) => None,
    };
    if let Some(user_id) = payload.user_id {
        ensure_user(state, user_id).await?;
    }

    let mut active: ActiveModel = existing.clone().into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if payload.category.is_some() {
        active.category_id = Set(category.as_ref().map(|c| c.id));
    }
    if let Some(brand_id) = payload.brand_id {
        active.brand_id = Set(Some(brand_id));
    }
    if let Some(user_id) = payload.user_id {
        active.user_id = Set(Some(user_id));
    }
    let new_photo = payload.photo;
    if let Some(photo) = new_photo.clone() {
        active.photo = Set(Some(photo));
    }

    let updated = if active.is_changed() {
        let model = active.update(&state.orm).await?;
        tracing::info!(product_id = %id, "product updated");
        model
    } else {
        existing
    };

    if let (Some(old), Some(new)) = (previous_photo, new_photo) {
        if old != new {
            state.uploads.remove(&old).await;
        }
    }

    Ok(ApiResponse::success(
        "Updated",
        product_view(updated, category, brand),
        Some(Meta::empty()),
    ))
}

/// Returns the row as it was before deletion.
pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = fetch_product(state, id).await?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("product"));
    }
    if let Some(photo) = product.photo.as_deref() {
        state.uploads.remove(photo).await;
    }

    tracing::info!(product_id = %id, "product deleted");
    Ok(ApiResponse::success("Deleted", product, Some(Meta::empty())))
}

async fn fetch_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let mut builder = QueryBuilder::<Postgres>::new(PRODUCT_VIEW_SQL);
    builder.push(" WHERE p.id = ").push_bind(id);
    builder
        .build_query_as::<Product>()
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::not_found("product"))
}

async fn find_brand(state: &AppState, id: Uuid) -> AppResult<BrandModel> {
    Brands::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found(format!("brand {id}")))
}

/// Same shape as a `PRODUCT_VIEW_SQL` row, built from models already in hand.
fn product_view(
    product: ProductModel,
    category: Option<CategoryModel>,
    brand: Option<BrandModel>,
) -> Product {
    let (category_name, category_description) = match category {
        Some(category) => (Some(category.name), category.description),
        None => (None, None),
    };
    Product {
        id: product.id,
        name: product.name,
        price: product.price,
        photo: product.photo,
        user_id: product.user_id,
        brand_id: product.brand_id,
        category_id: product.category_id,
        category_name,
        category_description,
        brand_name: brand.map(|b| b.name),
        created_at: product.created_at.with_timezone(&Utc),
    }
}

async fn ensure_user(state: &AppState, id: Uuid) -> AppResult<()> {
    match Users::find_by_id(id).one(&state.orm).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found(format!("user {id}"))),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn stored_product(category_id: Option<Uuid>, brand_id: Option<Uuid>) -> ProductModel {
        ProductModel {
            id: Uuid::new_v4(),
            name: "Air Max".into(),
            price: Decimal::new(12000, 2),
            category_id,
            brand_id,
            user_id: None,
            photo: Some("1-air.png".into()),
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn view_is_built_from_loaded_relations() {
        let now = Utc::now().fixed_offset();
        let category = CategoryModel {
            id: Uuid::new_v4(),
            name: "Shoes".into(),
            description: Some("Footwear".into()),
            created_at: now,
        };
        let brand = BrandModel {
            id: Uuid::new_v4(),
            name: "Nike".into(),
            logo: None,
            created_at: now,
        };
        let model = stored_product(Some(category.id), Some(brand.id));
        let created_at = model.created_at.with_timezone(&Utc);

        let view = product_view(model, Some(category.clone()), Some(brand));
        assert_eq!(view.category_id, Some(category.id));
        assert_eq!(view.category_name.as_deref(), Some("Shoes"));
        assert_eq!(view.category_description.as_deref(), Some("Footwear"));
        assert_eq!(view.brand_name.as_deref(), Some("Nike"));
        assert_eq!(view.photo.as_deref(), Some("1-air.png"));
        assert_eq!(view.created_at, created_at);
    }

    #[test]
    fn view_without_relations_leaves_names_empty() {
        let view = product_view(stored_product(None, None), None, None);
        assert_eq!(view.category_name, None);
        assert_eq!(view.category_description, None);
        assert_eq!(view.brand_name, None);
    }
}
