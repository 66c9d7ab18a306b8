use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{ProductForm, ProductList, ProductQuery, ProductUpload},
    error::AppResult,
    extract::{ApiMultipart, ApiPath, ApiQuery},
    models::Product,
    response::ApiResponse,
    services::product_service,
    state::AppState,
    uploads::read_form,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/produit",
    params(ProductQuery),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/produit/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/produit",
    request_body(content = ProductUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Missing or invalid field"),
        (status = 404, description = "Category, brand or user not found")
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let form = read_form(&mut multipart, &state.uploads, "photo").await?;
    let photo = form.file.clone();
    let result = match ProductForm::try_from(form) {
        Ok(payload) => product_service::create_product(&state, payload).await,
        Err(err) => Err(err),
    };
    let resp = state.uploads.discard_on_error(photo.as_deref(), result).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/produit/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body(content = ProductUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Product, category, brand or user not found")
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> AppResult<Json<ApiResponse<Product>>> {
    let form = read_form(&mut multipart, &state.uploads, "photo").await?;
    let photo = form.file.clone();
    let result = match ProductForm::try_from(form) {
        Ok(payload) => product_service::update_product(&state, id, payload).await,
        Err(err) => Err(err),
    };
    let resp = state.uploads.discard_on_error(photo.as_deref(), result).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/produit/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found")
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::delete_product(&state, id).await?;
    Ok(Json(resp))
}
