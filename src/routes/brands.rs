use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::brands::{BrandForm, BrandList, BrandTree, BrandUpload},
    error::AppResult,
    extract::ApiMultipart,
    models::Brand,
    response::ApiResponse,
    services::brand_service,
    state::AppState,
    uploads::read_form,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_brands).post(create_brand))
}

#[utoipa::path(
    post,
    path = "/brands",
    request_body(content = BrandUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Create brand", body = ApiResponse<Brand>),
        (status = 400, description = "Missing name")
    ),
    tag = "Brands"
)]
pub async fn create_brand(
    State(state): State<AppState>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> AppResult<(StatusCode, Json<ApiResponse<Brand>>)> {
    let form = read_form(&mut multipart, &state.uploads, "logo").await?;
    let logo = form.file.clone();
    let result = match BrandForm::try_from(form) {
        Ok(payload) => brand_service::create_brand(&state, payload).await,
        Err(err) => Err(err),
    };
    let resp = state.uploads.discard_on_error(logo.as_deref(), result).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/brands",
    responses(
        (status = 200, description = "All brands ordered by name", body = ApiResponse<BrandList>)
    ),
    tag = "Brands"
)]
pub async fn list_brands(State(state): State<AppState>) -> AppResult<Json<ApiResponse<BrandList>>> {
    let resp = brand_service::list_brands(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/brands-with-products",
    responses(
        (status = 200, description = "Brands with their products grouped by category", body = ApiResponse<BrandTree>)
    ),
    tag = "Brands"
)]
pub async fn brands_with_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<BrandTree>>> {
    let resp = brand_service::brands_with_products(&state).await?;
    Ok(Json(resp))
}
