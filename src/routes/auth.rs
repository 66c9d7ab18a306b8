use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::auth::{LoginRequest, RegisterForm, RegisterUpload, UserList},
    error::AppResult,
    extract::{ApiJson, ApiMultipart},
    models::User,
    response::ApiResponse,
    services::auth_service::{list_users as list_all_users, login_user, register_user},
    state::AppState,
    uploads::read_form,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(register).get(list_users))
}

#[utoipa::path(
    post,
    path = "/users",
    request_body(content = RegisterUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Register user", body = ApiResponse<User>),
        (status = 400, description = "Missing name, email or password"),
        (status = 409, description = "Email already used")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let form = read_form(&mut multipart, &state.uploads, "photo").await?;
    let photo = form.file.clone();
    let result = match RegisterForm::try_from(form) {
        Ok(payload) => register_user(&state, payload).await,
        Err(err) => Err(err),
    };
    let resp = state.uploads.discard_on_error(photo.as_deref(), result).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "List users", body = ApiResponse<UserList>)
    ),
    tag = "Auth"
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = list_all_users(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<User>),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}
