use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::User,
    uploads::FormData,
};

/// Parsed `POST /users` form.
#[derive(Debug)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub photo: Option<String>,
}

impl TryFrom<FormData> for RegisterForm {
    type Error = AppError;

    fn try_from(form: FormData) -> AppResult<Self> {
        let name = form
            .text("name")
            .ok_or_else(|| AppError::bad_request("name is required"))?;
        let email = form
            .text("email")
            .ok_or_else(|| AppError::bad_request("email is required"))?;
        let password = form
            .raw("password")
            .ok_or_else(|| AppError::bad_request("password is required"))?;
        Ok(Self {
            name,
            email,
            password,
            photo: form.file,
        })
    }
}

/// Multipart layout of `POST /users`, for the API docs.
#[derive(Debug, ToSchema)]
pub struct RegisterUpload {
    pub name: String,
    pub email: String,
    pub password: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}
