use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Brand, BrandWithProducts},
    uploads::FormData,
};

/// Parsed `POST /brands` form.
#[derive(Debug)]
pub struct BrandForm {
    pub name: String,
    pub logo: Option<String>,
}

impl TryFrom<FormData> for BrandForm {
    type Error = AppError;

    fn try_from(form: FormData) -> AppResult<Self> {
        let name = form
            .text("name")
            .ok_or_else(|| AppError::bad_request("name is required"))?;
        Ok(Self {
            name,
            logo: form.file,
        })
    }
}

/// Multipart layout of `POST /brands`, for the API docs.
#[derive(Debug, ToSchema)]
pub struct BrandUpload {
    pub name: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub logo: Option<Vec<u8>>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct BrandList {
    #[schema(value_type = Vec<Brand>)]
    pub items: Vec<Brand>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct BrandTree {
    #[schema(value_type = Vec<BrandWithProducts>)]
    pub items: Vec<BrandWithProducts>,
}
