use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Product,
    uploads::FormData,
};

/// Parsed product form. Every field is optional here; create enforces the
/// required ones, update treats absent fields as "keep".
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub brand_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub photo: Option<String>,
}

impl TryFrom<FormData> for ProductForm {
    type Error = AppError;

    fn try_from(form: FormData) -> AppResult<Self> {
        let price = form.text("price").map(|raw| parse_price(&raw)).transpose()?;
        let brand_id = form
            .text("brand_id")
            .map(|raw| parse_id("brand_id", &raw))
            .transpose()?;
        let user_id = form
            .text("user_id")
            .or_else(|| form.text("id_user"))
            .map(|raw| parse_id("user_id", &raw))
            .transpose()?;
        Ok(Self {
            name: form.text("name"),
            price,
            category: form.text("category").or_else(|| form.text("category_name")),
            brand_id,
            user_id,
            photo: form.file,
        })
    }
}

/// `9999999999.99`, the largest value a `NUMERIC(12,2)` price column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Accepts `12.5` and `12,5`; rejects negatives and anything above [`MAX_PRICE`].
pub fn parse_price(raw: &str) -> AppResult<Decimal> {
    let price = Decimal::from_str(&raw.trim().replace(',', "."))
        .map_err(|_| AppError::bad_request(format!("price '{raw}' is not a number")))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::bad_request("price must not be negative"));
    }
    let price = price.round_dp(2);
    if price > MAX_PRICE {
        return Err(AppError::bad_request(format!("price must not exceed {MAX_PRICE}")));
    }
    Ok(price)
}

fn parse_id(field: &str, raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request(format!("{field} must be a UUID")))
}

/// Multipart layout of product create/update, for the API docs.
#[derive(Debug, ToSchema)]
pub struct ProductUpload {
    pub name: Option<String>,
    #[schema(example = "49.90")]
    pub price: Option<String>,
    /// Category name.
    pub category: Option<String>,
    pub brand_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Only products owned by this user.
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: Option<Uuid>,
    /// Category name, case-insensitive.
    pub category: Option<String>,
    pub brand_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
