use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{BrandWithProducts, CatalogCategory, CatalogProduct};

/// One row of `brands LEFT JOIN products LEFT JOIN categories`.
#[derive(Debug, Clone, FromRow)]
pub struct BrandProductRow {
    pub brand_id: Uuid,
    pub brand_name: String,
    pub brand_logo: Option<String>,
    pub category_name: Option<String>,
    pub category_description: Option<String>,
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub product_price: Option<Decimal>,
    pub product_photo: Option<String>,
}

pub const BRANDS_WITH_PRODUCTS_SQL: &str = r#"
    SELECT b.id AS brand_id, b.name AS brand_name, b.logo AS brand_logo,
           c.name AS category_name, c.description AS category_description,
           p.id AS product_id, p.name AS product_name, p.price AS product_price,
           p.photo AS product_photo
    FROM brands b
    LEFT JOIN products p ON p.brand_id = b.id
    LEFT JOIN categories c ON c.id = p.category_id
    ORDER BY b.name, b.id, c.name, p.name
"#;

/// Pivot flat join rows into brand → category → product.
///
/// Brands keep the order they first appear in. A brand without products ends
/// up with no categories, and a category is only materialized once it holds a
/// product, so empty categories never reach the client. Products without a
/// category have nowhere to go and are skipped.
pub fn group_brands<I>(rows: I) -> Vec<BrandWithProducts>
where
    I: IntoIterator<Item = BrandProductRow>,
{
    let mut brands: Vec<BrandWithProducts> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        let slot = *index.entry(row.brand_id).or_insert_with(|| {
            brands.push(BrandWithProducts {
                id: row.brand_id,
                name: row.brand_name.clone(),
                logo: row.brand_logo.clone(),
                categories: Vec::new(),
            });
            brands.len() - 1
        });

        let (Some(product_id), Some(product_name), Some(price), Some(category_name)) = (
            row.product_id,
            row.product_name,
            row.product_price,
            row.category_name,
        ) else {
            continue;
        };

        let categories = &mut brands[slot].categories;
        let position = match categories.iter().position(|c| c.name == category_name) {
            Some(position) => position,
            None => {
                categories.push(CatalogCategory {
                    name: category_name,
                    description: row.category_description,
                    products: Vec::new(),
                });
                categories.len() - 1
            }
        };

        categories[position].products.push(CatalogProduct {
            id: product_id,
            name: product_name,
            price,
            photo: row.product_photo,
        });
    }

    brands
}
