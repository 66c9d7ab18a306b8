use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, RegisterUpload, UserList},
        brands::{BrandList, BrandTree, BrandUpload},
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        products::{ProductList, ProductQuery, ProductUpload},
    },
    models::{Brand, BrandWithProducts, CatalogCategory, CatalogProduct, Category, Product, User},
    response::{ApiResponse, Meta},
    routes::{auth, brands, categories, health, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::list_users,
        auth::login,
        categories::create_category,
        categories::list_categories,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        brands::create_brand,
        brands::list_brands,
        brands::brands_with_products
    ),
    components(
        schemas(
            User,
            Category,
            Brand,
            Product,
            BrandWithProducts,
            CatalogCategory,
            CatalogProduct,
            RegisterUpload,
            UserList,
            LoginRequest,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryList,
            ProductUpload,
            ProductQuery,
            ProductList,
            BrandUpload,
            BrandList,
            BrandTree,
            Meta,
            ApiResponse<User>,
            ApiResponse<Category>,
            ApiResponse<UserList>,
            ApiResponse<Product>,
            ApiResponse<Brand>,
            ApiResponse<CategoryList>,
            ApiResponse<ProductList>,
            ApiResponse<BrandList>,
            ApiResponse<BrandTree>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Categories", description = "Category endpoints, keyed by name"),
        (name = "Products", description = "Product endpoints, also mounted at /produits"),
        (name = "Brands", description = "Brand endpoints and the brand catalog"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
