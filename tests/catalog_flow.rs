use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Statement};
use serial_test::serial;
use shop_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterForm},
        brands::BrandForm,
        categories::{CreateCategoryRequest, UpdateCategoryRequest},
        products::{ProductForm, ProductQuery},
    },
    entity::Products,
    error::AppError,
    services::{auth_service, brand_service, category_service, product_service},
    state::AppState,
    uploads::UploadStore,
};
use uuid::Uuid;

// These tests talk to a real Postgres and are skipped when no database is configured.
fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run catalog flow tests.");
            None
        }
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url, 2).await?;
    let orm = create_orm_conn(&pool);
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE products, brands, categories, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let uploads = UploadStore::new(std::env::temp_dir().join(format!("shop-api-it-{}", Uuid::new_v4())));
    uploads.ensure_dir().await?;

    Ok(AppState { pool, orm, uploads })
}

async fn create_category(state: &AppState, name: &str, description: &str) -> anyhow::Result<()> {
    category_service::create_category(
        state,
        CreateCategoryRequest {
            name: Some(name.into()),
            description: Some(description.into()),
        },
    )
    .await?;
    Ok(())
}

fn product_form(name: &str, price: Decimal, category: &str) -> ProductForm {
    ProductForm {
        name: Some(name.into()),
        price: Some(price),
        category: Some(category.into()),
        ..ProductForm::default()
    }
}

#[tokio::test]
#[serial]
async fn created_category_appears_exactly_once() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&url).await?;

    create_category(&state, "Shoes", "Sneakers and boots").await?;
    create_category(&state, "Bags", "Totes").await?;

    let list = category_service::list_categories(&state).await?;
    let items = list.data.expect("categories").items;
    let names: Vec<_> = items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Bags", "Shoes"], "ordered by name");

    let shoes: Vec<_> = items.iter().filter(|c| c.name == "Shoes").collect();
    assert_eq!(shoes.len(), 1);
    assert_eq!(shoes[0].description.as_deref(), Some("Sneakers and boots"));

    let duplicate = category_service::create_category(
        &state,
        CreateCategoryRequest {
            name: Some("Shoes".into()),
            description: None,
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::OrmError(_))));
    Ok(())
}

#[tokio::test]
#[serial]
async fn category_update_and_lookup_by_name() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&url).await?;
    create_category(&state, "Shoes", "Sneakers").await?;

    let updated = category_service::update_category(
        &state,
        "Shoes",
        UpdateCategoryRequest {
            name: Some("Footwear".into()),
            description: None,
        },
    )
    .await?
    .data
    .expect("category");
    assert_eq!(updated.name, "Footwear");
    assert_eq!(updated.description.as_deref(), Some("Sneakers"));

    assert!(matches!(
        category_service::get_category(&state, "Shoes").await,
        Err(AppError::NotFound(_))
    ));
    assert!(category_service::get_category(&state, "Footwear").await.is_ok());
    assert!(matches!(
        category_service::update_category(&state, "Nope", UpdateCategoryRequest::default()).await,
        Err(AppError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
#[serial]
async fn delete_by_name_ignores_case_and_whitespace() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&url).await?;
    create_category(&state, "Shoes", "Sneakers").await?;

    let deleted = category_service::delete_category(&state, " shoes ").await?;
    assert_eq!(deleted.data.expect("deleted").name, "Shoes");

    let list = category_service::list_categories(&state).await?;
    assert!(list.data.expect("categories").items.is_empty());

    assert!(matches!(
        category_service::delete_category(&state, "Shoes").await,
        Err(AppError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
#[serial]
async fn product_with_unknown_category_is_not_persisted() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&url).await?;

    let result = product_service::create_product(
        &state,
        product_form("Air Max", Decimal::new(12000, 2), "Ghost"),
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(Products::find().count(&state.orm).await?, 0);

    create_category(&state, "Shoes", "Sneakers").await?;
    let mut form = product_form("Air Max", Decimal::new(12000, 2), "Shoes");
    form.brand_id = Some(Uuid::new_v4());
    let result = product_service::create_product(&state, form).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(Products::find().count(&state.orm).await?, 0);

    let missing_price = ProductForm {
        name: Some("Air Max".into()),
        category: Some("Shoes".into()),
        ..ProductForm::default()
    };
    assert!(matches!(
        product_service::create_product(&state, missing_price).await,
        Err(AppError::BadRequest(_))
    ));
    Ok(())
}

#[tokio::test]
#[serial]
async fn product_crud_with_partial_update() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&url).await?;
    create_category(&state, "Shoes", "Sneakers").await?;
    create_category(&state, "Sale", "Discounted").await?;

    let created = product_service::create_product(
        &state,
        product_form("Air Max", Decimal::new(12000, 2), "Shoes"),
    )
    .await?
    .data
    .expect("product");
    assert_eq!(created.category_name.as_deref(), Some("Shoes"));
    assert_eq!(created.category_description.as_deref(), Some("Sneakers"));

    let updated = product_service::update_product(
        &state,
        created.id,
        ProductForm {
            price: Some(Decimal::new(9900, 2)),
            category: Some("Sale".into()),
            ..ProductForm::default()
        },
    )
    .await?
    .data
    .expect("product");
    assert_eq!(updated.name, "Air Max", "omitted name is kept");
    assert_eq!(updated.price, Decimal::new(9900, 2));
    assert_eq!(updated.category_name.as_deref(), Some("Sale"));

    let untouched = product_service::update_product(&state, created.id, ProductForm::default())
        .await?
        .data
        .expect("product");
    assert_eq!(untouched.price, Decimal::new(9900, 2));

    let deleted = product_service::delete_product(&state, created.id)
        .await?
        .data
        .expect("product");
    assert_eq!(deleted.id, created.id);
    assert!(matches!(
        product_service::get_product(&state, created.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        product_service::delete_product(&state, created.id).await,
        Err(AppError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
#[serial]
async fn product_list_filters_by_owner_category_and_brand() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&url).await?;
    create_category(&state, "Shoes", "Sneakers").await?;
    create_category(&state, "Shirts", "Tees").await?;

    let owner = auth_service::register_user(
        &state,
        RegisterForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "s3cret".into(),
            photo: None,
        },
    )
    .await?
    .data
    .expect("user");
    let nike = brand_service::create_brand(
        &state,
        BrandForm {
            name: "Nike".into(),
            logo: None,
        },
    )
    .await?
    .data
    .expect("brand");

    let mut owned = product_form("Air Max", Decimal::new(12000, 2), "Shoes");
    owned.user_id = Some(owner.id);
    owned.brand_id = Some(nike.id);
    product_service::create_product(&state, owned).await?;
    product_service::create_product(&state, product_form("Plain Tee", Decimal::new(1500, 2), "Shirts"))
        .await?;

    let all = product_service::list_products(&state, ProductQuery::default()).await?;
    assert_eq!(all.data.expect("products").items.len(), 2);

    let mine = product_service::list_products(
        &state,
        ProductQuery {
            user_id: Some(owner.id),
            ..ProductQuery::default()
        },
    )
    .await?
    .data
    .expect("products")
    .items;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].brand_name.as_deref(), Some("Nike"));

    let shirts = product_service::list_products(
        &state,
        ProductQuery {
            category: Some("shirts".into()),
            ..ProductQuery::default()
        },
    )
    .await?
    .data
    .expect("products")
    .items;
    assert_eq!(shirts.len(), 1);
    assert_eq!(shirts[0].name, "Plain Tee");

    let by_brand = product_service::list_products(
        &state,
        ProductQuery {
            brand_id: Some(nike.id),
            ..ProductQuery::default()
        },
    )
    .await?
    .data
    .expect("products")
    .items;
    assert_eq!(by_brand.len(), 1);
    Ok(())
}

#[tokio::test]
#[serial]
async fn login_rejects_wrong_password_and_unknown_email_alike() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&url).await?;

    let form = || RegisterForm {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        password: "s3cret".into(),
        photo: None,
    };
    auth_service::register_user(&state, form()).await?;
    assert!(matches!(
        auth_service::register_user(&state, form()).await,
        Err(AppError::Conflict(_))
    ));

    let ok = auth_service::login_user(
        &state,
        LoginRequest {
            email: "ada@example.com".into(),
            password: "s3cret".into(),
        },
    )
    .await?;
    assert_eq!(ok.data.expect("user").name, "Ada");

    let wrong_password = auth_service::login_user(
        &state,
        LoginRequest {
            email: "ada@example.com".into(),
            password: "guess".into(),
        },
    )
    .await;
    let unknown_email = auth_service::login_user(
        &state,
        LoginRequest {
            email: "bob@example.com".into(),
            password: "s3cret".into(),
        },
    )
    .await;
    assert!(matches!(wrong_password, Err(AppError::Unauthorized)));
    assert!(matches!(unknown_email, Err(AppError::Unauthorized)));

    let users = auth_service::list_users(&state).await?.data.expect("users").items;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "ada@example.com");
    Ok(())
}

#[tokio::test]
#[serial]
async fn brands_with_products_nests_by_category() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&url).await?;
    create_category(&state, "Shoes", "Sneakers").await?;
    create_category(&state, "Empty", "Nothing here").await?;

    let nike = brand_service::create_brand(
        &state,
        BrandForm {
            name: "Nike".into(),
            logo: Some("1700-nike.png".into()),
        },
    )
    .await?
    .data
    .expect("brand");
    brand_service::create_brand(
        &state,
        BrandForm {
            name: "Puma".into(),
            logo: None,
        },
    )
    .await?;

    let mut form = product_form("Air Max", Decimal::new(12000, 2), "Shoes");
    form.brand_id = Some(nike.id);
    product_service::create_product(&state, form).await?;

    let tree = brand_service::brands_with_products(&state)
        .await?
        .data
        .expect("tree")
        .items;
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].name, "Nike");
    assert_eq!(tree[0].logo.as_deref(), Some("1700-nike.png"));
    assert_eq!(tree[0].categories.len(), 1);
    assert_eq!(tree[0].categories[0].name, "Shoes");
    assert_eq!(tree[0].categories[0].products[0].name, "Air Max");
    assert_eq!(tree[1].name, "Puma");
    assert!(tree[1].categories.is_empty());

    let brands = brand_service::list_brands(&state).await?.data.expect("brands");
    assert_eq!(brands.items.len(), 2);
    Ok(())
}
