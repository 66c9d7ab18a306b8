use rust_decimal::Decimal;
use shop_api::{
    config::AppConfig,
    db::create_pool,
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 2).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "Admin", "admin@example.com", "admin123").await?;
    seed_categories(&pool).await?;
    seed_brands(&pool).await?;
    seed_products(&pool, admin_id).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email}");
    Ok(row.0)
}

async fn seed_categories(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categories = [
        ("Shoes", "Running, training and everyday sneakers"),
        ("Shirts", "Tees and technical tops"),
        ("Accessories", "Bags, caps and socks"),
    ];

    for (name, description) in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
    }

    println!("Seeded categories");
    Ok(())
}

async fn seed_brands(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for name in ["Nike", "Puma", "Adidas"] {
        sqlx::query(
            r#"
            INSERT INTO brands (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .execute(pool)
        .await?;
    }

    println!("Seeded brands");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool, owner: Uuid) -> anyhow::Result<()> {
    let products = [
        ("Air Max 90", 12999_i64, "Shoes", "Nike"),
        ("Dri-FIT Tee", 3499, "Shirts", "Nike"),
        ("Suede Classic", 7499, "Shoes", "Puma"),
        ("Training Cap", 1999, "Accessories", "Puma"),
    ];

    for (name, cents, category, brand) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, category_id, brand_id, user_id)
            SELECT $1, $2, $3, c.id, b.id, $6
            FROM categories c, brands b
            WHERE c.name = $4 AND b.name = $5
              AND NOT EXISTS (SELECT 1 FROM products p WHERE p.name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(Decimal::new(cents, 2))
        .bind(category)
        .bind(brand)
        .bind(owner)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
