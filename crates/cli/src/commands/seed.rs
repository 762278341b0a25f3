//! Seed the database with the starter catalog and demo accounts.
//!
//! Categories and accounts are upserted; the product catalog is wiped and
//! re-created, so this fails once real orders reference the products.
//! Intended for development and demo databases.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use bloomery_server::services::auth::{self, AuthError};

use super::{CommandError, database_url};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] AuthError),
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    image: &'static str,
    stock: i32,
    category: &'static str,
}

const CATEGORIES: &[(&str, &str)] = &[
    ("Roses", "Fresh, beautiful roses."),
    ("Potted Plants", "Potted plants for homes and offices."),
    ("Orchids", "Elegant, stylish orchids."),
    ("Bouquets", "Flower bouquets for special occasions."),
    ("Seasonal Flowers", "Seasonal and mixed flowers."),
];

fn seed_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Red Rose Bouquet",
            description: "A bouquet of 12 fresh red roses.",
            price: Decimal::new(75000, 2),
            image: "/images/roses.png",
            stock: 20,
            category: "Roses",
        },
        SeedProduct {
            name: "Yucca Potted Plant",
            description: "A decorative, hardy potted plant.",
            price: Decimal::new(175_000, 2),
            image: "/images/potted.png",
            stock: 10,
            category: "Potted Plants",
        },
        SeedProduct {
            name: "White Orchid",
            description: "An elegant, stylish white orchid.",
            price: Decimal::new(120_000, 2),
            image: "/images/orchid.png",
            stock: 8,
            category: "Orchids",
        },
        SeedProduct {
            name: "Colorful Flower Bouquet",
            description: "A colorful bouquet of mixed flowers.",
            price: Decimal::new(110_000, 2),
            image: "/images/bouquet.png",
            stock: 15,
            category: "Bouquets",
        },
        SeedProduct {
            name: "Seasonal Flower Arrangement",
            description: "An arrangement of colorful seasonal flowers.",
            price: Decimal::new(95000, 2),
            image: "/images/seasonal.png",
            stock: 12,
            category: "Seasonal Flowers",
        },
    ]
}

/// Seed categories, products, and demo accounts.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or a statement fails.
pub async fn run() -> Result<(), SeedError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = bloomery_server::db::create_pool(&database_url).await?;

    let categories = seed_categories(&pool).await?;
    let products = seed_catalog(&pool).await?;
    let users = seed_accounts(&pool).await?;

    tracing::info!("Seed complete!");
    tracing::info!("  Categories: {}", categories);
    tracing::info!("  Products: {}", products);
    tracing::info!("  Accounts: {} (user@bloomery.test / admin@bloomery.test)", users);

    Ok(())
}

async fn seed_categories(pool: &PgPool) -> Result<usize, SeedError> {
    for (name, description) in CATEGORIES {
        sqlx::query(
            "INSERT INTO categories (name, description)
             VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET description = EXCLUDED.description",
        )
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
    }

    Ok(CATEGORIES.len())
}

async fn seed_catalog(pool: &PgPool) -> Result<usize, SeedError> {
    // Start from a clean catalog; stale demo products would accumulate otherwise
    sqlx::query("DELETE FROM products").execute(pool).await?;

    let products = seed_products();
    for product in &products {
        sqlx::query(
            "INSERT INTO products (name, description, price, image, stock, category_id)
             SELECT $1, $2, $3, $4, $5, c.id FROM categories c WHERE c.name = $6",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.image)
        .bind(product.stock)
        .bind(product.category)
        .execute(pool)
        .await?;
    }

    Ok(products.len())
}

async fn seed_accounts(pool: &PgPool) -> Result<usize, SeedError> {
    let user_hash = auth::hash_password("customer123")?;
    let admin_hash = auth::hash_password("admin123456")?;

    sqlx::query(
        "INSERT INTO users (name, email, password_hash, role)
         VALUES ($1, $2, $3, 'USER')
         ON CONFLICT (email) DO NOTHING",
    )
    .bind("Demo Customer")
    .bind("user@bloomery.test")
    .bind(&user_hash)
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO users (name, email, password_hash, role)
         VALUES ($1, $2, $3, 'ADMIN')
         ON CONFLICT (email) DO NOTHING",
    )
    .bind("Shop Admin")
    .bind("admin@bloomery.test")
    .bind(&admin_hash)
    .execute(pool)
    .await?;

    Ok(2)
}
