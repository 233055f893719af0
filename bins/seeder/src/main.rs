//! Database seeder for thbfx.
//!
//! Upserts the reference currencies and creates the initial admin account
//! when it does not exist yet. Safe to run repeatedly.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use sea_orm::DatabaseConnection;
use thbfx_core::auth::{Role, hash_password};
use thbfx_db::repositories::DEFAULT_CURRENCIES;
use thbfx_db::{CurrencyRepository, UserRepository};

const ADMIN_NAME: &str = "Administrator";
const ADMIN_EMAIL: &str = "admin@currency.local";
const ADMIN_PASSWORD: &str = "admin1234";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = thbfx_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding currencies...");
    CurrencyRepository::new(db.clone())
        .upsert(&DEFAULT_CURRENCIES)
        .await
        .context("Failed to seed currencies")?;
    println!("  {} currencies up to date", DEFAULT_CURRENCIES.len());

    println!("Seeding admin user...");
    seed_admin(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_admin(db: &DatabaseConnection) -> anyhow::Result<()> {
    let users = UserRepository::new(db.clone());
    if users.email_exists(ADMIN_EMAIL).await? {
        println!("  Admin user already exists, skipping...");
        return Ok(());
    }

    let password_hash = hash_password(ADMIN_PASSWORD)?;
    users
        .create(ADMIN_NAME, ADMIN_EMAIL, &password_hash, Role::Admin)
        .await?;
    println!("  Created {ADMIN_EMAIL} (change the password after first login)");
    Ok(())
}
