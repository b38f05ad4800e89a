//! Shared test utilities for the storefront.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{product, user},
    entities,
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test user with the given wallet balance.
///
/// # Defaults
/// * password: `"password"`
/// * currency: `"UAH"`
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    wallet_balance: Decimal,
) -> Result<entities::user::Model> {
    user::signup(
        db,
        username.to_string(),
        "password",
        None,
        wallet_balance,
        "UAH",
    )
    .await
}

/// Creates a test product with the given price and stock.
///
/// # Defaults
/// * description: `"Test product"`
/// * image: None
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
    available_quantity: i32,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        name.to_string(),
        "Test product".to_string(),
        price,
        None,
        available_quantity,
    )
    .await
}

/// Inserts a purchase whose `purchase_date` lies `age_secs` in the past.
///
/// Used to exercise the return-window checks without sleeping. The wallet and
/// stock are NOT touched; callers assert against the balances they set up.
pub async fn create_backdated_purchase(
    db: &DatabaseConnection,
    buyer_id: i64,
    product_id: i64,
    quantity: i32,
    total_price: Decimal,
    age_secs: i64,
) -> Result<entities::purchase::Model> {
    let purchase_date = chrono::Utc::now() - chrono::Duration::seconds(age_secs);
    let record = entities::purchase::ActiveModel {
        buyer_id: Set(buyer_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        total_price: Set(total_price),
        purchase_date: Set(purchase_date),
        purchase_date_user: Set(purchase_date.naive_utc()),
        is_active: Set(true),
        ..Default::default()
    };
    record.insert(db).await.map_err(Into::into)
}

/// Reloads a user, failing the test if the row has vanished.
pub async fn get_test_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<entities::user::Model> {
    user::get_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            name: user_id.to_string(),
        })
}

/// Reloads a product, failing the test if the row has vanished.
pub async fn get_test_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<entities::product::Model> {
    product::get_product_by_id(db, product_id)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })
}
