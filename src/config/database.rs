//! Database configuration module for the storefront.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to generate SQL statements from the entity
//! models, so the database schema always matches the Rust struct definitions.

use crate::entities::{Cart, CartItem, Product, Purchase, Return, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/sweetshop.sqlite?mode=rwc".to_string());

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Creates tables for users, products, carts, cart items, purchases and returns.
/// Referenced tables are created before the tables that point at them so that the
/// foreign keys resolve.
///
/// # Errors
/// Returns an error if any table creation statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut product_table = schema.create_table_from_entity(Product);
    let mut cart_table = schema.create_table_from_entity(Cart);
    let mut cart_item_table = schema.create_table_from_entity(CartItem);
    let mut purchase_table = schema.create_table_from_entity(Purchase);
    let mut return_table = schema.create_table_from_entity(Return);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(product_table.if_not_exists()))
        .await?;
    db.execute(builder.build(cart_table.if_not_exists())).await?;
    db.execute(builder.build(cart_item_table.if_not_exists()))
        .await?;
    db.execute(builder.build(purchase_table.if_not_exists()))
        .await?;
    db.execute(builder.build(return_table.if_not_exists()))
        .await?;

    Ok(())
}
