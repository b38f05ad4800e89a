//! Product business logic - catalog management and stock adjustment.
//!
//! This module provides functions for creating, retrieving and updating
//! products, deriving unique URL slugs from product names, and atomically
//! adjusting stock counters. All functions are async and return Result types
//! for proper error handling throughout the system.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all products, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by its URL slug, returning None if not found.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Slug.eq(slug))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by its unique ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Derives a unique slug from a product name.
///
/// Starts from the slugified name and appends `-2`, `-3`, ... until no other
/// product holds the slug.
async fn unique_slug<C>(db: &C, name: &str) -> Result<String>
where
    C: ConnectionTrait,
{
    let base = slug::slugify(name);
    let mut candidate = base.clone();
    let mut suffix = 2u32;

    loop {
        let taken = Product::find()
            .filter(product::Column::Slug.eq(&candidate))
            .one(db)
            .await?;
        if taken.is_none() {
            return Ok(candidate);
        }
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
}

/// Creates a new product, performing input validation and slug derivation.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is negative
/// - The initial quantity is negative
/// - The database insert operation fails
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    description: String,
    price: Decimal,
    image: Option<String>,
    available_quantity: i32,
) -> Result<product::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if price < Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: price });
    }

    if available_quantity < 0 {
        return Err(Error::InvalidQuantity {
            quantity: available_quantity,
        });
    }

    let slug = unique_slug(db, &name).await?;

    let product = product::ActiveModel {
        name: Set(name),
        description: Set(description),
        price: Set(price),
        image: Set(image),
        available_quantity: Set(available_quantity),
        slug: Set(slug),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Updates an existing product's fields, keeping its slug stable.
///
/// The slug stays attached to the original name so bookmarked product URLs
/// keep working after an edit.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist
/// - The new name is empty, the price or quantity negative
/// - The database update operation fails
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    new_name: String,
    new_description: String,
    new_price: Decimal,
    new_image: Option<String>,
    new_quantity: i32,
) -> Result<product::Model> {
    let new_name = new_name.trim().to_string();
    if new_name.is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if new_price < Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: new_price });
    }

    if new_quantity < 0 {
        return Err(Error::InvalidQuantity {
            quantity: new_quantity,
        });
    }

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?
        .into();

    product.name = Set(new_name);
    product.description = Set(new_description);
    product.price = Set(new_price);
    product.image = Set(new_image);
    product.available_quantity = Set(new_quantity);

    product.update(db).await.map_err(Into::into)
}

/// Atomically adds a delta to a product's stock counter.
///
/// Issues a single `UPDATE products SET available_quantity =
/// available_quantity + delta WHERE id = ?` so concurrent purchases and return
/// approvals cannot lose updates. Use a negative delta to decrement.
///
/// # Errors
/// Returns an error if the product does not exist or the update fails.
pub async fn adjust_stock_atomic<C>(
    db: &C,
    product_id: i64,
    delta: i32,
) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    let _product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?;

    Product::update_many()
        .col_expr(
            product::Column::AvailableQuantity,
            Expr::col(product::Column::AvailableQuantity).add(delta),
        )
        .filter(product::Column::Id.eq(product_id))
        .exec(db)
        .await?;

    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })
}
