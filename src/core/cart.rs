//! Cart business logic - aggregation and item management.
//!
//! A customer's cart is created lazily on the first add. Adding a product that
//! is already in the cart increments the existing line instead of duplicating
//! it, so each (cart, product) pair appears at most once. `cart_total` and
//! `check_available_quantity` are the two aggregation primitives the purchase
//! flow gates on.

use crate::{
    entities::{Cart, CartItem, Product, cart, cart_item, product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Outcome of a stock availability check across cart items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockStatus {
    /// Every cart line can be satisfied from stock
    Available,
    /// The first line whose requested quantity exceeds stock
    Unavailable {
        /// ID of the short product
        product_id: i64,
        /// Name of the short product, for the error message
        name: String,
        /// Units the cart asked for
        requested: i32,
        /// Units actually in stock
        available: i32,
    },
}

/// Returns the customer's cart, creating an empty one if none exists yet.
///
/// # Errors
/// Returns an error if the lookup or insert fails.
pub async fn get_or_create_cart<C>(db: &C, customer_id: i64) -> Result<cart::Model>
where
    C: ConnectionTrait,
{
    let existing = Cart::find()
        .filter(cart::Column::CustomerId.eq(customer_id))
        .one(db)
        .await?;
    if let Some(cart) = existing {
        return Ok(cart);
    }

    let cart = cart::ActiveModel {
        customer_id: Set(customer_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    cart.insert(db).await.map_err(Into::into)
}

/// Adds a product to the customer's cart, incrementing the line if present.
///
/// # Errors
/// Returns an error if:
/// - The quantity is zero or negative
/// - No product carries the given slug
/// - The database operations fail
pub async fn add_to_cart(
    db: &DatabaseConnection,
    customer_id: i64,
    product_slug: &str,
    quantity: i32,
) -> Result<cart_item::Model> {
    if quantity < 1 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let product = Product::find()
        .filter(product::Column::Slug.eq(product_slug))
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_slug.to_string(),
        })?;

    let cart = get_or_create_cart(db, customer_id).await?;

    let existing = CartItem::find()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .filter(cart_item::Column::ProductId.eq(product.id))
        .one(db)
        .await?;

    if let Some(item) = existing {
        let new_quantity = item.quantity + quantity;
        let mut item: cart_item::ActiveModel = item.into();
        item.quantity = Set(new_quantity);
        return item.update(db).await.map_err(Into::into);
    }

    let item = cart_item::ActiveModel {
        cart_id: Set(cart.id),
        product_id: Set(product.id),
        quantity: Set(quantity),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    item.insert(db).await.map_err(Into::into)
}

/// Removes a line from the customer's cart.
///
/// # Errors
/// Returns an error if the item does not exist, belongs to another customer's
/// cart, or the delete fails.
pub async fn remove_from_cart(
    db: &DatabaseConnection,
    customer_id: i64,
    cart_item_id: i64,
) -> Result<()> {
    let item = CartItem::find_by_id(cart_item_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: cart_item_id.to_string(),
        })?;

    let cart = Cart::find_by_id(item.cart_id)
        .one(db)
        .await?
        .ok_or(Error::Forbidden)?;
    if cart.customer_id != customer_id {
        return Err(Error::Forbidden);
    }

    item.delete(db).await?;
    Ok(())
}

/// Loads the customer's cart lines together with their products, oldest first.
///
/// Returns an empty list when the customer has no cart yet. Lines whose
/// product row has vanished are skipped.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn cart_items_with_products<C>(
    db: &C,
    customer_id: i64,
) -> Result<Vec<(cart_item::Model, product::Model)>>
where
    C: ConnectionTrait,
{
    let Some(cart) = Cart::find()
        .filter(cart::Column::CustomerId.eq(customer_id))
        .one(db)
        .await?
    else {
        return Ok(Vec::new());
    };

    let rows = CartItem::find()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .find_also_related(Product)
        .order_by_asc(cart_item::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(item, product)| product.map(|p| (item, p)))
        .collect())
}

/// Computes the total price of the customer's cart.
///
/// Sums quantity times unit price over every line; an empty or missing cart
/// totals zero. No side effects.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn cart_total(db: &DatabaseConnection, customer_id: i64) -> Result<Decimal> {
    let items = cart_items_with_products(db, customer_id).await?;
    Ok(items
        .iter()
        .map(|(item, product)| Decimal::from(item.quantity) * product.price)
        .sum())
}

/// Checks every cart line against current stock.
///
/// Pure function over already-loaded lines: returns `StockStatus::Unavailable`
/// identifying the first product whose stock cannot cover the requested
/// quantity, or `StockStatus::Available` when all lines fit.
#[must_use]
pub fn check_available_quantity(items: &[(cart_item::Model, product::Model)]) -> StockStatus {
    for (item, product) in items {
        if product.available_quantity < item.quantity {
            return StockStatus::Unavailable {
                product_id: product.id,
                name: product.name.clone(),
                requested: item.quantity,
                available: product.available_quantity,
            };
        }
    }
    StockStatus::Available
}

/// Deletes every line of a cart. The cart row itself survives.
///
/// # Errors
/// Returns an error if the delete fails.
pub async fn clear_cart<C>(db: &C, cart_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    CartItem::delete_many()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .exec(db)
        .await?;
    Ok(())
}
