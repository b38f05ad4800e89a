//! Purchase business logic - turns a cart into purchase records.
//!
//! `execute_purchase` is the money-and-inventory reconciliation at the heart of
//! the shop: it debits the wallet, decrements stock and snapshots a Purchase
//! row per cart line, then empties the cart. The whole flow runs inside one
//! database transaction, so a failure anywhere leaves wallet, stock and cart
//! untouched. Wallet and stock writes go through the atomic column updates in
//! [`crate::core::user`] and [`crate::core::product`].
//!
//! Stock is decremented in exactly one place, here; creating a Purchase row by
//! itself never touches the stock counter.

use crate::{
    core::{cart, product as product_ops, user as user_ops},
    entities::{Product, Purchase, User, product, purchase},
    errors::{Error, Result},
};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Executes the purchase of the buyer's entire cart.
///
/// Preconditions checked before any mutation: the cart total must not exceed
/// the wallet balance, and every line's quantity must be covered by stock.
/// Each line then debits the wallet by quantity times unit price, decrements
/// the product's stock by the quantity and records a Purchase whose
/// `purchase_date_user` is the purchase instant in `buyer_tz` (UTC when the
/// buyer declared none). Finally the cart is emptied.
///
/// An empty cart is a no-op returning no purchases.
///
/// # Errors
/// Returns an error if:
/// - The buyer does not exist
/// - The cart total exceeds the wallet balance (`InsufficientFunds`)
/// - A line exceeds stock (`InsufficientStock`, naming the first short product)
/// - Any database operation fails
pub async fn execute_purchase(
    db: &DatabaseConnection,
    buyer_id: i64,
    buyer_tz: Option<Tz>,
) -> Result<Vec<purchase::Model>> {
    let txn = db.begin().await?;

    let buyer = User::find_by_id(buyer_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            name: buyer_id.to_string(),
        })?;

    let items = cart::cart_items_with_products(&txn, buyer_id).await?;
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let total: Decimal = items
        .iter()
        .map(|(item, product)| Decimal::from(item.quantity) * product.price)
        .sum();
    if total > buyer.wallet_balance {
        return Err(Error::InsufficientFunds {
            current: buyer.wallet_balance,
            required: total,
        });
    }

    if let cart::StockStatus::Unavailable {
        name,
        requested,
        available,
        ..
    } = cart::check_available_quantity(&items)
    {
        return Err(Error::InsufficientStock {
            product: name,
            requested,
            available,
        });
    }

    let now = chrono::Utc::now();
    let purchase_date_user = match buyer_tz {
        Some(tz) => now.with_timezone(&tz).naive_local(),
        None => now.naive_utc(),
    };

    let cart_id = items[0].0.cart_id;
    let mut purchases = Vec::with_capacity(items.len());

    for (item, product) in items {
        let line_total = Decimal::from(item.quantity) * product.price;

        user_ops::update_wallet_balance_atomic(&txn, buyer_id, -line_total).await?;
        product_ops::adjust_stock_atomic(&txn, product.id, -item.quantity).await?;

        let record = purchase::ActiveModel {
            buyer_id: Set(buyer_id),
            product_id: Set(product.id),
            quantity: Set(item.quantity),
            total_price: Set(line_total),
            purchase_date: Set(now),
            purchase_date_user: Set(purchase_date_user),
            is_active: Set(true),
            ..Default::default()
        };
        purchases.push(record.insert(&txn).await?);
    }

    cart::clear_cart(&txn, cart_id).await?;
    txn.commit().await?;

    Ok(purchases)
}

/// Retrieves a purchase by its unique ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_purchase_by_id(
    db: &DatabaseConnection,
    purchase_id: i64,
) -> Result<Option<purchase::Model>> {
    Purchase::find_by_id(purchase_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a buyer's purchase history with the purchased products, oldest first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn purchases_for_buyer(
    db: &DatabaseConnection,
    buyer_id: i64,
) -> Result<Vec<(purchase::Model, Option<product::Model>)>> {
    Purchase::find()
        .filter(purchase::Column::BuyerId.eq(buyer_id))
        .find_also_related(Product)
        .order_by_asc(purchase::Column::PurchaseDate)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_purchase_debits_wallet_and_stock_once() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        cart::add_to_cart(&db, buyer.id, &fudge.slug, 3).await?;

        let purchases = execute_purchase(&db, buyer.id, None).await?;

        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].quantity, 3);
        assert_eq!(purchases[0].total_price, dec!(30.00));
        assert!(purchases[0].is_active);

        let buyer = get_test_user(&db, buyer.id).await?;
        assert_eq!(buyer.wallet_balance, dec!(70.00));

        // Single authoritative decrement: 5 - 3 = 2, not 5 - 6
        let fudge = get_test_product(&db, fudge.id).await?;
        assert_eq!(fudge.available_quantity, 2);

        assert!(cart::cart_items_with_products(&db, buyer.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_purchase_multiple_lines() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        let toffee = create_test_product(&db, "Toffee", dec!(2.50), 4).await?;
        cart::add_to_cart(&db, buyer.id, &fudge.slug, 2).await?;
        cart::add_to_cart(&db, buyer.id, &toffee.slug, 4).await?;

        let purchases = execute_purchase(&db, buyer.id, None).await?;
        assert_eq!(purchases.len(), 2);

        // 100 - (2*10 + 4*2.50) = 70
        let buyer = get_test_user(&db, buyer.id).await?;
        assert_eq!(buyer.wallet_balance, dec!(70.00));

        let fudge = get_test_product(&db, fudge.id).await?;
        let toffee = get_test_product(&db, toffee.id).await?;
        assert_eq!(fudge.available_quantity, 3);
        assert_eq!(toffee.available_quantity, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_funds_leaves_state_unchanged() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(25.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        cart::add_to_cart(&db, buyer.id, &fudge.slug, 3).await?;

        let result = execute_purchase(&db, buyer.id, None).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientFunds { current, required })
                if current == dec!(25.00) && required == dec!(30.00)
        ));

        let buyer_after = get_test_user(&db, buyer.id).await?;
        assert_eq!(buyer_after.wallet_balance, dec!(25.00));
        let fudge_after = get_test_product(&db, fudge.id).await?;
        assert_eq!(fudge_after.available_quantity, 5);
        assert_eq!(
            cart::cart_items_with_products(&db, buyer.id).await?.len(),
            1
        );
        assert!(purchases_for_buyer(&db, buyer.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_stock_names_first_short_product() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        let toffee = create_test_product(&db, "Toffee", dec!(2.50), 1).await?;
        cart::add_to_cart(&db, buyer.id, &fudge.slug, 2).await?;
        cart::add_to_cart(&db, buyer.id, &toffee.slug, 2).await?;

        let result = execute_purchase(&db, buyer.id, None).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientStock { product, requested: 2, available: 1 })
                if product == "Toffee"
        ));

        // Nothing moved, including the line that was in stock
        let buyer_after = get_test_user(&db, buyer.id).await?;
        assert_eq!(buyer_after.wallet_balance, dec!(100.00));
        let fudge_after = get_test_product(&db, fudge.id).await?;
        assert_eq!(fudge_after.available_quantity, 5);
        assert_eq!(
            cart::cart_items_with_products(&db, buyer.id).await?.len(),
            2
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_cart_is_a_noop() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;

        let purchases = execute_purchase(&db, buyer.id, None).await?;
        assert!(purchases.is_empty());

        let buyer_after = get_test_user(&db, buyer.id).await?;
        assert_eq!(buyer_after.wallet_balance, dec!(100.00));

        Ok(())
    }

    #[tokio::test]
    async fn test_exact_balance_is_sufficient() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(30.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        cart::add_to_cart(&db, buyer.id, &fudge.slug, 3).await?;

        execute_purchase(&db, buyer.id, None).await?;

        let buyer_after = get_test_user(&db, buyer.id).await?;
        assert_eq!(buyer_after.wallet_balance, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_purchase_date_user_follows_timezone() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        cart::add_to_cart(&db, buyer.id, &fudge.slug, 1).await?;

        let tz = chrono_tz::Europe::Kyiv;
        let purchases = execute_purchase(&db, buyer.id, Some(tz)).await?;
        let record = &purchases[0];

        let expected = record.purchase_date.with_timezone(&tz).naive_local();
        assert_eq!(record.purchase_date_user, expected);
        // Kyiv is never on UTC, so the local stamp must differ
        assert_ne!(record.purchase_date_user, record.purchase_date.naive_utc());

        Ok(())
    }

    #[tokio::test]
    async fn test_purchase_without_timezone_stores_utc() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        cart::add_to_cart(&db, buyer.id, &fudge.slug, 1).await?;

        let purchases = execute_purchase(&db, buyer.id, None).await?;
        let record = &purchases[0];
        assert_eq!(record.purchase_date_user, record.purchase_date.naive_utc());

        Ok(())
    }

}
