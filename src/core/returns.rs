//! Return business logic - the request/approve/reject lifecycle.
//!
//! A buyer may request a return while the configured window since the purchase
//! is still open; the request marks the purchase inactive and creates a pending
//! Return. An administrator then either approves it, which credits the wallet,
//! restores stock and deletes the purchase, or rejects it, which deletes the
//! Return and touches nothing else. The window is checked again at approval
//! time against the original purchase date, so a request cannot be parked past
//! the deadline and approved later.
//!
//! Approval credits quantity times the product's *current* price, matching the
//! shop's policy that refunds track the live catalog price.

use crate::{
    core::{product as product_ops, user as user_ops},
    entities::{Product, Purchase, Return, return_request},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Checks the elapsed time since a purchase against the return window.
fn check_window(purchase_date: chrono::DateTime<chrono::Utc>, window_secs: i64) -> Result<()> {
    let elapsed_secs = (chrono::Utc::now() - purchase_date).num_seconds();
    if elapsed_secs >= window_secs {
        return Err(Error::ReturnWindowExpired {
            elapsed_secs,
            limit_secs: window_secs,
        });
    }
    Ok(())
}

/// Requests a return for one of the buyer's purchases.
///
/// Marks the purchase inactive and creates a pending Return with a zero
/// `return_price`. Only the purchase's own buyer may request, and only while
/// the return window is open.
///
/// # Errors
/// Returns an error if:
/// - The purchase does not exist
/// - The purchase belongs to a different buyer (`Forbidden`)
/// - A return was already requested (`ReturnAlreadyRequested`)
/// - The window has closed (`ReturnWindowExpired`)
/// - Any database operation fails
pub async fn request_return(
    db: &DatabaseConnection,
    buyer_id: i64,
    purchase_id: i64,
    window_secs: i64,
) -> Result<return_request::Model> {
    let txn = db.begin().await?;

    let purchase = Purchase::find_by_id(purchase_id)
        .one(&txn)
        .await?
        .ok_or(Error::PurchaseNotFound { id: purchase_id })?;

    if purchase.buyer_id != buyer_id {
        return Err(Error::Forbidden);
    }
    if !purchase.is_active {
        return Err(Error::ReturnAlreadyRequested { purchase_id });
    }
    check_window(purchase.purchase_date, window_secs)?;

    let mut purchase: crate::entities::purchase::ActiveModel = purchase.into();
    purchase.is_active = Set(false);
    purchase.update(&txn).await?;

    let pending = return_request::ActiveModel {
        buyer_id: Set(buyer_id),
        purchase_id: Set(purchase_id),
        return_price: Set(Decimal::ZERO),
        return_date: Set(chrono::Utc::now()),
        is_notice: Set(false),
        ..Default::default()
    };
    let pending = pending.insert(&txn).await?;

    txn.commit().await?;
    Ok(pending)
}

/// Approves a pending return, moving money and stock exactly once.
///
/// Re-checks the window against the original purchase date, then credits the
/// buyer's wallet with quantity times the product's current price, restores the
/// product's stock, flips `is_notice` to true and deletes the originating
/// purchase. The whole flow runs in one database transaction.
///
/// Approving an already-approved return is a no-op returning the existing row.
///
/// # Errors
/// Returns an error if:
/// - The return or its purchase or product no longer exists
/// - The window has closed (`ReturnWindowExpired`)
/// - Any database operation fails
pub async fn approve_return(
    db: &DatabaseConnection,
    return_id: i64,
    window_secs: i64,
) -> Result<return_request::Model> {
    let txn = db.begin().await?;

    let pending = Return::find_by_id(return_id)
        .one(&txn)
        .await?
        .ok_or(Error::ReturnNotFound { id: return_id })?;

    // is_notice flips false -> true exactly once
    if pending.is_notice {
        return Ok(pending);
    }

    let purchase = Purchase::find_by_id(pending.purchase_id)
        .one(&txn)
        .await?
        .ok_or(Error::PurchaseNotFound {
            id: pending.purchase_id,
        })?;
    check_window(purchase.purchase_date, window_secs)?;

    let product = Product::find_by_id(purchase.product_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: purchase.product_id.to_string(),
        })?;

    let return_price = Decimal::from(purchase.quantity) * product.price;

    user_ops::update_wallet_balance_atomic(&txn, purchase.buyer_id, return_price).await?;
    product_ops::adjust_stock_atomic(&txn, product.id, purchase.quantity).await?;

    let mut approved: return_request::ActiveModel = pending.into();
    approved.is_notice = Set(true);
    approved.return_price = Set(return_price);
    let approved = approved.update(&txn).await?;

    Purchase::delete_by_id(purchase.id).exec(&txn).await?;

    txn.commit().await?;
    Ok(approved)
}

/// Rejects a pending return by deleting it.
///
/// No wallet or stock effect; the originating purchase stays inactive and no
/// rejected state is retained.
///
/// # Errors
/// Returns an error if the return does not exist or the delete fails.
pub async fn reject_return(db: &DatabaseConnection, return_id: i64) -> Result<()> {
    let pending = Return::find_by_id(return_id)
        .one(db)
        .await?
        .ok_or(Error::ReturnNotFound { id: return_id })?;

    pending.delete(db).await?;
    Ok(())
}

/// Retrieves a return by its unique ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_return_by_id(
    db: &DatabaseConnection,
    return_id: i64,
) -> Result<Option<return_request::Model>> {
    Return::find_by_id(return_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads all pending returns with their purchase and product, oldest first.
///
/// Used by the admin review screen. Rows whose purchase or product has
/// vanished are skipped.
///
/// # Errors
/// Returns an error if the database queries fail.
pub async fn pending_returns(
    db: &DatabaseConnection,
) -> Result<
    Vec<(
        return_request::Model,
        crate::entities::purchase::Model,
        crate::entities::product::Model,
    )>,
> {
    let pending = Return::find()
        .filter(return_request::Column::IsNotice.eq(false))
        .order_by_asc(return_request::Column::ReturnDate)
        .all(db)
        .await?;

    let mut rows = Vec::with_capacity(pending.len());
    for ret in pending {
        let Some(purchase) = Purchase::find_by_id(ret.purchase_id).one(db).await? else {
            continue;
        };
        let Some(product) = Product::find_by_id(purchase.product_id).one(db).await? else {
            continue;
        };
        rows.push((ret, purchase, product));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{cart, purchase as purchase_ops};
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    const WINDOW: i64 = 259_200; // three days

    async fn buy_one(
        db: &DatabaseConnection,
        buyer_id: i64,
        slug: &str,
        quantity: i32,
    ) -> Result<crate::entities::purchase::Model> {
        cart::add_to_cart(db, buyer_id, slug, quantity).await?;
        let mut purchases = purchase_ops::execute_purchase(db, buyer_id, None).await?;
        Ok(purchases.remove(0))
    }

    #[tokio::test]
    async fn test_request_return_marks_purchase_inactive() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        let purchase = buy_one(&db, buyer.id, &fudge.slug, 3).await?;

        let pending = request_return(&db, buyer.id, purchase.id, WINDOW).await?;

        assert!(!pending.is_notice);
        assert_eq!(pending.return_price, Decimal::ZERO);
        assert_eq!(pending.purchase_id, purchase.id);

        let purchase = purchase_ops::get_purchase_by_id(&db, purchase.id)
            .await?
            .unwrap();
        assert!(!purchase.is_active);

        Ok(())
    }

    #[tokio::test]
    async fn test_request_return_rejects_other_users_purchase() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice", dec!(100)).await?;
        let mallory = create_test_user(&db, "mallory", dec!(100)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        let purchase = buy_one(&db, alice.id, &fudge.slug, 1).await?;

        let result = request_return(&db, mallory.id, purchase.id, WINDOW).await;
        assert!(matches!(result, Err(Error::Forbidden)));

        // Purchase untouched
        let purchase = purchase_ops::get_purchase_by_id(&db, purchase.id)
            .await?
            .unwrap();
        assert!(purchase.is_active);

        Ok(())
    }

    #[tokio::test]
    async fn test_request_return_after_window_mutates_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        let purchase =
            create_backdated_purchase(&db, buyer.id, fudge.id, 1, dec!(10.00), WINDOW + 60)
                .await?;

        let result = request_return(&db, buyer.id, purchase.id, WINDOW).await;
        assert!(matches!(
            result,
            Err(Error::ReturnWindowExpired {
                elapsed_secs: _,
                limit_secs: WINDOW
            })
        ));

        let purchase = purchase_ops::get_purchase_by_id(&db, purchase.id)
            .await?
            .unwrap();
        assert!(purchase.is_active);
        assert!(pending_returns(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_request_return_twice_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        let purchase = buy_one(&db, buyer.id, &fudge.slug, 1).await?;

        request_return(&db, buyer.id, purchase.id, WINDOW).await?;
        let second = request_return(&db, buyer.id, purchase.id, WINDOW).await;

        assert!(matches!(
            second,
            Err(Error::ReturnAlreadyRequested { purchase_id: _ })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_return_reconciles_wallet_and_stock() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        let purchase = buy_one(&db, buyer.id, &fudge.slug, 3).await?;
        let pending = request_return(&db, buyer.id, purchase.id, WINDOW).await?;

        let approved = approve_return(&db, pending.id, WINDOW).await?;

        assert!(approved.is_notice);
        assert_eq!(approved.return_price, dec!(30.00));

        let buyer = get_test_user(&db, buyer.id).await?;
        assert_eq!(buyer.wallet_balance, dec!(100.00));

        let fudge = get_test_product(&db, fudge.id).await?;
        assert_eq!(fudge.available_quantity, 5);

        // Originating purchase no longer exists
        assert!(
            purchase_ops::get_purchase_by_id(&db, purchase.id)
                .await?
                .is_none()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_return_uses_current_product_price() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        let purchase = buy_one(&db, buyer.id, &fudge.slug, 2).await?;
        let pending = request_return(&db, buyer.id, purchase.id, WINDOW).await?;

        // Price rises between purchase and approval; refund tracks the catalog
        crate::core::product::update_product(
            &db,
            fudge.id,
            "Fudge".to_string(),
            String::new(),
            dec!(12.00),
            None,
            3,
        )
        .await?;

        let approved = approve_return(&db, pending.id, WINDOW).await?;
        assert_eq!(approved.return_price, dec!(24.00));

        // Paid 20, refunded 24
        let buyer = get_test_user(&db, buyer.id).await?;
        assert_eq!(buyer.wallet_balance, dec!(104.00));

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_return_after_window_mutates_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(70.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 2).await?;
        // Backdated past the window: the request slipped through, approval must not
        let purchase =
            create_backdated_purchase(&db, buyer.id, fudge.id, 3, dec!(30.00), WINDOW + 60)
                .await?;
        let pending = return_request::ActiveModel {
            buyer_id: Set(buyer.id),
            purchase_id: Set(purchase.id),
            return_price: Set(Decimal::ZERO),
            return_date: Set(chrono::Utc::now()),
            is_notice: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let result = approve_return(&db, pending.id, WINDOW).await;
        assert!(matches!(
            result,
            Err(Error::ReturnWindowExpired {
                elapsed_secs: _,
                limit_secs: WINDOW
            })
        ));

        let buyer = get_test_user(&db, buyer.id).await?;
        assert_eq!(buyer.wallet_balance, dec!(70.00));
        let fudge = get_test_product(&db, fudge.id).await?;
        assert_eq!(fudge.available_quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_return_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        let purchase = buy_one(&db, buyer.id, &fudge.slug, 3).await?;
        let pending = request_return(&db, buyer.id, purchase.id, WINDOW).await?;

        approve_return(&db, pending.id, WINDOW).await?;
        let again = approve_return(&db, pending.id, WINDOW).await?;

        assert!(again.is_notice);

        // Money and stock moved exactly once
        let buyer = get_test_user(&db, buyer.id).await?;
        assert_eq!(buyer.wallet_balance, dec!(100.00));
        let fudge = get_test_product(&db, fudge.id).await?;
        assert_eq!(fudge.available_quantity, 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_reject_return_deletes_without_side_effects() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        let purchase = buy_one(&db, buyer.id, &fudge.slug, 3).await?;
        let pending = request_return(&db, buyer.id, purchase.id, WINDOW).await?;

        reject_return(&db, pending.id).await?;

        assert!(get_return_by_id(&db, pending.id).await?.is_none());

        // Wallet and stock reflect the purchase only
        let buyer = get_test_user(&db, buyer.id).await?;
        assert_eq!(buyer.wallet_balance, dec!(70.00));
        let fudge = get_test_product(&db, fudge.id).await?;
        assert_eq!(fudge.available_quantity, 2);

        let missing = reject_return(&db, pending.id).await;
        assert!(matches!(missing, Err(Error::ReturnNotFound { id: _ })));

        Ok(())
    }

    #[tokio::test]
    async fn test_pending_returns_lists_only_unapproved() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;
        let toffee = create_test_product(&db, "Toffee", dec!(2.50), 5).await?;

        let p1 = buy_one(&db, buyer.id, &fudge.slug, 1).await?;
        let p2 = buy_one(&db, buyer.id, &toffee.slug, 1).await?;
        let r1 = request_return(&db, buyer.id, p1.id, WINDOW).await?;
        let r2 = request_return(&db, buyer.id, p2.id, WINDOW).await?;

        approve_return(&db, r1.id, WINDOW).await?;

        let pending = pending_returns(&db).await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0.id, r2.id);
        assert_eq!(pending[0].2.name, "Toffee");

        Ok(())
    }

    /// The worked end-to-end example: wallet 100, price 10, stock 5, buy 3,
    /// then request and approve the return.
    #[tokio::test]
    async fn test_full_purchase_and_return_cycle() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "alice", dec!(100.00)).await?;
        let fudge = create_test_product(&db, "Fudge", dec!(10.00), 5).await?;

        let purchase = buy_one(&db, buyer.id, &fudge.slug, 3).await?;
        assert_eq!(purchase.total_price, dec!(30.00));
        assert_eq!(get_test_user(&db, buyer.id).await?.wallet_balance, dec!(70.00));
        assert_eq!(get_test_product(&db, fudge.id).await?.available_quantity, 2);

        let pending = request_return(&db, buyer.id, purchase.id, WINDOW).await?;
        let approved = approve_return(&db, pending.id, WINDOW).await?;

        assert!(approved.is_notice);
        assert_eq!(approved.return_price, dec!(30.00));
        assert_eq!(get_test_user(&db, buyer.id).await?.wallet_balance, dec!(100.00));
        assert_eq!(get_test_product(&db, fudge.id).await?.available_quantity, 5);
        assert!(
            purchase_ops::get_purchase_by_id(&db, purchase.id)
                .await?
                .is_none()
        );

        Ok(())
    }
}
