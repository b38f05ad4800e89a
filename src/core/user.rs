//! User business logic - signup, authentication and wallet updates.
//!
//! This module provides functions for creating accounts, verifying credentials
//! and atomically adjusting wallet balances. Wallet mutation goes through a
//! single atomic column update so concurrent purchases and return approvals
//! cannot lose writes. All functions are async and return Result types for
//! proper error handling throughout the system.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{Set, prelude::*};
use sha2::{Digest, Sha256};

/// Currency codes a wallet may be denominated in
pub const WALLET_CURRENCIES: [&str; 4] = ["USD", "EUR", "GBP", "UAH"];

/// Computes the hex-encoded digest stored for a password.
///
/// The shop treats authentication as a thin collaborator; a keyed or salted
/// scheme would slot in here without touching the rest of the crate.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Creates a new account with the configured starting wallet balance.
///
/// Validates that the username is non-empty and not taken, and that the
/// currency (when given) is one of the supported codes.
///
/// # Errors
/// Returns an error if:
/// - The username is empty, whitespace-only or already registered
/// - The currency code is not supported
/// - The database insert operation fails
pub async fn signup(
    db: &DatabaseConnection,
    username: String,
    password: &str,
    currency: Option<String>,
    starting_balance: Decimal,
    default_currency: &str,
) -> Result<user::Model> {
    let username = username.trim().to_string();
    if username.is_empty() {
        return Err(Error::Config {
            message: "Username cannot be empty".to_string(),
        });
    }

    let currency = currency.unwrap_or_else(|| default_currency.to_string());
    if !WALLET_CURRENCIES.contains(&currency.as_str()) {
        return Err(Error::Config {
            message: format!("Unsupported wallet currency '{currency}'"),
        });
    }

    let taken = User::find()
        .filter(user::Column::Username.eq(&username))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(Error::Config {
            message: format!("Username '{username}' is already registered"),
        });
    }

    let account = user::ActiveModel {
        username: Set(username),
        password_hash: Set(hash_password(password)),
        wallet_balance: Set(starting_balance),
        wallet_currency: Set(currency),
        is_admin: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    account.insert(db).await.map_err(Into::into)
}

/// Verifies a username/password pair, returning the account on success.
///
/// Returns `None` both for unknown usernames and wrong passwords so the
/// caller cannot distinguish the two.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Option<user::Model>> {
    let account = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    Ok(account.filter(|a| a.password_hash == hash_password(password)))
}

/// Retrieves a user by its unique ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Ensures an administrator account exists, creating it when missing.
///
/// Called once on startup. An existing account with the same username is left
/// untouched, including its password.
///
/// # Errors
/// Returns an error if the lookup or insert fails.
pub async fn seed_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    currency: &str,
) -> Result<user::Model> {
    let existing = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;
    if let Some(admin) = existing {
        return Ok(admin);
    }

    let admin = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)),
        wallet_balance: Set(Decimal::ZERO),
        wallet_currency: Set(currency.to_string()),
        is_admin: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    admin.insert(db).await.map_err(Into::into)
}

/// Atomically adds an amount to a user's wallet balance.
///
/// Instead of reading the balance, modifying it and writing it back (which can
/// lose updates under concurrent requests), this issues a single
/// `UPDATE users SET wallet_balance = wallet_balance + delta WHERE id = ?`.
/// Use a negative delta to debit.
///
/// # Errors
/// Returns an error if the user does not exist or the update fails.
pub async fn update_wallet_balance_atomic<C>(
    db: &C,
    user_id: i64,
    delta: Decimal,
) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    let _user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            name: user_id.to_string(),
        })?;

    User::update_many()
        .col_expr(
            user::Column::WalletBalance,
            Expr::col(user::Column::WalletBalance).add(delta),
        )
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;

    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            name: user_id.to_string(),
        })
}
