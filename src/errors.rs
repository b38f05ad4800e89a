//! Unified error types for the storefront.
//!
//! Domain errors carry enough context to render the plain-text responses the
//! presentation layer emits: the short product for stock failures, the balance
//! shortfall for funds failures, the elapsed/limit pair for expired returns.

use rust_decimal::Decimal;
use thiserror::Error;

/// All errors the storefront can produce
#[derive(Debug, Error)]
pub enum Error {
    /// Cart total exceeds the buyer's wallet balance
    #[error("insufficient funds: balance is {current}, cart total is {required}")]
    InsufficientFunds {
        /// Wallet balance at the time of the attempt
        current: Decimal,
        /// Cart total that was required
        required: Decimal,
    },

    /// A cart item asks for more units than the product has in stock
    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Name of the first under-stocked product
        product: String,
        /// Units the cart asked for
        requested: i32,
        /// Units actually in stock
        available: i32,
    },

    /// The return window has closed for the purchase in question
    #[error("return window expired: {elapsed_secs}s elapsed, limit is {limit_secs}s")]
    ReturnWindowExpired {
        /// Seconds since the original purchase
        elapsed_secs: i64,
        /// Configured window in seconds
        limit_secs: i64,
    },

    /// The record exists but belongs to a different user
    #[error("operation not permitted for this user")]
    Forbidden,

    /// A return has already been requested for this purchase
    #[error("a return for purchase {purchase_id} has already been requested")]
    ReturnAlreadyRequested {
        /// Purchase the duplicate request targeted
        purchase_id: i64,
    },

    /// No product with the given slug or id
    #[error("product '{name}' not found")]
    ProductNotFound {
        /// Slug or id the lookup used
        name: String,
    },

    /// No purchase with the given id
    #[error("purchase {id} not found")]
    PurchaseNotFound {
        /// Primary key the lookup used
        id: i64,
    },

    /// No return request with the given id
    #[error("return {id} not found")]
    ReturnNotFound {
        /// Primary key the lookup used
        id: i64,
    },

    /// No user with the given id or username
    #[error("user '{name}' not found")]
    UserNotFound {
        /// Id or username the lookup used
        name: String,
    },

    /// Quantity was zero or negative
    #[error("invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending quantity
        quantity: i32,
    },

    /// A monetary amount was negative where it must not be
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: Decimal,
    },

    /// Configuration file or value problem
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description of what is wrong
        message: String,
    },

    /// Underlying database error
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (config files, sockets)
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
