//! Core business logic - framework-agnostic storefront operations.
//!
//! Everything the HTTP layer does goes through these modules; none of them
//! know about routes, forms or sessions, so the purchase/return reconciliation
//! rules are testable against a bare database connection.

/// Cart aggregation and item management
pub mod cart;
/// Catalog management and stock adjustment
pub mod product;
/// Purchase execution and history
pub mod purchase;
/// Return request/approval/rejection lifecycle
pub mod returns;
/// Accounts, authentication and wallet updates
pub mod user;
