//! Route handlers, grouped by storefront area.

/// Signup, signin and logout
pub mod auth;
/// Cart viewing and item management
pub mod cart;
/// Product listing, detail and admin catalog management
pub mod catalog;
/// Purchase execution and history
pub mod checkout;
/// Return request and admin review
pub mod returns;
