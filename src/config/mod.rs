/// Database configuration and connection management
pub mod database;

/// Shop settings loading from shop.toml
pub mod settings;
