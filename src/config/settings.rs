//! Shop settings loading from shop.toml
//!
//! Business constants (starting wallet balance, return window) and the
//! user-facing message strings live here rather than in code, so the domain
//! operations stay free of presentation text. The settings file is read once at
//! startup and injected into the web layer.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire shop.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Business constants
    pub shop: ShopConfig,
    /// User-facing strings rendered by the presentation layer
    pub messages: Messages,
}

/// Business constants for the shop
#[derive(Debug, Deserialize, Clone)]
pub struct ShopConfig {
    /// Wallet balance granted to every new account
    pub starting_wallet_balance: Decimal,
    /// Seconds after a purchase during which a return may be requested or approved
    pub return_window_secs: i64,
    /// Currency code assigned to new wallets when signup does not pick one
    pub default_currency: String,
    /// Address the HTTP server binds to (e.g., "127.0.0.1:3000")
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// User-facing message strings
#[derive(Debug, Deserialize, Clone)]
pub struct Messages {
    /// Shown on the home page when no products exist
    pub empty_catalog: String,
    /// Plain-text body for a failed purchase due to wallet balance
    pub insufficient_funds: String,
    /// Plain-text body for a failed purchase due to stock;
    /// `{product}` is replaced with the short product's name
    pub insufficient_stock: String,
    /// Plain-text body for a return attempted past the window
    pub return_window_expired: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Messages {
    /// Renders the insufficient-stock message for a concrete product.
    #[must_use]
    pub fn insufficient_stock_for(&self, product: &str) -> String {
        self.insufficient_stock.replace("{product}", product)
    }
}

/// Loads shop settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read settings file: {e}"),
    })?;

    let settings: Settings = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse shop.toml: {e}"),
    })?;

    if settings.shop.starting_wallet_balance < Decimal::ZERO {
        return Err(Error::Config {
            message: "starting_wallet_balance must not be negative".to_string(),
        });
    }
    if settings.shop.return_window_secs <= 0 {
        return Err(Error::Config {
            message: "return_window_secs must be positive".to_string(),
        });
    }

    Ok(settings)
}

/// Loads shop settings from `SHOP_CONFIG` or the default location (./shop.toml)
///
/// # Errors
/// Returns an error if the settings file cannot be read or parsed.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("SHOP_CONFIG").unwrap_or_else(|_| "shop.toml".to_string());
    load_settings(path)
}
