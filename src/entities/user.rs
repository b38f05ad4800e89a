//! User entity - Represents a shop customer (or administrator) with a wallet.
//!
//! Every user carries a `wallet_balance` in their `wallet_currency`. The balance
//! is seeded from configuration on signup, debited by purchases and credited by
//! approved returns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across the shop
    #[sea_orm(unique)]
    pub username: String,
    /// Hex-encoded digest of the user's password
    pub password_hash: String,
    /// Current wallet balance in `wallet_currency`
    pub wallet_balance: Decimal,
    /// ISO 4217 currency code: `"USD"`, `"EUR"`, `"GBP"` or `"UAH"`
    pub wallet_currency: String,
    /// Whether the user may manage products and returns
    pub is_admin: bool,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many carts (at most one in practice)
    #[sea_orm(has_many = "super::cart::Entity")]
    Carts,
    /// One user has many purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
    /// One user has many return requests
    #[sea_orm(has_many = "super::return_request::Entity")]
    Returns,
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Carts.def()
    }
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl Related<super::return_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Returns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
