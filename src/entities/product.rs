//! Product entity - Represents an item offered in the storefront.
//!
//! Each product has a unit price, a stock counter and a URL slug derived from
//! its name. Stock is decremented by purchases and restored by approved returns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the product (e.g., "Caramel Fudge")
    pub name: String,
    /// Longer description shown on the detail page
    pub description: String,
    /// Unit price
    pub price: Decimal,
    /// Optional path or URL to a product image
    pub image: Option<String>,
    /// Units currently in stock, never negative
    pub available_quantity: i32,
    /// URL slug derived from the name, unique
    #[sea_orm(unique)]
    pub slug: String,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product appears in many cart items
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
    /// One product appears in many purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
