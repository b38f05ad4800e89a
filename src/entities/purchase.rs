//! Purchase entity - Immutable snapshot of a completed transaction.
//!
//! `total_price` records quantity times the unit price at purchase time.
//! `purchase_date` is server UTC time, `purchase_date_user` the same instant in
//! the buyer's declared timezone. `is_active` gates return eligibility: it flips
//! to false once a return has been requested, and the row is deleted entirely
//! when a return is approved.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the buyer
    pub buyer_id: i64,
    /// ID of the purchased product
    pub product_id: i64,
    /// Units bought
    pub quantity: i32,
    /// Quantity times the unit price at purchase time
    pub total_price: Decimal,
    /// Server time of the purchase (UTC)
    pub purchase_date: DateTimeUtc,
    /// Same instant expressed in the buyer's declared timezone
    pub purchase_date_user: DateTime,
    /// False once a return has been requested for this purchase
    pub is_active: bool,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase belongs to one buyer
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BuyerId",
        to = "super::user::Column::Id"
    )]
    Buyer,
    /// Each purchase references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buyer.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
