//! Return entity - A buyer-initiated request to reverse a purchase.
//!
//! Created pending (`is_notice = false`, `return_price` zero). Admin approval
//! flips `is_notice` to true exactly once, which is when money and stock move.
//! Rejection deletes the row outright, so no rejected state is retained.
//!
//! `purchase_id` is deliberately not a database-level foreign key: approval
//! deletes the originating Purchase while the approved Return survives as the
//! record of the refund.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Return request database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "returns")]
pub struct Model {
    /// Unique identifier for the return
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the buyer who requested the return
    pub buyer_id: i64,
    /// ID of the purchase being returned; the purchase row is deleted on approval
    pub purchase_id: i64,
    /// Amount credited back to the wallet; zero until approved
    pub return_price: Decimal,
    /// When the return was requested
    pub return_date: DateTimeUtc,
    /// Whether an administrator has approved the return
    pub is_notice: bool,
}

/// Defines relationships between Return and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each return belongs to one buyer
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BuyerId",
        to = "super::user::Column::Id"
    )]
    Buyer,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buyer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
