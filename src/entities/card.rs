//! Card entity - A payment card (network) issued on an account.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Card database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    /// Unique identifier for the card
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (`card.card_name` column)
    pub card_name: String,
    /// Account the card draws on
    pub account_id: i64,
}

/// Defines relationships between Card and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each card belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
