//! Expense entity - Expense account categories referenced by transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g. "Office Supplies")
    pub name: String,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One expense category is used by many transactions
    #[sea_orm(has_many = "super::expense_transaction::Entity")]
    Transactions,
}

impl Related<super::expense_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
