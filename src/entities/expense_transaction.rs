//! Expense transaction entity - One spend recorded against the reference hierarchy.
//!
//! Every link of the company → department → bank → account → card chain is stored
//! directly on the row. The chain is not checked on write, so a row can reference a
//! department that belongs to another company.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Company charged
    pub company_id: Option<i64>,
    /// Department charged
    pub department_id: Option<i64>,
    /// Bank the money left from
    pub bank_id: Option<i64>,
    /// Bank account the money left from
    pub account_id: Option<i64>,
    /// Card used, if any
    pub card_id: Option<i64>,
    /// Day the expense happened; never after the day it was entered
    pub date: Option<Date>,
    /// Transaction number, displayed as `TRA-0000<number>`
    pub number: Option<i64>,
    /// Expense account category
    pub expense_id: Option<i64>,
    /// Merchant as written on the receipt
    pub merchant_name: Option<String>,
    /// Free text description
    pub description: Option<String>,
    /// Amount spent in dollars
    pub amount: f64,
    /// Soft delete flag - if true, the transaction is hidden but data is preserved
    pub is_deleted: bool,
}

/// Defines relationships between `ExpenseTransaction` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Company charged
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    /// Department charged
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
    /// Bank used
    #[sea_orm(
        belongs_to = "super::bank::Entity",
        from = "Column::BankId",
        to = "super::bank::Column::Id"
    )]
    Bank,
    /// Account debited
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// Card used
    #[sea_orm(
        belongs_to = "super::card::Entity",
        from = "Column::CardId",
        to = "super::card::Column::Id"
    )]
    Card,
    /// Expense category
    #[sea_orm(
        belongs_to = "super::expense::Entity",
        from = "Column::ExpenseId",
        to = "super::expense::Column::Id"
    )]
    Expense,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
