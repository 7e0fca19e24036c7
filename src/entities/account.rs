//! Account entity - A bank account edited through the accounts resource.
//!
//! The company and department ids are stored alongside `bank_id` because the form
//! captures the whole cascade. Text attributes mirror the form's text inputs and are
//! kept as free text. Accounts are soft-deleted via `is_deleted`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Company selected on the form
    pub company_id: Option<i64>,
    /// Department selected on the form
    pub department_id: Option<i64>,
    /// Bank holding this account
    pub bank_id: Option<i64>,
    /// Free-form account type (e.g. "Checking")
    pub account_type: Option<String>,
    /// Display name (`account.account_name` column)
    pub account_name: Option<String>,
    /// Account number as printed by the bank
    pub account_number: Option<String>,
    /// ACH / paperless routing number
    pub routing_number_paperless_and_electronic: Option<String>,
    /// Wire routing number
    pub routing_number_wires: Option<String>,
    /// Opening date as entered
    pub account_opened_date: Option<String>,
    /// Currency code as entered
    pub currency: Option<String>,
    /// Starting balance as entered
    pub starting_balance: Option<String>,
    /// Soft delete flag - if true, the account is hidden but data is preserved
    pub is_deleted: bool,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Company chosen on the form
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    /// Department chosen on the form
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
    /// Each account belongs to one bank
    #[sea_orm(
        belongs_to = "super::bank::Entity",
        from = "Column::BankId",
        to = "super::bank::Column::Id"
    )]
    Bank,
    /// One account has many cards
    #[sea_orm(has_many = "super::card::Entity")]
    Cards,
    /// One account has many expense transactions
    #[sea_orm(has_many = "super::expense_transaction::Entity")]
    Transactions,
}

impl Related<super::bank::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bank.def()
    }
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl Related<super::expense_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
