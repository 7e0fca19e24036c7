//! Bank entity - A bank relationship held by a department.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bank database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "banks")]
pub struct Model {
    /// Unique identifier for the bank
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (`bank.bank_name` column)
    pub bank_name: String,
    /// Owning department
    pub department_id: i64,
}

/// Defines relationships between Bank and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each bank belongs to one department
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
    /// One bank holds many accounts
    #[sea_orm(has_many = "super::account::Entity")]
    Accounts,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
