//! Company entity - Root of the reference hierarchy.
//!
//! Companies own departments, which own banks, which hold accounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Company database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Unique identifier for the company
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, used as the option label and in the `company.name` column
    pub name: String,
}

/// Defines relationships between Company and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One company has many departments
    #[sea_orm(has_many = "super::department::Entity")]
    Departments,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Departments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
