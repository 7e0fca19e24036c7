//! Department entity - Belongs to a company and groups its banks.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Department database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    /// Unique identifier for the department
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Owning company
    pub company_id: i64,
}

/// Defines relationships between Department and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each department belongs to one company
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    /// One department has many banks
    #[sea_orm(has_many = "super::bank::Entity")]
    Banks,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::bank::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Banks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
