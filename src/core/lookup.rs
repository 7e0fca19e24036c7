//! Reference data lookups behind an injectable store.
//!
//! The cascade resolver and the table renderer never query entities directly. They go
//! through [`ReferenceStore`], which answers three questions about a reference kind:
//! does this id exist, what are all of them, and which children hang off a parent.
//! [`SeaOrmReferenceStore`] answers from the database, [`MemoryReferenceStore`] from an
//! in-memory snapshot.

use crate::{
    entities::{
        Account, Bank, Card, Company, Department, Expense, account, bank, card, company,
        department, expense,
    },
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*};
use std::collections::HashMap;

/// The kinds of reference entity a selector or relation column can point at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// `companies`
    Company,
    /// `departments`, children of a company
    Department,
    /// `banks`, children of a department
    Bank,
    /// `accounts`, children of a bank
    Account,
    /// `cards`, children of an account
    Card,
    /// `expenses`, standalone categories
    Expense,
}

impl ReferenceKind {
    /// Kind reached through this kind's child collection, if it has one.
    #[must_use]
    pub const fn child_kind(self) -> Option<Self> {
        match self {
            Self::Company => Some(Self::Department),
            Self::Department => Some(Self::Bank),
            Self::Bank => Some(Self::Account),
            Self::Account => Some(Self::Card),
            Self::Card | Self::Expense => None,
        }
    }

    /// Relation name used in dotted column paths (`company.name`).
    #[must_use]
    pub const fn relation(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Department => "department",
            Self::Bank => "bank",
            Self::Account => "account",
            Self::Card => "card",
            Self::Expense => "expense",
        }
    }

    /// Attribute shown as the option label.
    #[must_use]
    pub const fn display_attribute(self) -> &'static str {
        match self {
            Self::Company | Self::Department | Self::Expense => "name",
            Self::Bank => "bank_name",
            Self::Account => "account_name",
            Self::Card => "card_name",
        }
    }

    /// Looks a kind up by its relation name.
    #[must_use]
    pub fn from_relation(relation: &str) -> Option<Self> {
        [
            Self::Company,
            Self::Department,
            Self::Bank,
            Self::Account,
            Self::Card,
            Self::Expense,
        ]
        .into_iter()
        .find(|kind| kind.relation() == relation)
    }
}

/// A reference entity reduced to what option lists and relation columns need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Primary key
    pub id: i64,
    /// Id of the owning parent, for kinds that have one
    pub parent_id: Option<i64>,
    /// Value of the kind's display attribute
    pub label: String,
}

impl ReferenceEntry {
    /// Builds an entry.
    #[must_use]
    pub fn new(id: i64, parent_id: Option<i64>, label: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            label: label.into(),
        }
    }
}

impl From<company::Model> for ReferenceEntry {
    fn from(model: company::Model) -> Self {
        Self::new(model.id, None, model.name)
    }
}

impl From<department::Model> for ReferenceEntry {
    fn from(model: department::Model) -> Self {
        Self::new(model.id, Some(model.company_id), model.name)
    }
}

impl From<bank::Model> for ReferenceEntry {
    fn from(model: bank::Model) -> Self {
        Self::new(model.id, Some(model.department_id), model.bank_name)
    }
}

impl From<account::Model> for ReferenceEntry {
    fn from(model: account::Model) -> Self {
        Self::new(
            model.id,
            model.bank_id,
            model.account_name.unwrap_or_default(),
        )
    }
}

impl From<card::Model> for ReferenceEntry {
    fn from(model: card::Model) -> Self {
        Self::new(model.id, Some(model.account_id), model.card_name)
    }
}

impl From<expense::Model> for ReferenceEntry {
    fn from(model: expense::Model) -> Self {
        Self::new(model.id, None, model.name)
    }
}

/// Read-only access to reference entities.
///
/// Every sequence is returned in ascending id order, which is the order options are
/// displayed in.
#[async_trait::async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Finds one entity. Deleted entities are reported as absent.
    async fn find(&self, kind: ReferenceKind, id: i64) -> Result<Option<ReferenceEntry>>;

    /// Lists every entity of a kind.
    async fn all(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntry>>;

    /// Lists the child collection of `parent_id`, whose entries are of
    /// `parent_kind.child_kind()`. Kinds without children yield an empty list.
    async fn children(
        &self,
        parent_kind: ReferenceKind,
        parent_id: i64,
    ) -> Result<Vec<ReferenceEntry>>;
}

fn entries<M: Into<ReferenceEntry>>(models: Vec<M>) -> Vec<ReferenceEntry> {
    models.into_iter().map(Into::into).collect()
}

/// [`ReferenceStore`] backed by the `SeaORM` connection.
#[derive(Debug)]
pub struct SeaOrmReferenceStore {
    db: DatabaseConnection,
}

impl SeaOrmReferenceStore {
    /// Wraps a connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The wrapped connection, for writes alongside lookups.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait::async_trait]
impl ReferenceStore for SeaOrmReferenceStore {
    async fn find(&self, kind: ReferenceKind, id: i64) -> Result<Option<ReferenceEntry>> {
        let db = &self.db;
        let entry = match kind {
            ReferenceKind::Company => Company::find_by_id(id).one(db).await?.map(Into::into),
            ReferenceKind::Department => {
                Department::find_by_id(id).one(db).await?.map(Into::into)
            }
            ReferenceKind::Bank => Bank::find_by_id(id).one(db).await?.map(Into::into),
            ReferenceKind::Account => Account::find_by_id(id)
                .filter(account::Column::IsDeleted.eq(false))
                .one(db)
                .await?
                .map(Into::into),
            ReferenceKind::Card => Card::find_by_id(id).one(db).await?.map(Into::into),
            ReferenceKind::Expense => Expense::find_by_id(id).one(db).await?.map(Into::into),
        };
        Ok(entry)
    }

    async fn all(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntry>> {
        let db = &self.db;
        let list = match kind {
            ReferenceKind::Company => entries(
                Company::find()
                    .order_by_asc(company::Column::Id)
                    .all(db)
                    .await?,
            ),
            ReferenceKind::Department => entries(
                Department::find()
                    .order_by_asc(department::Column::Id)
                    .all(db)
                    .await?,
            ),
            ReferenceKind::Bank => entries(
                Bank::find()
                    .order_by_asc(bank::Column::Id)
                    .all(db)
                    .await?,
            ),
            ReferenceKind::Account => entries(
                Account::find()
                    .filter(account::Column::IsDeleted.eq(false))
                    .order_by_asc(account::Column::Id)
                    .all(db)
                    .await?,
            ),
            ReferenceKind::Card => entries(
                Card::find()
                    .order_by_asc(card::Column::Id)
                    .all(db)
                    .await?,
            ),
            ReferenceKind::Expense => entries(
                Expense::find()
                    .order_by_asc(expense::Column::Id)
                    .all(db)
                    .await?,
            ),
        };
        Ok(list)
    }

    async fn children(
        &self,
        parent_kind: ReferenceKind,
        parent_id: i64,
    ) -> Result<Vec<ReferenceEntry>> {
        let db = &self.db;
        let list = match parent_kind {
            ReferenceKind::Company => entries(
                Department::find()
                    .filter(department::Column::CompanyId.eq(parent_id))
                    .order_by_asc(department::Column::Id)
                    .all(db)
                    .await?,
            ),
            ReferenceKind::Department => entries(
                Bank::find()
                    .filter(bank::Column::DepartmentId.eq(parent_id))
                    .order_by_asc(bank::Column::Id)
                    .all(db)
                    .await?,
            ),
            ReferenceKind::Bank => entries(
                Account::find()
                    .filter(account::Column::BankId.eq(parent_id))
                    .filter(account::Column::IsDeleted.eq(false))
                    .order_by_asc(account::Column::Id)
                    .all(db)
                    .await?,
            ),
            ReferenceKind::Account => entries(
                Card::find()
                    .filter(card::Column::AccountId.eq(parent_id))
                    .order_by_asc(card::Column::Id)
                    .all(db)
                    .await?,
            ),
            ReferenceKind::Card | ReferenceKind::Expense => Vec::new(),
        };
        Ok(list)
    }
}

/// [`ReferenceStore`] over an in-memory snapshot.
#[derive(Clone, Debug, Default)]
pub struct MemoryReferenceStore {
    entries: HashMap<ReferenceKind, Vec<ReferenceEntry>>,
}

impl MemoryReferenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, kind: ReferenceKind, entry: ReferenceEntry) {
        let list = self.entries.entry(kind).or_default();
        list.retain(|existing| existing.id != entry.id);
        list.push(entry);
        list.sort_by_key(|existing| existing.id);
    }

    /// Removes an entry, as if it had been deleted from storage.
    pub fn remove(&mut self, kind: ReferenceKind, id: i64) {
        if let Some(list) = self.entries.get_mut(&kind) {
            list.retain(|existing| existing.id != id);
        }
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with(
        mut self,
        kind: ReferenceKind,
        id: i64,
        parent_id: Option<i64>,
        label: &str,
    ) -> Self {
        self.insert(kind, ReferenceEntry::new(id, parent_id, label));
        self
    }

    /// Adds a company.
    #[must_use]
    pub fn company(self, id: i64, name: &str) -> Self {
        self.with(ReferenceKind::Company, id, None, name)
    }

    /// Adds a department of `company_id`.
    #[must_use]
    pub fn department(self, id: i64, company_id: i64, name: &str) -> Self {
        self.with(ReferenceKind::Department, id, Some(company_id), name)
    }

    /// Adds a bank of `department_id`.
    #[must_use]
    pub fn bank(self, id: i64, department_id: i64, bank_name: &str) -> Self {
        self.with(ReferenceKind::Bank, id, Some(department_id), bank_name)
    }

    /// Adds an account held at `bank_id`.
    #[must_use]
    pub fn account(self, id: i64, bank_id: i64, account_name: &str) -> Self {
        self.with(ReferenceKind::Account, id, Some(bank_id), account_name)
    }

    /// Adds a card issued on `account_id`.
    #[must_use]
    pub fn card(self, id: i64, account_id: i64, card_name: &str) -> Self {
        self.with(ReferenceKind::Card, id, Some(account_id), card_name)
    }

    /// Adds an expense category.
    #[must_use]
    pub fn expense(self, id: i64, name: &str) -> Self {
        self.with(ReferenceKind::Expense, id, None, name)
    }

    fn list(&self, kind: ReferenceKind) -> &[ReferenceEntry] {
        self.entries.get(&kind).map_or(&[][..], Vec::as_slice)
    }
}

#[async_trait::async_trait]
impl ReferenceStore for MemoryReferenceStore {
    async fn find(&self, kind: ReferenceKind, id: i64) -> Result<Option<ReferenceEntry>> {
        Ok(self.list(kind).iter().find(|entry| entry.id == id).cloned())
    }

    async fn all(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntry>> {
        Ok(self.list(kind).to_vec())
    }

    async fn children(
        &self,
        parent_kind: ReferenceKind,
        parent_id: i64,
    ) -> Result<Vec<ReferenceEntry>> {
        let Some(child_kind) = parent_kind.child_kind() else {
            return Ok(Vec::new());
        };
        Ok(self
            .list(child_kind)
            .iter()
            .filter(|entry| entry.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{ReferenceFixture, setup_reference_fixture};

    fn ids(entries: &[ReferenceEntry]) -> Vec<i64> {
        entries.iter().map(|entry| entry.id).collect()
    }

    #[test]
    fn test_kind_relations_round_trip() {
        for kind in [
            ReferenceKind::Company,
            ReferenceKind::Department,
            ReferenceKind::Bank,
            ReferenceKind::Account,
            ReferenceKind::Card,
            ReferenceKind::Expense,
        ] {
            assert_eq!(ReferenceKind::from_relation(kind.relation()), Some(kind));
        }
        assert_eq!(ReferenceKind::from_relation("merchant"), None);
        assert_eq!(ReferenceKind::Card.child_kind(), None);
        assert_eq!(ReferenceKind::Bank.display_attribute(), "bank_name");
    }

    #[tokio::test]
    async fn test_memory_store_orders_by_id() -> Result<()> {
        let store = MemoryReferenceStore::new()
            .company(3, "Gamma")
            .company(1, "Alpha")
            .company(2, "Beta");

        let all = store.all(ReferenceKind::Company).await?;
        assert_eq!(ids(&all), vec![1, 2, 3]);
        assert_eq!(all[0].label, "Alpha");
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store_children_and_removal() -> Result<()> {
        let mut store = MemoryReferenceStore::new()
            .company(1, "Acme")
            .department(10, 1, "Finance")
            .department(11, 2, "Ops")
            .department(12, 1, "Legal");

        let children = store.children(ReferenceKind::Company, 1).await?;
        assert_eq!(ids(&children), vec![10, 12]);

        assert!(store.children(ReferenceKind::Expense, 1).await?.is_empty());

        store.remove(ReferenceKind::Department, 10);
        assert!(store.find(ReferenceKind::Department, 10).await?.is_none());
        assert_eq!(
            ids(&store.children(ReferenceKind::Company, 1).await?),
            vec![12]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_sea_orm_store_lookups() -> Result<()> {
        let ReferenceFixture { db, ids: fx } = setup_reference_fixture().await?;
        let store = SeaOrmReferenceStore::new(db);

        let company = store.find(ReferenceKind::Company, fx.acme).await?.unwrap();
        assert_eq!(company.label, "Acme");

        let departments = store.children(ReferenceKind::Company, fx.acme).await?;
        assert_eq!(ids(&departments), vec![fx.acme_finance, fx.acme_ops]);

        let all_departments = store.all(ReferenceKind::Department).await?;
        assert_eq!(all_departments.len(), 3);

        let banks = store.children(ReferenceKind::Department, fx.acme_finance).await?;
        assert_eq!(banks[0].label, "First National");
        assert_eq!(banks[0].parent_id, Some(fx.acme_finance));

        let cards = store.children(ReferenceKind::Account, fx.operating).await?;
        assert_eq!(ids(&cards), vec![fx.visa, fx.amex]);

        assert!(store.find(ReferenceKind::Bank, 9999).await?.is_none());
        assert!(store.children(ReferenceKind::Card, fx.visa).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_sea_orm_store_hides_deleted_accounts() -> Result<()> {
        let ReferenceFixture { db, ids: fx } = setup_reference_fixture().await?;
        crate::core::account::soft_delete_accounts(&db, &[fx.operating]).await?;
        let store = SeaOrmReferenceStore::new(db);

        assert!(store.find(ReferenceKind::Account, fx.operating).await?.is_none());
        let accounts = store.all(ReferenceKind::Account).await?;
        assert!(accounts.iter().all(|entry| entry.id != fx.operating));
        let held = store.children(ReferenceKind::Bank, fx.first_national).await?;
        assert!(held.iter().all(|entry| entry.id != fx.operating));
        Ok(())
    }
}
