//! Reference data maintenance - companies, departments, banks, cards and expense
//! categories.
//!
//! The admin screens only read this data. These helpers exist to seed a fresh database
//! from config.toml and to build fixtures.

use crate::{
    config::reference::ReferenceConfig,
    core::account::{AccountInput, create_account},
    entities::{Company, bank, card, company, department, expense},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

fn require_name(field: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            field: field.to_string(),
            message: format!("The {field} field is required."),
        });
    }
    Ok(trimmed.to_string())
}

/// Creates a company.
pub async fn create_company<C: ConnectionTrait>(db: &C, name: &str) -> Result<company::Model> {
    let model = company::ActiveModel {
        name: Set(require_name("name", name)?),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Creates a department of `company_id`.
pub async fn create_department<C: ConnectionTrait>(
    db: &C,
    company_id: i64,
    name: &str,
) -> Result<department::Model> {
    let model = department::ActiveModel {
        name: Set(require_name("name", name)?),
        company_id: Set(company_id),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Creates a bank of `department_id`.
pub async fn create_bank<C: ConnectionTrait>(
    db: &C,
    department_id: i64,
    bank_name: &str,
) -> Result<bank::Model> {
    let model = bank::ActiveModel {
        bank_name: Set(require_name("bank_name", bank_name)?),
        department_id: Set(department_id),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Creates a card issued on `account_id`.
pub async fn create_card<C: ConnectionTrait>(
    db: &C,
    account_id: i64,
    card_name: &str,
) -> Result<card::Model> {
    let model = card::ActiveModel {
        card_name: Set(require_name("card_name", card_name)?),
        account_id: Set(account_id),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Creates an expense category.
pub async fn create_expense<C: ConnectionTrait>(db: &C, name: &str) -> Result<expense::Model> {
    let model = expense::ActiveModel {
        name: Set(require_name("name", name)?),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// What a seeding run inserted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Companies inserted
    pub companies: usize,
    /// Departments inserted
    pub departments: usize,
    /// Banks inserted
    pub banks: usize,
    /// Accounts inserted
    pub accounts: usize,
    /// Cards inserted
    pub cards: usize,
    /// Expense categories inserted
    pub expenses: usize,
}

/// Seeds the configured hierarchy in one database transaction.
///
/// Does nothing and returns `None` when companies already exist, so the binary can
/// call it on every start.
#[instrument(skip(db, config))]
pub async fn seed_reference_data(
    db: &DatabaseConnection,
    config: &ReferenceConfig,
) -> Result<Option<SeedSummary>> {
    let existing = Company::find().count(db).await?;
    if existing > 0 {
        info!("Reference data present ({existing} companies), skipping seed");
        return Ok(None);
    }

    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    for company_config in &config.companies {
        let company = create_company(&txn, &company_config.name).await?;
        summary.companies += 1;

        for department_config in &company_config.departments {
            let department =
                create_department(&txn, company.id, &department_config.name).await?;
            summary.departments += 1;

            for bank_config in &department_config.banks {
                let bank = create_bank(&txn, department.id, &bank_config.name).await?;
                summary.banks += 1;

                for account_config in &bank_config.accounts {
                    let account = create_account(
                        &txn,
                        AccountInput {
                            company_id: Some(company.id),
                            department_id: Some(department.id),
                            bank_id: Some(bank.id),
                            account_name: Some(account_config.name.clone()),
                            account_type: account_config.account_type.clone(),
                            currency: account_config.currency.clone(),
                            ..Default::default()
                        },
                    )
                    .await?;
                    summary.accounts += 1;

                    for card_name in &account_config.cards {
                        create_card(&txn, account.id, card_name).await?;
                        summary.cards += 1;
                    }
                }
            }
        }
    }

    for expense_name in &config.expenses {
        create_expense(&txn, expense_name).await?;
        summary.expenses += 1;
    }

    txn.commit().await?;
    info!(
        "Seeded {} companies, {} departments, {} banks, {} accounts, {} cards, {} expenses",
        summary.companies,
        summary.departments,
        summary.banks,
        summary.accounts,
        summary.cards,
        summary.expenses
    );
    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::reference::parse_config;
    use crate::core::lookup::{ReferenceKind, ReferenceStore, SeaOrmReferenceStore};
    use crate::test_utils::setup_test_db;

    const SEED: &str = r#"
        expenses = ["Travel", "Meals"]

        [[companies]]
        name = "Acme"

        [[companies.departments]]
        name = "Finance"

        [[companies.departments.banks]]
        name = "First National"

        [[companies.departments.banks.accounts]]
        name = "Operating"
        cards = ["Visa", "Amex"]

        [[companies.departments]]
        name = "Operations"
    "#;

    #[tokio::test]
    async fn test_blank_names_are_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_company(&db, "   ").await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let company = create_company(&db, "  Acme  ").await?;
        assert_eq!(company.name, "Acme");
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_reference_data() -> Result<()> {
        let store = SeaOrmReferenceStore::new(setup_test_db().await?);
        let db = store.connection();
        let config = parse_config(SEED)?;

        let summary = seed_reference_data(db, &config).await?.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                companies: 1,
                departments: 2,
                banks: 1,
                accounts: 1,
                cards: 2,
                expenses: 2,
            }
        );

        let accounts = store.all(ReferenceKind::Account).await?;
        assert_eq!(accounts[0].label, "Operating");
        let cards = store.children(ReferenceKind::Account, accounts[0].id).await?;
        let names: Vec<&str> = cards.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(names, vec!["Visa", "Amex"]);

        // Second run is a no-op
        assert!(seed_reference_data(db, &config).await?.is_none());
        assert_eq!(store.all(ReferenceKind::Company).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_rolls_back_on_error() -> Result<()> {
        let db = setup_test_db().await?;
        let config = parse_config(
            r#"
            expenses = ["Travel", " "]

            [[companies]]
            name = "Acme"
            "#,
        )?;

        assert!(seed_reference_data(&db, &config).await.is_err());
        assert_eq!(Company::find().count(&db).await?, 0);
        Ok(())
    }
}
