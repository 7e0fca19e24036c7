//! Shared test utilities.
//!
//! This module provides helpers for setting up in-memory test databases and a small
//! reference hierarchy with known ids.

use crate::{
    core::{
        account::{AccountInput, create_account},
        expense_transaction::{ExpenseTransactionInput, create_expense_transaction},
        reference::{create_bank, create_card, create_company, create_department, create_expense},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness. Safe to call more than once.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Ids of the rows created by [`setup_reference_fixture`].
///
/// ```text
/// Acme ── Finance ── First National ─┬─ Operating ── Visa, Amex
///      │                              └─ Payroll ── Mastercard
///      └─ Operations ── City Bank
/// Globex ── Sales ── Globex Credit Union ── Globex Main
/// Expenses: Travel, Office Supplies
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FixtureIds {
    pub acme: i64,
    pub globex: i64,
    pub acme_finance: i64,
    pub acme_ops: i64,
    pub globex_sales: i64,
    pub first_national: i64,
    pub city_bank: i64,
    pub globex_bank: i64,
    pub operating: i64,
    pub payroll: i64,
    pub globex_main: i64,
    pub visa: i64,
    pub amex: i64,
    pub mastercard: i64,
    pub travel: i64,
    pub supplies: i64,
}

/// A seeded database and the ids in it.
pub struct ReferenceFixture {
    pub db: DatabaseConnection,
    pub ids: FixtureIds,
}

async fn fixture_account(
    db: &DatabaseConnection,
    company_id: i64,
    department_id: i64,
    bank_id: i64,
    name: &str,
) -> Result<entities::account::Model> {
    create_account(
        db,
        AccountInput {
            company_id: Some(company_id),
            department_id: Some(department_id),
            bank_id: Some(bank_id),
            account_name: Some(name.to_string()),
            account_type: Some("Checking".to_string()),
            currency: Some("USD".to_string()),
            ..Default::default()
        },
    )
    .await
}

/// Sets up a database holding the hierarchy drawn on [`FixtureIds`].
pub async fn setup_reference_fixture() -> Result<ReferenceFixture> {
    let db = setup_test_db().await?;

    let acme = create_company(&db, "Acme").await?.id;
    let globex = create_company(&db, "Globex").await?.id;

    let acme_finance = create_department(&db, acme, "Finance").await?.id;
    let acme_ops = create_department(&db, acme, "Operations").await?.id;
    let globex_sales = create_department(&db, globex, "Sales").await?.id;

    let first_national = create_bank(&db, acme_finance, "First National").await?.id;
    let city_bank = create_bank(&db, acme_ops, "City Bank").await?.id;
    let globex_bank = create_bank(&db, globex_sales, "Globex Credit Union").await?.id;

    let operating = fixture_account(&db, acme, acme_finance, first_national, "Operating")
        .await?
        .id;
    let payroll = fixture_account(&db, acme, acme_finance, first_national, "Payroll")
        .await?
        .id;
    let globex_main = fixture_account(&db, globex, globex_sales, globex_bank, "Globex Main")
        .await?
        .id;

    let visa = create_card(&db, operating, "Visa").await?.id;
    let amex = create_card(&db, operating, "Amex").await?.id;
    let mastercard = create_card(&db, payroll, "Mastercard").await?.id;

    let travel = create_expense(&db, "Travel").await?.id;
    let supplies = create_expense(&db, "Office Supplies").await?.id;

    Ok(ReferenceFixture {
        db,
        ids: FixtureIds {
            acme,
            globex,
            acme_finance,
            acme_ops,
            globex_sales,
            first_national,
            city_bank,
            globex_bank,
            operating,
            payroll,
            globex_main,
            visa,
            amex,
            mastercard,
            travel,
            supplies,
        },
    })
}

/// Creates an expense transaction on the Operating account with sensible defaults.
///
/// # Defaults
/// * chain: Acme / Finance / First National / Operating / Visa
/// * `expense_id`: Travel
/// * `description`: `"Test transaction"`
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    ids: &FixtureIds,
    amount: f64,
) -> Result<entities::expense_transaction::Model> {
    create_expense_transaction(
        db,
        ExpenseTransactionInput {
            company_id: Some(ids.acme),
            department_id: Some(ids.acme_finance),
            bank_id: Some(ids.first_national),
            account_id: Some(ids.operating),
            card_id: Some(ids.visa),
            expense_id: Some(ids.travel),
            description: Some("Test transaction".to_string()),
            amount,
            ..Default::default()
        },
    )
    .await
}
