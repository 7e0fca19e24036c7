//! Expense transaction business logic - create, view, filter, edit and soft-delete.
//!
//! Every foreign key of the company → department → bank → account → card chain is
//! stored as submitted. Submissions are only checked against the form's field
//! constraints: the date may not be in the future, the description is limited to 255
//! characters and the amount must be a non-negative number no larger than
//! [`MAX_AMOUNT`].

use crate::{
    core::{
        descriptor::{FieldValue, expense_transaction_resource},
        lookup::ReferenceKind,
        table::{CellValue, TableRecord},
    },
    entities::{ExpenseTransaction, expense_transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument};

/// Largest amount accepted; every cent up to it is exact in an `f64`.
pub const MAX_AMOUNT: f64 = 9_999_999_999_999.99;

/// Values submitted by the expense transaction form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseTransactionInput {
    /// Selected company
    pub company_id: Option<i64>,
    /// Selected department
    pub department_id: Option<i64>,
    /// Selected bank
    pub bank_id: Option<i64>,
    /// Selected bank account
    pub account_id: Option<i64>,
    /// Selected card
    pub card_id: Option<i64>,
    /// Date of the expense
    pub date: Option<NaiveDate>,
    /// Unmasked transaction number
    pub number: Option<i64>,
    /// Selected expense account
    pub expense_id: Option<i64>,
    /// Merchant
    pub merchant_name: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Unmasked amount
    pub amount: f64,
}

impl ExpenseTransactionInput {
    /// Checks the input against the expense transaction form.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if !(0.0..=MAX_AMOUNT).contains(&self.amount) {
            return Err(Error::InvalidAmount {
                amount: self.amount,
            });
        }

        let values = [
            ("date", FieldValue::from(self.date)),
            (
                "number",
                self.number
                    .map_or(FieldValue::Empty, |number| FieldValue::Number(number as f64)),
            ),
            ("merchant_name", FieldValue::from(self.merchant_name.clone())),
            ("description", FieldValue::from(self.description.clone())),
            ("amount", FieldValue::Number(self.amount)),
        ];

        expense_transaction_resource()
            .validate(values.iter().map(|(key, value)| (*key, value)), today)
            .into_iter()
            .next()
            .map_or(Ok(()), |error| Err(error.into()))
    }

    fn apply(self, model: &mut expense_transaction::ActiveModel) {
        model.company_id = Set(self.company_id);
        model.department_id = Set(self.department_id);
        model.bank_id = Set(self.bank_id);
        model.account_id = Set(self.account_id);
        model.card_id = Set(self.card_id);
        model.date = Set(self.date);
        model.number = Set(self.number);
        model.expense_id = Set(self.expense_id);
        model.merchant_name = Set(self.merchant_name);
        model.description = Set(self.description);
        model.amount = Set(self.amount);
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Creates an expense transaction from form input.
#[instrument(skip(db, input))]
pub async fn create_expense_transaction<C>(
    db: &C,
    input: ExpenseTransactionInput,
) -> Result<expense_transaction::Model>
where
    C: ConnectionTrait,
{
    input.validate(today())?;

    let mut model = expense_transaction::ActiveModel {
        is_deleted: Set(false),
        ..Default::default()
    };
    input.apply(&mut model);

    let created = model.insert(db).await?;
    info!(
        "Created expense transaction #{}: amount=${:.2}",
        created.id, created.amount
    );
    Ok(created)
}

/// Finds an active expense transaction by id, `None` if missing or soft-deleted.
pub async fn get_expense_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<expense_transaction::Model>> {
    ExpenseTransaction::find_by_id(transaction_id)
        .filter(expense_transaction::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Multi-select filter state of the expense transactions table.
///
/// An empty id set does not restrict; non-empty sets are combined with AND.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseTransactionFilter {
    /// Selected companies
    pub company_ids: Vec<i64>,
    /// Selected departments
    pub department_ids: Vec<i64>,
    /// Selected banks
    pub bank_ids: Vec<i64>,
    /// Selected accounts
    pub account_ids: Vec<i64>,
    /// Selected cards
    pub card_ids: Vec<i64>,
}

impl ExpenseTransactionFilter {
    /// Sets the selection of the filter over `kind`. Expense categories have no
    /// filter and are ignored.
    #[must_use]
    pub fn with(mut self, kind: ReferenceKind, ids: Vec<i64>) -> Self {
        match kind {
            ReferenceKind::Company => self.company_ids = ids,
            ReferenceKind::Department => self.department_ids = ids,
            ReferenceKind::Bank => self.bank_ids = ids,
            ReferenceKind::Account => self.account_ids = ids,
            ReferenceKind::Card => self.card_ids = ids,
            ReferenceKind::Expense => {}
        }
        self
    }

    fn selections(&self) -> [(expense_transaction::Column, &Vec<i64>); 5] {
        [
            (expense_transaction::Column::CompanyId, &self.company_ids),
            (expense_transaction::Column::DepartmentId, &self.department_ids),
            (expense_transaction::Column::BankId, &self.bank_ids),
            (expense_transaction::Column::AccountId, &self.account_ids),
            (expense_transaction::Column::CardId, &self.card_ids),
        ]
    }
}

/// Lists active expense transactions matching the filter, in id order.
pub async fn list_expense_transactions(
    db: &DatabaseConnection,
    filter: &ExpenseTransactionFilter,
) -> Result<Vec<expense_transaction::Model>> {
    let mut query =
        ExpenseTransaction::find().filter(expense_transaction::Column::IsDeleted.eq(false));
    for (column, ids) in filter.selections() {
        if !ids.is_empty() {
            query = query.filter(column.is_in(ids.iter().copied()));
        }
    }

    let transactions = query
        .order_by_asc(expense_transaction::Column::Id)
        .all(db)
        .await?;
    debug!("Listed {} expense transaction(s)", transactions.len());
    Ok(transactions)
}

/// Replaces every form-editable attribute of an active expense transaction.
#[instrument(skip(db, input))]
pub async fn update_expense_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    input: ExpenseTransactionInput,
) -> Result<expense_transaction::Model> {
    let existing = get_expense_transaction_by_id(db, transaction_id)
        .await?
        .ok_or(Error::RecordNotFound {
            resource: "expense-transactions",
            id: transaction_id,
        })?;
    input.validate(today())?;

    let mut model: expense_transaction::ActiveModel = existing.into();
    input.apply(&mut model);
    let updated = model.update(db).await?;
    info!("Updated expense transaction #{}", updated.id);
    Ok(updated)
}

/// Soft-deletes the given expense transactions; returns how many were newly hidden.
#[instrument(skip(db))]
pub async fn soft_delete_expense_transactions(
    db: &DatabaseConnection,
    transaction_ids: &[i64],
) -> Result<u64> {
    if transaction_ids.is_empty() {
        return Ok(0);
    }

    let result = ExpenseTransaction::update_many()
        .col_expr(expense_transaction::Column::IsDeleted, Expr::value(true))
        .filter(expense_transaction::Column::Id.is_in(transaction_ids.iter().copied()))
        .filter(expense_transaction::Column::IsDeleted.eq(false))
        .exec(db)
        .await?;

    info!(
        "Soft-deleted {} expense transaction(s)",
        result.rows_affected
    );
    Ok(result.rows_affected)
}

impl TableRecord for expense_transaction::Model {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn cell(&self, path: &str) -> CellValue {
        match path {
            "company.name" => CellValue::Relation(self.company_id),
            "department.name" => CellValue::Relation(self.department_id),
            "bank.bank_name" => CellValue::Relation(self.bank_id),
            "account.account_name" => CellValue::Relation(self.account_id),
            "card.card_name" => CellValue::Relation(self.card_id),
            "expense.name" => CellValue::Relation(self.expense_id),
            "date" => self.date.map_or(CellValue::Empty, CellValue::Date),
            "number" => self.number.map_or(CellValue::Empty, CellValue::Integer),
            "merchant_name" => self.merchant_name.clone().into(),
            "description" => self.description.clone().into(),
            "amount" => CellValue::Number(self.amount),
            _ => CellValue::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{
        cascade::{SelectionState, SelectorField},
        descriptor::expense_transaction_resource,
        lookup::SeaOrmReferenceStore,
        mask::MoneyMask,
        table::render_rows,
    };
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn full_input(ids: &FixtureIds) -> ExpenseTransactionInput {
        ExpenseTransactionInput {
            company_id: Some(ids.acme),
            department_id: Some(ids.acme_finance),
            bank_id: Some(ids.first_national),
            account_id: Some(ids.operating),
            card_id: Some(ids.amex),
            date: NaiveDate::from_ymd_opt(2024, 3, 7),
            number: Some(42),
            expense_id: Some(ids.travel),
            merchant_name: Some("Delta".to_string()),
            description: Some("Flight to client".to_string()),
            amount: 1234.56,
        }
    }

    #[tokio::test]
    async fn test_create_expense_transaction_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let negative = create_expense_transaction(
            &db,
            ExpenseTransactionInput {
                amount: -5.0,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            negative.unwrap_err(),
            Error::InvalidAmount { amount } if amount == -5.0
        ));

        for amount in [f64::NAN, f64::INFINITY, 1e30, MAX_AMOUNT + 1.0] {
            let rejected = create_expense_transaction(
                &db,
                ExpenseTransactionInput {
                    amount,
                    ..Default::default()
                },
            )
            .await;
            assert!(matches!(rejected.unwrap_err(), Error::InvalidAmount { .. }));
        }

        let future = create_expense_transaction(
            &db,
            ExpenseTransactionInput {
                date: today().succ_opt(),
                amount: 5.0,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            future.unwrap_err(),
            Error::Validation { field, .. } if field == "date"
        ));

        let long = create_expense_transaction(
            &db,
            ExpenseTransactionInput {
                description: Some("d".repeat(256)),
                amount: 5.0,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            long.unwrap_err(),
            Error::Validation { field, .. } if field == "description"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_get_expense_transaction() -> Result<()> {
        let ReferenceFixture { db, ids } = setup_reference_fixture().await?;

        let created = create_expense_transaction(&db, full_input(&ids)).await?;
        assert_eq!(created.amount, 1234.56);
        assert_eq!(created.number, Some(42));
        assert!(!created.is_deleted);

        let found = get_expense_transaction_by_id(&db, created.id)
            .await?
            .unwrap();
        assert_eq!(found, created);

        // An edit form reopens with the stored selections
        let state = SelectionState::from(&found);
        assert_eq!(state.get(SelectorField::Card), Some(ids.amex));
        assert_eq!(state.get(SelectorField::Expense), Some(ids.travel));
        Ok(())
    }

    #[tokio::test]
    async fn test_largest_amount_shows_every_cent() -> Result<()> {
        let ReferenceFixture { db, ids } = setup_reference_fixture().await?;
        let created = create_test_transaction(&db, &ids, MAX_AMOUNT).await?;
        assert_eq!(created.amount, MAX_AMOUNT);
        assert_eq!(
            MoneyMask::currency().format_value(created.amount),
            "$9,999,999,999,999.99"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_today_is_accepted() -> Result<()> {
        let ReferenceFixture { db, .. } = setup_reference_fixture().await?;
        let created = create_expense_transaction(
            &db,
            ExpenseTransactionInput {
                date: Some(today()),
                amount: 0.0,
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(created.date, Some(today()));
        assert_eq!(created.company_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_filters_combine() -> Result<()> {
        let ReferenceFixture { db, ids } = setup_reference_fixture().await?;
        let acme = create_expense_transaction(&db, full_input(&ids)).await?;
        let globex = create_expense_transaction(
            &db,
            ExpenseTransactionInput {
                company_id: Some(ids.globex),
                department_id: Some(ids.globex_sales),
                account_id: Some(ids.globex_main),
                amount: 15.0,
                ..Default::default()
            },
        )
        .await?;

        let everything =
            list_expense_transactions(&db, &ExpenseTransactionFilter::default()).await?;
        assert_eq!(everything.len(), 2);

        let by_company = ExpenseTransactionFilter::default()
            .with(ReferenceKind::Company, vec![ids.globex]);
        let found = list_expense_transactions(&db, &by_company).await?;
        assert_eq!(found, vec![globex.clone()]);

        let both_companies = ExpenseTransactionFilter::default()
            .with(ReferenceKind::Company, vec![ids.acme, ids.globex]);
        assert_eq!(
            list_expense_transactions(&db, &both_companies).await?.len(),
            2
        );

        let narrowed = both_companies.with(ReferenceKind::Card, vec![ids.amex]);
        let found = list_expense_transactions(&db, &narrowed).await?;
        assert_eq!(found, vec![acme]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_soft_delete() -> Result<()> {
        let ReferenceFixture { db, ids } = setup_reference_fixture().await?;
        let created = create_expense_transaction(&db, full_input(&ids)).await?;

        let mut input = full_input(&ids);
        input.amount = 99.0;
        input.card_id = None;
        let updated = update_expense_transaction(&db, created.id, input).await?;
        assert_eq!(updated.amount, 99.0);
        assert_eq!(updated.card_id, None);

        assert_eq!(
            soft_delete_expense_transactions(&db, &[created.id]).await?,
            1
        );
        assert!(
            get_expense_transaction_by_id(&db, created.id)
                .await?
                .is_none()
        );
        assert!(
            list_expense_transactions(&db, &ExpenseTransactionFilter::default())
                .await?
                .is_empty()
        );

        let again = update_expense_transaction(&db, created.id, full_input(&ids)).await;
        assert!(matches!(again.unwrap_err(), Error::RecordNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_render_expense_table_from_database() -> Result<()> {
        let ReferenceFixture { db, ids } = setup_reference_fixture().await?;
        create_expense_transaction(&db, full_input(&ids)).await?;
        let records =
            list_expense_transactions(&db, &ExpenseTransactionFilter::default()).await?;
        let store = SeaOrmReferenceStore::new(db);

        let rows = render_rows(&expense_transaction_resource().table, &records, &store).await?;
        let row = &rows[0];
        assert_eq!(row.cell("company.name"), Some("Acme"));
        assert_eq!(row.cell("card.card_name"), Some("Amex"));
        assert_eq!(row.cell("expense.name"), Some("Travel"));
        assert_eq!(row.cell("merchant_name"), Some("Delta"));
        assert_eq!(row.cell("amount"), Some("$1,234.56"));
        Ok(())
    }
}
