//! Account business logic - create, view, list, edit and soft-delete accounts.
//!
//! Inputs are checked against the account form's field constraints before they are
//! written. The company → department → bank selections are stored as given; the
//! cascade only narrows what the form offers and nothing here re-checks it.

use crate::{
    core::{
        descriptor::{FieldValue, account_resource},
        table::{CellValue, TableRecord},
    },
    entities::{Account, Card, ExpenseTransaction, account, card, expense_transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*, sea_query::Expr};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Values submitted by the account form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountInput {
    /// Selected company
    pub company_id: Option<i64>,
    /// Selected department
    pub department_id: Option<i64>,
    /// Selected bank
    pub bank_id: Option<i64>,
    /// Account type
    pub account_type: Option<String>,
    /// Account name
    pub account_name: Option<String>,
    /// Account number
    pub account_number: Option<String>,
    /// Routing number for paperless and electronic transfers
    pub routing_number_paperless_and_electronic: Option<String>,
    /// Routing number for wires
    pub routing_number_wires: Option<String>,
    /// Opening date, free text
    pub account_opened_date: Option<String>,
    /// Currency, free text
    pub currency: Option<String>,
    /// Starting balance, free text
    pub starting_balance: Option<String>,
}

impl AccountInput {
    fn text_fields(&self) -> [(&'static str, &Option<String>); 8] {
        [
            ("account_type", &self.account_type),
            ("account_name", &self.account_name),
            ("account_number", &self.account_number),
            (
                "routing_number_paperless_and_electronic",
                &self.routing_number_paperless_and_electronic,
            ),
            ("routing_number_wires", &self.routing_number_wires),
            ("account_opened_date", &self.account_opened_date),
            ("currency", &self.currency),
            ("starting_balance", &self.starting_balance),
        ]
    }

    /// Checks the input against the account form.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        let values: Vec<(&'static str, FieldValue)> = self
            .text_fields()
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from(value.clone())))
            .collect();

        account_resource()
            .validate(values.iter().map(|(key, value)| (*key, value)), today)
            .into_iter()
            .next()
            .map_or(Ok(()), |error| Err(error.into()))
    }

    fn apply(self, model: &mut account::ActiveModel) {
        model.company_id = Set(self.company_id);
        model.department_id = Set(self.department_id);
        model.bank_id = Set(self.bank_id);
        model.account_type = Set(self.account_type);
        model.account_name = Set(self.account_name);
        model.account_number = Set(self.account_number);
        model.routing_number_paperless_and_electronic =
            Set(self.routing_number_paperless_and_electronic);
        model.routing_number_wires = Set(self.routing_number_wires);
        model.account_opened_date = Set(self.account_opened_date);
        model.currency = Set(self.currency);
        model.starting_balance = Set(self.starting_balance);
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Creates an account from form input.
#[instrument(skip(db, input))]
pub async fn create_account<C>(db: &C, input: AccountInput) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    input.validate(today())?;

    let mut model = account::ActiveModel {
        is_deleted: Set(false),
        ..Default::default()
    };
    input.apply(&mut model);

    let created = model.insert(db).await?;
    info!(
        "Created account #{} ({})",
        created.id,
        created.account_name.as_deref().unwrap_or("unnamed")
    );
    Ok(created)
}

/// Finds an active account by id, `None` if missing or soft-deleted.
pub async fn get_account_by_id(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Option<account::Model>> {
    Account::find_by_id(account_id)
        .filter(account::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// An account together with the aggregates shown in the accounts table.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountListItem {
    /// The account
    pub account: account::Model,
    /// Cards issued on the account
    pub cards_count: u64,
    /// Active expense transactions charged to the account
    pub transactions_count: u64,
}

/// Lists active accounts in id order with their card and transaction counts.
///
/// Counts come from two grouped queries, whatever the number of accounts.
pub async fn list_accounts(db: &DatabaseConnection) -> Result<Vec<AccountListItem>> {
    let accounts = Account::find()
        .filter(account::Column::IsDeleted.eq(false))
        .order_by_asc(account::Column::Id)
        .all(db)
        .await?;
    if accounts.is_empty() {
        return Ok(Vec::new());
    }
    let account_ids: Vec<i64> = accounts.iter().map(|account| account.id).collect();

    let cards: Vec<(i64, i64)> = Card::find()
        .select_only()
        .column(card::Column::AccountId)
        .column_as(Expr::col(card::Column::Id).count(), "count")
        .filter(card::Column::AccountId.is_in(account_ids.iter().copied()))
        .group_by(card::Column::AccountId)
        .into_tuple()
        .all(db)
        .await?;
    let transactions: Vec<(i64, i64)> = ExpenseTransaction::find()
        .select_only()
        .column(expense_transaction::Column::AccountId)
        .column_as(Expr::col(expense_transaction::Column::Id).count(), "count")
        .filter(expense_transaction::Column::AccountId.is_in(account_ids.iter().copied()))
        .filter(expense_transaction::Column::IsDeleted.eq(false))
        .group_by(expense_transaction::Column::AccountId)
        .into_tuple()
        .all(db)
        .await?;

    let cards: HashMap<i64, i64> = cards.into_iter().collect();
    let transactions: HashMap<i64, i64> = transactions.into_iter().collect();
    let count_of = |counts: &HashMap<i64, i64>, id: i64| {
        counts
            .get(&id)
            .map_or(0, |&count| u64::try_from(count).unwrap_or(0))
    };

    Ok(accounts
        .into_iter()
        .map(|account| AccountListItem {
            cards_count: count_of(&cards, account.id),
            transactions_count: count_of(&transactions, account.id),
            account,
        })
        .collect())
}

/// Replaces every form-editable attribute of an active account.
#[instrument(skip(db, input))]
pub async fn update_account(
    db: &DatabaseConnection,
    account_id: i64,
    input: AccountInput,
) -> Result<account::Model> {
    let existing = get_account_by_id(db, account_id)
        .await?
        .ok_or(Error::RecordNotFound {
            resource: "accounts",
            id: account_id,
        })?;
    input.validate(today())?;

    let mut model: account::ActiveModel = existing.into();
    input.apply(&mut model);
    let updated = model.update(db).await?;
    info!("Updated account #{}", updated.id);
    Ok(updated)
}

/// Soft-deletes the given accounts; returns how many were newly hidden.
#[instrument(skip(db))]
pub async fn soft_delete_accounts(db: &DatabaseConnection, account_ids: &[i64]) -> Result<u64> {
    if account_ids.is_empty() {
        return Ok(0);
    }

    let result = Account::update_many()
        .col_expr(account::Column::IsDeleted, Expr::value(true))
        .filter(account::Column::Id.is_in(account_ids.iter().copied()))
        .filter(account::Column::IsDeleted.eq(false))
        .exec(db)
        .await?;

    info!("Soft-deleted {} account(s)", result.rows_affected);
    Ok(result.rows_affected)
}

impl TableRecord for AccountListItem {
    fn record_id(&self) -> i64 {
        self.account.id
    }

    fn cell(&self, path: &str) -> CellValue {
        let account = &self.account;
        match path {
            "company.name" => CellValue::Relation(account.company_id),
            "department.name" => CellValue::Relation(account.department_id),
            "bank.bank_name" => CellValue::Relation(account.bank_id),
            "account_type" => account.account_type.clone().into(),
            "account_name" => account.account_name.clone().into(),
            "account_number" => account.account_number.clone().into(),
            "routing_number_paperless_and_electronic" => account
                .routing_number_paperless_and_electronic
                .clone()
                .into(),
            "routing_number_wires" => account.routing_number_wires.clone().into(),
            "account_opened_date" => account.account_opened_date.clone().into(),
            "currency" => account.currency.clone().into(),
            "starting_balance" => account.starting_balance.clone().into(),
            "cards_count" => {
                CellValue::Integer(i64::try_from(self.cards_count).unwrap_or(i64::MAX))
            }
            "transactions_count" => {
                CellValue::Integer(i64::try_from(self.transactions_count).unwrap_or(i64::MAX))
            }
            _ => CellValue::Empty,
        }
    }
}
