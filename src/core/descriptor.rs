//! Declarative resource descriptors.
//!
//! A resource bundles the form used to create and edit one record type, the table used
//! to list it, its filters and actions, and its routes. Everything here is data; the
//! only behavior is checking a submitted value against a field's constraints.

use crate::{
    core::{
        cascade::{CascadeChain, CascadeResolver, SelectorField},
        lookup::{ReferenceKind, ReferenceStore},
        mask::{DATE_FORMAT, MoneyMask},
    },
    errors::Error,
};
use chrono::NaiveDate;

/// Longest value accepted by text inputs.
pub const MAX_TEXT_LENGTH: usize = 255;

/// Derives a label from a key or dotted path: `company.name` → `Company`,
/// `merchant_name` → `Merchant name`.
#[must_use]
pub fn default_label(path: &str) -> String {
    let owner = path.rsplit_once('.').map_or(path, |(owner, _)| owner);
    let last = owner.rsplit('.').next().unwrap_or(owner);
    let spaced = last.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Widget used for a form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// Dropdown fed by a selector's option list
    Select(SelectorField),
    /// Single-line text input
    Text,
    /// Date picker using `format` for input and display
    Date {
        /// `chrono` format string
        format: &'static str,
    },
    /// Numeric input shown through a mask
    Masked(MoneyMask),
}

/// Rule a submitted value must satisfy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// Text no longer than this many characters
    MaxLength(usize),
    /// Date not later than today
    NotAfterToday,
    /// Empty submissions are stored as null
    Nullable,
    /// Value must be a number
    Numeric,
}

/// A submitted form value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Nothing entered
    Empty,
    /// Selected entity id
    Id(i64),
    /// Text as typed
    Text(String),
    /// Picked date
    Date(NaiveDate),
    /// Unmasked number
    Number(f64),
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Empty, Self::Text)
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, |text| Self::Text(text.to_string()))
    }
}

impl From<Option<NaiveDate>> for FieldValue {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Empty, Self::Date)
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Empty, Self::Id)
    }
}

/// A constraint violation on one field, shown inline next to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// Form key
    pub field: String,
    /// Message for the user
    pub message: String,
}

impl From<FieldError> for Error {
    fn from(error: FieldError) -> Self {
        Self::Validation {
            field: error.field,
            message: error.message,
        }
    }
}

/// One form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Form key, also the column name
    pub key: &'static str,
    /// Label shown above the widget
    pub label: String,
    /// Widget
    pub input: InputKind,
    /// Rules checked on submit
    pub constraints: Vec<Constraint>,
}

impl FieldDescriptor {
    fn new(key: &'static str, input: InputKind) -> Self {
        Self {
            key,
            label: default_label(key),
            input,
            constraints: Vec::new(),
        }
    }

    /// Dropdown for a selector.
    #[must_use]
    pub fn select(field: SelectorField) -> Self {
        Self::new(field.key(), InputKind::Select(field))
    }

    /// Text input.
    #[must_use]
    pub fn text(key: &'static str) -> Self {
        Self::new(key, InputKind::Text)
    }

    /// Date picker in `m/d/Y`.
    #[must_use]
    pub fn date(key: &'static str) -> Self {
        Self::new(
            key,
            InputKind::Date {
                format: DATE_FORMAT,
            },
        )
    }

    /// Masked numeric input.
    #[must_use]
    pub fn masked(key: &'static str, mask: MoneyMask) -> Self {
        Self::new(key, InputKind::Masked(mask))
    }

    /// Overrides the derived label.
    #[must_use]
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Adds a constraint.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Shorthand for the standard text length limit.
    #[must_use]
    pub fn max_length(self) -> Self {
        self.constraint(Constraint::MaxLength(MAX_TEXT_LENGTH))
    }

    /// Checks a submitted value against this field's constraints.
    pub fn check(&self, value: &FieldValue, today: NaiveDate) -> Result<(), FieldError> {
        let fail = |message: String| FieldError {
            field: self.key.to_string(),
            message,
        };

        for constraint in &self.constraints {
            match (constraint, value) {
                (Constraint::MaxLength(max), FieldValue::Text(text))
                    if text.chars().count() > *max =>
                {
                    return Err(fail(format!(
                        "The {} may not be greater than {max} characters.",
                        self.label
                    )));
                }
                (Constraint::NotAfterToday, FieldValue::Date(date)) if *date > today => {
                    return Err(fail(format!(
                        "The {} must be a date before or equal to {}.",
                        self.label,
                        today.format(DATE_FORMAT)
                    )));
                }
                (Constraint::Numeric, FieldValue::Number(number)) if !number.is_finite() => {
                    return Err(fail(format!("The {} must be a number.", self.label)));
                }
                (Constraint::Numeric, FieldValue::Text(text)) => {
                    let parsed = match &self.input {
                        InputKind::Masked(mask) => mask.unmask(text),
                        _ => text.trim().parse::<f64>().ok(),
                    };
                    if parsed.is_none() {
                        return Err(fail(format!("The {} must be a number.", self.label)));
                    }
                }
                _ => {}
            }
        }

        if let (InputKind::Masked(mask), FieldValue::Number(number)) = (&self.input, value) {
            if !number.is_finite() {
                return Err(fail(format!("The {} must be a number.", self.label)));
            }
            if !mask.signed && *number < 0.0 {
                return Err(fail(format!("The {} must not be negative.", self.label)));
            }
        }

        Ok(())
    }
}

/// How a table cell is formatted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Formatter {
    /// Value as-is
    Text,
    /// Amount with currency symbol and grouping
    Money {
        /// ISO currency code
        currency: &'static str,
        /// Digits after the decimal point
        decimals: u32,
    },
    /// Number of related records
    Count {
        /// Relation counted
        relation: &'static str,
    },
}

/// One table column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Attribute name or dotted `relation.attribute` path
    pub path: &'static str,
    /// Header text
    pub label: String,
    /// Cell formatter
    pub formatter: Formatter,
    /// Hidden columns are declared but not rendered
    pub hidden: bool,
}

impl ColumnDescriptor {
    /// Plain text column.
    #[must_use]
    pub fn text(path: &'static str) -> Self {
        Self {
            path,
            label: default_label(path),
            formatter: Formatter::Text,
            hidden: false,
        }
    }

    /// Money column.
    #[must_use]
    pub fn money(path: &'static str, currency: &'static str, decimals: u32) -> Self {
        Self {
            formatter: Formatter::Money { currency, decimals },
            ..Self::text(path)
        }
    }

    /// Column counting a relation, named `<relation>_count`.
    #[must_use]
    pub fn count(path: &'static str, relation: &'static str) -> Self {
        Self {
            formatter: Formatter::Count { relation },
            ..Self::text(path)
        }
    }

    /// Overrides the derived header.
    #[must_use]
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Hides the column.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Relation kind for dotted paths, `None` for plain attributes.
    #[must_use]
    pub fn relation(&self) -> Option<ReferenceKind> {
        self.path
            .split_once('.')
            .and_then(|(relation, _)| ReferenceKind::from_relation(relation))
    }
}

/// Multi-select filter over a related entity's display attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterDescriptor {
    /// Dotted `relation.attribute` path
    pub path: &'static str,
    /// Filter label
    pub label: String,
    /// Entity kind whose ids are selected
    pub kind: ReferenceKind,
}

impl FilterDescriptor {
    /// Multi-select filter on a relation.
    #[must_use]
    pub fn multi_select(kind: ReferenceKind) -> Self {
        let path = match kind {
            ReferenceKind::Company => "company.name",
            ReferenceKind::Department => "department.name",
            ReferenceKind::Bank => "bank.bank_name",
            ReferenceKind::Account => "account.account_name",
            ReferenceKind::Card => "card.card_name",
            ReferenceKind::Expense => "expense.name",
        };
        Self {
            path,
            label: default_label(path),
            kind,
        }
    }

    /// Overrides the derived label.
    #[must_use]
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }
}

/// Per-row actions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecordAction {
    /// Open the read-only view page
    View,
    /// Open the edit page
    Edit,
}

/// Actions applied to a selection of rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BulkAction {
    /// Soft-delete every selected row
    Delete,
}

/// Listing configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Columns in display order
    pub columns: Vec<ColumnDescriptor>,
    /// Filters in display order
    pub filters: Vec<FilterDescriptor>,
    /// Row actions
    pub actions: Vec<RecordAction>,
    /// Bulk actions
    pub bulk_actions: Vec<BulkAction>,
}

impl TableDescriptor {
    /// Columns that are rendered.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|column| !column.hidden)
    }
}

/// Pages a resource exposes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Page {
    /// `/{slug}`
    Index,
    /// `/{slug}/create`
    Create,
    /// `/{slug}/{record}`
    View,
    /// `/{slug}/{record}/edit`
    Edit,
}

/// Route table of one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRoutes {
    slug: &'static str,
}

impl ResourceRoutes {
    /// Pages in registration order.
    pub const PAGES: [Page; 4] = [Page::Index, Page::Create, Page::View, Page::Edit];

    /// Route pattern of a page, with `{record}` standing for the id.
    #[must_use]
    pub fn pattern(&self, page: Page) -> String {
        match page {
            Page::Index => format!("/{}", self.slug),
            Page::Create => format!("/{}/create", self.slug),
            Page::View => format!("/{}/{{record}}", self.slug),
            Page::Edit => format!("/{}/{{record}}/edit", self.slug),
        }
    }

    /// Concrete path of a page; record pages need an id.
    #[must_use]
    pub fn path(&self, page: Page, record: Option<i64>) -> Option<String> {
        match (page, record) {
            (Page::Index, _) => Some(format!("/{}", self.slug)),
            (Page::Create, _) => Some(format!("/{}/create", self.slug)),
            (Page::View, Some(id)) => Some(format!("/{}/{id}", self.slug)),
            (Page::Edit, Some(id)) => Some(format!("/{}/{id}/edit", self.slug)),
            (Page::View | Page::Edit, None) => None,
        }
    }
}

/// Everything the admin panel needs to manage one record type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// URL segment
    pub slug: &'static str,
    /// Singular label
    pub model_label: &'static str,
    /// Navigation group
    pub navigation_group: &'static str,
    /// Position inside the navigation group
    pub navigation_sort: i32,
    /// Form fields in display order
    pub form: Vec<FieldDescriptor>,
    /// Listing configuration
    pub table: TableDescriptor,
    /// Dependent selectors on the form
    pub chain: CascadeChain,
}

impl ResourceDescriptor {
    /// Route table.
    #[must_use]
    pub const fn routes(&self) -> ResourceRoutes {
        ResourceRoutes { slug: self.slug }
    }

    /// Form field by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.form.iter().find(|field| field.key == key)
    }

    /// Cascade resolver for this resource's form.
    pub fn resolver<'a, S: ReferenceStore + ?Sized>(
        &self,
        store: &'a S,
    ) -> CascadeResolver<'a, S> {
        CascadeResolver::new(self.chain.clone(), store)
    }

    /// Checks submitted values, returning every violation.
    pub fn validate<'v>(
        &self,
        values: impl IntoIterator<Item = (&'v str, &'v FieldValue)>,
        today: NaiveDate,
    ) -> Vec<FieldError> {
        values
            .into_iter()
            .filter_map(|(key, value)| match self.field(key) {
                Some(field) => field.check(value, today).err(),
                None => Some(FieldError {
                    field: key.to_string(),
                    message: format!("{key} is not a field of {}", self.slug),
                }),
            })
            .collect()
    }
}

/// The accounts resource.
#[must_use]
pub fn account_resource() -> ResourceDescriptor {
    ResourceDescriptor {
        slug: "accounts",
        model_label: "Account",
        navigation_group: "Resource Management",
        navigation_sort: 5,
        form: vec![
            FieldDescriptor::select(SelectorField::Company).label("Company"),
            FieldDescriptor::select(SelectorField::Department).label("Department"),
            FieldDescriptor::select(SelectorField::Bank).label("Bank Name"),
            FieldDescriptor::text("account_type")
                .max_length()
                .label("Account Type"),
            FieldDescriptor::text("account_name")
                .max_length()
                .label("Account Name"),
            FieldDescriptor::text("account_number")
                .max_length()
                .label("Account Number"),
            FieldDescriptor::text("routing_number_paperless_and_electronic")
                .max_length()
                .label("Routing Number: Paperless & Electronic"),
            FieldDescriptor::text("routing_number_wires")
                .max_length()
                .label("Routing Number: Wire"),
            FieldDescriptor::text("account_opened_date")
                .max_length()
                .label("Account Opened Date"),
            FieldDescriptor::text("currency").max_length(),
            FieldDescriptor::text("starting_balance")
                .max_length()
                .label("Starting Balance"),
        ],
        table: TableDescriptor {
            columns: vec![
                ColumnDescriptor::text("company.name"),
                ColumnDescriptor::text("department.name"),
                ColumnDescriptor::text("bank.bank_name").label("Bank Name"),
                ColumnDescriptor::text("account_type").label("Account Type"),
                ColumnDescriptor::text("account_name").label("Account Name"),
                ColumnDescriptor::text("account_number").label("Account Number"),
                ColumnDescriptor::text("routing_number_paperless_and_electronic")
                    .label("Routing Number: P&E"),
                ColumnDescriptor::text("routing_number_wires").label("Routing Number: Wires"),
                ColumnDescriptor::text("account_opened_date").label("Account Opened Date"),
                ColumnDescriptor::text("currency"),
                ColumnDescriptor::text("starting_balance").label("Starting Balance"),
                ColumnDescriptor::count("cards_count", "cards").label("Cards"),
                ColumnDescriptor::count("transactions_count", "transactions")
                    .label("Transactions"),
            ],
            filters: Vec::new(),
            actions: vec![RecordAction::View, RecordAction::Edit],
            bulk_actions: vec![BulkAction::Delete],
        },
        chain: CascadeChain::account(),
    }
}

/// The expense transactions resource.
#[must_use]
pub fn expense_transaction_resource() -> ResourceDescriptor {
    ResourceDescriptor {
        slug: "expense-transactions",
        model_label: "Expenses",
        navigation_group: "Bank",
        navigation_sort: 5,
        form: vec![
            FieldDescriptor::select(SelectorField::Company).label("Company"),
            FieldDescriptor::select(SelectorField::Department).label("Department"),
            FieldDescriptor::select(SelectorField::Bank).label("Bank Name"),
            FieldDescriptor::select(SelectorField::Account).label("Bank Account Name"),
            FieldDescriptor::select(SelectorField::Card).label("Card Network"),
            FieldDescriptor::date("date").constraint(Constraint::NotAfterToday),
            FieldDescriptor::masked("number", MoneyMask::transaction_number())
                .constraint(Constraint::Nullable)
                .constraint(Constraint::Numeric)
                .label("Transaction Number"),
            FieldDescriptor::select(SelectorField::Expense).label("Expense Account"),
            FieldDescriptor::text("merchant_name")
                .constraint(Constraint::Nullable)
                .label("Merchant Name"),
            FieldDescriptor::text("description")
                .max_length()
                .label("Transaction Description"),
            FieldDescriptor::masked("amount", MoneyMask::currency()),
        ],
        table: TableDescriptor {
            columns: vec![
                ColumnDescriptor::text("company.name"),
                ColumnDescriptor::text("department.name"),
                ColumnDescriptor::text("bank.bank_name").label("Bank Name"),
                ColumnDescriptor::text("account.account_name").label("Bank Account Name"),
                ColumnDescriptor::text("card.card_name").label("Card Network"),
                ColumnDescriptor::text("date"),
                ColumnDescriptor::text("number"),
                ColumnDescriptor::text("expense.name").label("Account Name"),
                ColumnDescriptor::text("merchant_name").label("Merchant Name"),
                ColumnDescriptor::text("description").hidden(),
                ColumnDescriptor::money("amount", "USD", 2),
            ],
            filters: vec![
                FilterDescriptor::multi_select(ReferenceKind::Company),
                FilterDescriptor::multi_select(ReferenceKind::Department),
                FilterDescriptor::multi_select(ReferenceKind::Bank).label("Bank Name"),
                FilterDescriptor::multi_select(ReferenceKind::Account).label("Account Name"),
                FilterDescriptor::multi_select(ReferenceKind::Card).label("Card Network"),
            ],
            actions: vec![RecordAction::View, RecordAction::Edit],
            bulk_actions: vec![BulkAction::Delete],
        },
        chain: CascadeChain::expense_transaction(),
    }
}

/// Every registered resource, in navigation order.
#[must_use]
pub fn resources() -> Vec<ResourceDescriptor> {
    vec![account_resource(), expense_transaction_resource()]
}
