//! Table rendering for resource listings.
//!
//! Records expose raw cell values by column path; this module resolves relation paths
//! (`company.name`) through the reference store and applies each column's formatter.

use crate::{
    core::{
        cascade::OptionList,
        descriptor::{ColumnDescriptor, FilterDescriptor, Formatter, TableDescriptor},
        lookup::{ReferenceKind, ReferenceStore},
        mask::format_money,
    },
    errors::Result,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Raw value of one cell before formatting.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    /// Null or unknown column
    Empty,
    /// Text attribute
    Text(String),
    /// Integer attribute or aggregate
    Integer(i64),
    /// Decimal attribute
    Number(f64),
    /// Date attribute
    Date(NaiveDate),
    /// Foreign key of a dotted relation column
    Relation(Option<i64>),
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Empty, Self::Text)
    }
}

/// A record that can be listed in a table.
pub trait TableRecord {
    /// Primary key, used by row actions.
    fn record_id(&self) -> i64;

    /// Raw value for a column path.
    fn cell(&self, path: &str) -> CellValue;
}

/// A formatted cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableCell {
    /// Column path
    pub path: &'static str,
    /// Formatted text
    pub text: String,
}

/// A formatted row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    /// Primary key of the record
    pub id: i64,
    /// Cells of the visible columns, in column order
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Formatted text of a column.
    #[must_use]
    pub fn cell(&self, path: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|cell| cell.path == path)
            .map(|cell| cell.text.as_str())
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_cell(column: &ColumnDescriptor, value: CellValue) -> String {
    match (&column.formatter, value) {
        (_, CellValue::Empty | CellValue::Relation(_)) => String::new(),
        (Formatter::Money { currency, decimals }, CellValue::Number(amount)) => {
            format_money(amount, currency, *decimals)
        }
        (Formatter::Money { currency, decimals }, CellValue::Integer(amount)) => {
            format_money(amount as f64, currency, *decimals)
        }
        (_, CellValue::Date(date)) => date.format("%Y-%m-%d").to_string(),
        (_, CellValue::Text(text)) => text,
        (_, CellValue::Integer(value)) => value.to_string(),
        (_, CellValue::Number(value)) => value.to_string(),
    }
}

/// Formats records into rows of the table's visible columns.
///
/// Relation labels are looked up once per entity. A relation pointing at a missing
/// entity renders as an empty cell.
pub async fn render_rows<R, S>(
    table: &TableDescriptor,
    records: &[R],
    store: &S,
) -> Result<Vec<TableRow>>
where
    R: TableRecord,
    S: ReferenceStore + ?Sized,
{
    let mut labels: HashMap<(ReferenceKind, i64), String> = HashMap::new();
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        let mut cells = Vec::new();
        for column in table.visible_columns() {
            let value = record.cell(column.path);
            let text = match (column.relation(), &value) {
                (Some(kind), CellValue::Relation(Some(id))) => {
                    if let Some(label) = labels.get(&(kind, *id)) {
                        label.clone()
                    } else {
                        let label = store
                            .find(kind, *id)
                            .await?
                            .map(|entry| entry.label)
                            .unwrap_or_default();
                        labels.insert((kind, *id), label.clone());
                        label
                    }
                }
                _ => format_cell(column, value),
            };
            cells.push(TableCell {
                path: column.path,
                text,
            });
        }
        rows.push(TableRow {
            id: record.record_id(),
            cells,
        });
    }

    Ok(rows)
}

/// Choices offered by a multi-select filter: every entity of its kind.
pub async fn filter_options<S: ReferenceStore + ?Sized>(
    filter: &FilterDescriptor,
    store: &S,
) -> Result<OptionList> {
    Ok(OptionList::from_entries(store.all(filter.kind).await?))
}
