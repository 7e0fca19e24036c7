//! Cascading selector resolution.
//!
//! Forms pick company → department → bank → account → card through chained dropdowns.
//! Each dropdown lists the children of the value chosen one step up, or every entity
//! of its kind when nothing usable is chosen there. Changing a selector empties every
//! selector after it, whether or not the old values would still fit.
//!
//! The chain is an explicit ordered list ([`CascadeChain`]) and all lookups go through
//! a [`ReferenceStore`], so the resolver runs the same against the database and
//! against an in-memory snapshot.

use crate::{
    core::lookup::{ReferenceEntry, ReferenceKind, ReferenceStore},
    entities::{account, expense_transaction},
    errors::{Error, Result},
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// A dropdown on one of the record forms.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SelectorField {
    /// `company_id`
    Company,
    /// `department_id`
    Department,
    /// `bank_id`
    Bank,
    /// `account_id`
    Account,
    /// `card_id`
    Card,
    /// `expense_id`, a plain select outside any chain
    Expense,
}

impl SelectorField {
    const ALL: [Self; 6] = [
        Self::Company,
        Self::Department,
        Self::Bank,
        Self::Account,
        Self::Card,
        Self::Expense,
    ];

    /// Form key of the selector.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Company => "company_id",
            Self::Department => "department_id",
            Self::Bank => "bank_id",
            Self::Account => "account_id",
            Self::Card => "card_id",
            Self::Expense => "expense_id",
        }
    }

    /// Kind of entity the selector picks.
    #[must_use]
    pub const fn kind(self) -> ReferenceKind {
        match self {
            Self::Company => ReferenceKind::Company,
            Self::Department => ReferenceKind::Department,
            Self::Bank => ReferenceKind::Bank,
            Self::Account => ReferenceKind::Account,
            Self::Card => ReferenceKind::Card,
            Self::Expense => ReferenceKind::Expense,
        }
    }

    /// Resolves a form key.
    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| Error::UnknownField {
                key: key.to_string(),
            })
    }
}

/// Ordered list of dependent selectors; each one is filtered by the one before it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CascadeChain {
    fields: Vec<SelectorField>,
}

impl CascadeChain {
    /// Builds a chain from fields in dependency order.
    #[must_use]
    pub const fn new(fields: Vec<SelectorField>) -> Self {
        Self { fields }
    }

    /// Chain used by the expense transaction form.
    #[must_use]
    pub fn expense_transaction() -> Self {
        Self::new(vec![
            SelectorField::Company,
            SelectorField::Department,
            SelectorField::Bank,
            SelectorField::Account,
            SelectorField::Card,
        ])
    }

    /// Chain used by the account form.
    #[must_use]
    pub fn account() -> Self {
        Self::new(vec![
            SelectorField::Company,
            SelectorField::Department,
            SelectorField::Bank,
        ])
    }

    /// Fields in chain order.
    #[must_use]
    pub fn fields(&self) -> &[SelectorField] {
        &self.fields
    }

    fn position(&self, field: SelectorField) -> Option<usize> {
        self.fields.iter().position(|&candidate| candidate == field)
    }

    /// Field immediately before `field`, if any.
    #[must_use]
    pub fn parent_of(&self, field: SelectorField) -> Option<SelectorField> {
        let index = self.position(field)?;
        index.checked_sub(1).map(|parent| self.fields[parent])
    }

    /// Fields strictly after `field`. Empty for the last field and for fields not in
    /// the chain.
    #[must_use]
    pub fn descendants_of(&self, field: SelectorField) -> &[SelectorField] {
        self.position(field)
            .map_or(&[][..], |index| &self.fields[index + 1..])
    }

    /// Empties every descendant of `field` and returns them in chain order.
    pub fn clear_descendants(
        &self,
        field: SelectorField,
        state: &mut SelectionState,
    ) -> Vec<SelectorField> {
        let descendants = self.descendants_of(field).to_vec();
        for &descendant in &descendants {
            state.clear(descendant);
        }
        descendants
    }
}

/// Values currently chosen in the selectors of one in-progress form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    values: HashMap<SelectorField, i64>,
}

impl SelectionState {
    /// A form with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::set`].
    #[must_use]
    pub fn with(mut self, field: SelectorField, value: i64) -> Self {
        self.set(field, Some(value));
        self
    }

    /// Current value of a selector.
    #[must_use]
    pub fn get(&self, field: SelectorField) -> Option<i64> {
        self.values.get(&field).copied()
    }

    /// Sets or empties a selector.
    pub fn set(&mut self, field: SelectorField, value: Option<i64>) {
        match value {
            Some(value) => {
                self.values.insert(field, value);
            }
            None => {
                self.values.remove(&field);
            }
        }
    }

    /// Empties a selector.
    pub fn clear(&mut self, field: SelectorField) {
        self.values.remove(&field);
    }

    /// Whether a selector has a value.
    #[must_use]
    pub fn is_set(&self, field: SelectorField) -> bool {
        self.values.contains_key(&field)
    }
}

impl From<&account::Model> for SelectionState {
    fn from(model: &account::Model) -> Self {
        let mut state = Self::new();
        state.set(SelectorField::Company, model.company_id);
        state.set(SelectorField::Department, model.department_id);
        state.set(SelectorField::Bank, model.bank_id);
        state
    }
}

impl From<&expense_transaction::Model> for SelectionState {
    fn from(model: &expense_transaction::Model) -> Self {
        let mut state = Self::new();
        state.set(SelectorField::Company, model.company_id);
        state.set(SelectorField::Department, model.department_id);
        state.set(SelectorField::Bank, model.bank_id);
        state.set(SelectorField::Account, model.account_id);
        state.set(SelectorField::Card, model.card_id);
        state.set(SelectorField::Expense, model.expense_id);
        state
    }
}

/// One entry of a dropdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    /// Stored value (entity id)
    pub value: i64,
    /// Displayed text
    pub label: String,
}

/// Ordered id → label mapping shown by a dropdown.
///
/// Ids are unique; when a source repeats an id the first occurrence wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionList {
    options: Vec<SelectOption>,
}

impl OptionList {
    /// Builds a list from reference entries, keeping their order.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = ReferenceEntry>) -> Self {
        let mut seen = HashSet::new();
        let options = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.id))
            .map(|entry| SelectOption {
                value: entry.id,
                label: entry.label,
            })
            .collect();
        Self { options }
    }

    /// Options in display order.
    pub fn iter(&self) -> impl Iterator<Item = &SelectOption> {
        self.options.iter()
    }

    /// Ids in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<i64> {
        self.options.iter().map(|option| option.value).collect()
    }

    /// Labels in display order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.options
            .iter()
            .map(|option| option.label.as_str())
            .collect()
    }

    /// Label for an id, if it is offered.
    #[must_use]
    pub fn label_of(&self, value: i64) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }

    /// Whether an id is offered.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        self.label_of(value).is_some()
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether there are no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Result of a selector change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CascadeUpdate {
    /// Selectors that were emptied, in chain order
    pub cleared: Vec<SelectorField>,
    /// Fresh option list for every emptied selector
    pub options: Vec<(SelectorField, OptionList)>,
}

impl CascadeUpdate {
    /// Option list recomputed for `field`, if it was part of the update.
    #[must_use]
    pub fn options_for(&self, field: SelectorField) -> Option<&OptionList> {
        self.options
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, options)| options)
    }
}

/// An adjacent pair of selections where the child does not belong to the parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainViolation {
    /// Upper selector
    pub parent: SelectorField,
    /// Value chosen there
    pub parent_id: i64,
    /// Lower selector
    pub child: SelectorField,
    /// Value chosen there, not among the parent's children
    pub child_id: i64,
}

/// Computes option lists and resets for one chain over one store.
pub struct CascadeResolver<'a, S: ReferenceStore + ?Sized> {
    chain: CascadeChain,
    store: &'a S,
}

impl<'a, S: ReferenceStore + ?Sized> CascadeResolver<'a, S> {
    /// Creates a resolver.
    pub const fn new(chain: CascadeChain, store: &'a S) -> Self {
        Self { chain, store }
    }

    /// The chain this resolver walks.
    pub const fn chain(&self) -> &CascadeChain {
        &self.chain
    }

    /// Options for `field` given the current selections.
    ///
    /// Lists the parent's children when the parent selector holds the id of an
    /// existing entity. Otherwise (first field, parent empty, parent gone) lists every
    /// entity of the field's kind.
    pub async fn compute_options(
        &self,
        field: SelectorField,
        state: &SelectionState,
    ) -> Result<OptionList> {
        let parent = self
            .chain
            .parent_of(field)
            .and_then(|parent| state.get(parent).map(|id| (parent, id)));

        if let Some((parent, parent_id)) = parent {
            if self.store.find(parent.kind(), parent_id).await?.is_some() {
                let children = self.store.children(parent.kind(), parent_id).await?;
                return Ok(OptionList::from_entries(children));
            }
            debug!(
                parent = parent.key(),
                parent_id, "Parent not found, offering every {:?}", field.kind()
            );
        }

        Ok(OptionList::from_entries(self.store.all(field.kind()).await?))
    }

    /// Applies a selector change: stores the value, empties every later selector in
    /// the chain and recomputes their options.
    ///
    /// Later selectors are emptied even when `value` equals the previous value.
    #[instrument(skip(self, state))]
    pub async fn on_field_changed(
        &self,
        field: SelectorField,
        value: Option<i64>,
        state: &mut SelectionState,
    ) -> Result<CascadeUpdate> {
        state.set(field, value);
        let cleared = self.chain.clear_descendants(field, state);

        let mut options = Vec::with_capacity(cleared.len());
        for &descendant in &cleared {
            options.push((descendant, self.compute_options(descendant, state).await?));
        }

        debug!(
            field = field.key(),
            cleared = cleared.len(),
            "Cascade resolved"
        );
        Ok(CascadeUpdate { cleared, options })
    }

    /// Options for every selector in the chain, as shown when a form first opens.
    pub async fn initial_options(
        &self,
        state: &SelectionState,
    ) -> Result<Vec<(SelectorField, OptionList)>> {
        let mut options = Vec::with_capacity(self.chain.fields().len());
        for &field in self.chain.fields() {
            options.push((field, self.compute_options(field, state).await?));
        }
        Ok(options)
    }

    /// Reports adjacent selections that break the hierarchy.
    ///
    /// Nothing in the crate rejects such records; this is for auditing them.
    pub async fn chain_violations(&self, state: &SelectionState) -> Result<Vec<ChainViolation>> {
        let mut violations = Vec::new();
        for pair in self.chain.fields().windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            let (Some(parent_id), Some(child_id)) = (state.get(parent), state.get(child)) else {
                continue;
            };
            let children = self.store.children(parent.kind(), parent_id).await?;
            if !children.iter().any(|entry| entry.id == child_id) {
                violations.push(ChainViolation {
                    parent,
                    parent_id,
                    child,
                    child_id,
                });
            }
        }
        Ok(violations)
    }
}
