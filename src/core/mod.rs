//! Core business logic - framework-agnostic cascade resolution, resource descriptors
//! and persistence services.

/// Account create/view/list/edit/soft-delete
pub mod account;
/// Dependent selector resolution
pub mod cascade;
/// Form, table, filter and route declarations per resource
pub mod descriptor;
/// Expense transaction create/view/filter/edit/soft-delete
pub mod expense_transaction;
/// Reference data lookups behind an injectable store
pub mod lookup;
/// Display masks and date formatting
pub mod mask;
/// Reference data creation and seeding
pub mod reference;
/// Listing rows rendered through table descriptors
pub mod table;
