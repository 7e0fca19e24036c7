//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the reference hierarchy and the two edited record types.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod bank;
pub mod card;
pub mod company;
pub mod department;
pub mod expense;
pub mod expense_transaction;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use bank::{Column as BankColumn, Entity as Bank, Model as BankModel};
pub use card::{Column as CardColumn, Entity as Card, Model as CardModel};
pub use company::{Column as CompanyColumn, Entity as Company, Model as CompanyModel};
pub use department::{
    Column as DepartmentColumn, Entity as Department, Model as DepartmentModel,
};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use expense_transaction::{
    Column as ExpenseTransactionColumn, Entity as ExpenseTransaction,
    Model as ExpenseTransactionModel,
};
