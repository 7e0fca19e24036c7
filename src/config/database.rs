//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Creation uses `IF NOT EXISTS` so the
//! bootstrap binary can run against an existing database file.

use crate::entities::{
    Account, Bank, Card, Company, Department, Expense, ExpenseTransaction,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
    sea_query::TableCreateStatement,
};
use tracing::{debug, info};

/// Fallback database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/expense_admin.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if database_url == DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    debug!("Connecting to {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

fn create_statement<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    statement
}

/// Creates every table, parents before children so foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let statements = [
        create_statement(&schema, Company),
        create_statement(&schema, Department),
        create_statement(&schema, Bank),
        create_statement(&schema, Account),
        create_statement(&schema, Card),
        create_statement(&schema, Expense),
        create_statement(&schema, ExpenseTransaction),
    ];

    for statement in &statements {
        db.execute(builder.build(statement)).await?;
    }

    info!("Database tables ensured ({} tables)", statements.len());
    Ok(())
}
