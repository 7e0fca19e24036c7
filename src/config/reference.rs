//! Reference-data configuration loading from config.toml
//!
//! Companies, departments, banks, accounts and cards are maintained outside the admin
//! screens. This module reads a nested TOML description of that hierarchy (plus the
//! list of expense categories) so a fresh database can be seeded on first run.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default location of the seed file
pub const DEFAULT_REFERENCE_CONFIG: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct ReferenceConfig {
    /// Company tree to seed
    #[serde(default)]
    pub companies: Vec<CompanyConfig>,
    /// Expense category names to seed
    #[serde(default)]
    pub expenses: Vec<String>,
}

/// One company and its departments
#[derive(Debug, Deserialize, Clone)]
pub struct CompanyConfig {
    /// Company name
    pub name: String,
    /// Departments owned by the company
    #[serde(default)]
    pub departments: Vec<DepartmentConfig>,
}

/// One department and its banks
#[derive(Debug, Deserialize, Clone)]
pub struct DepartmentConfig {
    /// Department name
    pub name: String,
    /// Banks used by the department
    #[serde(default)]
    pub banks: Vec<BankConfig>,
}

/// One bank and its accounts
#[derive(Debug, Deserialize, Clone)]
pub struct BankConfig {
    /// Bank name
    pub name: String,
    /// Accounts held at the bank
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// One account and the cards issued on it
#[derive(Debug, Deserialize, Clone)]
pub struct AccountConfig {
    /// Account display name
    pub name: String,
    /// Optional account type (e.g. "Checking")
    #[serde(default)]
    pub account_type: Option<String>,
    /// Optional currency code
    #[serde(default)]
    pub currency: Option<String>,
    /// Card names issued on the account
    #[serde(default)]
    pub cards: Vec<String>,
}

/// Loads reference configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ReferenceConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses reference configuration from TOML text
pub fn parse_config(contents: &str) -> Result<ReferenceConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Path of the seed file, from `REFERENCE_CONFIG` or the default location
#[must_use]
pub fn get_config_path() -> String {
    std::env::var("REFERENCE_CONFIG").unwrap_or_else(|_| DEFAULT_REFERENCE_CONFIG.to_string())
}
