//! Unified error type for the admin services.
//!
//! Missing cascade parents are not errors (they degrade to unfiltered option lists),
//! so everything here is either an infrastructure failure or a rejected form input.

use thiserror::Error;

/// Errors produced by persistence, configuration and form validation.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying `SeaORM` failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration file or environment problem.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A record addressed by id does not exist or has been soft-deleted.
    #[error("{resource} #{id} not found")]
    RecordNotFound {
        /// Resource slug (e.g. `accounts`)
        resource: &'static str,
        /// Requested id
        id: i64,
    },

    /// A form value violated one of its field constraints.
    #[error("Invalid value for {field}: {message}")]
    Validation {
        /// Form key of the offending field
        field: String,
        /// Human-readable constraint message
        message: String,
    },

    /// An amount that is not finite or is negative.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A form key that no selector or descriptor knows about.
    #[error("Unknown field: {key}")]
    UnknownField {
        /// The unrecognized key
        key: String,
    },

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
