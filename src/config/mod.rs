/// Database configuration and connection management
pub mod database;

/// Reference-data seed configuration loaded from config.toml
pub mod reference;
