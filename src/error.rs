//! Error types for vizmongo
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors with clear error chains.

use std::io;

/// Main error type for the vizmongo application
#[derive(Debug, thiserror::Error)]
pub enum VizmongoError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Database operation errors
///
/// `Clone` because operation failures travel inside response messages,
/// and broadcast delivery clones the whole message per target.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DbError {
    /// Failed to establish connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Script execution failed
    #[error("Script execution failed: {0}")]
    ScriptFailed(String),

    /// Malformed "database.collection" namespace
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    /// Not connected to a server
    #[error("Not connected to a server")]
    NotConnected,

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Home directory not found
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Config file not found
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Failed to write a configuration file
    #[error("Failed to write configuration: {0}")]
    WriteFailed(String),

    /// Connection profile not found
    #[error("Connection profile '{0}' not found")]
    ProfileNotFound(String),
}

/// Specialized Result type for vizmongo operations
pub type Result<T> = std::result::Result<T, VizmongoError>;

/// Specialized Result type for database operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
