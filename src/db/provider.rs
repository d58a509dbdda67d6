//! Database provider trait
//!
//! Defines the interface the worker context programs against.
//! This abstraction allows for:
//! - Multiple driver backends
//! - Easy testing with mock implementations
//! - Consistent error handling

use async_trait::async_trait;

use crate::config::ConnectionConfig;
use crate::db::types::{DocumentPage, Namespace, ScriptResult};
use crate::error::DbResult;

/// Main database provider trait
///
/// All database implementations must implement this trait to provide
/// a consistent interface for the worker context.
#[async_trait]
pub trait DatabaseProvider: Send + Sync {
    /// Establish connection to the server
    ///
    /// # Errors
    /// Returns `DbError::ConnectionFailed` if connection cannot be established
    async fn connect(config: &ConnectionConfig) -> DbResult<Self>
    where
        Self: Sized;

    /// Close the connection
    ///
    /// # Errors
    /// Returns error if disconnection fails (though this is rare)
    async fn disconnect(&mut self) -> DbResult<()>;

    /// Check if the connection is still alive
    ///
    /// This should be a lightweight check (e.g., ping)
    async fn is_connected(&self) -> bool;

    /// List the names of all databases on the server
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` if the listing fails
    async fn database_names(&self) -> DbResult<Vec<String>>;

    /// List the names of all collections in a database
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` if the listing fails
    async fn collection_names(&self, database: &str) -> DbResult<Vec<String>>;

    /// Fetch one page of documents from a collection
    ///
    /// # Arguments
    /// * `namespace` - The collection to read ("database.collection")
    /// * `take` - Page size limit; 0 means no explicit limit
    /// * `skip` - Number of leading documents to skip
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` if the read fails
    async fn execute_query(
        &self,
        namespace: &Namespace,
        take: u64,
        skip: u64,
    ) -> DbResult<DocumentPage>;

    /// Execute a script against a database and return its result records
    ///
    /// # Errors
    /// Returns `DbError::ScriptFailed` if the script is malformed or the
    /// server rejects it
    async fn execute_script(
        &self,
        database: &str,
        script: &str,
        take: u64,
        skip: u64,
    ) -> DbResult<Vec<ScriptResult>>;
}
