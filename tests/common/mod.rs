//! Common test utilities and helpers
//!
//! Shared infrastructure for integration tests: a deterministic
//! in-memory database provider and canned connection configurations.

use std::time::Duration;

use async_trait::async_trait;
use bson::doc;

use vizmongo::config::{ConnectionConfig, CredentialEntry};
use vizmongo::db::DatabaseProvider;
use vizmongo::db::types::{DocumentPage, Namespace, ScriptResult};
use vizmongo::error::{DbError, DbResult};

/// Host name that makes [`MockProvider::connect`] fail
pub const UNREACHABLE_HOST: &str = "unreachable.invalid";

/// Database whose collection listing always times out
pub const FLAKY_DATABASE: &str = "flaky";

/// Deterministic in-memory provider
pub struct MockProvider {
    connected: bool,
}

#[async_trait]
impl DatabaseProvider for MockProvider {
    async fn connect(config: &ConnectionConfig) -> DbResult<Self> {
        if config.host == UNREACHABLE_HOST {
            return Err(DbError::ConnectionFailed("no route to host".to_string()));
        }
        Ok(Self { connected: true })
    }

    async fn disconnect(&mut self) -> DbResult<()> {
        self.connected = false;
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected
    }

    async fn database_names(&self) -> DbResult<Vec<String>> {
        Ok(vec!["admin".to_string(), "inventory".to_string()])
    }

    async fn collection_names(&self, database: &str) -> DbResult<Vec<String>> {
        match database {
            "inventory" => Ok(vec!["products".to_string(), "orders".to_string()]),
            FLAKY_DATABASE => Err(DbError::Timeout),
            other => Err(DbError::QueryFailed(format!("no such database: {}", other))),
        }
    }

    async fn execute_query(
        &self,
        namespace: &Namespace,
        take: u64,
        skip: u64,
    ) -> DbResult<DocumentPage> {
        let all = vec![
            doc! { "_id": 1, "sku": "anvil" },
            doc! { "_id": 2, "sku": "hammer" },
            doc! { "_id": 3, "sku": "tongs" },
        ];
        let mut documents: Vec<_> = all.into_iter().skip(skip as usize).collect();
        if take > 0 {
            documents.truncate(take as usize);
        }
        Ok(DocumentPage {
            namespace: namespace.to_string(),
            documents,
            skip,
            take,
            execution_time: Duration::from_millis(1),
        })
    }

    async fn execute_script(
        &self,
        database: &str,
        script: &str,
        _take: u64,
        _skip: u64,
    ) -> DbResult<Vec<ScriptResult>> {
        if script.trim().is_empty() {
            return Err(DbError::ScriptFailed("empty script".to_string()));
        }
        Ok(vec![ScriptResult::new(
            format!("ok ({})", database),
            vec![doc! { "ok": 1 }],
        )])
    }
}

/// Create a test connection configuration
pub fn test_config() -> ConnectionConfig {
    ConnectionConfig {
        name: "test".to_string(),
        host: "localhost".to_string(),
        port: 27017,
        default_database: Some("inventory".to_string()),
        credentials: vec![CredentialEntry::new("inventory", "app", "hunter2")],
    }
}

/// Configuration whose host the mock provider refuses to reach
pub fn unreachable_config() -> ConnectionConfig {
    ConnectionConfig {
        name: "dead".to_string(),
        host: UNREACHABLE_HOST.to_string(),
        port: 27017,
        default_database: None,
        credentials: Vec::new(),
    }
}
