//! MongoDB database provider
//!
//! Concrete implementation using the official `mongodb` driver.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::Client;
use mongodb::options::{ClientOptions, Credential, ServerAddress};

use crate::config::ConnectionConfig;
use crate::db::provider::DatabaseProvider;
use crate::db::types::{DocumentPage, Namespace, ScriptResult};
use crate::error::{DbError, DbResult};

/// Driver-level timeouts. Kept short: a dead server should surface as a
/// connection failure, not a hung worker.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// MongoDB database provider
pub struct MongoProvider {
    client: Client,
    connected: bool,
}

#[async_trait]
impl DatabaseProvider for MongoProvider {
    /// Connect to a MongoDB server.
    ///
    /// Performs a `ping` round trip so that an unreachable server fails
    /// here rather than on the first real operation.
    async fn connect(config: &ConnectionConfig) -> DbResult<Self> {
        let mut options = ClientOptions::default();
        options.hosts = vec![ServerAddress::Tcp {
            host: config.host.clone(),
            port: Some(config.port),
        }];
        options.app_name = Some("vizmongo".to_string());
        options.connect_timeout = Some(CONNECT_TIMEOUT);
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        if let Some(entry) = config.primary_credential() {
            let mut credential = Credential::default();
            credential.username = Some(entry.user_name.clone());
            credential.password = Some(entry.user_password.clone());
            credential.source = Some(entry.database_name.clone());
            options.credential = Some(credential);
        }

        let client = Client::with_options(options)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            connected: true,
        })
    }

    async fn disconnect(&mut self) -> DbResult<()> {
        self.connected = false;
        // Client is a cheap handle over a shared connection pool; shutdown
        // consumes one, so hand it a clone.
        self.client.clone().shutdown().await;
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        if !self.connected {
            return false;
        }
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .is_ok()
    }

    async fn database_names(&self) -> DbResult<Vec<String>> {
        self.client
            .list_database_names()
            .await
            .map_err(|e| DbError::QueryFailed(e.to_string()))
    }

    async fn collection_names(&self, database: &str) -> DbResult<Vec<String>> {
        self.client
            .database(database)
            .list_collection_names()
            .await
            .map_err(|e| DbError::QueryFailed(e.to_string()))
    }

    async fn execute_query(
        &self,
        namespace: &Namespace,
        take: u64,
        skip: u64,
    ) -> DbResult<DocumentPage> {
        let start = Instant::now();

        let collection = self
            .client
            .database(namespace.database())
            .collection::<Document>(namespace.collection());

        let mut find = collection.find(doc! {});
        if skip > 0 {
            find = find.skip(skip);
        }
        if take > 0 {
            find = find.limit(take as i64);
        }

        let mut cursor = find
            .await
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;

        let mut documents = Vec::new();
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| DbError::QueryFailed(e.to_string()))?
        {
            documents.push(document);
        }

        Ok(DocumentPage {
            namespace: namespace.to_string(),
            documents,
            skip,
            take,
            execution_time: start.elapsed(),
        })
    }

    async fn execute_script(
        &self,
        database: &str,
        script: &str,
        take: u64,
        skip: u64,
    ) -> DbResult<Vec<ScriptResult>> {
        let command = parse_script(script)?;
        let reply = self
            .client
            .database(database)
            .run_command(command)
            .await
            .map_err(|e| DbError::ScriptFailed(e.to_string()))?;
        Ok(vec![reply_to_result(reply, take, skip)])
    }
}

/// Parse script text as an Extended JSON command document.
fn parse_script(script: &str) -> DbResult<Document> {
    let value: serde_json::Value = serde_json::from_str(script)
        .map_err(|e| DbError::ScriptFailed(format!("not a valid command document: {}", e)))?;
    let bson = Bson::try_from(value)
        .map_err(|e| DbError::ScriptFailed(format!("not a valid command document: {}", e)))?;
    match bson {
        Bson::Document(document) => Ok(document),
        _ => Err(DbError::ScriptFailed(
            "script must be a command document".to_string(),
        )),
    }
}

/// Wrap a raw server reply in a [`ScriptResult`].
///
/// Replies that carry a cursor first batch (`find`, `aggregate`, ...)
/// get their documents extracted with `skip`/`take` applied; any other
/// reply passes through with no extracted documents.
fn reply_to_result(reply: Document, take: u64, skip: u64) -> ScriptResult {
    let mut documents: Vec<Document> = Vec::new();
    if let Ok(cursor) = reply.get_document("cursor") {
        if let Ok(batch) = cursor.get_array("firstBatch") {
            documents = batch
                .iter()
                .filter_map(|b| match b {
                    Bson::Document(d) => Some(d.clone()),
                    _ => None,
                })
                .skip(skip as usize)
                .collect();
            if take > 0 {
                documents.truncate(take as usize);
            }
        }
    }
    let text = Bson::Document(reply).into_relaxed_extjson().to_string();
    ScriptResult::new(text, documents)
}
