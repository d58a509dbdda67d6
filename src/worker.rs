//! Worker context
//!
//! A worker owns one database connection and executes every potentially
//! slow operation off the UI context. It never touches UI-owned state:
//! all communication happens by sending Response and Notification
//! messages through the dispatcher.
//!
//! The worker takes its [`ConnectionConfig`] by value at spawn time, so
//! it always operates on an immutable snapshot; an edit in the UI can
//! never be observed half-applied by a running worker.

use std::collections::HashSet;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::ConnectionConfig;
use crate::db::provider::DatabaseProvider;
use crate::db::types::{DocumentPage, Namespace, ScriptResult};
use crate::dispatch::Dispatcher;
use crate::error::DbError;
use crate::message::{CollectionNames, Message, Notification, Request, Response};

/// Producer-side handle to a spawned worker.
#[derive(Clone)]
pub struct WorkerHandle {
    tx: mpsc::UnboundedSender<Request>,
}

impl WorkerHandle {
    /// Hand a request to the worker.
    ///
    /// Returns `false` once the worker has terminated (after `Finalize`,
    /// or if its task died). Mirrors the dispatch channel's best-effort
    /// contract: a request nobody will serve is not an error.
    pub fn submit(&self, request: Request) -> bool {
        self.tx.send(request).is_ok()
    }
}

/// Spawn a worker for `config` on the current tokio runtime.
pub fn spawn<P>(dispatcher: Dispatcher, config: ConnectionConfig) -> WorkerHandle
where
    P: DatabaseProvider + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let worker = Worker::<P> {
        dispatcher,
        config,
        provider: None,
        shells: HashSet::new(),
        rx,
    };
    tokio::spawn(worker.run());
    WorkerHandle { tx }
}

struct Worker<P> {
    dispatcher: Dispatcher,
    config: ConnectionConfig,
    provider: Option<P>,
    /// Databases that already had a script run against them
    shells: HashSet<String>,
    rx: mpsc::UnboundedReceiver<Request>,
}

impl<P: DatabaseProvider> Worker<P> {
    async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            let finalize = matches!(request, Request::Finalize { .. });
            self.handle(request).await;
            if finalize {
                break;
            }
        }
        debug!(address = %self.config.address(), "worker terminated");
    }

    async fn handle(&mut self, request: Request) {
        debug!(kind = request.label(), "handling request");
        let sender = request.sender();
        let response = match request {
            Request::Init { .. } => Response::Init(Ok(())),
            Request::Finalize { .. } => Response::Finalize(self.finalize().await),
            Request::EstablishConnection { .. } => {
                Response::EstablishConnection(self.establish_connection().await)
            }
            Request::LoadDatabaseNames { .. } => {
                Response::DatabaseNames(self.load_database_names().await)
            }
            Request::LoadCollectionNames { database, .. } => {
                Response::CollectionNames(self.load_collection_names(database).await)
            }
            Request::ExecuteQuery {
                namespace,
                take,
                skip,
                ..
            } => Response::Query(self.execute_query(namespace, take, skip).await),
            Request::ExecuteScript {
                database,
                script,
                take,
                skip,
                ..
            } => Response::Script(self.execute_script(database, script, take, skip).await),
        };
        if let Some(error) = response.error() {
            warn!(kind = response.label(), error = %error, "operation failed");
        }
        self.dispatcher.send(sender, Message::Response(response));
    }

    async fn establish_connection(&mut self) -> Result<String, DbError> {
        let address = self.config.address();
        self.notify(Notification::Connecting {
            address: address.clone(),
        });
        match P::connect(&self.config).await {
            Ok(provider) => {
                self.provider = Some(provider);
                self.notify(Notification::ConnectionEstablished {
                    address: address.clone(),
                });
                Ok(address)
            }
            Err(error) => {
                self.notify(Notification::ConnectionFailed {
                    address,
                    message: error.to_string(),
                });
                Err(error)
            }
        }
    }

    async fn load_database_names(&mut self) -> Result<Vec<String>, DbError> {
        let names = self.provider()?.database_names().await?;
        self.notify(Notification::DatabaseListLoaded {
            databases: names.clone(),
        });
        Ok(names)
    }

    async fn load_collection_names(&mut self, database: String) -> Result<CollectionNames, DbError> {
        let names = self.provider()?.collection_names(&database).await?;
        Ok(CollectionNames { database, names })
    }

    async fn execute_query(
        &mut self,
        namespace: Namespace,
        take: u64,
        skip: u64,
    ) -> Result<DocumentPage, DbError> {
        let page = self.provider()?.execute_query(&namespace, take, skip).await?;
        self.notify(Notification::DocumentListLoaded {
            namespace: page.namespace.clone(),
            documents: page.documents.clone(),
        });
        Ok(page)
    }

    async fn execute_script(
        &mut self,
        database: String,
        script: String,
        take: u64,
        skip: u64,
    ) -> Result<Vec<ScriptResult>, DbError> {
        if self.provider.is_none() {
            return Err(DbError::NotConnected);
        }
        if self.shells.insert(database.clone()) {
            self.notify(Notification::ShellOpened {
                database: database.clone(),
                initial_script: script.clone(),
            });
        }
        let results = self
            .provider()?
            .execute_script(&database, &script, take, skip)
            .await?;
        self.notify(Notification::ScriptExecuted {
            results: results.clone(),
        });
        Ok(results)
    }

    async fn finalize(&mut self) -> Result<(), DbError> {
        if let Some(mut provider) = self.provider.take() {
            provider.disconnect().await?;
        }
        Ok(())
    }

    fn provider(&self) -> Result<&P, DbError> {
        self.provider.as_ref().ok_or(DbError::NotConnected)
    }

    fn notify(&self, notification: Notification) {
        self.dispatcher
            .broadcast(Message::Notification(notification));
    }
}
