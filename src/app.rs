//! Application state and message handling
//!
//! Central state machine for the UI context: messages come in, state
//! updates. No I/O happens here: intent methods mint requests stamped
//! with this app's target identity, and the caller decides where they go.

use std::collections::HashMap;

use crate::db::types::{DocumentPage, Namespace, ScriptResult};
use crate::dispatch::TargetId;
use crate::message::{CollectionNames, Message, Notification, Request, Response};

/// Connection lifecycle as seen from the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected { address: String },
    Failed { message: String },
}

/// Status message with severity level
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub level: StatusLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Main application state
pub struct App {
    id: TargetId,

    /// Connection lifecycle state
    pub connection: ConnectionState,

    /// Database names on the connected server
    pub databases: Vec<String>,

    /// Collection names per database, filled on demand
    pub collections: HashMap<String, Vec<String>>,

    /// Last successfully loaded page of documents
    pub documents: Option<DocumentPage>,

    /// Results of the last script execution
    pub script_results: Vec<ScriptResult>,

    /// Whether a query request is in flight
    pub query_running: bool,

    /// Status message to display
    pub status_message: Option<StatusMessage>,
}

impl App {
    /// Create an app bound to the mailbox identity it receives on.
    pub fn new(id: TargetId) -> Self {
        Self {
            id,
            connection: ConnectionState::Disconnected,
            databases: Vec::new(),
            collections: HashMap::new(),
            documents: None,
            script_results: Vec::new(),
            query_running: false,
            status_message: None,
        }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    // ── Intents ──────────────────────────────────────────────

    pub fn init_request(&self) -> Request {
        Request::Init { sender: self.id }
    }

    pub fn finalize_request(&self) -> Request {
        Request::Finalize { sender: self.id }
    }

    pub fn connect_request(&mut self) -> Request {
        self.connection = ConnectionState::Connecting;
        Request::EstablishConnection { sender: self.id }
    }

    pub fn load_databases_request(&self) -> Request {
        Request::LoadDatabaseNames { sender: self.id }
    }

    pub fn load_collections_request(&self, database: &str) -> Request {
        Request::LoadCollectionNames {
            sender: self.id,
            database: database.to_string(),
        }
    }

    pub fn query_request(&mut self, namespace: Namespace, take: u64, skip: u64) -> Request {
        self.query_running = true;
        self.set_status("Executing query...", StatusLevel::Info);
        Request::ExecuteQuery {
            sender: self.id,
            namespace,
            take,
            skip,
        }
    }

    pub fn script_request(&mut self, database: &str, script: &str, take: u64, skip: u64) -> Request {
        self.set_status("Executing script...", StatusLevel::Info);
        Request::ExecuteScript {
            sender: self.id,
            database: database.to_string(),
            script: script.to_string(),
            take,
            skip,
        }
    }

    // ── Message handling ─────────────────────────────────────

    /// Fold one delivered message into the state.
    pub fn handle_message(&mut self, message: Message) {
        match message {
            // The UI context never serves requests
            Message::Request(_) => {}
            Message::Response(response) => self.handle_response(response),
            Message::Notification(notification) => self.handle_notification(notification),
        }
    }

    fn handle_response(&mut self, response: Response) {
        match response {
            Response::Init(Ok(())) => self.set_status("Ready", StatusLevel::Info),
            Response::Init(Err(error)) => {
                self.set_status(format!("Startup failed: {}", error), StatusLevel::Error);
            }
            Response::Finalize(_) => {
                self.connection = ConnectionState::Disconnected;
                self.set_status("Disconnected", StatusLevel::Info);
            }
            Response::EstablishConnection(Ok(address)) => {
                self.set_status(format!("Connected to {}", address), StatusLevel::Success);
                self.connection = ConnectionState::Connected { address };
            }
            Response::EstablishConnection(Err(error)) => {
                self.connection = ConnectionState::Failed {
                    message: error.to_string(),
                };
                self.set_status(error.to_string(), StatusLevel::Error);
            }
            Response::DatabaseNames(Ok(names)) => {
                self.set_status(format!("{} databases", names.len()), StatusLevel::Info);
                self.databases = names;
            }
            Response::DatabaseNames(Err(error)) => {
                self.set_status(
                    format!("Loading databases failed: {}", error),
                    StatusLevel::Error,
                );
            }
            Response::CollectionNames(Ok(CollectionNames { database, names })) => {
                self.set_status(
                    format!("{} collections in {}", names.len(), database),
                    StatusLevel::Info,
                );
                self.collections.insert(database, names);
            }
            Response::CollectionNames(Err(error)) => {
                self.set_status(
                    format!("Loading collections failed: {}", error),
                    StatusLevel::Error,
                );
            }
            Response::Query(Ok(page)) => {
                self.query_running = false;
                self.set_status(
                    format!(
                        "{} documents in {:.1}ms",
                        page.documents.len(),
                        page.execution_time.as_secs_f64() * 1000.0
                    ),
                    StatusLevel::Success,
                );
                self.documents = Some(page);
            }
            Response::Query(Err(error)) => {
                self.query_running = false;
                self.set_status(format!("Query failed: {}", error), StatusLevel::Error);
            }
            Response::Script(Ok(results)) => {
                self.set_status(
                    format!("Script produced {} result(s)", results.len()),
                    StatusLevel::Success,
                );
                self.script_results = results;
            }
            Response::Script(Err(error)) => {
                self.set_status(format!("Script failed: {}", error), StatusLevel::Error);
            }
        }
    }

    fn handle_notification(&mut self, notification: Notification) {
        match notification {
            Notification::Connecting { address } => {
                self.connection = ConnectionState::Connecting;
                self.set_status(format!("Connecting to {}...", address), StatusLevel::Info);
            }
            Notification::ConnectionEstablished { address } => {
                self.connection = ConnectionState::Connected { address };
            }
            Notification::ConnectionFailed { message, .. } => {
                self.set_status(message.clone(), StatusLevel::Error);
                self.connection = ConnectionState::Failed { message };
            }
            Notification::DatabaseListLoaded { databases } => {
                self.databases = databases;
            }
            // The matching response carries the page for the requester;
            // observers only need to know the event happened.
            Notification::DocumentListLoaded { .. } => {}
            Notification::ScriptExecuted { .. } => {}
            Notification::ShellOpened { database, .. } => {
                self.set_status(format!("Shell opened for {}", database), StatusLevel::Info);
            }
            Notification::Alert { text } => {
                self.set_status(text, StatusLevel::Warning);
            }
        }
    }

    fn set_status(&mut self, message: impl Into<String>, level: StatusLevel) {
        self.status_message = Some(StatusMessage {
            message: message.into(),
            level,
        });
    }
}
