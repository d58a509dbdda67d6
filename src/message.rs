//! Message catalog
//!
//! The closed set of typed messages exchanged between the UI context and
//! worker contexts: requests flow UI → worker, responses answer exactly
//! one request, notifications are broadcast to every registered target.
//!
//! Response payloads are wrapped in `Result<_, DbError>`: a response
//! either carries data or a populated error, never both, and the payload
//! of a failed operation cannot be read at all. `is_error()` and
//! `error_message()` give a uniform view across all response kinds.

use bson::Document;

use crate::db::types::{DocumentPage, Namespace, ScriptResult};
use crate::dispatch::TargetId;
use crate::error::DbError;

/// A request from a UI-bound target to a worker.
///
/// Every variant carries the identity of the originating target so the
/// worker can route the response back. `take`/`skip` are unsigned by
/// construction; `take == 0` means "no explicit limit".
#[derive(Debug, Clone)]
pub enum Request {
    /// Worker readiness handshake
    Init { sender: TargetId },
    /// Disconnect and stop the worker
    Finalize { sender: TargetId },
    /// Connect using the worker's configuration snapshot
    EstablishConnection { sender: TargetId },
    /// List database names on the server
    LoadDatabaseNames { sender: TargetId },
    /// List collection names in one database
    LoadCollectionNames { sender: TargetId, database: String },
    /// Fetch a page of documents from a collection
    ExecuteQuery {
        sender: TargetId,
        namespace: Namespace,
        take: u64,
        skip: u64,
    },
    /// Run a script against a database
    ExecuteScript {
        sender: TargetId,
        database: String,
        script: String,
        take: u64,
        skip: u64,
    },
}

impl Request {
    /// Identity of the target this request originated from
    pub fn sender(&self) -> TargetId {
        match self {
            Request::Init { sender }
            | Request::Finalize { sender }
            | Request::EstablishConnection { sender }
            | Request::LoadDatabaseNames { sender }
            | Request::LoadCollectionNames { sender, .. }
            | Request::ExecuteQuery { sender, .. }
            | Request::ExecuteScript { sender, .. } => *sender,
        }
    }

    /// Human-readable type label
    pub fn label(&self) -> &'static str {
        match self {
            Request::Init { .. } => "InitRequest",
            Request::Finalize { .. } => "FinalizeRequest",
            Request::EstablishConnection { .. } => "EstablishConnectionRequest",
            Request::LoadDatabaseNames { .. } => "LoadDatabaseNamesRequest",
            Request::LoadCollectionNames { .. } => "LoadCollectionNamesRequest",
            Request::ExecuteQuery { .. } => "ExecuteQueryRequest",
            Request::ExecuteScript { .. } => "ExecuteScriptRequest",
        }
    }
}

/// Collection listing payload: names are meaningless without knowing
/// which database they came from.
#[derive(Debug, Clone)]
pub struct CollectionNames {
    pub database: String,
    pub names: Vec<String>,
}

/// A worker's answer to exactly one request.
#[derive(Debug, Clone)]
pub enum Response {
    Init(Result<(), DbError>),
    Finalize(Result<(), DbError>),
    /// Success payload is the connected server address ("host:port")
    EstablishConnection(Result<String, DbError>),
    DatabaseNames(Result<Vec<String>, DbError>),
    CollectionNames(Result<CollectionNames, DbError>),
    Query(Result<DocumentPage, DbError>),
    Script(Result<Vec<ScriptResult>, DbError>),
}

impl Response {
    /// The error envelope, uniform across all response kinds
    pub fn error(&self) -> Option<&DbError> {
        match self {
            Response::Init(r) | Response::Finalize(r) => r.as_ref().err(),
            Response::EstablishConnection(r) => r.as_ref().err(),
            Response::DatabaseNames(r) => r.as_ref().err(),
            Response::CollectionNames(r) => r.as_ref().err(),
            Response::Query(r) => r.as_ref().err(),
            Response::Script(r) => r.as_ref().err(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Human-readable failure message; `Some` exactly when `is_error()`
    pub fn error_message(&self) -> Option<String> {
        self.error().map(|e| e.to_string())
    }

    /// Human-readable type label
    pub fn label(&self) -> &'static str {
        match self {
            Response::Init(_) => "InitResponse",
            Response::Finalize(_) => "FinalizeResponse",
            Response::EstablishConnection(_) => "EstablishConnectionResponse",
            Response::DatabaseNames(_) => "LoadDatabaseNamesResponse",
            Response::CollectionNames(_) => "LoadCollectionNamesResponse",
            Response::Query(_) => "ExecuteQueryResponse",
            Response::Script(_) => "ExecuteScriptResponse",
        }
    }
}

/// Unsolicited event, broadcast to every registered target.
#[derive(Debug, Clone)]
pub enum Notification {
    /// A connection attempt has started
    Connecting { address: String },
    ConnectionEstablished { address: String },
    ConnectionFailed { address: String, message: String },
    /// First script is about to run against `database`
    ShellOpened {
        database: String,
        initial_script: String,
    },
    DatabaseListLoaded { databases: Vec<String> },
    DocumentListLoaded {
        namespace: String,
        documents: Vec<Document>,
    },
    ScriptExecuted { results: Vec<ScriptResult> },
    /// Free-form diagnostic for the status line
    Alert { text: String },
}

impl Notification {
    /// Human-readable type label
    pub fn label(&self) -> &'static str {
        match self {
            Notification::Connecting { .. } => "ConnectingEvent",
            Notification::ConnectionEstablished { .. } => "ConnectionEstablishedEvent",
            Notification::ConnectionFailed { .. } => "ConnectionFailedEvent",
            Notification::ShellOpened { .. } => "ShellOpenedEvent",
            Notification::DatabaseListLoaded { .. } => "DatabaseListLoadedEvent",
            Notification::DocumentListLoaded { .. } => "DocumentListLoadedEvent",
            Notification::ScriptExecuted { .. } => "ScriptExecutedEvent",
            Notification::Alert { .. } => "AlertEvent",
        }
    }
}

/// Anything that can travel through the dispatch channel.
#[derive(Debug, Clone)]
pub enum Message {
    Request(Request),
    Response(Response),
    Notification(Notification),
}

impl Message {
    /// The discriminator label of the wrapped message
    pub fn label(&self) -> &'static str {
        match self {
            Message::Request(request) => request.label(),
            Message::Response(response) => response.label(),
            Message::Notification(notification) => notification.label(),
        }
    }
}
