//! Database type definitions
//!
//! Core data structures for addressing collections and representing
//! query and script results.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bson::{Bson, Document};

use crate::error::DbError;

/// Fully qualified collection address, e.g. `"inventory.products"`.
///
/// The split happens at the *first* dot: MongoDB collection names may
/// themselves contain dots (`db.system.indexes` is the collection
/// `system.indexes` in database `db`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    database: String,
    collection: String,
}

impl Namespace {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

impl FromStr for Namespace {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (database, collection) = s
            .split_once('.')
            .ok_or_else(|| DbError::InvalidNamespace(s.to_string()))?;
        if database.is_empty() || collection.is_empty() {
            return Err(DbError::InvalidNamespace(s.to_string()));
        }
        Ok(Self {
            database: database.to_string(),
            collection: collection.to_string(),
        })
    }
}

/// One bounded page of query results
#[derive(Debug, Clone)]
pub struct DocumentPage {
    /// Namespace the page was read from ("database.collection")
    pub namespace: String,
    /// Result documents, in cursor order
    pub documents: Vec<Document>,
    /// Number of leading documents skipped
    pub skip: u64,
    /// Page size limit that was applied (0 = no explicit limit)
    pub take: u64,
    /// Server round-trip time
    pub execution_time: Duration,
}

/// Result record of one script execution.
///
/// The server reply is kept opaque: `text` is its relaxed Extended JSON
/// rendering, `documents` holds whatever result documents could be
/// extracted from it (empty when the reply carried none).
#[derive(Debug, Clone)]
pub struct ScriptResult {
    pub text: String,
    pub documents: Vec<Document>,
}

impl ScriptResult {
    pub fn new(text: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            text: text.into(),
            documents,
        }
    }
}

/// Render a document as one line of relaxed Extended JSON, truncated to
/// `max_len` characters.
pub fn document_summary(document: &Document, max_len: usize) -> String {
    let full = Bson::Document(document.clone())
        .into_relaxed_extjson()
        .to_string();
    if full.chars().count() > max_len {
        let cut: String = full.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        full
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_namespace_parse() {
        let ns: Namespace = "inventory.products".parse().unwrap();
        assert_eq!(ns.database(), "inventory");
        assert_eq!(ns.collection(), "products");
        assert_eq!(ns.to_string(), "inventory.products");
    }

    #[test]
    fn test_namespace_keeps_dotted_collection() {
        let ns: Namespace = "db.system.indexes".parse().unwrap();
        assert_eq!(ns.database(), "db");
        assert_eq!(ns.collection(), "system.indexes");
    }

    #[test]
    fn test_namespace_rejects_missing_dot() {
        let result = "products".parse::<Namespace>();
        assert!(matches!(result, Err(DbError::InvalidNamespace(_))));
    }

    #[test]
    fn test_namespace_rejects_empty_parts() {
        assert!(".products".parse::<Namespace>().is_err());
        assert!("db.".parse::<Namespace>().is_err());
    }

    #[test]
    fn test_document_summary_truncates() {
        let doc = doc! { "name": "a very long product description indeed" };
        let summary = document_summary(&doc, 20);
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= 20);
    }

    #[test]
    fn test_document_summary_short_doc_untouched() {
        let doc = doc! { "a": 1 };
        assert_eq!(document_summary(&doc, 100), r#"{"a":1}"#);
    }
}
