//! Database abstraction layer
//!
//! This module provides a trait-based abstraction over database operations,
//! allowing for multiple driver backends and easy testing with mocks.

pub mod mongo;
pub mod provider;
pub mod types;

// Re-export main types
pub use provider::DatabaseProvider;
pub use types::{DocumentPage, Namespace, ScriptResult};
