//! Configuration management
//!
//! Handles loading connection profiles and user settings.

pub mod connections;
pub mod settings;

pub use connections::{
    ConnectionConfig, CredentialEntry, find_connection, load_connections, save_connections,
};
pub use settings::{Settings, load_settings};
