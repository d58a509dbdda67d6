//! View adapters
//!
//! Data-provider side of the display layer: plain structures exposing
//! row/column addressed access for whatever widget toolkit sits on top.
//! No rendering happens here.

pub mod credentials;

pub use credentials::CredentialTable;
