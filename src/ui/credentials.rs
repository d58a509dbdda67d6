//! Credential table adapter
//!
//! Exposes a connection's ordered credential list through bounded
//! row/column addressing for whatever table widget sits on top. Rows
//! `0..N-1` are real entries; row `N` is a virtual placeholder that
//! becomes a real entry when a database name is written into its first
//! column.

use crate::config::CredentialEntry;

/// Database / User Name / Password
pub const COLUMN_COUNT: usize = 3;

/// Shown in place of stored passwords. Display-layer redaction only,
/// not a security control: `edit_value` returns the literal value.
const PASSWORD_MASK: &str = "******";

/// Table adapter over a credential list
#[derive(Debug, Default)]
pub struct CredentialTable {
    entries: Vec<CredentialEntry>,
}

impl CredentialTable {
    pub fn new(entries: Vec<CredentialEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CredentialEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CredentialEntry> {
        self.entries
    }

    /// Real rows plus the trailing placeholder row
    pub fn row_count(&self) -> usize {
        self.entries.len() + 1
    }

    pub fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    /// Whether `row` is the trailing "new entry" placeholder
    pub fn is_placeholder(&self, row: usize) -> bool {
        row == self.entries.len()
    }

    /// Column header text
    pub fn header(column: usize) -> Option<&'static str> {
        match column {
            0 => Some("Database"),
            1 => Some("User Name"),
            2 => Some("Password"),
            _ => None,
        }
    }

    /// Row header text: the index for real rows, `"*"` for the placeholder
    pub fn row_label(&self, row: usize) -> Option<String> {
        if row < self.entries.len() {
            Some(row.to_string())
        } else if self.is_placeholder(row) {
            Some("*".to_string())
        } else {
            None
        }
    }

    /// Cell value for display. Passwords of real rows are masked; the
    /// placeholder row renders empty.
    pub fn display_value(&self, row: usize, column: usize) -> Option<String> {
        if column >= COLUMN_COUNT || row >= self.row_count() {
            return None;
        }
        if self.is_placeholder(row) {
            return Some(String::new());
        }
        let entry = &self.entries[row];
        let value = match column {
            0 => entry.database_name.clone(),
            1 => entry.user_name.clone(),
            _ => PASSWORD_MASK.to_string(),
        };
        Some(value)
    }

    /// Literal cell value for editing (no masking)
    pub fn edit_value(&self, row: usize, column: usize) -> Option<String> {
        if column >= COLUMN_COUNT || row >= self.row_count() {
            return None;
        }
        if self.is_placeholder(row) {
            return Some(String::new());
        }
        let entry = &self.entries[row];
        let value = match column {
            0 => entry.database_name.clone(),
            1 => entry.user_name.clone(),
            _ => entry.user_password.clone(),
        };
        Some(value)
    }

    /// Write a cell. Returns `false` when the edit is rejected.
    ///
    /// On the placeholder row only a non-empty database name (column 0)
    /// is accepted; it appends a new entry with empty username and
    /// password. Writes to real rows mutate the entry in place.
    pub fn set_value(&mut self, row: usize, column: usize, value: &str) -> bool {
        if column >= COLUMN_COUNT || row >= self.row_count() {
            return false;
        }
        if self.is_placeholder(row) {
            if column != 0 || value.is_empty() {
                return false;
            }
            self.entries.push(CredentialEntry::new(value, "", ""));
            return true;
        }
        let entry = &mut self.entries[row];
        match column {
            0 => entry.database_name = value.to_string(),
            1 => entry.user_name = value.to_string(),
            _ => entry.user_password = value.to_string(),
        }
        true
    }

    /// Remove the entry at `row`, shifting later rows down.
    ///
    /// The placeholder row is not removable; out-of-range rows are
    /// rejected the same way.
    pub fn remove(&mut self, row: usize) -> bool {
        if row < self.entries.len() {
            self.entries.remove(row);
            true
        } else {
            false
        }
    }
}
