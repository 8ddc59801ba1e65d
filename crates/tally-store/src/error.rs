//! # Store Error Types
//!
//! Error types for file-backed storage and the order flow.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / bad line / CoreError                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds file + line context                   │
//! │       │                                                                 │
//! │       ├──► ApiError (tally-server) ← JSON {code, message} + status     │
//! │       └──► ConsoleError (tally-console) ← printed message              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use tally_core::CoreError;
use thiserror::Error;

/// Storage and order flow errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A stock or ledger line could not be parsed.
    ///
    /// ## When This Occurs
    /// - Wrong number of comma-separated fields
    /// - Non-numeric price or quantity
    /// - Unknown currency code in the ledger
    #[error("Malformed record in {file}:{line}: {reason}")]
    MalformedRecord {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    /// File read, write or rename failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Business rule failure (not found, stock, currency, validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Config values that parse but make no sense (negative VAT, etc.).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file is not valid TOML for [`TallyConfig`](crate::TallyConfig).
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl StoreError {
    /// Creates a MalformedRecord error. `line` is 1-based.
    pub fn malformed(file: &Path, line: usize, reason: impl Into<String>) -> Self {
        StoreError::MalformedRecord {
            file: file.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
