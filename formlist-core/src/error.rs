//! Error types for formlist operations.
//!
//! The editor core itself never fails — unresolvable positions and missing
//! entries degrade to appends and no-ops by contract. Errors exist only at the
//! store boundary.

use thiserror::Error;

/// Configuration store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Type not found: {type_name} in table {table}")]
    TypeNotFound { table: String, type_name: String },

    #[error("Palette not found: {palette} in table {table}")]
    PaletteNotFound { table: String, palette: String },
}

/// Master error type for formlist operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormListError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for formlist operations.
pub type FormListResult<T> = Result<T, FormListError>;

// =============================================================================
// TESTS
// =============================================================================
