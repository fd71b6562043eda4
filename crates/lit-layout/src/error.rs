//! Error types for layout computation.

use thiserror::Error;

/// Errors from layout computation.
///
/// Only configuration problems can fail a layout; visibility bookkeeping is
/// total.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LayoutError {
    /// A declared component name is not in the registry.
    #[error("unknown module '{name}': not found in the module registry")]
    UnknownModule { name: String },

    /// Two declared tabs share a name.
    #[error("duplicate tab '{name}' in declared layout")]
    DuplicateTab { name: String },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
