//! Error types for Madingley operations.
//!
//! Provides structured error handling instead of panics.

use crate::types::CellIndex;
use thiserror::Error;

/// Result type for Madingley operations.
pub type Result<T> = std::result::Result<T, MadingleyError>;

/// Errors that can occur while running cross-grid-cell ecology.
#[derive(Debug, Error)]
pub enum MadingleyError {
    /// `run`/`update` was called before `initialize`.
    #[error("cross-grid-cell ecology has not been initialized")]
    NotInitialized,

    /// No formulation is registered under this name.
    #[error("unknown cross-grid-cell formulation: {0}")]
    UnknownFormulation(String),

    /// A formulation with this name is already registered.
    #[error("formulation already registered: {0}")]
    DuplicateFormulation(String),

    /// The cell index lies outside the grid.
    #[error("cell {cell} is outside the grid")]
    CellOutOfBounds { cell: CellIndex },

    /// A staged cross-cell effect refers to a cohort that no longer exists.
    #[error("cohort {index} of functional group {functional_group} not found in cell {cell}")]
    CohortNotFound {
        cell: CellIndex,
        functional_group: usize,
        index: usize,
    },

    /// A functional group index is outside the definitions table.
    #[error("unknown functional group index: {0}")]
    UnknownFunctionalGroup(usize),

    /// A configuration value is invalid.
    #[error("invalid value for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Convenience constructors
impl MadingleyError {
    pub fn unknown_formulation(name: impl Into<String>) -> Self {
        MadingleyError::UnknownFormulation(name.into())
    }

    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MadingleyError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn cohort_not_found(cell: CellIndex, functional_group: usize, index: usize) -> Self {
        MadingleyError::CohortNotFound {
            cell,
            functional_group,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = MadingleyError::unknown_formulation("Fancy dispersal");
        assert_eq!(
            err.to_string(),
            "unknown cross-grid-cell formulation: Fancy dispersal"
        );

        let err = MadingleyError::cohort_not_found(CellIndex::new(1, 2), 3, 4);
        assert!(err.to_string().contains("(1, 2)"));
    }
}
