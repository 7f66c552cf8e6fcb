//! Madingley Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use madingley_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{CellIndex, CohortId, Direction, Month, Realm, TimeStep};

pub use crate::cohort::Cohort;
pub use crate::stock::Stock;

pub use crate::functional_group::{FunctionalGroup, FunctionalGroupDefinitions};

pub use crate::grid::{GridCell, ModelGrid, PendingDispersal};

pub use crate::process::{CrossCellApply, CrossCellProcess, DispersalRecord, ProcessTracker};

pub use crate::init::{DispersalParameters, ModelInitialisation};

pub use crate::units::TimeStepUnit;

// Re-export error types
pub use crate::error::{MadingleyError, Result};
