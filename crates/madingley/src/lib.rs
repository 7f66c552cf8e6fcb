//! # Madingley
//!
//! Cross-grid-cell ecology for Madingley-style general ecosystem models.
//!
//! Animals live on a latitude/longitude grid as **cohorts**, plants as
//! **stocks**. Every time step, each cell hands its cohorts to the
//! cross-grid-cell coordinator, which runs the registered dispersal
//! formulation and stages moves; one update per step then commits them.
//!
//! ## Quick Start
//!
//! ```rust
//! use madingley::prelude::*;
//!
//! // Build and seed a model with the default 6 x 8 coastal grid
//! let mut model = MadingleyModel::from_config(ModelConfig::default()).unwrap();
//! let cohorts = model.grid().total_cohorts();
//!
//! // Run a year of monthly steps
//! let reports = model.run(12).unwrap();
//!
//! // Dispersal moves cohorts; it never creates or destroys them
//! assert_eq!(reports.len(), 12);
//! assert_eq!(model.grid().total_cohorts(), cohorts);
//! ```
//!
//! ## Architecture
//!
//! - [`madingley_core`] - Stock, cohort, functional groups, grid and process traits
//! - [`madingley_runtime`] - Grid implementation, dispersal, coordinator, model loop
//!
//! ## Key Concepts
//!
//! ### Dispersal formulations
//!
//! | Formulation | Who | How far |
//! |-------------|-----|---------|
//! | Advective | Marine plankton | Ocean currents plus eddy diffusion |
//! | Responsive | Starving or sparse cohorts | Body-mass speed, random heading |
//! | Diffusive | Everyone else | Body-mass speed, random heading |
//!
//! ### Two-phase steps
//!
//! `run` only stages moves on the source cell; `update` commits all of them
//! at once, so a cohort crosses at most one cell boundary per visit no
//! matter which order cells run in.

// Re-export all subcrates
pub use madingley_core as core;
pub use madingley_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use madingley::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use madingley_core::types::{CellIndex, CohortId, Direction, Month, Realm, TimeStep};
    pub use madingley_core::cohort::Cohort;
    pub use madingley_core::stock::Stock;
    pub use madingley_core::functional_group::{FunctionalGroup, FunctionalGroupDefinitions};
    pub use madingley_core::init::{DispersalParameters, ModelInitialisation};
    pub use madingley_core::units::TimeStepUnit;

    // Core traits
    pub use madingley_core::grid::{GridCell, ModelGrid};
    pub use madingley_core::process::{CrossCellApply, CrossCellProcess, DispersalRecord, ProcessTracker};

    // Error types
    pub use madingley_core::error::{MadingleyError, Result};

    // Runtime
    pub use madingley_runtime::config::{GridConfig, ModelConfig, RealmLayout};
    pub use madingley_runtime::ecology::{EcologyCrossGridCell, FormulationRegistry};
    pub use madingley_runtime::dispersal::{BasicDispersal, BASIC_DISPERSAL};
    pub use madingley_runtime::grid_impl::CellGrid;
    pub use madingley_runtime::model::{MadingleyModel, TimeStepReport};
    pub use madingley_runtime::metrics::GridStats;
    pub use madingley_runtime::tracker::CrossCellProcessTracker;
    pub use madingley_runtime::session::{load_snapshot, save_snapshot, GridSnapshot};
}
