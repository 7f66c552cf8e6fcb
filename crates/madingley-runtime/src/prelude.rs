//! Madingley Runtime Prelude: convenient imports for common usage.
//!
//! ```rust
//! use madingley_runtime::prelude::*;
//! ```

// Re-export the model loop
pub use crate::model::{MadingleyModel, TimeStepReport};

// Re-export configuration
pub use crate::config::{GridConfig, ModelConfig, OceanCurrents, RealmLayout, SeedingConfig};

// Re-export the grid
pub use crate::grid_impl::CellGrid;

// Re-export the coordinator and its parts
pub use crate::apply::CrossCellApplier;
pub use crate::dispersal::{BasicDispersal, DispersalCounts, DispersalMode, DispersalTrigger, BASIC_DISPERSAL};
pub use crate::ecology::{EcologyCrossGridCell, FormulationRegistry};
pub use crate::tracker::{CellFlow, CrossCellProcessTracker};

// Re-export seeding, metrics, and sessions
pub use crate::metrics::{GridStats, RealmStats};
pub use crate::seeding::{seed_grid, SeedSummary};
pub use crate::session::{load_snapshot, save_snapshot, GridSnapshot, SnapshotMetadata};

// Re-export from core
pub use madingley_core::prelude::*;
