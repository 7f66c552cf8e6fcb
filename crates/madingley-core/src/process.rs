//! Cross-grid-cell process seams.
//!
//! A cross-grid-cell process (dispersal is the one the model ships) runs in
//! two phases:
//! 1. **Stage**: a [`CrossCellProcess`] formulation inspects one cell and
//!    stages moves on it, without touching any other cell
//! 2. **Commit**: a [`CrossCellApply`] drains every staged move once per
//!    time step and rewrites the grid, reporting each move to a
//!    [`ProcessTracker`]
//!
//! Staging first means a cohort can cross at most one boundary per step, no
//! matter in which order cells are visited.

use crate::error::Result;
use crate::functional_group::FunctionalGroupDefinitions;
use crate::grid::ModelGrid;
use crate::types::{CellIndex, CohortId, Direction, Month, TimeStep};
use serde::{Deserialize, Serialize};

/// A named formulation of a cross-grid-cell ecological process.
pub trait CrossCellProcess {
    /// Registry name of this formulation.
    fn name(&self) -> &str;

    /// Stage this process's effects for one cell.
    ///
    /// `dispersal_only` is set when within-cell ecology is switched off and
    /// only dispersal runs.
    fn run(
        &mut self,
        cell: CellIndex,
        grid: &mut dyn ModelGrid,
        dispersal_only: bool,
        cohort_definitions: &FunctionalGroupDefinitions,
        stock_definitions: &FunctionalGroupDefinitions,
        current_month: Month,
    ) -> Result<()>;
}

/// Commits staged cross-cell effects into the grid.
pub trait CrossCellApply {
    /// Apply everything staged across the grid. Returns the number of
    /// dispersal events committed.
    fn apply(
        &mut self,
        grid: &mut dyn ModelGrid,
        tracker: &mut dyn ProcessTracker,
        current_time_step: TimeStep,
    ) -> Result<u64>;
}

/// One committed cohort move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersalRecord {
    pub time_step: TimeStep,
    pub origin: CellIndex,
    pub destination: CellIndex,
    pub exit: Direction,
    pub entry: Direction,
    pub functional_group: usize,
    pub cohort_id: Option<CohortId>,
    pub abundance: f64,
    pub individual_body_mass: f64,
    pub biomass: f64,
}

/// Audits cross-cell effects as they are committed.
pub trait ProcessTracker {
    /// Whether records should be produced at all.
    fn is_tracking(&self) -> bool;

    fn record_dispersal(&mut self, record: &DispersalRecord);
}
