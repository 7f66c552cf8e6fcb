//! Cross-grid-cell ecology coordinator.
//!
//! Owns the named formulations of every cross-grid-cell process and the
//! applier that commits their staged effects. The model ships one
//! formulation, [`BASIC_DISPERSAL`]; `run` is called once per cell per time
//! step and `update` once per time step after every cell has run.

use crate::apply::CrossCellApplier;
use crate::dispersal::{BasicDispersal, BASIC_DISPERSAL};
use madingley_core::error::{MadingleyError, Result};
use madingley_core::functional_group::FunctionalGroupDefinitions;
use madingley_core::grid::ModelGrid;
use madingley_core::init::ModelInitialisation;
use madingley_core::process::{CrossCellApply, CrossCellProcess, ProcessTracker};
use madingley_core::types::{CellIndex, Month, TimeStep};
use madingley_core::units::TimeStepUnit;
use tracing::info;

/// Formulations keyed by name, in registration order. Keys are unique.
#[derive(Default)]
pub struct FormulationRegistry {
    entries: Vec<(String, Box<dyn CrossCellProcess>)>,
}

impl FormulationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding a single formulation.
    pub fn with_entry(name: impl Into<String>, formulation: Box<dyn CrossCellProcess>) -> Self {
        Self {
            entries: vec![(name.into(), formulation)],
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, formulation: Box<dyn CrossCellProcess>) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(MadingleyError::DuplicateFormulation(name));
        }
        self.entries.push((name, formulation));
        Ok(())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn CrossCellProcess + 'static)> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, formulation)| formulation.as_mut())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for FormulationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormulationRegistry")
            .field("names", &self.names())
            .finish()
    }
}

struct Processes {
    registry: FormulationRegistry,
    applier: Box<dyn CrossCellApply>,
}

/// Coordinates every cross-grid-cell ecological process.
///
/// Must be initialized before `run` or `update`:
///
/// ```
/// use madingley_core::init::ModelInitialisation;
/// use madingley_core::units::TimeStepUnit;
/// use madingley_runtime::ecology::EcologyCrossGridCell;
///
/// let mut ecology = EcologyCrossGridCell::new();
/// assert!(!ecology.is_initialized());
/// ecology.initialize(TimeStepUnit::Month, false, &ModelInitialisation::default());
/// assert_eq!(ecology.formulation_names(), vec!["Basic dispersal"]);
/// ```
#[derive(Default)]
pub struct EcologyCrossGridCell {
    processes: Option<Processes>,
}

impl EcologyCrossGridCell {
    /// An uninitialized coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// A coordinator built from explicit parts, ready to run.
    pub fn with_parts(registry: FormulationRegistry, applier: Box<dyn CrossCellApply>) -> Self {
        Self {
            processes: Some(Processes { registry, applier }),
        }
    }

    /// Build the basic dispersal formulation and the results applier.
    /// Calling this again starts over with fresh instances.
    pub fn initialize(
        &mut self,
        time_step_unit: TimeStepUnit,
        draw_randomly: bool,
        model_initialisation: &ModelInitialisation,
    ) {
        let dispersal = BasicDispersal::new(time_step_unit, draw_randomly, model_initialisation);
        self.processes = Some(Processes {
            registry: FormulationRegistry::with_entry(BASIC_DISPERSAL, Box::new(dispersal)),
            applier: Box::new(CrossCellApplier::new()),
        });
        info!(
            "Cross-grid-cell ecology initialized: {} time steps, {}",
            time_step_unit,
            if draw_randomly { "random draws" } else { "seeded draws" }
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.processes.is_some()
    }

    /// Registered formulation names. Empty before `initialize`.
    pub fn formulation_names(&self) -> Vec<&str> {
        self.processes
            .as_ref()
            .map(|p| p.registry.names())
            .unwrap_or_default()
    }

    pub fn registry(&self) -> Option<&FormulationRegistry> {
        self.processes.as_ref().map(|p| &p.registry)
    }

    /// Run basic dispersal for one cell.
    pub fn run(
        &mut self,
        cell: CellIndex,
        grid: &mut dyn ModelGrid,
        dispersal_only: bool,
        cohort_definitions: &FunctionalGroupDefinitions,
        stock_definitions: &FunctionalGroupDefinitions,
        current_month: Month,
    ) -> Result<()> {
        self.run_formulation(
            BASIC_DISPERSAL,
            cell,
            grid,
            dispersal_only,
            cohort_definitions,
            stock_definitions,
            current_month,
        )
    }

    /// Run a named formulation for one cell.
    #[allow(clippy::too_many_arguments)]
    pub fn run_formulation(
        &mut self,
        name: &str,
        cell: CellIndex,
        grid: &mut dyn ModelGrid,
        dispersal_only: bool,
        cohort_definitions: &FunctionalGroupDefinitions,
        stock_definitions: &FunctionalGroupDefinitions,
        current_month: Month,
    ) -> Result<()> {
        let processes = self.processes.as_mut().ok_or(MadingleyError::NotInitialized)?;
        let formulation = processes
            .registry
            .get_mut(name)
            .ok_or_else(|| MadingleyError::unknown_formulation(name))?;
        formulation.run(
            cell,
            grid,
            dispersal_only,
            cohort_definitions,
            stock_definitions,
            current_month,
        )
    }

    /// Commit everything staged this time step. Returns the number of
    /// dispersals committed by this call.
    pub fn update(
        &mut self,
        grid: &mut dyn ModelGrid,
        tracker: &mut dyn ProcessTracker,
        current_time_step: TimeStep,
    ) -> Result<u64> {
        let processes = self.processes.as_mut().ok_or(MadingleyError::NotInitialized)?;
        processes.applier.apply(grid, tracker, current_time_step)
    }
}

impl std::fmt::Debug for EcologyCrossGridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcologyCrossGridCell")
            .field("registry", &self.registry())
            .finish()
    }
}
