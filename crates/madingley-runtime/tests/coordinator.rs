//! Cross-grid-cell coordinator contract tests.
//!
//! Recording doubles stand in for the registered formulation and the
//! results applier, so these tests check forwarding only.

use madingley_runtime::prelude::*;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
struct RunCall {
    cell: CellIndex,
    grid_cells: usize,
    dispersal_only: bool,
    cohort_definitions: usize,
    stock_definitions: usize,
    current_month: Month,
}

struct RecordingProcess {
    calls: Arc<Mutex<Vec<RunCall>>>,
}

impl CrossCellProcess for RecordingProcess {
    fn name(&self) -> &str {
        BASIC_DISPERSAL
    }

    fn run(
        &mut self,
        cell: CellIndex,
        grid: &mut dyn ModelGrid,
        dispersal_only: bool,
        cohort_definitions: &FunctionalGroupDefinitions,
        stock_definitions: &FunctionalGroupDefinitions,
        current_month: Month,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(RunCall {
            cell,
            grid_cells: grid.num_lat_cells() * grid.num_lon_cells(),
            dispersal_only,
            cohort_definitions: cohort_definitions as *const _ as usize,
            stock_definitions: stock_definitions as *const _ as usize,
            current_month,
        });
        Ok(())
    }
}

struct CountingApplier {
    count: u64,
    calls: Arc<Mutex<Vec<(TimeStep, bool)>>>,
}

impl CrossCellApply for CountingApplier {
    fn apply(
        &mut self,
        _grid: &mut dyn ModelGrid,
        tracker: &mut dyn ProcessTracker,
        current_time_step: TimeStep,
    ) -> Result<u64> {
        self.calls
            .lock()
            .unwrap()
            .push((current_time_step, tracker.is_tracking()));
        Ok(self.count)
    }
}

fn small_grid() -> CellGrid {
    let config = GridConfig {
        num_lat_cells: 2,
        num_lon_cells: 3,
        ..Default::default()
    };
    CellGrid::new(&config, 7, 3).unwrap()
}

#[test]
fn initialize_registers_only_basic_dispersal() {
    let mut ecology = EcologyCrossGridCell::new();
    ecology.initialize(TimeStepUnit::Month, false, &ModelInitialisation::default());

    assert!(ecology.is_initialized());
    assert_eq!(ecology.formulation_names(), vec!["Basic dispersal"]);
    assert_eq!(ecology.registry().map(FormulationRegistry::len), Some(1));
}

#[test]
fn run_forwards_every_argument() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = FormulationRegistry::with_entry(
        BASIC_DISPERSAL,
        Box::new(RecordingProcess {
            calls: Arc::clone(&calls),
        }),
    );
    let mut ecology = EcologyCrossGridCell::with_parts(
        registry,
        Box::new(CountingApplier {
            count: 0,
            calls: Arc::new(Mutex::new(Vec::new())),
        }),
    );

    let mut grid = small_grid();
    let cohorts = FunctionalGroupDefinitions::default_cohorts();
    let stocks = FunctionalGroupDefinitions::default_stocks();
    ecology
        .run(CellIndex::new(1, 2), &mut grid, true, &cohorts, &stocks, 7)
        .unwrap();
    ecology
        .run(CellIndex::new(0, 0), &mut grid, false, &cohorts, &stocks, 11)
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        RunCall {
            cell: CellIndex::new(1, 2),
            grid_cells: 6,
            dispersal_only: true,
            cohort_definitions: &cohorts as *const _ as usize,
            stock_definitions: &stocks as *const _ as usize,
            current_month: 7,
        }
    );
    assert_eq!(calls[1].cell, CellIndex::new(0, 0));
    assert!(!calls[1].dispersal_only);
    assert_eq!(calls[1].current_month, 11);
}

#[test]
fn update_returns_the_applier_count() {
    let applied = Arc::new(Mutex::new(Vec::new()));
    let mut ecology = EcologyCrossGridCell::with_parts(
        FormulationRegistry::new(),
        Box::new(CountingApplier {
            count: 5,
            calls: Arc::clone(&applied),
        }),
    );

    let mut grid = small_grid();
    let mut tracker = CrossCellProcessTracker::new(true);
    let mut running_total = 0;
    running_total += ecology.update(&mut grid, &mut tracker, 42).unwrap();
    running_total += ecology.update(&mut grid, &mut tracker, 43).unwrap();

    assert_eq!(running_total, 10);
    assert_eq!(*applied.lock().unwrap(), vec![(42, true), (43, true)]);
}

#[test]
fn calls_before_initialize_fail() {
    let mut ecology = EcologyCrossGridCell::new();
    let mut grid = small_grid();
    let defs = FunctionalGroupDefinitions::default_cohorts();

    let err = ecology
        .run(CellIndex::new(0, 0), &mut grid, false, &defs, &defs, 0)
        .unwrap_err();
    assert!(matches!(err, MadingleyError::NotInitialized));

    let mut tracker = CrossCellProcessTracker::new(false);
    let err = ecology.update(&mut grid, &mut tracker, 0).unwrap_err();
    assert!(matches!(err, MadingleyError::NotInitialized));
}

#[test]
fn real_run_then_update_commits_what_was_staged() {
    let mut ecology = EcologyCrossGridCell::new();
    ecology.initialize(TimeStepUnit::Month, false, &ModelInitialisation::default());

    let config = GridConfig {
        num_lat_cells: 3,
        num_lon_cells: 3,
        bottom_latitude: -1.5,
        realm_layout: RealmLayout::AllTerrestrial,
        ..Default::default()
    };
    let mut grid = CellGrid::new(&config, 7, 3).unwrap();
    let centre = CellIndex::new(1, 1);
    for i in 0..40 {
        grid.cell_mut(centre)
            .unwrap()
            .add_cohort(Cohort::new(0, 0, 5.0e6, 5.0e6, 1.0, CohortId(i)));
    }

    let defs = FunctionalGroupDefinitions::default_cohorts();
    let stocks = FunctionalGroupDefinitions::default_stocks();
    for cell in grid.cell_indices() {
        ecology.run(cell, &mut grid, false, &defs, &stocks, 0).unwrap();
    }
    let staged = grid.cell(centre).unwrap().pending_dispersals().len() as u64;

    let mut tracker = CrossCellProcessTracker::new(true);
    let moved = ecology.update(&mut grid, &mut tracker, 0).unwrap();

    assert_eq!(moved, staged);
    assert_eq!(grid.total_cohorts(), 40);
    assert_eq!(grid.cell(centre).unwrap().cohort_count() as u64, 40 - moved);
    assert_eq!(tracker.total_dispersals(), moved);
}
