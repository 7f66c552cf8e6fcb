//! Dispersal, the cross-grid-cell process the model ships.
//!
//! [`BasicDispersal`] picks one of three formulations for every cohort:
//! - **Advective**: marine plankton drifts with the currents
//! - **Responsive**: starving or sparse cohorts leave on purpose
//! - **Diffusive**: everything else random-walks at a body-mass speed
//!
//! Moves are only staged here. The applier commits them once every cell
//! has been visited.

pub mod advective;
pub mod diffusive;
pub mod kinematics;
pub mod responsive;

pub use advective::AdvectiveDispersal;
pub use diffusive::DiffusiveDispersal;
pub use kinematics::Displacement;
pub use responsive::{DispersalTrigger, ResponsiveDispersal};

use madingley_core::cohort::Cohort;
use madingley_core::error::{MadingleyError, Result};
use madingley_core::functional_group::FunctionalGroupDefinitions;
use madingley_core::grid::{ModelGrid, PendingDispersal};
use madingley_core::init::{DispersalParameters, ModelInitialisation};
use madingley_core::process::CrossCellProcess;
use madingley_core::types::{CellIndex, Month, Realm};
use madingley_core::units::TimeStepUnit;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::debug;

/// Registry name of the basic dispersal formulation.
pub const BASIC_DISPERSAL: &str = "Basic dispersal";

/// Which formulation moved a cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispersalMode {
    Advective,
    Responsive(DispersalTrigger),
    Diffusive,
}

/// Running totals of staged moves, by formulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispersalCounts {
    pub advective: u64,
    pub responsive: u64,
    pub diffusive: u64,
}

impl DispersalCounts {
    pub fn total(&self) -> u64 {
        self.advective + self.responsive + self.diffusive
    }
}

/// The default dispersal formulation.
pub struct BasicDispersal {
    advective: AdvectiveDispersal,
    responsive: ResponsiveDispersal,
    diffusive: DiffusiveDispersal,
    plankton_size_threshold: f64,
    rng: SmallRng,
    staged: DispersalCounts,
}

impl BasicDispersal {
    /// Build the formulation. With `draw_randomly` the generator is seeded
    /// from entropy; otherwise from the initialisation's seed.
    pub fn new(time_step_unit: TimeStepUnit, draw_randomly: bool, init: &ModelInitialisation) -> Self {
        let rng = if draw_randomly {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(init.random_seed)
        };
        Self::with_rng(time_step_unit, &init.dispersal, rng)
    }

    pub fn with_rng(time_step_unit: TimeStepUnit, params: &DispersalParameters, rng: SmallRng) -> Self {
        Self {
            advective: AdvectiveDispersal::new(params, time_step_unit),
            responsive: ResponsiveDispersal::new(params, time_step_unit),
            diffusive: DiffusiveDispersal::new(params, time_step_unit),
            plankton_size_threshold: params.plankton_size_threshold,
            rng,
            staged: DispersalCounts::default(),
        }
    }

    /// Moves staged so far, by formulation.
    pub fn staged_counts(&self) -> DispersalCounts {
        self.staged
    }

    /// Pick the formulation for one cohort.
    pub fn select_mode(
        &self,
        realm: Realm,
        cohort: &Cohort,
        cell_area_km2: f64,
        dispersal_only: bool,
        cohort_definitions: &FunctionalGroupDefinitions,
    ) -> DispersalMode {
        let fg = cohort.functional_group_index();
        if realm == Realm::Marine
            && (cohort_definitions.is_planktonic(fg)
                || cohort.individual_body_mass < self.plankton_size_threshold)
        {
            return DispersalMode::Advective;
        }
        if !dispersal_only {
            if let Some(trigger) = self.responsive.trigger(cohort, cell_area_km2) {
                return DispersalMode::Responsive(trigger);
            }
        }
        DispersalMode::Diffusive
    }
}

impl CrossCellProcess for BasicDispersal {
    fn name(&self) -> &str {
        BASIC_DISPERSAL
    }

    fn run(
        &mut self,
        cell: CellIndex,
        grid: &mut dyn ModelGrid,
        dispersal_only: bool,
        cohort_definitions: &FunctionalGroupDefinitions,
        _stock_definitions: &FunctionalGroupDefinitions,
        current_month: Month,
    ) -> Result<()> {
        let mut staged = Vec::new();
        {
            let view: &dyn ModelGrid = grid;
            let source = view
                .cell(cell)
                .ok_or(MadingleyError::CellOutOfBounds { cell })?;

            for fg in 0..source.cohort_group_count() {
                for (index, cohort) in source.cohorts(fg).iter().enumerate() {
                    let mode = self.select_mode(
                        source.realm,
                        cohort,
                        source.area_km2,
                        dispersal_only,
                        cohort_definitions,
                    );
                    let displacement = match mode {
                        DispersalMode::Advective => {
                            self.advective.disperse(view, cell, current_month, &mut self.rng)
                        }
                        DispersalMode::Responsive(_) => {
                            self.responsive.disperse(view, cell, cohort, &mut self.rng)
                        }
                        DispersalMode::Diffusive => self.diffusive.disperse(
                            view,
                            cell,
                            cohort.individual_body_mass,
                            &mut self.rng,
                        ),
                    };

                    if let Some(d) = displacement {
                        match mode {
                            DispersalMode::Advective => self.staged.advective += 1,
                            DispersalMode::Responsive(_) => self.staged.responsive += 1,
                            DispersalMode::Diffusive => self.staged.diffusive += 1,
                        }
                        staged.push(PendingDispersal {
                            functional_group: fg,
                            cohort_index: index,
                            destination: d.destination,
                            exit: d.exit,
                            entry: d.entry,
                        });
                    }
                }
            }
        }

        if !staged.is_empty() {
            debug!("Cell {} staged {} dispersals", cell, staged.len());
        }

        let source = grid
            .cell_mut(cell)
            .ok_or(MadingleyError::CellOutOfBounds { cell })?;
        for pending in staged {
            source.stage_dispersal(pending);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, RealmLayout};
    use crate::grid_impl::CellGrid;
    use madingley_core::types::CohortId;

    fn dispersal() -> BasicDispersal {
        BasicDispersal::new(TimeStepUnit::Month, false, &ModelInitialisation::default())
    }

    #[test]
    fn plankton_drifts() {
        let d = dispersal();
        let defs = FunctionalGroupDefinitions::default_cohorts();
        let plankton = Cohort::new(5, 0, 0.001, 1.0, 1.0e12, CohortId(1));
        assert_eq!(
            d.select_mode(Realm::Marine, &plankton, 10_000.0, false, &defs),
            DispersalMode::Advective
        );

        // Tiny but mobile marine cohorts drift too.
        let small_fish = Cohort::new(6, 0, 0.001, 50.0, 1.0e12, CohortId(2));
        assert_eq!(
            d.select_mode(Realm::Marine, &small_fish, 10_000.0, false, &defs),
            DispersalMode::Advective
        );
    }

    #[test]
    fn dispersal_only_skips_responsive_checks() {
        let d = dispersal();
        let defs = FunctionalGroupDefinitions::default_cohorts();
        let sparse = Cohort::new(0, 0, 100.0, 100.0, 1.0, CohortId(1));
        assert_eq!(
            d.select_mode(Realm::Terrestrial, &sparse, 10_000.0, false, &defs),
            DispersalMode::Responsive(DispersalTrigger::LowDensity)
        );
        assert_eq!(
            d.select_mode(Realm::Terrestrial, &sparse, 10_000.0, true, &defs),
            DispersalMode::Diffusive
        );
    }

    #[test]
    fn run_only_stages_moves() {
        let config = GridConfig {
            num_lat_cells: 3,
            num_lon_cells: 3,
            bottom_latitude: -1.5,
            realm_layout: RealmLayout::AllTerrestrial,
            ..Default::default()
        };
        let mut grid = CellGrid::new(&config, 1, 0).unwrap();
        let centre = CellIndex::new(1, 1);
        for i in 0..50 {
            // Heavy, sparse cohorts: responsive and fast.
            let cohort = Cohort::new(0, 0, 5.0e6, 5.0e6, 1.0, CohortId(i));
            grid.cell_mut(centre).unwrap().add_cohort(cohort);
        }
        let defs = FunctionalGroupDefinitions::default_cohorts();
        let stocks = FunctionalGroupDefinitions::default_stocks();

        let mut d = dispersal();
        d.run(centre, &mut grid, false, &defs, &stocks, 0).unwrap();

        let cell = grid.cell(centre).unwrap();
        assert_eq!(cell.cohort_count(), 50);
        let staged = cell.pending_dispersals();
        assert!(!staged.is_empty());
        assert_eq!(staged.len() as u64, d.staged_counts().total());
        assert_eq!(d.staged_counts().responsive, d.staged_counts().total());
        for p in staged {
            assert_ne!(p.destination, centre);
            assert_eq!(p.exit.opposite(), p.entry);
        }
    }

    #[test]
    fn run_rejects_cells_off_the_grid() {
        let mut grid = CellGrid::new(&GridConfig::default(), 1, 0).unwrap();
        let defs = FunctionalGroupDefinitions::default_cohorts();
        let err = dispersal()
            .run(CellIndex::new(99, 0), &mut grid, false, &defs, &defs, 0)
            .unwrap_err();
        assert!(matches!(err, MadingleyError::CellOutOfBounds { .. }));
    }
}
