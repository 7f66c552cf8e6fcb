//! The model loop.
//!
//! Each time step visits every cell once through the cross-grid-cell
//! coordinator, then commits the staged moves with a single update.

use crate::config::ModelConfig;
use crate::ecology::EcologyCrossGridCell;
use crate::grid_impl::CellGrid;
use crate::metrics::GridStats;
use crate::seeding::seed_grid;
use crate::session::GridSnapshot;
use crate::tracker::CrossCellProcessTracker;
use madingley_core::error::Result;
use madingley_core::functional_group::FunctionalGroupDefinitions;
use madingley_core::grid::ModelGrid;
use madingley_core::types::{Month, TimeStep};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

/// What happened in one time step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStepReport {
    pub time_step: TimeStep,
    pub month: Month,
    /// Dispersals committed this step.
    pub dispersals: u64,
    /// Cohorts on the grid after the step.
    pub cohorts: usize,
    /// Cohort biomass on the grid after the step (g).
    pub cohort_biomass: f64,
}

/// A running Madingley model.
#[derive(Debug)]
pub struct MadingleyModel {
    config: ModelConfig,
    grid: CellGrid,
    ecology: EcologyCrossGridCell,
    tracker: CrossCellProcessTracker,
    run_id: String,
    time_step: TimeStep,
    total_dispersals: u64,
    next_cohort_id: u64,
}

impl MadingleyModel {
    /// Build and seed a fresh model.
    pub fn from_config(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        let mut grid = CellGrid::new(
            &config.grid,
            config.cohort_groups.len(),
            config.stock_groups.len(),
        )?;

        let mut rng = if config.draw_randomly {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(config.initialisation.random_seed)
        };
        let seeded = seed_grid(
            &mut grid,
            &config.cohort_groups,
            &config.stock_groups,
            &config.seeding,
            0,
            &mut rng,
        )?;

        let model = Self::assemble(config, grid, uuid::Uuid::new_v4().to_string(), 0, 0, seeded.next_cohort_id);
        info!(
            "Model {} ready: {}x{} cells, {} cohorts, {} stocks",
            model.run_id,
            model.grid.num_lat_cells(),
            model.grid.num_lon_cells(),
            seeded.cohorts,
            seeded.stocks
        );
        Ok(model)
    }

    /// Resume from a saved snapshot. The snapshot's grid replaces the one
    /// the config describes, and is rejected if its cells do not match its
    /// dimensions.
    pub fn from_snapshot(config: ModelConfig, snapshot: GridSnapshot) -> Result<Self> {
        config.validate()?;
        snapshot.grid.validate()?;
        let meta = snapshot.metadata;
        let model = Self::assemble(
            config,
            snapshot.grid,
            meta.run_id,
            meta.time_step,
            meta.total_dispersals,
            meta.next_cohort_id,
        );
        info!("Model {} resumed at time step {}", model.run_id, model.time_step);
        Ok(model)
    }

    fn assemble(
        config: ModelConfig,
        grid: CellGrid,
        run_id: String,
        time_step: TimeStep,
        total_dispersals: u64,
        next_cohort_id: u64,
    ) -> Self {
        let mut ecology = EcologyCrossGridCell::new();
        ecology.initialize(config.time_step_unit, config.draw_randomly, &config.initialisation);
        let tracker = CrossCellProcessTracker::new(config.initialisation.track_dispersal);
        Self {
            config,
            grid,
            ecology,
            tracker,
            run_id,
            time_step,
            total_dispersals,
            next_cohort_id,
        }
    }

    /// Calendar month of the current time step.
    pub fn current_month(&self) -> Month {
        let elapsed = self.time_step as f64 * self.config.time_step_unit.in_months();
        (elapsed.floor() as u64 % 12) as Month
    }

    /// Advance one time step.
    pub fn step(&mut self) -> Result<TimeStepReport> {
        let month = self.current_month();
        for cell in self.grid.cell_indices() {
            self.ecology.run(
                cell,
                &mut self.grid,
                self.config.dispersal_only,
                &self.config.cohort_groups,
                &self.config.stock_groups,
                month,
            )?;
        }
        let dispersals = self
            .ecology
            .update(&mut self.grid, &mut self.tracker, self.time_step)?;
        self.total_dispersals += dispersals;

        let report = TimeStepReport {
            time_step: self.time_step,
            month,
            dispersals,
            cohorts: self.grid.total_cohorts(),
            cohort_biomass: self.grid.total_cohort_biomass(),
        };
        debug!(
            "Time step {} (month {}): {} dispersals",
            report.time_step, report.month, report.dispersals
        );
        self.time_step += 1;
        Ok(report)
    }

    /// Advance `steps` time steps.
    pub fn run(&mut self, steps: u64) -> Result<Vec<TimeStepReport>> {
        let mut reports = Vec::new();
        for _ in 0..steps {
            reports.push(self.step()?);
        }
        info!(
            "Ran {} time steps; {} dispersals so far",
            steps, self.total_dispersals
        );
        Ok(reports)
    }

    /// Capture the current state for saving.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(
            &self.grid,
            Some(&self.run_id),
            self.time_step,
            self.current_month(),
            self.total_dispersals,
            self.next_cohort_id,
        )
    }

    pub fn stats(&self) -> GridStats {
        GridStats::compute(&self.grid)
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn tracker(&self) -> &CrossCellProcessTracker {
        &self.tracker
    }

    pub fn ecology(&self) -> &EcologyCrossGridCell {
        &self.ecology
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn cohort_definitions(&self) -> &FunctionalGroupDefinitions {
        &self.config.cohort_groups
    }

    pub fn stock_definitions(&self) -> &FunctionalGroupDefinitions {
        &self.config.stock_groups
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn time_step(&self) -> TimeStep {
        self.time_step
    }

    /// Dispersals committed since the run began, across resumes.
    pub fn total_dispersals(&self) -> u64 {
        self.total_dispersals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use madingley_core::units::TimeStepUnit;

    #[test]
    fn months_follow_the_time_step_unit() {
        let mut model = MadingleyModel::from_config(ModelConfig::default()).unwrap();
        assert_eq!(model.current_month(), 0);
        model.time_step = 13;
        assert_eq!(model.current_month(), 1);

        let config = ModelConfig {
            time_step_unit: TimeStepUnit::Year,
            ..Default::default()
        };
        let mut yearly = MadingleyModel::from_config(config).unwrap();
        yearly.time_step = 5;
        assert_eq!(yearly.current_month(), 0);
    }

    #[test]
    fn step_advances_and_reports() {
        let mut model = MadingleyModel::from_config(ModelConfig::default()).unwrap();
        let before = model.grid().total_cohorts();
        let report = model.step().unwrap();
        assert_eq!(report.time_step, 0);
        assert_eq!(report.cohorts, before);
        assert_eq!(model.time_step(), 1);
        assert_eq!(model.total_dispersals(), report.dispersals);
    }

    #[test]
    fn run_collects_one_report_per_step() {
        let mut model = MadingleyModel::from_config(ModelConfig::default()).unwrap();
        assert!(model.run(0).unwrap().is_empty());
        assert_eq!(model.time_step(), 0);

        let reports = model.run(3).unwrap();
        let steps: Vec<_> = reports.iter().map(|r| r.time_step).collect();
        assert_eq!(steps, vec![0, 1, 2]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ModelConfig::default();
        config.grid.cell_size = 0.0;
        assert!(MadingleyModel::from_config(config).is_err());
    }
}
