//! Responsive dispersal: cohorts that are starving or too sparse leave.

use super::diffusive::DiffusiveDispersal;
use super::kinematics::Displacement;
use madingley_core::cohort::Cohort;
use madingley_core::grid::ModelGrid;
use madingley_core::init::DispersalParameters;
use madingley_core::types::CellIndex;
use madingley_core::units::TimeStepUnit;
use rand::Rng;

/// Why a cohort decided to leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispersalTrigger {
    /// Body mass fell below the starvation threshold.
    Starvation,
    /// Density fell below the density threshold.
    LowDensity,
}

#[derive(Debug, Clone)]
pub struct ResponsiveDispersal {
    starvation_threshold: f64,
    density_threshold_scaling: f64,
    movement: DiffusiveDispersal,
}

impl ResponsiveDispersal {
    pub fn new(params: &DispersalParameters, time_step_unit: TimeStepUnit) -> Self {
        Self {
            starvation_threshold: params.starvation_threshold,
            density_threshold_scaling: params.density_threshold_scaling,
            movement: DiffusiveDispersal::new(params, time_step_unit),
        }
    }

    /// Check whether a cohort in a cell of this area wants to leave.
    /// Starvation is checked first.
    pub fn trigger(&self, cohort: &Cohort, cell_area_km2: f64) -> Option<DispersalTrigger> {
        if cohort.individual_body_mass < cohort.maximum_achieved_body_mass * self.starvation_threshold {
            return Some(DispersalTrigger::Starvation);
        }
        if cohort.adult_mass > 0.0 && cell_area_km2 > 0.0 {
            let density = cohort.abundance / cell_area_km2;
            if density < self.density_threshold_scaling / cohort.adult_mass {
                return Some(DispersalTrigger::LowDensity);
            }
        }
        None
    }

    /// Move a triggered cohort. Responsive moves use diffusive kinematics.
    pub fn disperse<R: Rng + ?Sized>(
        &self,
        grid: &dyn ModelGrid,
        origin: CellIndex,
        cohort: &Cohort,
        rng: &mut R,
    ) -> Option<Displacement> {
        self.movement
            .disperse(grid, origin, cohort.individual_body_mass, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use madingley_core::types::CohortId;

    fn responsive() -> ResponsiveDispersal {
        ResponsiveDispersal::new(&DispersalParameters::default(), TimeStepUnit::Month)
    }

    #[test]
    fn starving_cohorts_leave() {
        let cohort = Cohort::new(0, 0, 10.0, 100.0, 1.0e9, CohortId(1))
            .with_body_mass(100.0)
            .with_body_mass(70.0);
        assert_eq!(
            responsive().trigger(&cohort, 10_000.0),
            Some(DispersalTrigger::Starvation)
        );
    }

    #[test]
    fn sparse_cohorts_leave() {
        // 50_000 / 100 g = 500 individuals per km² needed to stay.
        let cohort = Cohort::new(0, 0, 100.0, 100.0, 4_000_000.0, CohortId(1));
        assert_eq!(
            responsive().trigger(&cohort, 10_000.0),
            Some(DispersalTrigger::LowDensity)
        );

        let dense = Cohort::new(0, 0, 100.0, 100.0, 6_000_000.0, CohortId(2));
        assert_eq!(responsive().trigger(&dense, 10_000.0), None);
    }
}
