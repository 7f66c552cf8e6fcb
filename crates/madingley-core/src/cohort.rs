//! Cohort: a group of identical animals tracked as one unit.

use crate::types::{CohortId, TimeStep};
use serde::{Deserialize, Serialize};

/// A cohort: individuals of one functional group that share a birth time
/// step and body-mass trajectory. Cohorts are the unit that disperses
/// between grid cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    functional_group_index: usize,
    birth_time_step: TimeStep,
    /// Mass at birth (g).
    pub juvenile_mass: f64,
    /// Mass at maturity (g).
    pub adult_mass: f64,
    /// Current mean body mass of an individual (g).
    pub individual_body_mass: f64,
    /// Mass set aside for reproduction (g).
    pub individual_reproductive_potential_mass: f64,
    /// Largest body mass any individual has reached (g).
    pub maximum_achieved_body_mass: f64,
    /// Number of individuals.
    pub abundance: f64,
    /// Whether this cohort was produced by merging.
    pub merged: bool,
    /// Fraction of the time step individuals are active (0.0-1.0).
    pub proportion_time_active: f64,
    pub trophic_index: f64,
    pub log_optimal_prey_body_size_ratio: f64,
    /// Ids of every cohort merged into this one; the first is its own.
    pub ids: Vec<CohortId>,
}

impl Cohort {
    /// Create a newborn cohort whose body mass starts at `juvenile_mass`.
    pub fn new(
        functional_group_index: usize,
        birth_time_step: TimeStep,
        juvenile_mass: f64,
        adult_mass: f64,
        abundance: f64,
        id: CohortId,
    ) -> Self {
        Self {
            functional_group_index,
            birth_time_step,
            juvenile_mass,
            adult_mass,
            individual_body_mass: juvenile_mass,
            individual_reproductive_potential_mass: 0.0,
            maximum_achieved_body_mass: juvenile_mass,
            abundance,
            merged: false,
            proportion_time_active: 1.0,
            trophic_index: 0.0,
            log_optimal_prey_body_size_ratio: 0.0,
            ids: vec![id],
        }
    }

    /// Set the current body mass, raising the maximum achieved mass if needed.
    pub fn with_body_mass(mut self, mass: f64) -> Self {
        self.individual_body_mass = mass;
        if mass > self.maximum_achieved_body_mass {
            self.maximum_achieved_body_mass = mass;
        }
        self
    }

    pub fn functional_group_index(&self) -> usize {
        self.functional_group_index
    }

    pub fn birth_time_step(&self) -> TimeStep {
        self.birth_time_step
    }

    /// The cohort's own id.
    pub fn id(&self) -> Option<CohortId> {
        self.ids.first().copied()
    }

    /// Total living biomass of the cohort (g).
    pub fn biomass(&self) -> f64 {
        (self.individual_body_mass + self.individual_reproductive_potential_mass) * self.abundance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newborn_starts_at_juvenile_mass() {
        let c = Cohort::new(3, 10, 2.0, 50.0, 100.0, CohortId(9));
        assert_eq!(c.functional_group_index(), 3);
        assert_eq!(c.birth_time_step(), 10);
        assert_eq!(c.individual_body_mass, 2.0);
        assert_eq!(c.maximum_achieved_body_mass, 2.0);
        assert_eq!(c.id(), Some(CohortId(9)));
        assert_eq!(c.biomass(), 200.0);
    }

    #[test]
    fn body_mass_tracks_maximum() {
        let c = Cohort::new(0, 0, 2.0, 50.0, 1.0, CohortId(1))
            .with_body_mass(30.0)
            .with_body_mass(12.0);
        assert_eq!(c.individual_body_mass, 12.0);
        assert_eq!(c.maximum_achieved_body_mass, 30.0);
    }
}
