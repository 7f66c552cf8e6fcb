//! Diffusive dispersal: a random walk whose step length scales with body
//! mass.

use super::kinematics::{displace, random_heading, Displacement};
use madingley_core::grid::ModelGrid;
use madingley_core::init::DispersalParameters;
use madingley_core::types::CellIndex;
use madingley_core::units::TimeStepUnit;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct DiffusiveDispersal {
    speed_scalar: f64,
    speed_exponent: f64,
    months_per_step: f64,
}

impl DiffusiveDispersal {
    pub fn new(params: &DispersalParameters, time_step_unit: TimeStepUnit) -> Self {
        Self {
            speed_scalar: params.speed_body_mass_scalar,
            speed_exponent: params.speed_body_mass_exponent,
            months_per_step: time_step_unit.in_months(),
        }
    }

    /// Dispersal speed for an individual of this mass (km/month).
    pub fn speed(&self, body_mass: f64) -> f64 {
        if body_mass <= 0.0 {
            return 0.0;
        }
        self.speed_scalar * body_mass.powf(self.speed_exponent)
    }

    /// Distance covered in one model time step (km).
    pub fn step_distance(&self, body_mass: f64) -> f64 {
        self.speed(body_mass) * self.months_per_step
    }

    /// Move a cohort of this body mass in a random direction.
    pub fn disperse<R: Rng + ?Sized>(
        &self,
        grid: &dyn ModelGrid,
        origin: CellIndex,
        body_mass: f64,
        rng: &mut R,
    ) -> Option<Displacement> {
        let distance = self.step_distance(body_mass);
        if distance <= 0.0 {
            return None;
        }
        let heading = random_heading(rng);
        displace(grid, origin, distance * heading.sin(), distance * heading.cos(), rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_follows_power_law() {
        let d = DiffusiveDispersal::new(&DispersalParameters::default(), TimeStepUnit::Month);
        assert!((d.speed(1.0) - 0.0278).abs() < 1e-12);
        let expected = 0.0278 * 1000f64.powf(0.48);
        assert!((d.speed(1000.0) - expected).abs() < 1e-9);
        assert_eq!(d.speed(0.0), 0.0);
    }

    #[test]
    fn yearly_steps_cover_twelve_months() {
        let params = DispersalParameters::default();
        let monthly = DiffusiveDispersal::new(&params, TimeStepUnit::Month);
        let yearly = DiffusiveDispersal::new(&params, TimeStepUnit::Year);
        let ratio = yearly.step_distance(500.0) / monthly.step_distance(500.0);
        assert!((ratio - 12.0).abs() < 1e-9);
    }
}
