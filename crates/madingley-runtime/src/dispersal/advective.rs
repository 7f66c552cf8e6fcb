//! Advective dispersal: planktonic cohorts drift with the ocean currents,
//! spread by horizontal eddy diffusion.

use super::kinematics::{displace, standard_normal, Displacement};
use madingley_core::grid::{ModelGrid, U_VELOCITY, V_VELOCITY};
use madingley_core::init::DispersalParameters;
use madingley_core::types::{CellIndex, Month};
use madingley_core::units::TimeStepUnit;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct AdvectiveDispersal {
    horizontal_diffusivity: f64,
    seconds_per_step: f64,
}

impl AdvectiveDispersal {
    pub fn new(params: &DispersalParameters, time_step_unit: TimeStepUnit) -> Self {
        Self {
            horizontal_diffusivity: params.horizontal_diffusivity,
            seconds_per_step: time_step_unit.in_seconds(),
        }
    }

    /// Displacement (lat km, lon km) from the currents alone.
    pub fn advection_km(&self, u_velocity: f64, v_velocity: f64) -> (f64, f64) {
        (
            v_velocity * self.seconds_per_step / 1000.0,
            u_velocity * self.seconds_per_step / 1000.0,
        )
    }

    /// Standard deviation of the diffusive displacement per axis (km).
    pub fn diffusion_km(&self) -> f64 {
        (2.0 * self.horizontal_diffusivity * self.seconds_per_step).sqrt() / 1000.0
    }

    /// Drift a cohort from `origin` with this month's currents.
    /// Cells without current layers are treated as still water.
    pub fn disperse<R: Rng + ?Sized>(
        &self,
        grid: &dyn ModelGrid,
        origin: CellIndex,
        month: Month,
        rng: &mut R,
    ) -> Option<Displacement> {
        let cell = grid.cell(origin)?;
        let u = cell.environment_value(U_VELOCITY, month).unwrap_or(0.0);
        let v = cell.environment_value(V_VELOCITY, month).unwrap_or(0.0);

        let (lat_km, lon_km) = self.advection_km(u, v);
        let spread = self.diffusion_km();
        displace(
            grid,
            origin,
            lat_km + spread * standard_normal(rng),
            lon_km + spread * standard_normal(rng),
            rng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eastward_current_moves_east() {
        let a = AdvectiveDispersal::new(&DispersalParameters::default(), TimeStepUnit::Day);
        let (lat, lon) = a.advection_km(0.1, 0.0);
        assert_eq!(lat, 0.0);
        assert!((lon - 8.64).abs() < 1e-9);
    }

    #[test]
    fn diffusion_grows_with_step_length() {
        let params = DispersalParameters::default();
        let daily = AdvectiveDispersal::new(&params, TimeStepUnit::Day).diffusion_km();
        let yearly = AdvectiveDispersal::new(&params, TimeStepUnit::Year).diffusion_km();
        assert!((yearly / daily - 365.25f64.sqrt()).abs() < 1e-9);
    }
}
