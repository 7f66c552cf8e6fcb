//! Model initialisation context handed to process formulations.

use crate::error::{MadingleyError, Result};
use serde::{Deserialize, Serialize};

/// Tunable constants of the dispersal formulations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispersalParameters {
    /// Scalar of the body-mass dispersal speed power law (km/month).
    pub speed_body_mass_scalar: f64,
    /// Exponent of the body-mass dispersal speed power law.
    pub speed_body_mass_exponent: f64,
    /// Fraction of maximum achieved mass below which a cohort is starving.
    pub starvation_threshold: f64,
    /// Density threshold scaling: cohorts sparser than this / adult mass
    /// (individuals per km²) disperse.
    pub density_threshold_scaling: f64,
    /// Marine cohorts lighter than this drift with the currents (g).
    pub plankton_size_threshold: f64,
    /// Horizontal eddy diffusivity for advected cohorts (m²/s).
    pub horizontal_diffusivity: f64,
}

impl Default for DispersalParameters {
    fn default() -> Self {
        Self {
            speed_body_mass_scalar: 0.0278,
            speed_body_mass_exponent: 0.48,
            starvation_threshold: 0.8,
            density_threshold_scaling: 50_000.0,
            plankton_size_threshold: 0.01,
            horizontal_diffusivity: 100.0,
        }
    }
}

impl DispersalParameters {
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("speed_body_mass_scalar", self.speed_body_mass_scalar),
            ("density_threshold_scaling", self.density_threshold_scaling),
            ("plankton_size_threshold", self.plankton_size_threshold),
            ("horizontal_diffusivity", self.horizontal_diffusivity),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MadingleyError::invalid_config(
                    field,
                    format!("must be finite and >= 0, got {}", value),
                ));
            }
        }
        if !self.speed_body_mass_exponent.is_finite() {
            return Err(MadingleyError::invalid_config(
                "speed_body_mass_exponent",
                "must be finite",
            ));
        }
        if !(0.0..=1.0).contains(&self.starvation_threshold) {
            return Err(MadingleyError::invalid_config(
                "starvation_threshold",
                format!("must be within 0.0-1.0, got {}", self.starvation_threshold),
            ));
        }
        Ok(())
    }
}

/// Everything a formulation needs from model set-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInitialisation {
    pub dispersal: DispersalParameters,
    /// Seed used when random draws are not requested.
    pub random_seed: u64,
    /// Whether cross-cell effects are recorded by the process tracker.
    pub track_dispersal: bool,
}

impl Default for ModelInitialisation {
    fn default() -> Self {
        Self {
            dispersal: DispersalParameters::default(),
            random_seed: 4315,
            track_dispersal: false,
        }
    }
}
