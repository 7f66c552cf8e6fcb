//! Model configuration.
//!
//! Every tunable of a run lives here: grid extent and realm layout, the
//! time-step unit, random-draw policy, dispersal constants, population
//! seeding, and the functional-group tables. All fields have defaults, so a
//! partial TOML or JSON document deserializes into a complete config.

use madingley_core::error::{MadingleyError, Result};
use madingley_core::functional_group::FunctionalGroupDefinitions;
use madingley_core::init::ModelInitialisation;
use madingley_core::units::TimeStepUnit;
use serde::{Deserialize, Serialize};

/// How realms are laid out across the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RealmLayout {
    AllTerrestrial,
    AllMarine,
    /// The westernmost `marine_columns` columns are ocean, the rest land.
    WestCoast { marine_columns: usize },
}

/// Ocean currents applied to every marine cell (m/s).
///
/// Each list holds one value for the whole year or twelve monthly values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanCurrents {
    pub u: Vec<f64>,
    pub v: Vec<f64>,
}

impl Default for OceanCurrents {
    fn default() -> Self {
        Self {
            u: vec![0.05],
            v: vec![0.0],
        }
    }
}

/// Grid extent and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub num_lat_cells: usize,
    pub num_lon_cells: usize,
    /// Latitude of the southern edge of the grid (degrees).
    pub bottom_latitude: f64,
    /// Longitude of the western edge of the grid (degrees).
    pub left_longitude: f64,
    /// Edge length of a cell (degrees).
    pub cell_size: f64,
    /// Whether the eastern and western edges join.
    pub wrap_longitude: bool,
    pub realm_layout: RealmLayout,
    pub ocean_currents: OceanCurrents,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            num_lat_cells: 6,
            num_lon_cells: 8,
            bottom_latitude: -3.0,
            left_longitude: 0.0,
            cell_size: 1.0,
            wrap_longitude: false,
            realm_layout: RealmLayout::WestCoast { marine_columns: 2 },
            ocean_currents: OceanCurrents::default(),
        }
    }
}

/// Initial population seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedingConfig {
    /// Cohorts created per functional group in each matching cell.
    pub cohorts_per_group: usize,
    /// Juvenile mass as a fraction of adult mass.
    pub juvenile_fraction: f64,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            cohorts_per_group: 3,
            juvenile_fraction: 0.1,
        }
    }
}

/// Configuration for a model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub grid: GridConfig,
    /// Length of one time step (default: month).
    pub time_step_unit: TimeStepUnit,
    /// Seed generators from entropy instead of `initialisation.random_seed`.
    pub draw_randomly: bool,
    /// Run dispersal only, without within-cell ecology.
    pub dispersal_only: bool,
    pub initialisation: ModelInitialisation,
    pub seeding: SeedingConfig,
    pub cohort_groups: FunctionalGroupDefinitions,
    pub stock_groups: FunctionalGroupDefinitions,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            time_step_unit: TimeStepUnit::Month,
            draw_randomly: false,
            dispersal_only: false,
            initialisation: ModelInitialisation::default(),
            seeding: SeedingConfig::default(),
            cohort_groups: FunctionalGroupDefinitions::default_cohorts(),
            stock_groups: FunctionalGroupDefinitions::default_stocks(),
        }
    }
}

impl ModelConfig {
    /// Check every value a run depends on.
    pub fn validate(&self) -> Result<()> {
        let grid = &self.grid;
        if grid.num_lat_cells == 0 || grid.num_lon_cells == 0 {
            return Err(MadingleyError::invalid_config(
                "grid",
                "needs at least one row and one column",
            ));
        }
        if !(grid.cell_size.is_finite() && grid.cell_size > 0.0) {
            return Err(MadingleyError::invalid_config(
                "grid.cell_size",
                format!("must be positive, got {}", grid.cell_size),
            ));
        }
        let top = grid.bottom_latitude + grid.cell_size * grid.num_lat_cells as f64;
        if grid.bottom_latitude < -90.0 || top > 90.0 {
            return Err(MadingleyError::invalid_config(
                "grid.bottom_latitude",
                format!("grid spans {}..{}, outside -90..90", grid.bottom_latitude, top),
            ));
        }
        if let RealmLayout::WestCoast { marine_columns } = grid.realm_layout {
            if marine_columns > grid.num_lon_cells {
                return Err(MadingleyError::invalid_config(
                    "grid.realm_layout.marine_columns",
                    format!("{} exceeds {} columns", marine_columns, grid.num_lon_cells),
                ));
            }
        }
        for (field, values) in [
            ("grid.ocean_currents.u", &grid.ocean_currents.u),
            ("grid.ocean_currents.v", &grid.ocean_currents.v),
        ] {
            if !(values.len() == 1 || values.len() == 12) {
                return Err(MadingleyError::invalid_config(
                    field,
                    format!("needs 1 or 12 values, got {}", values.len()),
                ));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(MadingleyError::invalid_config(field, "values must be finite"));
            }
        }
        let fraction = self.seeding.juvenile_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(MadingleyError::invalid_config(
                "seeding.juvenile_fraction",
                format!("must be within (0.0, 1.0], got {}", fraction),
            ));
        }
        self.initialisation.dispersal.validate()
    }
}
