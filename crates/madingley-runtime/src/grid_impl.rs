//! Concrete implementation of the ModelGrid trait.
//!
//! In-memory lat/lon raster with:
//! - Cells stored row-major from the south-west corner
//! - Rows that stop at the grid edge, columns that optionally wrap
//! - Ocean-current layers attached to every marine cell
//! - Serialization support for snapshots

use crate::config::{GridConfig, RealmLayout};
use madingley_core::error::{MadingleyError, Result};
use madingley_core::grid::{GridCell, ModelGrid, U_VELOCITY, V_VELOCITY};
use madingley_core::types::{CellIndex, Realm};
use serde::{Deserialize, Serialize};

/// In-memory model grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellGrid {
    num_lat_cells: usize,
    num_lon_cells: usize,
    bottom_latitude: f64,
    left_longitude: f64,
    cell_size: f64,
    wrap_longitude: bool,
    cells: Vec<GridCell>,
}

impl CellGrid {
    /// Build an empty grid (no cohorts or stocks) from its configuration.
    pub fn new(config: &GridConfig, cohort_groups: usize, stock_groups: usize) -> Result<Self> {
        if config.num_lat_cells == 0 || config.num_lon_cells == 0 {
            return Err(MadingleyError::invalid_config(
                "grid",
                "needs at least one row and one column",
            ));
        }

        let mut cells = Vec::with_capacity(config.num_lat_cells * config.num_lon_cells);
        for lat in 0..config.num_lat_cells {
            for lon in 0..config.num_lon_cells {
                let realm = match config.realm_layout {
                    RealmLayout::AllTerrestrial => Realm::Terrestrial,
                    RealmLayout::AllMarine => Realm::Marine,
                    RealmLayout::WestCoast { marine_columns } if lon < marine_columns => Realm::Marine,
                    RealmLayout::WestCoast { .. } => Realm::Terrestrial,
                };
                let mut cell = GridCell::new(
                    config.bottom_latitude + lat as f64 * config.cell_size,
                    config.left_longitude + lon as f64 * config.cell_size,
                    config.cell_size,
                    realm,
                    cohort_groups,
                    stock_groups,
                );
                if realm == Realm::Marine {
                    cell.set_environment(U_VELOCITY, config.ocean_currents.u.clone());
                    cell.set_environment(V_VELOCITY, config.ocean_currents.v.clone());
                }
                cells.push(cell);
            }
        }

        Ok(Self {
            num_lat_cells: config.num_lat_cells,
            num_lon_cells: config.num_lon_cells,
            bottom_latitude: config.bottom_latitude,
            left_longitude: config.left_longitude,
            cell_size: config.cell_size,
            wrap_longitude: config.wrap_longitude,
            cells,
        })
    }

    /// Check that the cell store matches the grid's dimensions. Grids read
    /// back from a snapshot must pass this before use.
    pub fn validate(&self) -> Result<()> {
        if self.num_lat_cells == 0 || self.num_lon_cells == 0 {
            return Err(MadingleyError::invalid_config(
                "grid",
                "needs at least one row and one column",
            ));
        }
        let expected = self
            .num_lat_cells
            .checked_mul(self.num_lon_cells)
            .ok_or_else(|| MadingleyError::invalid_config("grid", "dimensions overflow"))?;
        if self.cells.len() != expected {
            return Err(MadingleyError::invalid_config(
                "grid.cells",
                format!(
                    "{} cells stored for a {}x{} grid",
                    self.cells.len(),
                    self.num_lat_cells,
                    self.num_lon_cells
                ),
            ));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(MadingleyError::invalid_config("grid.cell_size", "must be positive"));
        }
        Ok(())
    }

    /// Whether this grid has the geometry `config` describes.
    pub fn matches_config(&self, config: &GridConfig) -> bool {
        self.num_lat_cells == config.num_lat_cells
            && self.num_lon_cells == config.num_lon_cells
            && self.bottom_latitude == config.bottom_latitude
            && self.left_longitude == config.left_longitude
            && self.cell_size == config.cell_size
            && self.wrap_longitude == config.wrap_longitude
    }

    fn offset(&self, index: CellIndex) -> Option<usize> {
        if index.lat < self.num_lat_cells && index.lon < self.num_lon_cells {
            Some(index.lat * self.num_lon_cells + index.lon)
        } else {
            None
        }
    }

    pub fn bottom_latitude(&self) -> f64 {
        self.bottom_latitude
    }

    pub fn left_longitude(&self) -> f64 {
        self.left_longitude
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn wraps_longitude(&self) -> bool {
        self.wrap_longitude
    }

    /// All cells, row-major from the south-west corner.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// The cell containing a geographic point, if it lies on the grid.
    pub fn cell_at(&self, latitude: f64, longitude: f64) -> Option<CellIndex> {
        let lat = ((latitude - self.bottom_latitude) / self.cell_size).floor();
        let lon = ((longitude - self.left_longitude) / self.cell_size).floor();
        if lat < 0.0 || lon < 0.0 {
            return None;
        }
        let index = CellIndex::new(lat as usize, lon as usize);
        self.offset(index).map(|_| index)
    }

    pub fn total_cohorts(&self) -> usize {
        self.cells.iter().map(GridCell::cohort_count).sum()
    }

    pub fn total_cohort_biomass(&self) -> f64 {
        self.cells.iter().map(GridCell::cohort_biomass).sum()
    }

    pub fn total_stocks(&self) -> usize {
        self.cells.iter().map(GridCell::stock_count).sum()
    }
}

impl ModelGrid for CellGrid {
    fn num_lat_cells(&self) -> usize {
        self.num_lat_cells
    }

    fn num_lon_cells(&self) -> usize {
        self.num_lon_cells
    }

    fn cell(&self, index: CellIndex) -> Option<&GridCell> {
        self.offset(index).and_then(|i| self.cells.get(i))
    }

    fn cell_mut(&mut self, index: CellIndex) -> Option<&mut GridCell> {
        let i = self.offset(index)?;
        self.cells.get_mut(i)
    }

    fn neighbour(&self, index: CellIndex, lat_step: i32, lon_step: i32) -> Option<CellIndex> {
        self.offset(index)?;

        let lat = index.lat as i64 + lat_step as i64;
        if lat < 0 || lat >= self.num_lat_cells as i64 {
            return None;
        }

        let cols = self.num_lon_cells as i64;
        let mut lon = index.lon as i64 + lon_step as i64;
        if self.wrap_longitude {
            lon = lon.rem_euclid(cols);
        } else if lon < 0 || lon >= cols {
            return None;
        }

        Some(CellIndex::new(lat as usize, lon as usize))
    }
}
