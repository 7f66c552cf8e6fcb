//! Model grid: the spatial container every process reads and mutates.
//!
//! A grid is a regular latitude/longitude raster of [`GridCell`]s. Each cell
//! holds the cohorts and stocks living in it, its environment layers, and
//! the cross-cell effects staged against it for the current time step.

use crate::cohort::Cohort;
use crate::stock::Stock;
use crate::types::{CellIndex, Direction, Month, Realm};
use crate::units;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Eastward ocean current layer (m/s).
pub const U_VELOCITY: &str = "uVel";
/// Northward ocean current layer (m/s).
pub const V_VELOCITY: &str = "vVel";

/// A cross-cell move staged by a formulation, committed by the applier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDispersal {
    pub functional_group: usize,
    /// Index of the cohort within its functional group in the source cell.
    pub cohort_index: usize,
    pub destination: CellIndex,
    /// Edge the cohort leaves the source cell through.
    pub exit: Direction,
    /// Edge the cohort enters the destination cell through.
    pub entry: Direction,
}

/// One cell of the model grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCell {
    /// Latitude of the cell centre (degrees).
    pub latitude: f64,
    /// Longitude of the cell centre (degrees).
    pub longitude: f64,
    pub realm: Realm,
    pub height_km: f64,
    pub width_km: f64,
    pub area_km2: f64,
    /// Cohorts grouped by cohort functional group index.
    cohorts: Vec<Vec<Cohort>>,
    /// Stocks grouped by stock functional group index.
    stocks: Vec<Vec<Stock>>,
    /// Named environment layers: one value, or one value per month.
    #[serde(default)]
    environment: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pending_dispersals: Vec<PendingDispersal>,
}

impl GridCell {
    /// Build a cell from its south-west corner and size, computing geometry.
    pub fn new(
        bottom_latitude: f64,
        left_longitude: f64,
        cell_size_degrees: f64,
        realm: Realm,
        cohort_groups: usize,
        stock_groups: usize,
    ) -> Self {
        let latitude = bottom_latitude + cell_size_degrees / 2.0;
        Self {
            latitude,
            longitude: left_longitude + cell_size_degrees / 2.0,
            realm,
            height_km: units::km_per_degree_latitude() * cell_size_degrees,
            width_km: units::km_per_degree_longitude(latitude) * cell_size_degrees,
            area_km2: units::cell_area_km2(bottom_latitude, cell_size_degrees),
            cohorts: vec![Vec::new(); cohort_groups],
            stocks: vec![Vec::new(); stock_groups],
            environment: BTreeMap::new(),
            pending_dispersals: Vec::new(),
        }
    }

    // --- Cohorts ---

    /// Number of cohort functional groups this cell has slots for.
    pub fn cohort_group_count(&self) -> usize {
        self.cohorts.len()
    }

    pub fn cohorts(&self, functional_group: usize) -> &[Cohort] {
        self.cohorts
            .get(functional_group)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cohort(&self, functional_group: usize, index: usize) -> Option<&Cohort> {
        self.cohorts.get(functional_group)?.get(index)
    }

    pub fn cohort_mut(&mut self, functional_group: usize, index: usize) -> Option<&mut Cohort> {
        self.cohorts.get_mut(functional_group)?.get_mut(index)
    }

    /// Append a cohort to its functional group, growing the slots if needed.
    pub fn add_cohort(&mut self, cohort: Cohort) {
        let fg = cohort.functional_group_index();
        if fg >= self.cohorts.len() {
            self.cohorts.resize_with(fg + 1, Vec::new);
        }
        self.cohorts[fg].push(cohort);
    }

    /// Remove and return a cohort. Later cohorts in the group shift down.
    pub fn remove_cohort(&mut self, functional_group: usize, index: usize) -> Option<Cohort> {
        let group = self.cohorts.get_mut(functional_group)?;
        if index < group.len() {
            Some(group.remove(index))
        } else {
            None
        }
    }

    pub fn cohort_count(&self) -> usize {
        self.cohorts.iter().map(Vec::len).sum()
    }

    pub fn cohort_biomass(&self) -> f64 {
        self.cohorts.iter().flatten().map(Cohort::biomass).sum()
    }

    pub fn cohort_abundance(&self) -> f64 {
        self.cohorts.iter().flatten().map(|c| c.abundance).sum()
    }

    // --- Stocks ---

    pub fn stocks(&self, functional_group: usize) -> &[Stock] {
        self.stocks
            .get(functional_group)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stocks_mut(&mut self, functional_group: usize) -> Option<&mut Vec<Stock>> {
        self.stocks.get_mut(functional_group)
    }

    pub fn add_stock(&mut self, stock: Stock) {
        let fg = stock.functional_group_index();
        if fg >= self.stocks.len() {
            self.stocks.resize_with(fg + 1, Vec::new);
        }
        self.stocks[fg].push(stock);
    }

    pub fn stock_count(&self) -> usize {
        self.stocks.iter().map(Vec::len).sum()
    }

    pub fn stock_biomass(&self) -> f64 {
        self.stocks.iter().flatten().map(|s| s.total_biomass).sum()
    }

    // --- Environment ---

    pub fn set_environment(&mut self, layer: &str, values: Vec<f64>) {
        self.environment.insert(layer.to_string(), values);
    }

    /// Value of a layer for a month. Single-valued layers apply to every month.
    pub fn environment_value(&self, layer: &str, month: Month) -> Option<f64> {
        let values = self.environment.get(layer)?;
        if values.is_empty() {
            return None;
        }
        Some(values[month as usize % values.len()])
    }

    // --- Staged cross-cell effects ---

    pub fn stage_dispersal(&mut self, pending: PendingDispersal) {
        self.pending_dispersals.push(pending);
    }

    pub fn pending_dispersals(&self) -> &[PendingDispersal] {
        &self.pending_dispersals
    }

    /// Drain everything staged against this cell.
    pub fn take_pending_dispersals(&mut self) -> Vec<PendingDispersal> {
        std::mem::take(&mut self.pending_dispersals)
    }
}

/// The spatial grid processes run against.
///
/// Implementations decide the topology: which neighbours exist, and whether
/// longitude wraps around.
pub trait ModelGrid {
    fn num_lat_cells(&self) -> usize;

    fn num_lon_cells(&self) -> usize;

    /// Get a cell by index.
    fn cell(&self, index: CellIndex) -> Option<&GridCell>;

    fn cell_mut(&mut self, index: CellIndex) -> Option<&mut GridCell>;

    /// The cell `lat_step` rows north and `lon_step` columns east of `index`,
    /// or `None` when that falls off the grid.
    fn neighbour(&self, index: CellIndex, lat_step: i32, lon_step: i32) -> Option<CellIndex>;

    /// Every cell index, row by row from the south-west corner.
    fn cell_indices(&self) -> Vec<CellIndex> {
        let lons = self.num_lon_cells();
        (0..self.num_lat_cells())
            .flat_map(|lat| (0..lons).map(move |lon| CellIndex::new(lat, lon)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CohortId;

    fn cell() -> GridCell {
        GridCell::new(0.0, 10.0, 1.0, Realm::Terrestrial, 2, 1)
    }

    #[test]
    fn geometry_is_centred() {
        let c = cell();
        assert_eq!(c.latitude, 0.5);
        assert_eq!(c.longitude, 10.5);
        assert!(c.height_km > 111.0 && c.height_km < 111.5);
        assert!(c.area_km2 > 12_000.0);
    }

    #[test]
    fn add_and_remove_cohorts() {
        let mut c = cell();
        c.add_cohort(Cohort::new(1, 0, 1.0, 10.0, 5.0, CohortId(1)));
        c.add_cohort(Cohort::new(1, 0, 2.0, 10.0, 5.0, CohortId(2)));
        c.add_cohort(Cohort::new(4, 0, 3.0, 10.0, 5.0, CohortId(3)));

        assert_eq!(c.cohort_count(), 3);
        assert_eq!(c.cohort_group_count(), 5);
        assert_eq!(c.cohort_biomass(), 30.0);

        let removed = c.remove_cohort(1, 0).unwrap();
        assert_eq!(removed.id(), Some(CohortId(1)));
        assert_eq!(c.cohort(1, 0).and_then(Cohort::id), Some(CohortId(2)));
        assert!(c.remove_cohort(1, 5).is_none());
        assert!(c.cohorts(9).is_empty());
    }

    #[test]
    fn monthly_environment_wraps() {
        let mut c = cell();
        c.set_environment(U_VELOCITY, (0..12).map(f64::from).collect());
        c.set_environment(V_VELOCITY, vec![0.25]);
        assert_eq!(c.environment_value(U_VELOCITY, 3), Some(3.0));
        assert_eq!(c.environment_value(U_VELOCITY, 14), Some(2.0));
        assert_eq!(c.environment_value(V_VELOCITY, 7), Some(0.25));
        assert_eq!(c.environment_value("temperature", 0), None);
    }

    #[test]
    fn pending_dispersals_drain() {
        let mut c = cell();
        c.stage_dispersal(PendingDispersal {
            functional_group: 0,
            cohort_index: 0,
            destination: CellIndex::new(1, 0),
            exit: Direction::North,
            entry: Direction::South,
        });
        assert_eq!(c.pending_dispersals().len(), 1);
        assert_eq!(c.take_pending_dispersals().len(), 1);
        assert!(c.pending_dispersals().is_empty());
    }
}
