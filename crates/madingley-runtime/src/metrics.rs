//! Grid-wide population summaries.
//!
//! Computes totals from the current grid state:
//! - Cohort and stock counts, overall and per realm
//! - Cohort abundance and biomass
//! - Stock biomass

use crate::grid_impl::CellGrid;
use madingley_core::grid::GridCell;
use madingley_core::types::Realm;
use serde::Serialize;

/// Totals for one realm.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RealmStats {
    pub cells: usize,
    pub cohorts: usize,
    pub stocks: usize,
    /// Total cohort biomass (g).
    pub cohort_biomass: f64,
    /// Total stock biomass (g).
    pub stock_biomass: f64,
}

impl RealmStats {
    fn add_cell(&mut self, cell: &GridCell) {
        self.cells += 1;
        self.cohorts += cell.cohort_count();
        self.stocks += cell.stock_count();
        self.cohort_biomass += cell.cohort_biomass();
        self.stock_biomass += cell.stock_biomass();
    }
}

/// Summary of the whole grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GridStats {
    pub cells: usize,
    pub cohorts: usize,
    pub stocks: usize,
    pub cohort_abundance: f64,
    pub cohort_biomass: f64,
    pub stock_biomass: f64,
    pub terrestrial: RealmStats,
    pub marine: RealmStats,
    /// Cells holding no cohorts.
    pub empty_cells: usize,
}

impl GridStats {
    pub fn compute(grid: &CellGrid) -> Self {
        let mut stats = GridStats::default();
        for cell in grid.cells() {
            stats.cells += 1;
            stats.cohort_abundance += cell.cohort_abundance();
            if cell.cohort_count() == 0 {
                stats.empty_cells += 1;
            }
            match cell.realm {
                Realm::Terrestrial => stats.terrestrial.add_cell(cell),
                Realm::Marine => stats.marine.add_cell(cell),
            }
        }
        stats.cohorts = stats.terrestrial.cohorts + stats.marine.cohorts;
        stats.stocks = stats.terrestrial.stocks + stats.marine.stocks;
        stats.cohort_biomass = stats.terrestrial.cohort_biomass + stats.marine.cohort_biomass;
        stats.stock_biomass = stats.terrestrial.stock_biomass + stats.marine.stock_biomass;
        stats
    }

    /// Mean cohorts per cell.
    pub fn mean_cohorts_per_cell(&self) -> f64 {
        if self.cells == 0 {
            0.0
        } else {
            self.cohorts as f64 / self.cells as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use madingley_core::cohort::Cohort;
    use madingley_core::grid::ModelGrid;
    use madingley_core::stock::Stock;
    use madingley_core::types::{CellIndex, CohortId};

    #[test]
    fn totals_split_by_realm() {
        // Default layout: 6 x 8 cells, two western columns marine.
        let mut grid = CellGrid::new(&GridConfig::default(), 7, 3).unwrap();
        let land = grid.cell_mut(CellIndex::new(0, 5)).unwrap();
        land.add_cohort(Cohort::new(0, 0, 2.0, 20.0, 10.0, CohortId(1)));
        land.add_stock(Stock::new(0, 1.0, 500.0));
        let sea = grid.cell_mut(CellIndex::new(0, 0)).unwrap();
        sea.add_cohort(Cohort::new(5, 0, 0.5, 1.0, 4.0, CohortId(2)));

        let stats = GridStats::compute(&grid);
        assert_eq!(stats.cells, 48);
        assert_eq!(stats.marine.cells, 12);
        assert_eq!(stats.cohorts, 2);
        assert_eq!(stats.terrestrial.cohort_biomass, 20.0);
        assert_eq!(stats.marine.cohort_biomass, 2.0);
        assert_eq!(stats.cohort_biomass, 22.0);
        assert_eq!(stats.stock_biomass, 500.0);
        assert_eq!(stats.cohort_abundance, 14.0);
        assert_eq!(stats.empty_cells, 46);
        assert!((stats.mean_cohorts_per_cell() - 2.0 / 48.0).abs() < 1e-12);
    }
}
