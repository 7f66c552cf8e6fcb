//! Stock: aggregate plant biomass of one functional group in one cell.

use serde::{Deserialize, Serialize};

/// The aggregate biomass of one stock functional group within a grid cell.
///
/// Stocks are not tracked as individuals. The functional group index is
/// fixed at construction; mass and biomass are updated in place by the
/// ecological processes that own the cell. `Clone` produces an independent
/// snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    functional_group_index: usize,
    /// Mean body mass of an individual in the stock (g).
    pub individual_body_mass: f64,
    /// Total biomass of the stock (g).
    pub total_biomass: f64,
}

impl Stock {
    pub fn new(functional_group_index: usize, individual_body_mass: f64, total_biomass: f64) -> Self {
        Self {
            functional_group_index,
            individual_body_mass,
            total_biomass,
        }
    }

    pub fn functional_group_index(&self) -> usize {
        self.functional_group_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_sets_all_fields() {
        let stock = Stock::new(2, 1.5, 100.0);
        assert_eq!(stock.functional_group_index(), 2);
        assert_eq!(stock.individual_body_mass, 1.5);
        assert_eq!(stock.total_biomass, 100.0);
    }

    #[test]
    fn mutation_leaves_functional_group_alone() {
        let mut stock = Stock::new(7, 3.0, 40.0);
        stock.individual_body_mass = 9.0;
        stock.total_biomass = 0.0;
        assert_eq!(stock.functional_group_index(), 7);
    }

    #[test]
    fn clone_is_independent() {
        let mut original = Stock::new(2, 1.5, 100.0);
        let mut copy = original.clone();
        assert_eq!(copy, original);

        original.total_biomass = 250.0;
        assert_eq!(copy.total_biomass, 100.0);

        copy.individual_body_mass = 4.0;
        assert_eq!(original.individual_body_mass, 1.5);
        assert_eq!(copy.functional_group_index(), original.functional_group_index());
    }
}
