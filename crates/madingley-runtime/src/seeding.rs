//! Initial population seeding.
//!
//! Every cell receives cohorts and stocks of the functional groups that live
//! in its realm. Cohort adult masses are drawn log-uniformly between the
//! group's minimum and maximum mass, so small and large animals are equally
//! represented per order of magnitude.

use crate::config::SeedingConfig;
use madingley_core::cohort::Cohort;
use madingley_core::error::{MadingleyError, Result};
use madingley_core::functional_group::{
    FunctionalGroupDefinitions, INDIVIDUAL_MASS, INITIAL_BIOMASS_DENSITY, MAXIMUM_MASS, MINIMUM_MASS,
};
use madingley_core::grid::ModelGrid;
use madingley_core::stock::Stock;
use madingley_core::types::{CohortId, Realm};
use rand::Rng;
use tracing::{debug, warn};

/// What seeding put on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub cohorts: usize,
    pub stocks: usize,
    /// Next unused cohort id.
    pub next_cohort_id: u64,
}

#[derive(Debug, Clone, Copy)]
struct CohortTemplate {
    group: usize,
    realm: Realm,
    minimum_mass: f64,
    maximum_mass: f64,
    density: f64,
}

#[derive(Debug, Clone, Copy)]
struct StockTemplate {
    group: usize,
    realm: Realm,
    individual_mass: f64,
    density: f64,
}

fn cohort_templates(definitions: &FunctionalGroupDefinitions) -> Result<Vec<CohortTemplate>> {
    let mut templates = Vec::new();
    for (group, definition) in definitions.iter().enumerate() {
        let Some(realm) = definitions.realm(group) else {
            warn!("Cohort group '{}' has no realm; not seeding it", definition.name);
            continue;
        };
        let (Some(minimum_mass), Some(maximum_mass), Some(density)) = (
            definition.property(MINIMUM_MASS),
            definition.property(MAXIMUM_MASS),
            definition.property(INITIAL_BIOMASS_DENSITY),
        ) else {
            warn!("Cohort group '{}' lacks mass or density properties; not seeding it", definition.name);
            continue;
        };
        if !(minimum_mass > 0.0 && maximum_mass >= minimum_mass) {
            return Err(MadingleyError::invalid_config(
                format!("cohort_groups[{}]", group),
                format!("mass range {}..{} is not positive and ordered", minimum_mass, maximum_mass),
            ));
        }
        check_density(format!("cohort_groups[{}]", group), density)?;
        templates.push(CohortTemplate {
            group,
            realm,
            minimum_mass,
            maximum_mass,
            density,
        });
    }
    Ok(templates)
}

fn stock_templates(definitions: &FunctionalGroupDefinitions) -> Result<Vec<StockTemplate>> {
    let mut templates = Vec::new();
    for (group, definition) in definitions.iter().enumerate() {
        let realm = definitions.realm(group);
        let mass = definition.property(INDIVIDUAL_MASS);
        let density = definition.property(INITIAL_BIOMASS_DENSITY);
        let (Some(realm), Some(individual_mass), Some(density)) = (realm, mass, density) else {
            warn!("Stock group '{}' is incomplete; not seeding it", definition.name);
            continue;
        };
        let field = format!("stock_groups[{}]", group);
        if !(individual_mass.is_finite() && individual_mass > 0.0) {
            return Err(MadingleyError::invalid_config(
                field,
                format!("individual mass {} is not positive", individual_mass),
            ));
        }
        check_density(field, density)?;
        templates.push(StockTemplate {
            group,
            realm,
            individual_mass,
            density,
        });
    }
    Ok(templates)
}

fn check_density(field: String, density: f64) -> Result<()> {
    if density.is_finite() && density >= 0.0 {
        Ok(())
    } else {
        Err(MadingleyError::invalid_config(
            field,
            format!("initial biomass density {} is negative or not finite", density),
        ))
    }
}

fn log_uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low.ln()..high.ln()).exp()
    } else {
        low
    }
}

/// Seed every cell of the grid. Cohort ids start at `first_cohort_id`.
pub fn seed_grid<R: Rng + ?Sized>(
    grid: &mut dyn ModelGrid,
    cohort_definitions: &FunctionalGroupDefinitions,
    stock_definitions: &FunctionalGroupDefinitions,
    seeding: &SeedingConfig,
    first_cohort_id: u64,
    rng: &mut R,
) -> Result<SeedSummary> {
    let cohort_templates = cohort_templates(cohort_definitions)?;
    let stock_templates = stock_templates(stock_definitions)?;

    let mut summary = SeedSummary {
        next_cohort_id: first_cohort_id,
        ..Default::default()
    };
    let per_group = seeding.cohorts_per_group;

    for index in grid.cell_indices() {
        let cell = grid
            .cell_mut(index)
            .ok_or(MadingleyError::CellOutOfBounds { cell: index })?;
        let area = cell.area_km2;
        let realm = cell.realm;

        if per_group > 0 {
            for t in cohort_templates.iter().filter(|t| t.realm == realm) {
                let biomass_each = t.density * area / per_group as f64;
                for _ in 0..per_group {
                    let adult_mass = log_uniform(rng, t.minimum_mass, t.maximum_mass);
                    let juvenile_mass = adult_mass * seeding.juvenile_fraction;
                    let abundance = biomass_each / juvenile_mass;
                    let id = CohortId(summary.next_cohort_id);
                    summary.next_cohort_id += 1;
                    cell.add_cohort(Cohort::new(t.group, 0, juvenile_mass, adult_mass, abundance, id));
                    summary.cohorts += 1;
                }
            }
        }

        for t in stock_templates.iter().filter(|t| t.realm == realm) {
            cell.add_stock(Stock::new(t.group, t.individual_mass, t.density * area));
            summary.stocks += 1;
        }
    }

    debug!("Seeded {} cohorts and {} stocks", summary.cohorts, summary.stocks);
    Ok(summary)
}
