//! Functional-group definitions: the trait and property tables shared by
//! every cohort or stock of a group.
//!
//! Traits are categorical (`realm = marine`), properties are numeric
//! (`maximum mass = 1000000`). Trait names and values compare
//! case-insensitively.

use crate::types::Realm;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trait naming the realm a group lives in.
pub const REALM: &str = "realm";
/// Trait distinguishing actively moving groups from planktonic drifters.
pub const MOBILITY: &str = "mobility";
pub const NUTRITION_SOURCE: &str = "nutrition source";
pub const THERMOREGULATION: &str = "thermoregulation";

/// Smallest adult body mass in the group (g).
pub const MINIMUM_MASS: &str = "minimum mass";
/// Largest adult body mass in the group (g).
pub const MAXIMUM_MASS: &str = "maximum mass";
/// Biomass per unit area used when seeding a cell (g/km²).
pub const INITIAL_BIOMASS_DENSITY: &str = "initial biomass density";
/// Mean individual mass of a stock (g).
pub const INDIVIDUAL_MASS: &str = "individual mass";

/// One functional group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalGroup {
    pub name: String,
    #[serde(default)]
    pub traits: BTreeMap<String, String>,
    #[serde(default)]
    pub properties: BTreeMap<String, f64>,
}

impl FunctionalGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            traits: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_trait(mut self, name: &str, value: &str) -> Self {
        self.traits
            .insert(name.to_ascii_lowercase(), value.to_ascii_lowercase());
        self
    }

    pub fn with_property(mut self, name: &str, value: f64) -> Self {
        self.properties.insert(name.to_ascii_lowercase(), value);
        self
    }

    pub fn trait_value(&self, name: &str) -> Option<&str> {
        self.traits
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn property(&self, name: &str) -> Option<f64> {
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

/// The ordered table of functional groups for cohorts or for stocks.
///
/// A group's index is its position in the table; cohorts and stocks store
/// that index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionalGroupDefinitions {
    groups: Vec<FunctionalGroup>,
}

impl FunctionalGroupDefinitions {
    pub fn new(groups: Vec<FunctionalGroup>) -> Self {
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FunctionalGroup> {
        self.groups.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionalGroup> {
        self.groups.iter()
    }

    /// Indices of every group whose trait equals `value`.
    pub fn indices_with_trait(&self, trait_name: &str, value: &str) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| {
                g.trait_value(trait_name)
                    .is_some_and(|v| v.eq_ignore_ascii_case(value.trim()))
            })
            .map(|(i, _)| i)
            .collect()
    }

    pub fn trait_value(&self, trait_name: &str, index: usize) -> Option<&str> {
        self.get(index)?.trait_value(trait_name)
    }

    pub fn property(&self, name: &str, index: usize) -> Option<f64> {
        self.get(index)?.property(name)
    }

    /// Realm of a group; `None` when the trait is missing or unrecognised.
    pub fn realm(&self, index: usize) -> Option<Realm> {
        self.trait_value(REALM, index).and_then(Realm::from_trait)
    }

    pub fn is_planktonic(&self, index: usize) -> bool {
        self.trait_value(MOBILITY, index)
            .is_some_and(|v| v.eq_ignore_ascii_case("planktonic"))
    }

    /// The default cohort groups: terrestrial endotherms and ectotherms of
    /// each diet, plus marine mobile carnivores and planktonic herbivores.
    pub fn default_cohorts() -> Self {
        let animal = |name: &str, realm: &str, diet: &str, thermo: &str, mobility: &str| {
            FunctionalGroup::new(name)
                .with_trait(REALM, realm)
                .with_trait(NUTRITION_SOURCE, diet)
                .with_trait(THERMOREGULATION, thermo)
                .with_trait(MOBILITY, mobility)
        };

        Self::new(vec![
            animal("terrestrial herbivorous endotherms", "terrestrial", "herbivore", "endotherm", "mobile")
                .with_property(MINIMUM_MASS, 1.5)
                .with_property(MAXIMUM_MASS, 5.0e6)
                .with_property(INITIAL_BIOMASS_DENSITY, 1.0e6),
            animal("terrestrial carnivorous endotherms", "terrestrial", "carnivore", "endotherm", "mobile")
                .with_property(MINIMUM_MASS, 1.5)
                .with_property(MAXIMUM_MASS, 7.0e5)
                .with_property(INITIAL_BIOMASS_DENSITY, 5.0e4),
            animal("terrestrial omnivorous endotherms", "terrestrial", "omnivore", "endotherm", "mobile")
                .with_property(MINIMUM_MASS, 1.5)
                .with_property(MAXIMUM_MASS, 1.5e5)
                .with_property(INITIAL_BIOMASS_DENSITY, 2.0e5),
            animal("terrestrial herbivorous ectotherms", "terrestrial", "herbivore", "ectotherm", "mobile")
                .with_property(MINIMUM_MASS, 0.4)
                .with_property(MAXIMUM_MASS, 4.0e5)
                .with_property(INITIAL_BIOMASS_DENSITY, 2.0e5),
            animal("terrestrial carnivorous ectotherms", "terrestrial", "carnivore", "ectotherm", "mobile")
                .with_property(MINIMUM_MASS, 1.0)
                .with_property(MAXIMUM_MASS, 2.0e5)
                .with_property(INITIAL_BIOMASS_DENSITY, 2.0e4),
            animal("marine planktonic herbivores", "marine", "herbivore", "ectotherm", "planktonic")
                .with_property(MINIMUM_MASS, 1.0e-5)
                .with_property(MAXIMUM_MASS, 10.0)
                .with_property(INITIAL_BIOMASS_DENSITY, 5.0e5),
            animal("marine mobile carnivores", "marine", "carnivore", "ectotherm", "mobile")
                .with_property(MINIMUM_MASS, 10.0)
                .with_property(MAXIMUM_MASS, 1.0e6)
                .with_property(INITIAL_BIOMASS_DENSITY, 1.0e5),
        ])
    }

    /// The default stock groups: two terrestrial autotrophs and marine
    /// phytoplankton.
    pub fn default_stocks() -> Self {
        let plant = |name: &str, realm: &str, mass: f64, density: f64| {
            FunctionalGroup::new(name)
                .with_trait(REALM, realm)
                .with_trait(NUTRITION_SOURCE, "autotroph")
                .with_property(INDIVIDUAL_MASS, mass)
                .with_property(INITIAL_BIOMASS_DENSITY, density)
        };

        Self::new(vec![
            plant("terrestrial deciduous autotrophs", "terrestrial", 1.0, 1.0e8),
            plant("terrestrial evergreen autotrophs", "terrestrial", 1.0, 1.0e8),
            plant("marine phytoplankton", "marine", 1.0e-6, 1.0e7),
        ])
    }
}
