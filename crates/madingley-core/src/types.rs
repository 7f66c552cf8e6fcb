//! Shared types used across the model grid and its processes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a cell in the grid: latitude row, longitude column.
///
/// Row 0 is the southernmost row, column 0 the westernmost column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    pub lat: usize,
    pub lon: usize,
}

impl CellIndex {
    pub fn new(lat: usize, lon: usize) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// Identifier carried by a cohort. Merged cohorts carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CohortId(pub u64);

/// Whether a cell (or a functional group) lives on land or in the ocean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Realm {
    Terrestrial,
    Marine,
}

impl Realm {
    /// Parse a functional-group trait value such as `"marine"`.
    pub fn from_trait(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "terrestrial" => Some(Realm::Terrestrial),
            "marine" => Some(Realm::Marine),
            _ => None,
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Realm::Terrestrial => write!(f, "terrestrial"),
            Realm::Marine => write!(f, "marine"),
        }
    }
}

/// Compass direction in which a cohort leaves or enters a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Direction of a one-cell step. `None` for a zero step.
    pub fn from_steps(lat_step: i32, lon_step: i32) -> Option<Self> {
        match (lat_step.signum(), lon_step.signum()) {
            (1, 0) => Some(Direction::North),
            (1, 1) => Some(Direction::NorthEast),
            (0, 1) => Some(Direction::East),
            (-1, 1) => Some(Direction::SouthEast),
            (-1, 0) => Some(Direction::South),
            (-1, -1) => Some(Direction::SouthWest),
            (0, -1) => Some(Direction::West),
            (1, -1) => Some(Direction::NorthWest),
            _ => None,
        }
    }

    /// The (lat, lon) step this direction represents.
    pub fn steps(&self) -> (i32, i32) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        let (lat, lon) = self.steps();
        // Every direction has an opposite, so the lookup cannot miss.
        Direction::from_steps(-lat, -lon).unwrap_or(*self)
    }

    /// Position in [`Direction::ALL`], used for per-direction counters.
    pub fn ordinal(&self) -> usize {
        match self {
            Direction::North => 0,
            Direction::NorthEast => 1,
            Direction::East => 2,
            Direction::SouthEast => 3,
            Direction::South => 4,
            Direction::SouthWest => 5,
            Direction::West => 6,
            Direction::NorthWest => 7,
        }
    }
}

/// The current discrete time step of the model.
pub type TimeStep = u64;

/// Calendar month, 0 (January) to 11 (December).
pub type Month = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_directions_cancel() {
        for dir in Direction::ALL {
            let (a_lat, a_lon) = dir.steps();
            let (b_lat, b_lon) = dir.opposite().steps();
            assert_eq!((a_lat + b_lat, a_lon + b_lon), (0, 0), "{:?}", dir);
        }
    }

    #[test]
    fn ordinals_follow_all() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.ordinal(), i);
        }
        assert_eq!(Direction::from_steps(0, 0), None);
        assert_eq!(Direction::from_steps(3, -2), Some(Direction::NorthWest));
    }

    #[test]
    fn realm_parses_trait_values() {
        assert_eq!(Realm::from_trait(" Marine "), Some(Realm::Marine));
        assert_eq!(Realm::from_trait("terrestrial"), Some(Realm::Terrestrial));
        assert_eq!(Realm::from_trait("freshwater"), None);
    }
}
