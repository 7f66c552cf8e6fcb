//! Time-step units and cell geometry.

use crate::error::MadingleyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DAYS_PER_YEAR: f64 = 365.25;
pub const MONTHS_PER_YEAR: f64 = 12.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Mean radius of the Earth (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// The length of one model time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStepUnit {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl TimeStepUnit {
    pub fn in_days(&self) -> f64 {
        match self {
            TimeStepUnit::Day => 1.0,
            TimeStepUnit::Week => 7.0,
            TimeStepUnit::Month => DAYS_PER_YEAR / MONTHS_PER_YEAR,
            TimeStepUnit::Year => DAYS_PER_YEAR,
        }
    }

    /// Length of one step in months. Dispersal speeds are per month.
    pub fn in_months(&self) -> f64 {
        match self {
            TimeStepUnit::Month => 1.0,
            TimeStepUnit::Year => MONTHS_PER_YEAR,
            other => other.in_days() * MONTHS_PER_YEAR / DAYS_PER_YEAR,
        }
    }

    pub fn in_seconds(&self) -> f64 {
        self.in_days() * SECONDS_PER_DAY
    }
}

impl fmt::Display for TimeStepUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeStepUnit::Day => "day",
            TimeStepUnit::Week => "week",
            TimeStepUnit::Month => "month",
            TimeStepUnit::Year => "year",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TimeStepUnit {
    type Err = MadingleyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimeStepUnit::Day),
            "week" => Ok(TimeStepUnit::Week),
            "month" => Ok(TimeStepUnit::Month),
            "year" => Ok(TimeStepUnit::Year),
            other => Err(MadingleyError::invalid_config(
                "time_step_unit",
                format!("unknown unit '{}'", other),
            )),
        }
    }
}

/// Length of one degree of latitude (km).
pub fn km_per_degree_latitude() -> f64 {
    EARTH_RADIUS_KM * std::f64::consts::PI / 180.0
}

/// Length of one degree of longitude at a latitude (km).
pub fn km_per_degree_longitude(latitude: f64) -> f64 {
    km_per_degree_latitude() * latitude.to_radians().cos()
}

/// Area of a lat/lon cell on the sphere (km²).
pub fn cell_area_km2(bottom_latitude: f64, cell_size_degrees: f64) -> f64 {
    let top = (bottom_latitude + cell_size_degrees).clamp(-90.0, 90.0);
    let bottom = bottom_latitude.clamp(-90.0, 90.0);
    EARTH_RADIUS_KM.powi(2)
        * cell_size_degrees.to_radians()
        * (top.to_radians().sin() - bottom.to_radians().sin()).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_conversions() {
        assert_eq!(TimeStepUnit::Month.in_months(), 1.0);
        assert_eq!(TimeStepUnit::Year.in_months(), 12.0);
        let week = TimeStepUnit::Week.in_months();
        assert!((week - 7.0 * 12.0 / 365.25).abs() < 1e-12);
        assert!((TimeStepUnit::Day.in_seconds() - 86_400.0).abs() < 1e-9);
    }

    #[test]
    fn parse_units() {
        assert_eq!("Month".parse::<TimeStepUnit>().unwrap(), TimeStepUnit::Month);
        assert_eq!(" year ".parse::<TimeStepUnit>().unwrap(), TimeStepUnit::Year);
        assert!("fortnight".parse::<TimeStepUnit>().is_err());
    }

    #[test]
    fn equatorial_cell_is_roughly_square() {
        let height = km_per_degree_latitude();
        let width = km_per_degree_longitude(0.5);
        let area = cell_area_km2(0.0, 1.0);
        assert!((height - 111.19).abs() < 0.01);
        assert!((area - height * width).abs() / area < 1e-3);
    }

    #[test]
    fn cells_shrink_towards_the_poles() {
        assert!(cell_area_km2(60.0, 1.0) < cell_area_km2(0.0, 1.0) / 1.9);
        assert!(km_per_degree_longitude(89.9) < 1.0);
    }
}
