//! # Madingley Core
//!
//! Core types and seam traits for cross-grid-cell ecology in a
//! Madingley-style general ecosystem model.
//!
//! The model tracks animal biomass as **cohorts** and plant biomass as
//! **stocks**, both grouped by functional group inside the cells of a
//! regular latitude/longitude grid. This crate defines:
//!
//! - **Biomass holders**: [`stock::Stock`] and [`cohort::Cohort`]
//! - **Functional groups**: trait/property tables ([`functional_group`])
//! - **The grid seam**: [`grid::ModelGrid`] and the per-cell [`grid::GridCell`]
//! - **The process seams**: [`process::CrossCellProcess`] (formulations that
//!   stage cross-cell effects), [`process::CrossCellApply`] (commits them) and
//!   [`process::ProcessTracker`] (audits them)
//! - **Units**: time-step conversions and cell geometry ([`units`])
//!
//! ## Quick Start
//!
//! ```rust
//! use madingley_core::prelude::*;
//!
//! let mut stock = Stock::new(2, 1.5, 100.0);
//! let snapshot = stock.clone();
//! stock.total_biomass = 250.0;
//!
//! assert_eq!(stock.functional_group_index(), 2);
//! assert_eq!(snapshot.total_biomass, 100.0);
//! ```

pub mod cohort;
pub mod error;
pub mod functional_group;
pub mod grid;
pub mod init;
pub mod process;
pub mod stock;
pub mod types;
pub mod units;
pub mod prelude;
