//! # Madingley Runtime
//!
//! Grid, dispersal, and time-step runtime.
//!
//! The runtime owns the in-memory grid, seeds it with cohorts and stocks,
//! and drives cross-grid-cell ecology once per time step: every cell stages
//! its dispersals through the [`ecology::EcologyCrossGridCell`] coordinator,
//! then a single update commits them.

pub mod apply;
pub mod config;
pub mod dispersal;
pub mod ecology;
pub mod grid_impl;
pub mod metrics;
pub mod model;
pub mod seeding;
pub mod session;
pub mod tracker;
pub mod prelude;
