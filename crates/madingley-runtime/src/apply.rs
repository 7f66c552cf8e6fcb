//! Committing staged cross-cell effects into the grid.
//!
//! Runs once per time step, after every cell has been visited:
//! 1. Collect each cell's staged dispersals, dropping repeats of a cohort
//! 2. Check that every source cohort and destination cell exists
//! 3. Clear the staging lists
//! 4. Remove the moving cohorts, highest index first within each group
//! 5. Append them to their destinations and report them to the tracker
//!
//! Validation happens before anything is cleared or removed. On a bad
//! staging the cohorts and every staged entry are left as they were.

use madingley_core::error::{MadingleyError, Result};
use madingley_core::grid::{ModelGrid, PendingDispersal};
use madingley_core::process::{CrossCellApply, DispersalRecord, ProcessTracker};
use madingley_core::types::{CellIndex, TimeStep};
use std::collections::HashSet;
use tracing::{debug, warn};

/// The default results applier.
#[derive(Debug, Default)]
pub struct CrossCellApplier;

impl CrossCellApplier {
    pub fn new() -> Self {
        Self
    }

    fn collect(grid: &dyn ModelGrid) -> Result<Vec<(CellIndex, PendingDispersal)>> {
        let mut staged = Vec::new();
        for cell in grid.cell_indices() {
            let pending = grid
                .cell(cell)
                .ok_or(MadingleyError::CellOutOfBounds { cell })?
                .pending_dispersals();

            let mut seen = HashSet::new();
            for p in pending {
                if seen.insert((p.functional_group, p.cohort_index)) {
                    staged.push((cell, p.clone()));
                } else {
                    warn!(
                        "Cohort {} of group {} in cell {} staged twice; keeping the first move",
                        p.cohort_index, p.functional_group, cell
                    );
                }
            }
        }
        Ok(staged)
    }

    fn clear(grid: &mut dyn ModelGrid) {
        for cell in grid.cell_indices() {
            if let Some(c) = grid.cell_mut(cell) {
                c.take_pending_dispersals();
            }
        }
    }

    fn validate(grid: &dyn ModelGrid, staged: &[(CellIndex, PendingDispersal)]) -> Result<()> {
        for (origin, p) in staged {
            let source = grid
                .cell(*origin)
                .ok_or(MadingleyError::CellOutOfBounds { cell: *origin })?;
            if source.cohort(p.functional_group, p.cohort_index).is_none() {
                return Err(MadingleyError::cohort_not_found(
                    *origin,
                    p.functional_group,
                    p.cohort_index,
                ));
            }
            if grid.cell(p.destination).is_none() {
                return Err(MadingleyError::CellOutOfBounds {
                    cell: p.destination,
                });
            }
        }
        Ok(())
    }
}

impl CrossCellApply for CrossCellApplier {
    fn apply(
        &mut self,
        grid: &mut dyn ModelGrid,
        tracker: &mut dyn ProcessTracker,
        current_time_step: TimeStep,
    ) -> Result<u64> {
        let mut staged = Self::collect(grid)?;
        if staged.is_empty() {
            return Ok(0);
        }
        Self::validate(grid, &staged)?;
        Self::clear(grid);

        // Highest index first, so earlier indices in the group stay valid.
        staged.sort_by(|(a_cell, a), (b_cell, b)| {
            (b_cell, b.functional_group, b.cohort_index).cmp(&(a_cell, a.functional_group, a.cohort_index))
        });

        let mut moving = Vec::with_capacity(staged.len());
        for (origin, p) in staged {
            let cohort = grid
                .cell_mut(origin)
                .and_then(|c| c.remove_cohort(p.functional_group, p.cohort_index))
                .ok_or_else(|| MadingleyError::cohort_not_found(origin, p.functional_group, p.cohort_index))?;
            moving.push((origin, p, cohort));
        }

        let mut moved = 0u64;
        // Reversed: cohorts arrive in their original order.
        for (origin, p, cohort) in moving.into_iter().rev() {
            if tracker.is_tracking() {
                tracker.record_dispersal(&DispersalRecord {
                    time_step: current_time_step,
                    origin,
                    destination: p.destination,
                    exit: p.exit,
                    entry: p.entry,
                    functional_group: p.functional_group,
                    cohort_id: cohort.id(),
                    abundance: cohort.abundance,
                    individual_body_mass: cohort.individual_body_mass,
                    biomass: cohort.biomass(),
                });
            }
            grid.cell_mut(p.destination)
                .ok_or(MadingleyError::CellOutOfBounds { cell: p.destination })?
                .add_cohort(cohort);
            moved += 1;
        }

        debug!("Time step {}: committed {} dispersals", current_time_step, moved);
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, RealmLayout};
    use crate::grid_impl::CellGrid;
    use crate::tracker::CrossCellProcessTracker;
    use madingley_core::cohort::Cohort;
    use madingley_core::types::{CohortId, Direction};

    fn grid() -> CellGrid {
        let config = GridConfig {
            num_lat_cells: 2,
            num_lon_cells: 2,
            bottom_latitude: 0.0,
            realm_layout: RealmLayout::AllTerrestrial,
            ..Default::default()
        };
        let mut g = CellGrid::new(&config, 2, 0).unwrap();
        for i in 0..4 {
            g.cell_mut(CellIndex::new(0, 0))
                .unwrap()
                .add_cohort(Cohort::new(0, 0, 1.0, 10.0, 10.0, CohortId(i)));
        }
        g
    }

    fn east(index: usize) -> PendingDispersal {
        PendingDispersal {
            functional_group: 0,
            cohort_index: index,
            destination: CellIndex::new(0, 1),
            exit: Direction::East,
            entry: Direction::West,
        }
    }

    #[test]
    fn moves_staged_cohorts_and_counts_them() {
        let mut g = grid();
        let origin = CellIndex::new(0, 0);
        g.cell_mut(origin).unwrap().stage_dispersal(east(1));
        g.cell_mut(origin).unwrap().stage_dispersal(east(3));

        let mut tracker = CrossCellProcessTracker::new(true);
        let moved = CrossCellApplier::new().apply(&mut g, &mut tracker, 7).unwrap();
        assert_eq!(moved, 2);

        let source: Vec<_> = g.cell(origin).unwrap().cohorts(0).iter().filter_map(Cohort::id).collect();
        assert_eq!(source, vec![CohortId(0), CohortId(2)]);
        let dest: Vec<_> = g
            .cell(CellIndex::new(0, 1))
            .unwrap()
            .cohorts(0)
            .iter()
            .filter_map(Cohort::id)
            .collect();
        assert_eq!(dest, vec![CohortId(1), CohortId(3)]);

        assert_eq!(tracker.records().len(), 2);
        assert!(tracker.records().iter().all(|r| r.time_step == 7));
        assert!(g.cell(origin).unwrap().pending_dispersals().is_empty());
    }

    #[test]
    fn duplicate_stagings_move_once() {
        let mut g = grid();
        let origin = CellIndex::new(0, 0);
        g.cell_mut(origin).unwrap().stage_dispersal(east(0));
        g.cell_mut(origin).unwrap().stage_dispersal(east(0));

        let mut tracker = CrossCellProcessTracker::new(false);
        let moved = CrossCellApplier::new().apply(&mut g, &mut tracker, 0).unwrap();
        assert_eq!(moved, 1);
        assert_eq!(g.total_cohorts(), 4);
        assert!(tracker.records().is_empty());
    }

    #[test]
    fn bad_staging_leaves_grid_untouched() {
        let mut g = grid();
        let origin = CellIndex::new(0, 0);
        g.cell_mut(origin).unwrap().stage_dispersal(east(0));
        g.cell_mut(origin).unwrap().stage_dispersal(east(9));

        let mut tracker = CrossCellProcessTracker::new(true);
        let err = CrossCellApplier::new().apply(&mut g, &mut tracker, 0).unwrap_err();
        assert!(matches!(err, MadingleyError::CohortNotFound { index: 9, .. }));
        assert_eq!(g.cell(origin).unwrap().cohort_count(), 4);
        assert!(tracker.records().is_empty());
        assert_eq!(g.cell(origin).unwrap().pending_dispersals(), &[east(0), east(9)]);
    }

    #[test]
    fn staging_survives_a_failed_apply() {
        let mut g = grid();
        let origin = CellIndex::new(0, 0);
        g.cell_mut(origin).unwrap().stage_dispersal(east(2));
        g.cell_mut(CellIndex::new(1, 1)).unwrap().stage_dispersal(east(0));

        let mut tracker = CrossCellProcessTracker::new(false);
        let mut applier = CrossCellApplier::new();
        assert!(applier.apply(&mut g, &mut tracker, 0).is_err());
        assert_eq!(g.cell(origin).unwrap().pending_dispersals().len(), 1);

        // Once the bad entry is gone the valid one still commits.
        g.cell_mut(CellIndex::new(1, 1)).unwrap().take_pending_dispersals();
        assert_eq!(applier.apply(&mut g, &mut tracker, 0).unwrap(), 1);
        assert!(g.cell(origin).unwrap().pending_dispersals().is_empty());
    }

    #[test]
    fn nothing_staged_is_a_no_op() {
        let mut g = grid();
        let mut tracker = CrossCellProcessTracker::new(true);
        assert_eq!(CrossCellApplier::new().apply(&mut g, &mut tracker, 0).unwrap(), 0);
    }
}
