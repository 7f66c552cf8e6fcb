//! Snapshot persistence: save and load the grid between runs.
//!
//! A snapshot holds the full grid (cells, cohorts, stocks, environment
//! layers) plus metadata describing the run that produced it.

use crate::grid_impl::CellGrid;
use madingley_core::error::Result;
use madingley_core::types::{Month, TimeStep};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Snapshot metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub run_id: String,
    pub time_step: TimeStep,
    pub month: Month,
    pub cell_count: usize,
    pub cohort_count: usize,
    pub stock_count: usize,
    #[serde(default)]
    pub total_dispersals: u64,
    /// Next unused cohort id.
    #[serde(default)]
    pub next_cohort_id: u64,
}

/// Serializable state of a model run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub metadata: SnapshotMetadata,
    pub grid: CellGrid,
}

impl GridSnapshot {
    /// Capture a grid. Each capture gets a fresh run id unless one is given.
    pub fn capture(
        grid: &CellGrid,
        run_id: Option<&str>,
        time_step: TimeStep,
        month: Month,
        total_dispersals: u64,
        next_cohort_id: u64,
    ) -> Self {
        Self {
            metadata: SnapshotMetadata {
                run_id: run_id
                    .map(str::to_string)
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                time_step,
                month,
                cell_count: grid.cells().len(),
                cohort_count: grid.total_cohorts(),
                stock_count: grid.total_stocks(),
                total_dispersals,
                next_cohort_id,
            },
            grid: grid.clone(),
        }
    }
}

/// Save a snapshot as pretty JSON, creating parent directories.
pub fn save_snapshot(snapshot: &GridSnapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a saved snapshot.
pub fn load_snapshot(path: &Path) -> Result<GridSnapshot> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use madingley_core::cohort::Cohort;
    use madingley_core::grid::ModelGrid;
    use madingley_core::types::{CellIndex, CohortId};

    #[test]
    fn snapshot_survives_disk() {
        let mut grid = CellGrid::new(&GridConfig::default(), 7, 3).unwrap();
        grid.cell_mut(CellIndex::new(2, 4))
            .unwrap()
            .add_cohort(Cohort::new(1, 3, 2.0, 20.0, 50.0, CohortId(17)));

        let snapshot = GridSnapshot::capture(&grid, None, 12, 0, 40, 18);
        assert!(uuid::Uuid::parse_str(&snapshot.metadata.run_id).is_ok());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snapshot.json");
        save_snapshot(&snapshot, &path).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded.metadata, snapshot.metadata);
        assert_eq!(loaded.metadata.cohort_count, 1);
        let cohort = loaded.grid.cell(CellIndex::new(2, 4)).unwrap().cohort(1, 0).unwrap();
        assert_eq!(cohort.id(), Some(CohortId(17)));
        assert_eq!(cohort.birth_time_step(), 3);
        // Marine cells keep their current layers.
        assert!(loaded
            .grid
            .cell(CellIndex::new(0, 0))
            .unwrap()
            .environment_value(madingley_core::grid::U_VELOCITY, 5)
            .is_some());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_snapshot(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, madingley_core::error::MadingleyError::Io(_)));
    }
}
