//! Audit trail of committed cross-cell moves.

use madingley_core::error::Result;
use madingley_core::process::{DispersalRecord, ProcessTracker};
use madingley_core::types::{CellIndex, Direction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Dispersal traffic through one cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellFlow {
    pub inbound: u64,
    pub outbound: u64,
    pub biomass_in: f64,
    pub biomass_out: f64,
    /// Departures per exit edge, indexed by [`Direction::ordinal`].
    pub exits: [u64; 8],
}

impl CellFlow {
    pub fn exits_towards(&self, direction: Direction) -> u64 {
        self.exits[direction.ordinal()]
    }

    /// Cohorts gained minus cohorts lost.
    pub fn net(&self) -> i64 {
        self.inbound as i64 - self.outbound as i64
    }
}

#[derive(Serialize)]
struct TrackerExport<'a> {
    records: &'a [DispersalRecord],
    flows: Vec<(CellIndex, &'a CellFlow)>,
}

/// The default [`ProcessTracker`]. Does nothing unless tracking is on.
#[derive(Debug, Default)]
pub struct CrossCellProcessTracker {
    tracking: bool,
    records: Vec<DispersalRecord>,
    flows: BTreeMap<CellIndex, CellFlow>,
}

impl CrossCellProcessTracker {
    pub fn new(tracking: bool) -> Self {
        Self {
            tracking,
            ..Default::default()
        }
    }

    pub fn flows(&self, cell: CellIndex) -> Option<&CellFlow> {
        self.flows.get(&cell)
    }

    pub fn records(&self) -> &[DispersalRecord] {
        &self.records
    }

    pub fn total_dispersals(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.flows.clear();
    }

    /// Write the records and per-cell flows as pretty JSON.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        // JSON object keys must be strings, so flows go out as pairs.
        let export = TrackerExport {
            records: &self.records,
            flows: self.flows.iter().map(|(k, v)| (*k, v)).collect(),
        };
        let json = serde_json::to_string_pretty(&export)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl ProcessTracker for CrossCellProcessTracker {
    fn is_tracking(&self) -> bool {
        self.tracking
    }

    fn record_dispersal(&mut self, record: &DispersalRecord) {
        if !self.tracking {
            return;
        }

        let out = self.flows.entry(record.origin).or_default();
        out.outbound += 1;
        out.biomass_out += record.biomass;
        out.exits[record.exit.ordinal()] += 1;

        let inflow = self.flows.entry(record.destination).or_default();
        inflow.inbound += 1;
        inflow.biomass_in += record.biomass;

        self.records.push(record.clone());
    }
}
