//! Show grid statistics.

use anyhow::{bail, Result};
use colored::Colorize;
use madingley::prelude::*;

use crate::config::current_snapshot_path;

fn print_realm(name: &str, realm: &madingley::runtime::metrics::RealmStats) {
    println!("{}", name.blue().bold());
    println!("  Cells:             {}", realm.cells.to_string().cyan());
    println!("  Cohorts:           {}", realm.cohorts.to_string().cyan());
    println!("  Stocks:            {}", realm.stocks.to_string().cyan());
    println!("  Cohort biomass:    {:.3e} g", realm.cohort_biomass);
    println!("  Stock biomass:     {:.3e} g", realm.stock_biomass);
    println!();
}

pub fn run() -> Result<()> {
    let snapshot_path = current_snapshot_path()?;

    if !snapshot_path.exists() {
        bail!("No snapshot found. Run {} first.", "madingley run".cyan());
    }

    let snapshot = load_snapshot(&snapshot_path)?;
    let meta = &snapshot.metadata;
    let stats = GridStats::compute(&snapshot.grid);

    println!("{}", "Madingley Grid Statistics".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Run".blue().bold());
    println!("  Run id:            {}", meta.run_id.dimmed());
    println!("  Time step:         {}", meta.time_step.to_string().cyan());
    println!("  Month:             {}", (meta.month + 1).to_string().cyan());
    println!("  Dispersals:        {}", meta.total_dispersals.to_string().cyan());
    println!();

    println!("{}", "Grid".blue().bold());
    println!(
        "  Size:              {} x {} cells",
        snapshot.grid.num_lat_cells(),
        snapshot.grid.num_lon_cells()
    );
    println!("  Cohorts:           {}", stats.cohorts.to_string().cyan());
    println!("  Empty cells:       {}", stats.empty_cells.to_string().cyan());
    println!("  Cohorts per cell:  {:.2}", stats.mean_cohorts_per_cell());
    println!("  Abundance:         {:.3e}", stats.cohort_abundance);
    println!();

    print_realm("Terrestrial", &stats.terrestrial);
    print_realm("Marine", &stats.marine);

    println!("{}", "═".repeat(40).dimmed());

    Ok(())
}
