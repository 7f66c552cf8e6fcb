//! Run the model.

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use madingley::prelude::*;
use std::path::Path;
use tracing::{info, warn};

use crate::config::{current_snapshot_path, Config};

pub fn run(steps: Option<u64>, fresh: bool, dispersal_log: Option<String>, verbose: bool) -> Result<()> {
    let mut config = Config::load()?;
    if dispersal_log.is_some() {
        config.model.initialisation.track_dispersal = true;
    }
    let steps = steps.unwrap_or(config.run.steps);
    let snapshot_path = current_snapshot_path()?;

    let mut model = if !fresh && snapshot_path.exists() {
        println!("{} Resuming {}...", "→".blue(), snapshot_path.display());
        let snapshot = load_snapshot(&snapshot_path)
            .with_context(|| format!("Failed to load {}", snapshot_path.display()))?;
        if !snapshot.grid.matches_config(&config.model.grid) {
            warn!("[model.grid] differs from the saved grid; using the saved grid");
            println!(
                "  {} The saved grid differs from [model.grid]; ignoring the config. Use --fresh to reseed.",
                "•".yellow()
            );
        }
        MadingleyModel::from_snapshot(config.model, snapshot)?
    } else {
        println!("{} Seeding a new grid...", "→".blue());
        MadingleyModel::from_config(config.model)?
    };

    let initial = model.stats();
    println!(
        "  Grid: {} cells, {} cohorts, {} stocks (time step {})",
        initial.cells.to_string().cyan(),
        initial.cohorts.to_string().cyan(),
        initial.stocks.to_string().cyan(),
        model.time_step().to_string().cyan()
    );

    println!(
        "{} Running {} time steps...",
        "→".blue(),
        steps.to_string().cyan()
    );

    let pb = ProgressBar::new(steps);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} steps")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let mut dispersals = 0u64;
    for _ in 0..steps {
        let report = model.step()?;
        dispersals += report.dispersals;
        if verbose {
            pb.println(format!(
                "  step {} (month {}): {} dispersals",
                report.time_step, report.month, report.dispersals
            ));
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    save_snapshot(&model.snapshot(), &snapshot_path)
        .with_context(|| format!("Failed to save {}", snapshot_path.display()))?;
    info!("Snapshot of run {} saved to {}", model.run_id(), snapshot_path.display());

    if let Some(log) = dispersal_log {
        model
            .tracker()
            .export_json(Path::new(&log))
            .with_context(|| format!("Failed to write dispersal log: {}", log))?;
        println!("  {} Dispersal log written to {}", "✓".green(), log);
    }

    let last = model.stats();
    println!();
    println!("{} Run complete!", "✓".green().bold());
    println!("  Dispersals:      {}", dispersals.to_string().green());
    println!(
        "  Cohorts:         {} → {}",
        initial.cohorts.to_string().yellow(),
        last.cohorts.to_string().green()
    );
    println!(
        "  Cohort biomass:  {:.3e} g → {:.3e} g",
        initial.cohort_biomass, last.cohort_biomass
    );

    Ok(())
}
