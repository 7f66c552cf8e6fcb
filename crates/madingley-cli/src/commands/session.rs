//! Named snapshot management.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use madingley::prelude::*;

use crate::config::{current_snapshot_path, sessions_dir};

pub fn save(name: &str) -> Result<()> {
    let current_path = current_snapshot_path()?;

    if !current_path.exists() {
        bail!("No active snapshot. Run {} first.", "madingley run".cyan());
    }

    let sessions = sessions_dir()?;
    std::fs::create_dir_all(&sessions)?;

    let session_path = sessions.join(format!("{}.json", name));
    std::fs::copy(&current_path, &session_path)
        .with_context(|| format!("Failed to save session: {}", name))?;

    println!("{} Session saved: {}", "✓".green().bold(), name.cyan());

    Ok(())
}

pub fn load(name: &str) -> Result<()> {
    let sessions = sessions_dir()?;
    let session_path = sessions.join(format!("{}.json", name));

    if !session_path.exists() {
        bail!("Session not found: {}", name);
    }

    // Parse before copying so a corrupt file never becomes current
    let snapshot = load_snapshot(&session_path)
        .with_context(|| format!("Failed to read session: {}", name))?;

    let current_path = current_snapshot_path()?;
    std::fs::copy(&session_path, &current_path)
        .with_context(|| format!("Failed to load session: {}", name))?;

    println!("{} Session loaded: {}", "✓".green().bold(), name.cyan());
    println!("  Time step: {}", snapshot.metadata.time_step.to_string().cyan());
    println!("  Cohorts:   {}", snapshot.metadata.cohort_count.to_string().cyan());

    Ok(())
}

pub fn list() -> Result<()> {
    let sessions = sessions_dir()?;

    if !sessions.exists() {
        println!("{} No saved sessions.", "•".yellow());
        return Ok(());
    }

    let mut found = false;
    println!("{} Saved sessions:", "→".blue());
    println!();

    let mut paths: Vec<_> = std::fs::read_dir(&sessions)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|e| e == "json"))
        .collect();
    paths.sort();

    for path in paths {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        if let Ok(snapshot) = load_snapshot(&path) {
            println!(
                "  {} {} (time step {}, {} cohorts)",
                "•".blue(),
                name.white().bold(),
                snapshot.metadata.time_step,
                snapshot.metadata.cohort_count
            );
            found = true;
        }
    }

    if !found {
        println!("  {} No saved sessions.", "•".yellow());
    }

    Ok(())
}
