//! Initialize a new Madingley project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE, DATA_DIR};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    println!("{} Initializing Madingley project...", "→".blue());

    // Create .madingley directory
    let data_dir = base_path.join(DATA_DIR);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    println!("  {} Created {}", "✓".green(), data_dir.display());

    let sessions_dir = data_dir.join("sessions");
    std::fs::create_dir_all(&sessions_dir)
        .with_context(|| format!("Failed to create {}", sessions_dir.display()))?;
    println!("  {} Created {}", "✓".green(), sessions_dir.display());

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    let gitignore_path = data_dir.join(".gitignore");
    if !gitignore_path.exists() {
        std::fs::write(&gitignore_path, "current.json\nsessions/\n")?;
        println!("  {} Created {}", "✓".green(), gitignore_path.display());
    }

    println!();
    println!("{} Madingley project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} edit {} to shape the grid", "1.".blue(), CONFIG_FILE);
    println!("  {} madingley run --steps 12", "2.".blue());
    println!("  {} madingley stats", "3.".blue());

    Ok(())
}
