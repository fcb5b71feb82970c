use super::GlobalOptions;
use crate::display;
use anyhow::Result;
use colored::Colorize;
use dirmanifest_core::ManifestGenerator;
use std::path::PathBuf;

pub fn run(root: PathBuf, options: &GlobalOptions) -> Result<()> {
    let root = super::resolve_root(&root)?;
    let config = super::load_config(&root, options)?;
    let generator = ManifestGenerator::from_config(&root, &config)?;

    println!("{}", "Manifest Status".bold().cyan());
    println!("  {}: {}", "Root".bold(), root.display());

    let previous = generator.store().load()?;
    match previous.timestamp {
        Some(timestamp) => println!(
            "  {}: {} ({} entries)",
            "Last generated".bold(),
            timestamp.format("%Y-%m-%d %H:%M:%S %:z"),
            previous.len()
        ),
        None => println!("  {}: {}", "Last generated".bold(), "never".yellow()),
    }
    println!();

    let change_set = generator.preview()?;

    if change_set.is_empty() {
        println!("{}", "No changes since last manifest".green());
        return Ok(());
    }

    println!(
        "{} {}",
        "Pending changes:".bold(),
        format!("({})", change_set.changes.len()).yellow()
    );
    println!();
    display::print_changes(&change_set, "  ", 20);
    println!();
    println!(
        "Run {} to record these changes",
        "dirmanifest generate".cyan()
    );

    Ok(())
}
