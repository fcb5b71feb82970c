use super::GlobalOptions;
use crate::display;
use anyhow::Result;
use colored::Colorize;
use dirmanifest_core::HistoryLog;
use std::path::PathBuf;

pub fn run(root: PathBuf, limit: Option<usize>, options: &GlobalOptions) -> Result<()> {
    let root = super::resolve_root(&root)?;
    let config = super::load_config(&root, options)?;
    let history = HistoryLog::new(config.layout(&root).history_path).load()?;

    if history.is_empty() {
        println!("{}", "No changes recorded yet".yellow());
        return Ok(());
    }

    println!("{}", "Change History".bold().cyan());
    println!();

    let to_show = limit.unwrap_or(history.len()).min(history.len());

    for change_set in history.iter().rev().take(to_show) {
        println!(
            "{} {}",
            "changes".yellow().bold(),
            change_set
                .timestamp
                .format("%Y-%m-%d %H:%M:%S %:z")
                .to_string()
                .yellow()
        );
        println!("    {}", display::summary(change_set));
        println!();
        display::print_changes(change_set, "      ", 5);
        println!();
    }

    if history.len() > to_show {
        println!(
            "{}",
            format!("... and {} older entries", history.len() - to_show).dimmed()
        );
        println!("Use {} to see more", "--limit N".cyan());
    }

    Ok(())
}
