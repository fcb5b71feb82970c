use super::GlobalOptions;
use crate::display;
use anyhow::{Context, Result};
use colored::Colorize;
use dirmanifest_core::{ManifestGenerator, SitemapRenderer};
use std::path::PathBuf;

pub fn run(root: PathBuf, render_sitemap: bool, options: &GlobalOptions) -> Result<()> {
    let root = super::resolve_root(&root)?;
    let config = super::load_config(&root, options)?;
    let generator = ManifestGenerator::from_config(&root, &config)?;

    println!("{}", "Generating file manifest...".bold().cyan());
    println!("   {}: {}", "Scanning".bold(), root.display());
    println!(
        "   {}: {}",
        "Manifest".bold(),
        generator.store().manifest_path().display()
    );
    println!();

    let report = generator
        .run()
        .context("Error generating file manifest")?;

    println!(
        "{}",
        format!(
            "✓ Manifest written: {} file(s), {} director{}",
            report.files,
            report.directories,
            if report.directories == 1 { "y" } else { "ies" }
        )
        .green()
        .bold()
    );
    println!(
        "  {}: {} ({} written)",
        "Details".bold(),
        generator.store().details_dir().display(),
        report.details_written
    );

    if !report.pruned.removed.is_empty() {
        println!(
            "  {}: {} stale record(s)",
            "Pruned".bold(),
            report.pruned.removed.len()
        );
    }
    if !report.pruned.is_clean() {
        println!(
            "  {} failed to prune {} record(s)",
            "⚠".yellow(),
            report.pruned.failed.len().to_string().yellow()
        );
    }

    if report.recorded {
        println!(
            "  {}: {}",
            "Changes".bold(),
            display::summary(&report.change_set)
        );
        println!();
        display::print_changes(&report.change_set, "    ", 10);
    } else {
        println!("  {}", "No changes since last manifest".dimmed());
    }

    if render_sitemap {
        let manifest = generator.store().load_existing()?;
        let output = config.sitemap_path(&root);
        SitemapRenderer::new(config.sitemap.title.clone()).write(&manifest, &output)?;
        println!();
        println!("  {}: {}", "Sitemap".bold(), output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_writes_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("index.html"), "<p>hi</p>").unwrap();

        run(root.to_path_buf(), true, &GlobalOptions::default()).unwrap();

        assert!(root.join(".data/file-manifest.json").exists());
        assert!(root.join(".data/changes.json").exists());
        let sitemap = std::fs::read_to_string(root.join("sitemap.html")).unwrap();
        assert!(sitemap.contains("<a href=\"index.html\">index.html</a>"));
    }

    #[test]
    fn test_generate_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();

        assert!(run(
            temp_dir.path().join("missing"),
            false,
            &GlobalOptions::default()
        )
        .is_err());
    }
}
