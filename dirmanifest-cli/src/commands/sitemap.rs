use super::GlobalOptions;
use anyhow::{Context, Result};
use colored::Colorize;
use dirmanifest_core::{ManifestStore, SitemapRenderer};
use std::path::PathBuf;

pub fn run(
    root: PathBuf,
    output: Option<PathBuf>,
    title: Option<String>,
    options: &GlobalOptions,
) -> Result<()> {
    let root = super::resolve_root(&root)?;
    let config = super::load_config(&root, options)?;
    let store = ManifestStore::from_layout(&config.layout(&root));

    let manifest = store
        .load_existing()
        .context("Run 'dirmanifest generate' first")?;

    let output = output.unwrap_or_else(|| config.sitemap_path(&root));
    let title = title.unwrap_or_else(|| config.sitemap.title.clone());

    SitemapRenderer::new(title).write(&manifest, &output)?;

    println!(
        "{} {}",
        "✓ Site map generated at:".green().bold(),
        output.display()
    );
    println!("  {}: {}", "Entries".bold(), manifest.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sitemap_requires_manifest() {
        let temp_dir = TempDir::new().unwrap();

        let result = run(
            temp_dir.path().to_path_buf(),
            None,
            None,
            &GlobalOptions::default(),
        );

        assert!(result.is_err());
        assert!(!temp_dir.path().join("sitemap.html").exists());
    }

    #[test]
    fn test_sitemap_custom_output_and_title() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("a.html"), "a").unwrap();
        super::super::generate::run(root.to_path_buf(), false, &GlobalOptions::default()).unwrap();

        let output = root.join("out").join("map.html");
        run(
            root.to_path_buf(),
            Some(output.clone()),
            Some("Docs".to_string()),
            &GlobalOptions::default(),
        )
        .unwrap();

        let html = std::fs::read_to_string(output).unwrap();
        assert!(html.contains("<title>Docs</title>"));
        assert!(html.contains("<li><a href=\"a.html\">a.html</a></li>"));
    }
}
