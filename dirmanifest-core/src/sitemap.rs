//! Static HTML listing of every manifest entry.

use crate::error::Result;
use crate::models::Manifest;
use crate::storage::write_atomic;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::path::Path;
use url::Url;

pub const DEFAULT_TITLE: &str = "Site Map";

// Only the path of this base ever reaches the output.
const LINK_BASE: &str = "http://localhost/";

pub struct SitemapRenderer {
    title: String,
}

impl Default for SitemapRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl SitemapRenderer {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Renders one link per manifest entry, in manifest order.
    pub fn render(&self, manifest: &Manifest) -> String {
        let title = encode_text(&self.title);
        let mut output = String::new();

        output.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        output.push_str(&format!("<title>{}</title>\n", title));
        output.push_str("</head>\n<body>\n");
        output.push_str(&format!("<h1>{}</h1>\n<ul>\n", title));

        for path in manifest.files.values() {
            output.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                encode_double_quoted_attribute(&link_target(path)),
                encode_text(path)
            ));
        }

        output.push_str("</ul>\n</body>\n</html>");
        output
    }

    pub fn write(&self, manifest: &Manifest, output: &Path) -> Result<()> {
        write_atomic(output, self.render(manifest).as_bytes())?;
        tracing::info!(
            "Wrote sitemap with {} entries to {:?}",
            manifest.len(),
            output
        );
        Ok(())
    }
}

/// Percent-encodes each `/`-separated segment of a relative path.
fn link_target(path: &str) -> String {
    let Ok(mut url) = Url::parse(LINK_BASE) else {
        return path.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().extend(path.split('/'));
    }
    url.path().trim_start_matches('/').to_string()
}
