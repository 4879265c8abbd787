use anyhow::{Context, Result};
use regex::Regex;

use super::Manifest;

pub fn render(manifest: &Manifest) -> Result<String> {
    let yaml = serde_yaml::to_string(manifest).context("Failed to serialize manifest")?;
    inline_page_spans(&yaml)
}

/// Rewrite the two-item block list under every `pages:` key as `[first, last]`
fn inline_page_spans(yaml: &str) -> Result<String> {
    let block = Regex::new(r"pages:\n\s+- (\d+)\n\s+- (\d+)")?;
    Ok(block.replace_all(yaml, "pages: [$1, $2]").into_owned())
}
