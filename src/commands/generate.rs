use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::manifest::Manifest;
use crate::outline::flatten_outline;
use crate::pdf::PdfDocument;

/// Build a manifest from the PDF's top-level bookmarks
pub fn generate_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    let doc = PdfDocument::open(path)?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| doc.path.clone());
    let flattened = flatten_outline(&doc, &name)?;
    info!(
        "{}: {} chapters from bookmarks, {} unresolved",
        name,
        flattened.chapters.len(),
        flattened.unresolved
    );

    Ok(Manifest::generated(path, doc.title(), flattened.chapters))
}

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let manifest = generate_manifest(path)?;
    println!("{}", manifest.to_yaml()?);
    Ok(())
}
