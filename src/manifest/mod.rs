mod render;
mod validate;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::slug::slugify;

pub use validate::validate;

/// How to cut one PDF into chapter files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Display name of the book
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Source PDF, relative to the project root
    pub source_pdf: PathBuf,
    /// Directory chapter files are written to, relative to the project root
    pub output_dir: PathBuf,
    /// Pages copied to the front of every chapter (cover, copyright, ...)
    #[serde(default)]
    pub prepend_pages: Vec<u32>,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub num: u32,
    pub title: String,
    pub pages: PageSpan,
}

/// Inclusive 1-based page range, written as `[first, last]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct PageSpan {
    pub start: u32,
    pub end: u32,
}

impl From<[u32; 2]> for PageSpan {
    fn from([start, end]: [u32; 2]) -> Self {
        PageSpan { start, end }
    }
}

impl From<PageSpan> for [u32; 2] {
    fn from(span: PageSpan) -> Self {
        [span.start, span.end]
    }
}

impl Manifest {
    /// Read and validate a manifest file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let manifest = Self::from_yaml_str(&text)
            .with_context(|| format!("Invalid manifest: {}", path.display()))?;
        Ok(manifest)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        validate(&value)?;
        Ok(serde_yaml::from_value(value)?)
    }

    /// The manifest `generate` prints for a PDF found at `pdf_path`
    pub fn generated(pdf_path: &Path, title: Option<String>, chapters: Vec<Chapter>) -> Self {
        let file_name = pdf_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = pdf_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Manifest {
            title,
            source_pdf: Path::new("sources").join(file_name),
            output_dir: Path::new("chapters").join(slugify(&stem)),
            prepend_pages: Vec::new(),
            chapters,
        }
    }

    /// YAML with page spans written inline
    pub fn to_yaml(&self) -> Result<String> {
        render::render(self)
    }

    /// Chapter numbers used by more than one chapter, ascending
    pub fn duplicate_chapter_numbers(&self) -> Vec<u32> {
        let mut counts = BTreeMap::new();
        for chapter in &self.chapters {
            *counts.entry(chapter.num).or_insert(0usize) += 1;
        }
        counts
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .map(|(num, _)| num)
            .collect()
    }

    pub fn last_chapter_num(&self) -> u32 {
        self.chapters.iter().map(|c| c.num).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str = "\
title: Systems Programming
source_pdf: sources/systems.pdf
output_dir: chapters/systems
prepend_pages: [1, 2]
chapters:
  - num: 1
    title: Getting Started
    pages: [5, 30]
  - num: 2
    title: Memory
    pages: [31, 62]
";

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_yaml_str(BOOK).unwrap();
        assert_eq!(manifest.title.as_deref(), Some("Systems Programming"));
        assert_eq!(manifest.source_pdf, PathBuf::from("sources/systems.pdf"));
        assert_eq!(manifest.output_dir, PathBuf::from("chapters/systems"));
        assert_eq!(manifest.prepend_pages, vec![1, 2]);
        assert_eq!(manifest.chapters.len(), 2);
        assert_eq!(manifest.chapters[1].title, "Memory");
        assert_eq!(manifest.chapters[1].pages, PageSpan { start: 31, end: 62 });
    }

    #[test]
    fn test_optional_keys_default() {
        let manifest = Manifest::from_yaml_str(
            "source_pdf: a.pdf\noutput_dir: out\nchapters:\n  - {num: 1, title: A, pages: [1, 2]}\n",
        )
        .unwrap();
        assert_eq!(manifest.title, None);
        assert!(manifest.prepend_pages.is_empty());
    }

    #[test]
    fn test_negative_page_is_malformed() {
        let err = Manifest::from_yaml_str(
            "source_pdf: a.pdf\noutput_dir: out\nchapters:\n  - {num: 1, title: A, pages: [-3, 2]}\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_unparseable_yaml() {
        let err = Manifest::from_yaml_str("chapters: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_empty_document_is_rejected() {
        assert!(Manifest::from_yaml_str("").is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "source_pdf: a.pdf\noutput_dir: out\n").unwrap();

        let err = Manifest::load(&path).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("broken.yaml"));
        assert!(message.contains("manifest missing required key: 'chapters'"));
    }

    #[test]
    fn test_generated_paths() {
        let manifest = Manifest::generated(Path::new("/tmp/in/My Big Book.pdf"), None, Vec::new());
        assert_eq!(manifest.source_pdf, PathBuf::from("sources/My Big Book.pdf"));
        assert_eq!(manifest.output_dir, PathBuf::from("chapters/my-big-book"));
        assert!(manifest.prepend_pages.is_empty());
    }

    #[test]
    fn test_duplicate_chapter_numbers() {
        let mut manifest = Manifest::from_yaml_str(BOOK).unwrap();
        assert!(manifest.duplicate_chapter_numbers().is_empty());

        let mut repeat = manifest.chapters[0].clone();
        repeat.title = "Again".to_string();
        manifest.chapters.push(repeat);
        assert_eq!(manifest.duplicate_chapter_numbers(), vec![1]);
        assert_eq!(manifest.last_chapter_num(), 2);
    }
}
