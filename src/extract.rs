use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::manifest::{Manifest, PageSpan};
use crate::page_plan::{ExtractionPlan, OutOfRange};
use crate::pdf::PdfDocument;
use crate::selection::ChapterSelection;
use crate::slug::chapter_filename;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plan and report, touch nothing on disk
    DryRun,
    Write,
}

#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub mode: Mode,
    /// Only process these chapter numbers
    pub only: Option<ChapterSelection>,
}

/// A chapter left out because its plan names pages the document lacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChapter {
    pub num: u32,
    pub out_of_range: OutOfRange,
}

#[derive(Debug, Default)]
pub struct SplitOutcome {
    /// Files written, or that would have been written in a dry run
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedChapter>,
}

/// Write one PDF per manifest chapter into `output_dir`.
///
/// A chapter whose pages fall outside the document is skipped with a
/// warning and the rest are still processed.
pub fn split_chapters(
    manifest: &Manifest,
    doc: &PdfDocument,
    output_dir: &Path,
    options: &SplitOptions,
) -> Result<SplitOutcome> {
    let total_pages = doc.page_count();
    let prepend = &manifest.prepend_pages;

    if options.mode == Mode::Write {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;
    }

    let mut outcome = SplitOutcome::default();

    for chapter in &manifest.chapters {
        if let Some(only) = &options.only {
            if !only.contains(chapter.num) {
                continue;
            }
        }

        let plan = match ExtractionPlan::checked(prepend, chapter.pages, total_pages) {
            Ok(plan) => plan,
            Err(bad) => {
                warn!(
                    "ch{:02}: pages {} out of range (PDF has {} pages), skipping",
                    chapter.num, bad, total_pages
                );
                outcome.skipped.push(SkippedChapter {
                    num: chapter.num,
                    out_of_range: bad,
                });
                continue;
            }
        };

        let file_name = chapter_filename(chapter.num, &chapter.title);
        let path = output_dir.join(&file_name);
        let page_count = plan.pages().len();
        debug!(chapter = chapter.num, pages = ?plan.pages(), "extraction plan");

        match options.mode {
            Mode::DryRun => {
                println!(
                    "{}",
                    dry_run_line(&file_name, chapter.pages, prepend.len(), page_count)
                );
            }
            Mode::Write => {
                let mut chapter_doc = doc
                    .extract_pages(plan.pages())
                    .with_context(|| format!("Failed to extract chapter {}", chapter.num))?;
                PdfDocument::save(&mut chapter_doc, &path)?;
                println!("{}", wrote_line(&file_name, page_count));
            }
        }

        outcome.written.push(path);
    }

    Ok(outcome)
}

/// Report line for a chapter that a dry run would write
pub fn dry_run_line(file_name: &str, span: PageSpan, prepend_len: usize, page_count: usize) -> String {
    let prepend_note = if prepend_len == 0 {
        String::new()
    } else {
        format!(" (+{} prepend)", prepend_len)
    };
    format!(
        "  [DRY RUN] {}  PDF pages {}-{}{}, {} pages total",
        file_name, span.start, span.end, prepend_note, page_count
    )
}

pub fn wrote_line(file_name: &str, page_count: usize) -> String {
    format!("  wrote {}  ({} pages)", file_name, page_count)
}
