use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use crate::extract::{split_chapters, Mode, SkippedChapter, SplitOptions, SplitOutcome};
use crate::manifest::Manifest;
use crate::pdf::PdfDocument;
use crate::selection::{parse_selection, ChapterSelection};

pub struct SplitArgs<'a> {
    pub manifest: &'a Path,
    /// Directory `source_pdf` and `output_dir` are relative to
    pub root: &'a Path,
    pub output_dir: Option<&'a Path>,
    pub dry_run: bool,
    pub chapters: &'a [String],
}

pub fn run(args: &SplitArgs) -> Result<SplitOutcome> {
    let mut manifest = Manifest::load(args.manifest)?;
    if let Some(dir) = args.output_dir {
        manifest.output_dir = dir.to_path_buf();
    }

    let duplicates = manifest.duplicate_chapter_numbers();
    if !duplicates.is_empty() {
        warn!("chapter numbers used more than once: {:?}", duplicates);
    }

    let only = if args.chapters.is_empty() {
        None
    } else {
        let selection =
            ChapterSelection::new(parse_selection(args.chapters)?, manifest.last_chapter_num());
        let nums: Vec<u32> = manifest.chapters.iter().map(|c| c.num).collect();
        for range in selection.unmatched(&nums) {
            warn!("--chapters {} matches no chapter in the manifest", range);
        }
        Some(selection)
    };

    let source_path = args.root.join(&manifest.source_pdf);
    let output_dir = args.root.join(&manifest.output_dir);

    if !source_path.exists() {
        anyhow::bail!("source PDF not found: {}", source_path.display());
    }

    let doc = PdfDocument::open(&source_path)?;
    let total_pages = doc.page_count();
    info!("{}: {} pages", source_path.display(), total_pages);

    for line in header_lines(&manifest, &source_path, &output_dir, total_pages) {
        println!("{}", line);
    }
    println!();

    let mode = if args.dry_run { Mode::DryRun } else { Mode::Write };
    let outcome = split_chapters(&manifest, &doc, &output_dir, &SplitOptions { mode, only })?;

    println!("\n{}", summary_line(mode, outcome.written.len()));
    for skipped in &outcome.skipped {
        println!("{}", skipped_line(skipped));
    }

    Ok(outcome)
}

fn header_lines(
    manifest: &Manifest,
    source_path: &Path,
    output_dir: &Path,
    total_pages: u32,
) -> Vec<String> {
    let book_title = manifest
        .title
        .clone()
        .unwrap_or_else(|| file_part(source_path.file_stem()));

    let mut lines = vec![
        format!("Book:   {}", book_title),
        format!(
            "Source: {}  ({} pages)",
            file_part(source_path.file_name()),
            total_pages
        ),
        format!("Output: {}", output_dir.display()),
    ];
    if !manifest.prepend_pages.is_empty() {
        lines.push(format!("Prepend pages: {:?}", manifest.prepend_pages));
    }
    lines
}

fn summary_line(mode: Mode, written: usize) -> String {
    match mode {
        Mode::DryRun => "Dry run complete.".to_string(),
        Mode::Write => format!("Done. {} files written.", written),
    }
}

fn skipped_line(skipped: &SkippedChapter) -> String {
    format!(
        "Skipped ch{:02}: pages {} out of range",
        skipped.num, skipped.out_of_range
    )
}

fn file_part(part: Option<&std::ffi::OsStr>) -> String {
    part.map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}
