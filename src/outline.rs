use lopdf::Object;
use tracing::{debug, warn};

use crate::error::OutlineError;
use crate::manifest::{Chapter, PageSpan};

/// A bookmark: its title and its raw destination, if it has one.
#[derive(Debug, Clone)]
pub struct OutlineEntry {
    pub title: String,
    pub destination: Option<Object>,
}

/// One element of a document outline. The sub-entries of an entry are
/// listed as a `Nested` item directly after it.
#[derive(Debug, Clone)]
pub enum OutlineItem {
    Entry(OutlineEntry),
    Nested(Vec<OutlineItem>),
}

/// What chapter generation needs from a document.
pub trait OutlineSource {
    fn page_count(&self) -> u32;

    /// Top-level outline items; empty when the document has no outline.
    fn outline(&self) -> Vec<OutlineItem>;

    /// 0-based index of the page an entry points at, if it can be resolved.
    fn destination_page_index(&self, entry: &OutlineEntry) -> Option<u32>;
}

/// Chapters derived from an outline.
#[derive(Debug)]
pub struct FlattenedOutline {
    pub chapters: Vec<Chapter>,
    /// Top-level bookmarks dropped because their destination did not resolve
    pub unresolved: usize,
}

/// Derive one chapter per top-level bookmark.
///
/// Each chapter runs from its bookmark's page up to the page before the next
/// bookmark; the last one runs to the end of the document. Nested bookmarks
/// never become chapters, and bookmarks whose destination cannot be resolved
/// are dropped. `name` identifies the document in errors.
pub fn flatten_outline<S: OutlineSource>(
    source: &S,
    name: &str,
) -> Result<FlattenedOutline, OutlineError> {
    let outline = source.outline();
    if outline.is_empty() {
        return Err(OutlineError::NoOutline(name.to_string()));
    }

    let mut starts: Vec<(String, u32)> = Vec::new();
    let mut dropped = 0usize;

    for item in &outline {
        let OutlineItem::Entry(entry) = item else {
            continue;
        };
        match source.destination_page_index(entry) {
            Some(index) => starts.push((entry.title.trim().to_string(), index + 1)),
            None => {
                debug!(title = %entry.title, "bookmark destination could not be resolved");
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!(
            "{}: skipped {} bookmark(s) with unresolvable destinations",
            name, dropped
        );
    }

    if starts.is_empty() {
        return Err(OutlineError::NoResolvableEntries(name.to_string()));
    }

    let total_pages = source.page_count();
    let chapters = starts
        .iter()
        .enumerate()
        .map(|(i, (title, start))| {
            let end = match starts.get(i + 1) {
                Some((_, next_start)) => next_start - 1,
                None => total_pages,
            };
            Chapter {
                num: i as u32 + 1,
                title: title.clone(),
                pages: PageSpan { start: *start, end },
            }
        })
        .collect();

    Ok(FlattenedOutline {
        chapters,
        unresolved: dropped,
    })
}
