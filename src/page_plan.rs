use std::fmt;
use std::ops::RangeInclusive;

use crate::manifest::PageSpan;

/// The pages copied into one chapter file, in output order: the shared
/// prepend pages followed by the chapter's own range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionPlan {
    pages: Vec<u32>,
}

/// Pages a plan names that the document does not have, as ranges in plan
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutOfRange(Vec<RangeInclusive<u32>>);

impl ExtractionPlan {
    /// Build the plan for a document of `total_pages` pages.
    ///
    /// Bounds are checked on the span's ends before the range is expanded,
    /// so the plan never holds more than `prepend.len() + total_pages` pages.
    pub fn checked(prepend: &[u32], span: PageSpan, total_pages: u32) -> Result<Self, OutOfRange> {
        let in_bounds = |page: u32| page >= 1 && page <= total_pages;

        let mut bad: Vec<RangeInclusive<u32>> = prepend
            .iter()
            .copied()
            .filter(|&page| !in_bounds(page))
            .map(|page| page..=page)
            .collect();
        if span.start == 0 {
            bad.push(0..=0);
        }
        if span.end > total_pages {
            bad.push(span.start.max(total_pages + 1)..=span.end);
        }
        if !bad.is_empty() {
            return Err(OutOfRange(bad));
        }

        let mut pages = Vec::with_capacity(prepend.len() + span_len(span));
        pages.extend_from_slice(prepend);
        pages.extend(span.start..=span.end);
        Ok(ExtractionPlan { pages })
    }

    /// 1-based page numbers, duplicates kept
    pub fn pages(&self) -> &[u32] {
        &self.pages
    }
}

impl OutOfRange {
    pub fn ranges(&self) -> &[RangeInclusive<u32>] {
        &self.0
    }
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if range.start() == range.end() {
                write!(f, "{}", range.start())?;
            } else {
                write!(f, "{}-{}", range.start(), range.end())?;
            }
        }
        Ok(())
    }
}

fn span_len(span: PageSpan) -> usize {
    if span.start > span.end {
        0
    } else {
        (span.end - span.start) as usize + 1
    }
}
