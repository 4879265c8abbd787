use std::fmt;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRange {
    pub start: ChapterRef,
    pub end: Option<ChapterRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterRef {
    Number(u32),
    /// The highest chapter number in the manifest
    End,
}

impl ChapterRange {
    /// Parse a chapter selection like "3", "1-4", "6-end" or "5-2"
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let s = s.trim();
        let invalid = || ConfigError::InvalidSelection(s.to_string());
        if s.is_empty() {
            return Err(invalid());
        }

        match s.split_once('-') {
            // "-5" is not a range
            Some(("", _)) => Err(invalid()),
            Some((start, end)) => Ok(ChapterRange {
                start: parse_chapter_ref(start).ok_or_else(invalid)?,
                end: Some(parse_chapter_ref(end).ok_or_else(invalid)?),
            }),
            None => Ok(ChapterRange {
                start: parse_chapter_ref(s).ok_or_else(invalid)?,
                end: None,
            }),
        }
    }

    /// Whether chapter `num` falls in this range; reversed ranges select the
    /// same chapters as their forward form.
    pub fn contains(&self, num: u32, last_chapter: u32) -> bool {
        let resolve = |r: &ChapterRef| match r {
            ChapterRef::Number(n) => *n,
            ChapterRef::End => last_chapter,
        };
        let start = resolve(&self.start);
        let end = self.end.as_ref().map(resolve).unwrap_or(start);
        (start.min(end)..=start.max(end)).contains(&num)
    }
}

impl fmt::Display for ChapterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        if let Some(end) = &self.end {
            write!(f, "-{}", end)?;
        }
        Ok(())
    }
}

impl fmt::Display for ChapterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChapterRef::Number(n) => write!(f, "{}", n),
            ChapterRef::End => f.write_str("end"),
        }
    }
}

fn parse_chapter_ref(s: &str) -> Option<ChapterRef> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("end") {
        return Some(ChapterRef::End);
    }
    match s.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(ChapterRef::Number(n)),
    }
}

/// Parse `--chapters` values; each may hold comma-separated ranges
pub fn parse_selection<S: AsRef<str>>(values: &[S]) -> Result<Vec<ChapterRange>, ConfigError> {
    values
        .iter()
        .flat_map(|value| value.as_ref().split(','))
        .map(ChapterRange::parse)
        .collect()
}

/// The chapters a `--chapters` filter selects, with `end` bound to the
/// manifest's highest chapter number.
#[derive(Debug, Clone)]
pub struct ChapterSelection {
    ranges: Vec<ChapterRange>,
    last_chapter: u32,
}

impl ChapterSelection {
    pub fn new(ranges: Vec<ChapterRange>, last_chapter: u32) -> Self {
        ChapterSelection {
            ranges,
            last_chapter,
        }
    }

    pub fn contains(&self, num: u32) -> bool {
        self.ranges
            .iter()
            .any(|range| range.contains(num, self.last_chapter))
    }

    /// Ranges that select none of `nums`
    pub fn unmatched<'a>(&'a self, nums: &'a [u32]) -> impl Iterator<Item = &'a ChapterRange> {
        self.ranges.iter().filter(move |range| {
            !nums
                .iter()
                .any(|&num| range.contains(num, self.last_chapter))
        })
    }
}
