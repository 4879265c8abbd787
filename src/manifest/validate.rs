use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

const REQUIRED_KEYS: [&str; 3] = ["source_pdf", "output_dir", "chapters"];
const CHAPTER_FIELDS: [&str; 3] = ["num", "title", "pages"];

/// Check the shape of a raw manifest before it is deserialized.
///
/// Only keys and page spans are checked here; page numbers are checked
/// against the document at extraction time.
pub fn validate(value: &Value) -> Result<(), ConfigError> {
    let manifest = value.as_mapping().ok_or(ConfigError::NotAMapping)?;

    for key in REQUIRED_KEYS {
        if !manifest.contains_key(key) {
            return Err(ConfigError::MissingKey(key));
        }
    }

    let chapters = manifest
        .get("chapters")
        .and_then(Value::as_sequence)
        .ok_or(ConfigError::WrongType {
            key: "chapters",
            expected: "a list of chapters",
        })?;

    for (index, chapter) in chapters.iter().enumerate() {
        validate_chapter(index, chapter)?;
    }

    Ok(())
}

fn validate_chapter(index: usize, chapter: &Value) -> Result<(), ConfigError> {
    let fields = chapter.as_mapping();
    let label = describe(index, fields);

    let missing: Vec<&'static str> = CHAPTER_FIELDS
        .into_iter()
        .filter(|field| fields.map_or(true, |f| !f.contains_key(*field)))
        .collect();
    let Some(fields) = fields.filter(|_| missing.is_empty()) else {
        return Err(ConfigError::MissingChapterFields {
            chapter: label,
            missing,
        });
    };

    let span = fields
        .get("pages")
        .and_then(Value::as_sequence)
        .filter(|pages| pages.len() == 2)
        .and_then(|pages| Some((pages[0].as_i64()?, pages[1].as_i64()?)));

    match span {
        None => Err(ConfigError::PagesNotPair { chapter: label }),
        Some((start, end)) if start > end => Err(ConfigError::InvertedRange {
            chapter: label,
            start,
            end,
        }),
        Some(_) => Ok(()),
    }
}

/// "chapter 3" when the entry has a usable `num`, else its position
fn describe(index: usize, fields: Option<&Mapping>) -> String {
    match fields.and_then(|f| f.get("num")) {
        Some(Value::Number(num)) => format!("chapter {}", num),
        Some(Value::String(num)) => format!("chapter {}", num),
        _ => format!("chapter entry #{}", index + 1),
    }
}
