use thiserror::Error;

/// A manifest that cannot be used. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("manifest must be a mapping of keys to values")]
    NotAMapping,

    #[error("manifest missing required key: '{0}'")]
    MissingKey(&'static str),

    #[error("manifest key '{key}' must be {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },

    #[error("{chapter} missing {missing:?}")]
    MissingChapterFields {
        chapter: String,
        missing: Vec<&'static str>,
    },

    #[error("{chapter}: 'pages' must be [first, last]")]
    PagesNotPair { chapter: String },

    #[error("{chapter}: start page ({start}) > end page ({end})")]
    InvertedRange {
        chapter: String,
        start: i64,
        end: i64,
    },

    #[error("invalid chapter selection '{0}'")]
    InvalidSelection(String),

    #[error("invalid manifest: {0}")]
    Malformed(#[from] serde_yaml::Error),
}

/// Reasons a manifest cannot be derived from a document outline.
#[derive(Error, Debug)]
pub enum OutlineError {
    #[error(
        "no bookmarks found in {0}; this PDF has no table of contents embedded, \
         write a manifest by hand instead"
    )]
    NoOutline(String),

    #[error("could not extract any chapter entries from {0}")]
    NoResolvableEntries(String),
}
