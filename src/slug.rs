/// Lower-case `title` and collapse every run of non-alphanumeric characters
/// into a single hyphen, trimming hyphens at either end.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// File name for a chapter, e.g. `ch03-the-end.pdf`
pub fn chapter_filename(num: u32, title: &str) -> String {
    format!("ch{:02}-{}.pdf", num, slugify(title))
}
