//! Title and tag extraction from uploaded markdown.
//!
//! The title is the first level-one ATX heading (`# Title`). Tags come from
//! the first line of the form `tags: a, b, c`.

pub fn extract_title(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("# "))
        .map(str::trim)
        .find(|title| !title.is_empty())
        .map(str::to_string)
}

pub fn extract_tags(markdown: &str) -> Vec<String> {
    markdown
        .lines()
        .find_map(|line| {
            let line = line.trim();
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case("tags").then_some(value)
        })
        .map(parse_tags)
        .unwrap_or_default()
}

/// Split a comma separated list, trimming entries and dropping empty ones.
pub fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
