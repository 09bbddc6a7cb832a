//! Free-text note tags.
//!
//! Tags are stored as the raw comma-separated string the user typed. These
//! helpers split that string into clean tag names for filtering and for the
//! tag cloud shown next to note listings.

use std::collections::BTreeSet;

/// Split a raw tag string into trimmed, non-empty tag names (input order).
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collect the distinct tags of many notes, sorted.
pub fn collect_tags<'a, I>(raws: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    raws.into_iter().flat_map(parse_tags).collect()
}
