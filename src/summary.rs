use std::sync::LazyLock;

use regex::Regex;

use crate::formats::TocEntry;

static TOC_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)[*-] \[(?P<title>.+?)\]\((?P<filename>.+?)\)")
        .expect("toc link pattern is valid")
});

static PART_NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[IV]+:\s").expect("part numeral pattern is valid"));

/// Parses one manifest line; anything that is not a `* [Title](file.md)`
/// list item yields `None`.
pub fn parse_entry(line: &str) -> Option<TocEntry> {
    let caps = TOC_LINK.captures(line)?;
    Some(TocEntry {
        depth: caps["indent"].len(),
        title: normalize_title(&caps["title"]),
        filename: caps["filename"].to_owned(),
    })
}

/// Entries in manifest order. Prose, blank lines and bare bullets are skipped.
pub fn parse_summary(summary_md: &str) -> Vec<TocEntry> {
    summary_md.lines().filter_map(parse_entry).collect()
}

/// Drops a part prefix such as `I: ` or `IV: `.
pub fn normalize_title(title: &str) -> String {
    PART_NUMERAL.replace(title, "").into_owned()
}
