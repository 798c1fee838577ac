use std::sync::LazyLock;

use regex::Regex;

static INTERNAL_HTML_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\]\(([\w-]+)\.html\)").expect("internal link pattern is valid")
});

/// Rewrites links so they still work once every chapter lives in one file.
///
/// Relative references into the API docs (`../std/...`) become absolute
/// URLs; links to sibling chapters (`ownership.html`) become `#sec--ownership`
/// anchors, matching the ids the assembler puts on chapter headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNormalizer {
    prefixes: Vec<(String, String)>,
}

impl Default for LinkNormalizer {
    fn default() -> Self {
        Self::new(
            "http://doc.rust-lang.org",
            &["std", "reference", "rustc", "syntax", "core"],
        )
    }
}

impl LinkNormalizer {
    pub fn new<S: AsRef<str>>(base_url: &str, sections: &[S]) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let prefixes = sections
            .iter()
            .map(|section| {
                let section = section.as_ref();
                (format!("../{section}"), format!("{base_url}/{section}"))
            })
            .collect();
        Self { prefixes }
    }

    /// Prefix replacement runs first: `../std/foo.html` must become an
    /// absolute URL rather than a `#sec--` anchor.
    pub fn normalize(&self, input: &str) -> String {
        let absolute = self
            .prefixes
            .iter()
            .fold(input.to_owned(), |text, (relative, absolute)| {
                text.replace(relative.as_str(), absolute)
            });

        INTERNAL_HTML_LINK
            .replace_all(&absolute, "](#sec--$1)")
            .into_owned()
    }
}
