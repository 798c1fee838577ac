use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::links::LinkNormalizer;
use crate::snippets::SnippetNormalizer;
use crate::wrap::LineWrapper;

/// Book metadata and normalizer settings, read from an optional YAML file.
///
/// Every field has a default, so an empty file (or no file at all) builds the
/// Rust book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BookConfig {
    pub title: String,
    pub author: String,
    pub description: String,
    pub language: String,
    pub document_class: String,
    pub toc_depth: u8,

    /// Link to the online edition, listed first on the index page.
    pub homepage: Option<String>,
    /// Source repository, shown as a ribbon on the index page.
    pub repository: Option<String>,

    /// Fence tag that marks snippets to normalize; also the class for indented code.
    pub code_language: String,
    pub hidden_prefix: String,
    pub wrap_width: usize,
    pub wrap_marker: String,

    pub doc_base_url: String,
    pub doc_sections: Vec<String>,

    pub highlight_style: String,
    pub monofont: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            title: "The Rust Programming Language".to_owned(),
            author: "The Rust Team".to_owned(),
            description: "This book will teach you about the Rust Programming Language. \
Rust is a modern systems programming language focusing on safety and speed. \
It accomplishes these goals by being memory safe without using garbage collection."
                .to_owned(),
            language: "en".to_owned(),
            document_class: "book".to_owned(),
            toc_depth: 2,
            homepage: Some("http://doc.rust-lang.org/book/".to_owned()),
            repository: None,
            code_language: "rust".to_owned(),
            hidden_prefix: "# ".to_owned(),
            wrap_width: 87,
            wrap_marker: "↳ ".to_owned(),
            doc_base_url: "http://doc.rust-lang.org".to_owned(),
            doc_sections: ["std", "reference", "rustc", "syntax", "core"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            highlight_style: "tango".to_owned(),
            monofont: "DejaVu Sans Mono".to_owned(),
        }
    }
}

impl BookConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parse config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded book config");
        Ok(config)
    }

    pub fn snippet_normalizer(&self) -> SnippetNormalizer {
        SnippetNormalizer::new(&self.code_language, &self.hidden_prefix)
    }

    pub fn link_normalizer(&self) -> LinkNormalizer {
        LinkNormalizer::new(&self.doc_base_url, &self.doc_sections)
    }

    pub fn line_wrapper(&self) -> anyhow::Result<LineWrapper> {
        LineWrapper::new(self.wrap_width, &self.wrap_marker)
    }
}
