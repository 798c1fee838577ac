use std::path::Path;

use anyhow::Context as _;

use crate::config::BookConfig;
use crate::links::LinkNormalizer;
use crate::pandoc::{ConvertInput, ConvertRequest, Converter, MARKDOWN_DIALECT};
use crate::snippets::SnippetNormalizer;
use crate::tables::normalize_grid_borders;

/// Heading level of a chapter's own top-level headings inside the book.
pub const DEFAULT_HEADER_LEVEL: u8 = 3;

/// Turns one chapter file into a fragment ready to be appended to the book.
#[derive(Debug)]
pub struct ChapterRenderer<C> {
    converter: C,
    code_language: String,
    snippets: SnippetNormalizer,
    links: LinkNormalizer,
}

impl<C: Converter> ChapterRenderer<C> {
    pub fn new(converter: C, config: &BookConfig) -> Self {
        Self {
            converter,
            code_language: config.code_language.clone(),
            snippets: config.snippet_normalizer(),
            links: config.link_normalizer(),
        }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Markdown-to-markdown pass that shifts headings so `#` lands on
    /// `header_level`.
    pub fn request(&self, source: String, header_level: u8) -> ConvertRequest {
        let shift = i32::from(header_level.max(1)) - 1;
        ConvertRequest::new(ConvertInput::Text(source), MARKDOWN_DIALECT)
            .to(MARKDOWN_DIALECT)
            .opt("shift-heading-level-by", shift.to_string())
            .opt("indented-code-classes", &self.code_language)
            .opt("markdown-headings", "atx")
    }

    /// Converter output is normalized (snippets, then links) because the
    /// converter rewrites code fences itself.
    pub fn render_text(&self, source: &str, header_level: u8) -> anyhow::Result<String> {
        let source = normalize_grid_borders(source);
        let converted = self
            .converter
            .convert(&self.request(source, header_level))
            .context("convert chapter")?;
        let converted = self.snippets.normalize(&converted);
        Ok(self.links.normalize(&converted))
    }

    pub fn render(&self, path: &Path, header_level: u8) -> anyhow::Result<String> {
        tracing::debug!(path = %path.display(), header_level, "render chapter");
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("read chapter: {}", path.display()))?;
        self.render_text(&source, header_level)
            .with_context(|| format!("render chapter: {}", path.display()))
    }
}
