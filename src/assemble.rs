use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;

use crate::chapter::{ChapterRenderer, DEFAULT_HEADER_LEVEL};
use crate::cli::AssembleArgs;
use crate::config::BookConfig;
use crate::formats::{Artifact, BookMetadata, Release, TocEntry};
use crate::pandoc::{Converter, Pandoc};
use crate::summary::parse_summary;

/// Where the manifest, the introduction and the chapters live.
#[derive(Debug, Clone)]
pub struct BookSources {
    pub src_dir: PathBuf,
    pub summary: PathBuf,
    pub introduction: PathBuf,
}

impl BookSources {
    pub fn new(src_dir: impl Into<PathBuf>) -> Self {
        let src_dir = src_dir.into();
        Self {
            summary: src_dir.join("SUMMARY.md"),
            introduction: src_dir.join("README.md"),
            src_dir,
        }
    }

    pub fn chapter_path(&self, entry: &TocEntry) -> PathBuf {
        self.src_dir.join(&entry.filename)
    }
}

pub fn run(args: AssembleArgs) -> anyhow::Result<()> {
    let config = BookConfig::load(args.config.config.as_deref()).context("load config")?;
    let pandoc = Pandoc::from_env(args.config.pandoc.as_deref());
    let release = args.release.release();
    let sources = args.source.sources();

    let renderer = ChapterRenderer::new(&pandoc, &config);
    let book = assemble_book(&renderer, &config, release.date, &sources)?;

    let mut status = std::io::stdout().lock();
    write_markdown(&args.out, &release, &book, &mut status)?;
    Ok(())
}

/// YAML metadata block read by pandoc; closed with `...` so it also works
/// as a LaTeX/EPUB title block.
pub fn header_block(config: &BookConfig, date: NaiveDate) -> anyhow::Result<String> {
    let metadata = BookMetadata {
        title: config.title.clone(),
        author: config.author.clone(),
        date,
        description: config.description.clone(),
        language: config.language.clone(),
        document_class: config.document_class.clone(),
        links_as_notes: true,
        verbatim_in_note: true,
        toc_depth: config.toc_depth,
    };
    let yaml = serde_yaml::to_string(&metadata).context("serialize book metadata")?;
    Ok(format!("---\n{yaml}...\n\n"))
}

/// `# The Basics {#sec--basics}`: the id is what `LinkNormalizer` points
/// `basics.html` links at.
pub fn chapter_heading(entry: &TocEntry) -> String {
    format!(
        "{} {} {{#sec--{}}}\n\n",
        entry.heading_marker(),
        entry.title,
        entry.anchor_stem()
    )
}

/// Builds the combined document: header, introduction, then every manifest
/// entry in order.
pub fn assemble_book<C: Converter>(
    renderer: &ChapterRenderer<C>,
    config: &BookConfig,
    date: NaiveDate,
    sources: &BookSources,
) -> anyhow::Result<String> {
    let summary_md = std::fs::read_to_string(&sources.summary)
        .with_context(|| format!("read manifest: {}", sources.summary.display()))?;
    let entries = parse_summary(&summary_md);
    tracing::info!(
        manifest = %sources.summary.display(),
        chapters = entries.len(),
        "assemble book"
    );

    let mut book = header_block(config, date)?;
    book.push_str("# Introduction\n\n");
    book.push_str(&renderer.render(&sources.introduction, 1)?);
    book.push_str("\n\n");

    entries.iter().try_fold(book, |mut book, entry| {
        book.push_str(&chapter_heading(entry));
        book.push_str(&renderer.render(&sources.chapter_path(entry), DEFAULT_HEADER_LEVEL)?);
        book.push_str("\n\n");
        Ok(book)
    })
}

/// Writes `<out>/<name>-<date>.md`, replacing an earlier run's file.
pub fn write_markdown(
    out_dir: &Path,
    release: &Release,
    book: &str,
    status: &mut dyn std::io::Write,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir: {}", out_dir.display()))?;

    let path = release.path_in(out_dir, Artifact::Markdown);
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&path)
        .with_context(|| format!("open output: {}", path.display()))?;
    file.write_all(book.as_bytes())
        .with_context(|| format!("write output: {}", path.display()))?;
    file.flush()
        .with_context(|| format!("flush output: {}", path.display()))?;

    crate::export::report_done(status, Artifact::Markdown.label())?;
    Ok(path)
}
