use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::assemble::BookSources;
use crate::formats::{Artifact, Release};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assemble the book, export every format and write the index page.
    Build(BuildArgs),
    /// Only write the combined markdown document.
    Assemble(AssembleArgs),
    /// Convert an already combined markdown document.
    Export(ExportArgs),
    /// Write `index.html` listing the artifacts in the output directory.
    Index(IndexArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Directory with the manifest, the introduction and the chapters.
    #[arg(long, default_value = "src")]
    pub src: PathBuf,

    /// Manifest file name, relative to `--src`.
    #[arg(long, default_value = "SUMMARY.md")]
    pub summary: String,

    /// Introduction file name, relative to `--src`.
    #[arg(long, default_value = "README.md")]
    pub intro: String,
}

impl SourceArgs {
    pub fn sources(&self) -> BookSources {
        BookSources {
            summary: self.src.join(&self.summary),
            introduction: self.src.join(&self.intro),
            src_dir: self.src.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct ReleaseArgs {
    /// Artifact file name prefix.
    #[arg(long, default_value = "trpl")]
    pub name: String,

    /// Release date embedded in artifact names and metadata (default: today).
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl ReleaseArgs {
    pub fn release(&self) -> Release {
        let date = self
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        Release::new(self.name.clone(), date)
    }
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// YAML file with book metadata and normalizer settings.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pandoc executable (default: `$TRPL_EBOOK_PANDOC`, then `pandoc`).
    #[arg(long)]
    pub pandoc: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Html,
    Epub,
    PdfA4,
    PdfLetter,
}

impl ExportFormat {
    /// Export order.
    pub const ALL: [Self; 4] = [Self::Html, Self::Epub, Self::PdfA4, Self::PdfLetter];

    pub fn artifact(self) -> Artifact {
        match self {
            Self::Html => Artifact::Html,
            Self::Epub => Artifact::Epub,
            Self::PdfA4 => Artifact::PdfA4,
            Self::PdfLetter => Artifact::PdfLetter,
        }
    }

    pub fn is_pdf(self) -> bool {
        matches!(self, Self::PdfA4 | Self::PdfLetter)
    }
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output directory for every artifact.
    #[arg(long, default_value = "dist")]
    pub out: PathBuf,

    /// Directory with `template.html`, `pandoc.css`, `epub.css` and `template.tex`.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Formats to export (repeatable; default: all).
    #[arg(long = "format", value_enum)]
    pub format: Vec<ExportFormat>,

    #[command(flatten)]
    pub release: ReleaseArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl BuildArgs {
    pub fn formats(&self) -> Vec<ExportFormat> {
        selected_formats(&self.format)
    }
}

#[derive(Debug, Args)]
pub struct AssembleArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output directory for the combined markdown.
    #[arg(long, default_value = "dist")]
    pub out: PathBuf,

    #[command(flatten)]
    pub release: ReleaseArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Combined markdown document (created by `assemble`).
    #[arg(long)]
    pub input: PathBuf,

    /// Output directory for the exported artifacts.
    #[arg(long, default_value = "dist")]
    pub out: PathBuf,

    /// Directory with `template.html`, `pandoc.css`, `epub.css` and `template.tex`.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Formats to export (repeatable; default: all).
    #[arg(long = "format", value_enum)]
    pub format: Vec<ExportFormat>,

    #[command(flatten)]
    pub release: ReleaseArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ExportArgs {
    pub fn formats(&self) -> Vec<ExportFormat> {
        selected_formats(&self.format)
    }
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Directory holding the generated artifacts.
    #[arg(long, default_value = "dist")]
    pub out: PathBuf,

    /// Artifact file name prefix.
    #[arg(long, default_value = "trpl")]
    pub name: String,

    /// YAML file with book metadata.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn selected_formats(requested: &[ExportFormat]) -> Vec<ExportFormat> {
    if requested.is_empty() {
        ExportFormat::ALL.to_vec()
    } else {
        requested.to_vec()
    }
}
