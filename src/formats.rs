use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Names every artifact of one release: `<name>-<YYYY-MM-DD><suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub name: String,
    pub date: NaiveDate,
}

impl Release {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }

    pub fn file_name(&self, artifact: Artifact) -> String {
        format!("{}-{}{}", self.name, self.date, artifact.suffix())
    }

    pub fn path_in(&self, dir: &Path, artifact: Artifact) -> PathBuf {
        dir.join(self.file_name(artifact))
    }
}

/// Pandoc metadata block at the top of the combined document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub date: NaiveDate,
    pub description: String,
    pub language: String,
    #[serde(rename = "documentclass")]
    pub document_class: String,
    pub links_as_notes: bool,
    pub verbatim_in_note: bool,
    pub toc_depth: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Markdown,
    Html,
    Epub,
    PdfA4,
    PdfLetter,
}

impl Artifact {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Markdown => ".md",
            Self::Html => ".html",
            Self::Epub => ".epub",
            Self::PdfA4 => "-a4.pdf",
            Self::PdfLetter => "-letter.pdf",
        }
    }

    /// Label printed in the `[✓] <label>` status line.
    pub fn label(self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Html => "HTML",
            Self::Epub => "EPUB",
            Self::PdfA4 => "PDF (A4)",
            Self::PdfLetter => "PDF (Letter)",
        }
    }
}

/// One chapter link from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub depth: usize,
    pub title: String,
    pub filename: String,
}

impl TocEntry {
    /// `#` for top-level entries, `##` for anything indented.
    pub fn heading_marker(&self) -> &'static str {
        if self.depth == 0 { "#" } else { "##" }
    }

    /// File name without directories or extension, used for `#sec--<stem>` anchors.
    pub fn anchor_stem(&self) -> &str {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.filename)
    }
}
