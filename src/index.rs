use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;

use crate::cli::IndexArgs;
use crate::config::BookConfig;
use crate::export::report_done;

pub const INDEX_FILE_NAME: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseFile {
    pub file_name: String,
    pub label: String,
}

/// All artifacts that share one release date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseGroup {
    pub date: NaiveDate,
    pub files: Vec<ReleaseFile>,
}

pub fn run(args: IndexArgs) -> anyhow::Result<()> {
    let config = BookConfig::load(args.config.as_deref()).context("load config")?;
    let mut status = std::io::stdout().lock();
    write_index(&args.out, &args.name, &config, &mut status)?;
    Ok(())
}

/// Scans `out_dir` and writes `out_dir/index.html`.
pub fn write_index(
    out_dir: &Path,
    name: &str,
    config: &BookConfig,
    status: &mut dyn std::io::Write,
) -> anyhow::Result<PathBuf> {
    let mut file_names = Vec::new();
    for entry in std::fs::read_dir(out_dir)
        .with_context(|| format!("read output dir: {}", out_dir.display()))?
    {
        let entry = entry.context("read output dir entry")?;
        if !entry.file_type().context("stat output entry")?.is_file() {
            continue;
        }
        if let Some(file_name) = entry.file_name().to_str() {
            file_names.push(file_name.to_owned());
        }
    }

    let groups = group_artifacts(name, file_names.iter().map(String::as_str))?;
    tracing::info!(
        out = %out_dir.display(),
        releases = groups.len(),
        "write index page"
    );

    let path = out_dir.join(INDEX_FILE_NAME);
    std::fs::write(&path, render_index_html(config, &groups))
        .with_context(|| format!("write index: {}", path.display()))?;
    report_done(status, "Index page")?;
    Ok(path)
}

/// Groups `<name>-<YYYY-MM-DD><rest>` file names by date, newest first.
/// Names that do not follow the convention are ignored.
pub fn group_artifacts<'a>(
    name: &str,
    file_names: impl IntoIterator<Item = &'a str>,
) -> anyhow::Result<Vec<ReleaseGroup>> {
    let pattern = Regex::new(&format!(
        r"^{}-(?P<date>\d{{4}}-\d{{2}}-\d{{2}})(?P<rest>.*)$",
        regex::escape(name)
    ))
    .context("build artifact name pattern")?;

    let mut by_date: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for file_name in file_names {
        let Some(caps) = pattern.captures(file_name) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(&caps["date"], "%Y-%m-%d") else {
            tracing::debug!(file_name, "skip artifact with invalid date");
            continue;
        };
        by_date.entry(date).or_default().push(file_name.to_owned());
    }

    let groups = by_date
        .into_iter()
        .rev()
        .map(|(date, mut names)| {
            names.sort_unstable_by(|a, b| b.cmp(a));
            let prefix_len = format!("{name}-{date}").len();
            let files = names
                .into_iter()
                .map(|file_name| ReleaseFile {
                    label: humanize_suffix(&file_name[prefix_len..]),
                    file_name,
                })
                .collect();
            ReleaseGroup { date, files }
        })
        .collect();

    Ok(groups)
}

/// `-a4.pdf` becomes `A4 PDF`.
pub fn humanize_suffix(suffix: &str) -> String {
    suffix.replace(['-', '.'], " ").trim().to_uppercase()
}

pub fn render_listing(groups: &[ReleaseGroup]) -> String {
    groups
        .iter()
        .map(|group| {
            let links: Vec<String> = group
                .files
                .iter()
                .map(|file| {
                    format!(
                        "<li><a href=\"{}\">{}</a></li>",
                        encode_double_quoted_attribute(&file.file_name),
                        encode_text(&file.label)
                    )
                })
                .collect();
            format!(
                "<li><h2>{}</h2><ul>{}</ul></li>\n",
                group.date,
                links.join("\n")
            )
        })
        .collect()
}

pub fn render_index_html(config: &BookConfig, groups: &[ReleaseGroup]) -> String {
    let title = encode_text(&config.title);
    let homepage = config
        .homepage
        .as_deref()
        .map(|url| {
            format!(
                "<li>\n            <strong><a href=\"{}\">The original online</a></strong>\n        </li>\n",
                encode_double_quoted_attribute(url)
            )
        })
        .unwrap_or_default();
    let ribbon = config
        .repository
        .as_deref()
        .map(|url| {
            format!(
                "<a href=\"{}\">\n        <img style=\"position: absolute; top: 0; right: 0; border: 0;\" src=\"https://s3.amazonaws.com/github/ribbons/forkme_right_gray_6d6d6d.png\" alt=\"Fork me on GitHub\"/>\n    </a>\n",
                encode_double_quoted_attribute(url)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="{language}">
<head>
    <meta charset="UTF-8">
    <title>Download '{title}'</title>
    <style>
        body {{ max-width: 32em; margin: 10em auto; font-size: 16px; font-family: sans-serif; line-height: 1.3; }}
        li {{ margin-bottom: 0.5em; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <ul>
        {homepage}{listing}    </ul>
    {ribbon}</body>
</html>
"#,
        language = encode_double_quoted_attribute(&config.language),
        listing = render_listing(groups),
    )
}
