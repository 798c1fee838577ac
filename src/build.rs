use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assemble::{BookSources, assemble_book, write_markdown};
use crate::chapter::ChapterRenderer;
use crate::cli::{BuildArgs, ExportFormat};
use crate::config::BookConfig;
use crate::export::Exporter;
use crate::formats::Release;
use crate::index::write_index;
use crate::pandoc::{Converter, Pandoc};

pub fn run(args: BuildArgs) -> anyhow::Result<()> {
    let config = BookConfig::load(args.config.config.as_deref()).context("load config")?;
    let pandoc = Pandoc::from_env(args.config.pandoc.as_deref());
    let release = args.release.release();
    let sources = args.source.sources();
    let formats = args.formats();

    let plan = BuildPlan {
        sources: &sources,
        out_dir: &args.out,
        release: &release,
        assets: args.assets.as_deref(),
        formats: &formats,
    };
    let mut status = std::io::stdout().lock();
    build_book(&pandoc, &config, &plan, &mut status)?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct BuildPlan<'a> {
    pub sources: &'a BookSources,
    pub out_dir: &'a Path,
    pub release: &'a Release,
    pub assets: Option<&'a Path>,
    pub formats: &'a [ExportFormat],
}

/// Runs the whole pipeline. Each step reads what the previous one wrote, so
/// a failure leaves the earlier artifacts in place.
pub fn build_book<C: Converter>(
    converter: C,
    config: &BookConfig,
    plan: &BuildPlan<'_>,
    status: &mut dyn std::io::Write,
) -> anyhow::Result<Vec<PathBuf>> {
    tracing::info!(
        src = %plan.sources.src_dir.display(),
        out = %plan.out_dir.display(),
        release = %plan.release.date,
        "build: assemble"
    );
    let renderer = ChapterRenderer::new(&converter, config);
    let book = assemble_book(&renderer, config, plan.release.date, plan.sources)
        .context("assemble")?;
    let markdown = write_markdown(plan.out_dir, plan.release, &book, status)?;

    tracing::info!("build: export");
    let exporter = Exporter {
        converter: &converter,
        config,
        assets: plan.assets,
    };
    let mut written = vec![markdown.clone()];
    written.extend(
        exporter
            .export(&markdown, plan.out_dir, plan.release, plan.formats, status)
            .context("export")?,
    );

    tracing::info!("build: index");
    written.push(
        write_index(plan.out_dir, &plan.release.name, config, status).context("index")?,
    );

    Ok(written)
}
