use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::cli::{ExportArgs, ExportFormat};
use crate::config::BookConfig;
use crate::formats::Release;
use crate::pandoc::{ConvertInput, ConvertRequest, Converter, MARKDOWN_DIALECT, Pandoc};

pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    let config = BookConfig::load(args.config.config.as_deref()).context("load config")?;
    let pandoc = Pandoc::from_env(args.config.pandoc.as_deref());
    let release = args.release.release();

    let exporter = Exporter {
        converter: &pandoc,
        config: &config,
        assets: args.assets.as_deref(),
    };
    let mut status = std::io::stdout().lock();
    exporter.export(&args.input, &args.out, &release, &args.formats(), &mut status)?;
    Ok(())
}

/// One `[✓] <label>` line per finished artifact.
pub fn report_done(status: &mut dyn std::io::Write, label: &str) -> anyhow::Result<()> {
    writeln!(status, "[✓] {label}").context("write status line")?;
    status.flush().context("flush status line")
}

/// Drives the converter once per output format, strictly in order.
#[derive(Debug)]
pub struct Exporter<'a, C> {
    pub converter: C,
    pub config: &'a BookConfig,
    /// Directory holding `template.html`, `pandoc.css`, `epub.css` and
    /// `template.tex`. Without it the converter's built-in templates are used.
    pub assets: Option<&'a Path>,
}

impl<C: Converter> Exporter<'_, C> {
    /// Converts the combined markdown at `markdown` into each requested
    /// format. PDFs are made from a copy with long code lines wrapped; HTML
    /// and EPUB reflow, so they get the original.
    pub fn export(
        &self,
        markdown: &Path,
        out_dir: &Path,
        release: &Release,
        formats: &[ExportFormat],
        status: &mut dyn std::io::Write,
    ) -> anyhow::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("create output dir: {}", out_dir.display()))?;

        let mut wrapped: Option<tempfile::NamedTempFile> = None;
        let mut written = Vec::new();

        for format in ExportFormat::ALL
            .into_iter()
            .filter(|format| formats.contains(format))
        {
            let artifact = format.artifact();
            let out = release.path_in(out_dir, artifact);

            let input = if format.is_pdf() {
                if wrapped.is_none() {
                    wrapped = Some(self.write_wrapped(markdown)?);
                }
                wrapped
                    .as_ref()
                    .map(|file| file.path().to_path_buf())
                    .context("wrapped markdown is missing")?
            } else {
                markdown.to_path_buf()
            };

            tracing::info!(
                format = artifact.label(),
                input = %input.display(),
                out = %out.display(),
                "export via converter"
            );
            let request = self.request(format, input, markdown, &out);
            self.converter
                .convert(&request)
                .with_context(|| format!("export {}", artifact.label()))?;

            report_done(status, artifact.label())?;
            written.push(out);
        }

        Ok(written)
    }

    fn write_wrapped(&self, markdown: &Path) -> anyhow::Result<tempfile::NamedTempFile> {
        let wrapper = self.config.line_wrapper().context("configure line wrapper")?;
        let book = std::fs::read_to_string(markdown)
            .with_context(|| format!("read combined markdown: {}", markdown.display()))?;

        let mut file = tempfile::Builder::new()
            .prefix("wrapped-")
            .suffix(".md")
            .tempfile()
            .context("create wrapped markdown temp file")?;
        file.write_all(wrapper.wrap_code_blocks(&book).as_bytes())
            .context("write wrapped markdown")?;
        file.flush().context("flush wrapped markdown")?;
        Ok(file)
    }

    fn asset(&self, name: &str) -> Option<PathBuf> {
        self.assets.map(|dir| dir.join(name))
    }

    pub fn request(
        &self,
        format: ExportFormat,
        input: PathBuf,
        markdown: &Path,
        out: &Path,
    ) -> ConvertRequest {
        let mut request = ConvertRequest::new(ConvertInput::File(input), MARKDOWN_DIALECT)
            .flag("--standalone")
            .opt("highlight-style", &self.config.highlight_style)
            .flag("--toc");

        if let Some(parent) = markdown.parent()
            && !parent.as_os_str().is_empty()
        {
            request = request.opt("resource-path", parent);
        }

        request = match format {
            ExportFormat::Html => {
                let mut request = request.to("html5").flag("--embed-resources");
                if let Some(template) = self.asset("template.html") {
                    request = request.opt("template", template);
                }
                if let Some(css) = self.asset("pandoc.css") {
                    request = request.opt("css", css);
                }
                request
            }
            ExportFormat::Epub => {
                let mut request = request.to("epub");
                if let Some(css) = self.asset("epub.css") {
                    request = request.opt("css", css);
                }
                request
            }
            ExportFormat::PdfA4 | ExportFormat::PdfLetter => {
                let paper = if format == ExportFormat::PdfA4 { "a4" } else { "letter" };
                let mut request = request
                    .to("latex")
                    .opt("top-level-division", "chapter")
                    .opt("pdf-engine", "xelatex")
                    .variable("papersize", paper)
                    .variable("monofont", &self.config.monofont);
                if let Some(template) = self.asset("template.tex") {
                    request = request.opt("template", template);
                }
                request
            }
        };

        request.output(out)
    }
}
