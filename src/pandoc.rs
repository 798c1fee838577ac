use std::ffi::OsString;
use std::io;
use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::Context as _;

/// The extended markdown dialect the book sources are written in.
pub const MARKDOWN_DIALECT: &str = "markdown+grid_tables+pipe_tables+raw_html+implicit_figures+footnotes+intraword_underscores+auto_identifiers-inline_code_attributes";

pub const PANDOC_BIN_ENV: &str = "TRPL_EBOOK_PANDOC";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertInput {
    /// Piped to the converter on stdin.
    Text(String),
    File(PathBuf),
}

/// One converter invocation: input, dialect pair, extra options and an
/// optional output file. Without an output file the result is read from stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    pub input: ConvertInput,
    pub from: String,
    pub to: Option<String>,
    pub options: Vec<OsString>,
    pub output: Option<PathBuf>,
}

impl ConvertRequest {
    pub fn new(input: ConvertInput, from: impl Into<String>) -> Self {
        Self {
            input,
            from: from.into(),
            to: None,
            options: Vec::new(),
            output: None,
        }
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn flag(mut self, flag: impl Into<OsString>) -> Self {
        self.options.push(flag.into());
        self
    }

    /// Pushes `--name=value`.
    pub fn opt(mut self, name: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        let mut arg = OsString::from(format!("--{name}="));
        arg.push(value);
        self.options.push(arg);
        self
    }

    /// Pushes `--variable key=value`.
    pub fn variable(self, key: &str, value: &str) -> Self {
        self.flag("--variable").flag(format!("{key}={value}"))
    }
}

/// Anything that can turn a document into another format.
///
/// The pipeline only talks to this trait, so tests can swap pandoc for an
/// in-process fake.
pub trait Converter {
    fn convert(&self, request: &ConvertRequest) -> anyhow::Result<String>;
}

impl<C: Converter + ?Sized> Converter for &C {
    fn convert(&self, request: &ConvertRequest) -> anyhow::Result<String> {
        (**self).convert(request)
    }
}

#[derive(Debug, Clone)]
pub struct Pandoc {
    pub bin: String,
}

impl Pandoc {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// `explicit` (from the command line) wins over `TRPL_EBOOK_PANDOC`,
    /// which wins over `pandoc` on `PATH`.
    pub fn from_env(explicit: Option<&str>) -> Self {
        let bin = match explicit {
            Some(bin) => bin.to_owned(),
            None => std::env::var(PANDOC_BIN_ENV).unwrap_or_else(|_| "pandoc".to_owned()),
        };
        Self { bin }
    }

    fn build_args(request: &ConvertRequest) -> Vec<OsString> {
        let mut args = Vec::new();
        if let ConvertInput::File(path) = &request.input {
            args.push(path.as_os_str().to_owned());
        }

        args.push(OsString::from(format!("--from={}", request.from)));
        if let Some(to) = &request.to {
            args.push(OsString::from(format!("--to={to}")));
        }
        args.extend(request.options.iter().cloned());

        if let Some(output) = &request.output {
            let mut arg = OsString::from("--output=");
            arg.push(output);
            args.push(arg);
        }
        args
    }
}

impl Converter for Pandoc {
    fn convert(&self, request: &ConvertRequest) -> anyhow::Result<String> {
        let args = Self::build_args(request);
        tracing::debug!(bin = %self.bin, ?args, "run pandoc");

        let mut cmd = Command::new(&self.bin);
        cmd.args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(match request.input {
                ConvertInput::Text(_) => Stdio::piped(),
                ConvertInput::File(_) => Stdio::null(),
            });

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                anyhow::bail!(
                    "pandoc not found: {}; install pandoc or pass `--pandoc <PATH>` (or set {PANDOC_BIN_ENV})",
                    self.bin
                );
            }
            Err(err) => {
                return Err(anyhow::Error::new(err).context(format!("spawn pandoc: {}", self.bin)));
            }
        };

        let stdin = match &request.input {
            ConvertInput::Text(text) => {
                Some((child.stdin.take().context("open pandoc stdin")?, text))
            }
            ConvertInput::File(_) => None,
        };

        // Feed stdin from its own thread while stdout and stderr are drained,
        // so neither side can stall on a full pipe.
        let (output, written) = std::thread::scope(|scope| {
            let writer = stdin.map(|(mut stdin, text)| {
                scope.spawn(move || stdin.write_all(text.as_bytes()))
            });
            let output = child.wait_with_output();
            let written = match writer {
                Some(writer) => writer
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("pandoc stdin writer panicked"))),
                None => Ok(()),
            };
            (output, written)
        });

        let output = output.context("wait pandoc")?;
        if !output.status.success() {
            anyhow::bail!(
                "pandoc failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        match written {
            Err(err) if err.kind() != io::ErrorKind::BrokenPipe => {
                return Err(anyhow::Error::new(err).context("write pandoc stdin"));
            }
            _ => {}
        }

        String::from_utf8(output.stdout).context("pandoc output is not UTF-8")
    }
}


/// In-process stand-in for pandoc that echoes its input and records requests.
#[cfg(test)]
pub(crate) mod fake {
    use std::cell::RefCell;

    use anyhow::Context as _;

    use super::{ConvertInput, ConvertRequest, Converter};

    #[derive(Debug, Default)]
    pub(crate) struct EchoConverter {
        pub(crate) requests: RefCell<Vec<ConvertRequest>>,
    }

    impl Converter for EchoConverter {
        fn convert(&self, request: &ConvertRequest) -> anyhow::Result<String> {
            self.requests.borrow_mut().push(request.clone());

            let text = match &request.input {
                ConvertInput::Text(text) => text.clone(),
                ConvertInput::File(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("read input: {}", path.display()))?,
            };
            match &request.output {
                Some(output) => {
                    std::fs::write(output, text)
                        .with_context(|| format!("write output: {}", output.display()))?;
                    Ok(String::new())
                }
                None => Ok(text),
            }
        }
    }
}
