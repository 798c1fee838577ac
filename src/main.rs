use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    let cli = trpl_ebook::cli::Cli::parse();
    trpl_ebook::logging::init(cli.verbose).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        trpl_ebook::cli::Command::Build(args) => {
            trpl_ebook::build::run(args).context("build")?;
        }
        trpl_ebook::cli::Command::Assemble(args) => {
            trpl_ebook::assemble::run(args).context("assemble")?;
        }
        trpl_ebook::cli::Command::Export(args) => {
            trpl_ebook::export::run(args).context("export")?;
        }
        trpl_ebook::cli::Command::Index(args) => {
            trpl_ebook::index::run(args).context("index")?;
        }
    }

    Ok(())
}
