#![cfg(unix)]

use std::fs;
use std::path::Path;

use predicates::prelude::*;

mod pandoc_stub;

use pandoc_stub::{PandocStub, StubBehavior};

fn write_book(src: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(src)?;
    fs::write(
        src.join("SUMMARY.md"),
        "# Summary\n\
\n\
* [I: Getting Started](getting-started.md)\n\
    * [Hello, world!](hello-world.md)\n\
This line is prose and is skipped.\n\
* [II: Syntax and Semantics](syntax-and-semantics.md)\n",
    )?;
    fs::write(src.join("README.md"), "% The Rust Programming Language\n\nWelcome!\n")?;
    fs::write(src.join("getting-started.md"), "First steps.\n")?;
    fs::write(
        src.join("hello-world.md"),
        format!(
            "```{{rust}}\n# #![allow(unused)]\nfn main() {{ println!(\"{}\"); }}\n```\n\
See [the syntax chapter](syntax-and-semantics.html) and [io](../std/io/index.html).\n",
            "a".repeat(120)
        ),
    )?;
    fs::write(src.join("syntax-and-semantics.md"), "Syntax.\n")?;
    Ok(())
}

#[test]
fn build_writes_every_artifact_through_the_converter() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let src = temp.path().join("src");
    let out = temp.path().join("dist");
    write_book(&src)?;
    let stub = PandocStub::install(temp.path(), StubBehavior::Echo)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("trpl-ebook");
    cmd.args([
        "build",
        "--src",
        src.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--date",
        "2015-05-15",
        "--pandoc",
        stub.bin.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(
        "[✓] Markdown\n[✓] HTML\n[✓] EPUB\n[✓] PDF (A4)\n[✓] PDF (Letter)\n[✓] Index page\n",
    );

    for name in [
        "trpl-2015-05-15.md",
        "trpl-2015-05-15.html",
        "trpl-2015-05-15.epub",
        "trpl-2015-05-15-a4.pdf",
        "trpl-2015-05-15-letter.pdf",
        "index.html",
    ] {
        assert!(out.join(name).exists(), "missing {name}");
    }

    let book = fs::read_to_string(out.join("trpl-2015-05-15.md"))?;
    assert!(book.starts_with("---\ntitle: \"The Rust Programming Language\"\n"));
    assert!(book.contains("date: 2015-05-15\n"));
    assert!(!book.contains("#![allow(unused)]"));
    assert!(book.contains("```rust\nfn main()"));
    assert!(book.contains("[the syntax chapter](#sec--syntax-and-semantics)"));
    assert!(book.contains("[io](http://doc.rust-lang.org/std/io/index.html)"));

    let headings: Vec<&str> = book
        .lines()
        .filter(|line| line.starts_with("# ") || line.starts_with("## "))
        .collect();
    assert_eq!(
        headings,
        [
            "# Introduction",
            "# Getting Started {#sec--getting-started}",
            "## Hello, world! {#sec--hello-world}",
            "# Syntax and Semantics {#sec--syntax-and-semantics}",
        ]
    );

    // HTML keeps long code lines; the PDFs get the wrapped copy.
    let html = fs::read_to_string(out.join("trpl-2015-05-15.html"))?;
    assert!(html.contains(&"a".repeat(120)));
    let pdf = fs::read_to_string(out.join("trpl-2015-05-15-a4.pdf"))?;
    assert!(!pdf.contains(&"a".repeat(120)));
    assert!(pdf.contains("\n↳ "));

    let invocations = stub.invocations()?;
    assert_eq!(invocations.len(), 8);
    for chapter_call in &invocations[..4] {
        assert!(chapter_call.contains("--markdown-headings=atx"), "{chapter_call}");
    }
    assert!(invocations[0].contains("--shift-heading-level-by=0"));
    assert!(invocations[1].contains("--shift-heading-level-by=2"));
    assert!(invocations[4].contains("--to=html5"));
    assert!(invocations[5].contains("--to=epub"));
    assert!(invocations[6].contains("papersize=a4"));
    assert!(invocations[7].contains("papersize=letter"));

    let index = fs::read_to_string(out.join("index.html"))?;
    assert!(index.contains("<h2>2015-05-15</h2>"));
    assert!(index.contains(">LETTER PDF</a>"));
    Ok(())
}

#[test]
fn converter_failure_halts_and_keeps_earlier_artifacts() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let src = temp.path().join("src");
    let out = temp.path().join("dist");
    write_book(&src)?;
    let stub = PandocStub::install(temp.path(), StubBehavior::FailOnEpub)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("trpl-ebook");
    cmd.env("TRPL_EBOOK_PANDOC", &stub.bin)
        .args([
            "build",
            "--src",
            src.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--date",
            "2015-05-15",
        ])
        .assert()
        .failure()
        .stdout("[✓] Markdown\n[✓] HTML\n")
        .stderr(predicate::str::contains("epub writer exploded"));

    assert!(out.join("trpl-2015-05-15.md").exists());
    assert!(out.join("trpl-2015-05-15.html").exists());
    assert!(!out.join("trpl-2015-05-15.epub").exists());
    assert!(!out.join("index.html").exists());
    Ok(())
}

#[test]
fn export_alone_converts_selected_formats() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let out = temp.path().join("dist");
    let input = temp.path().join("combined.md");
    fs::write(&input, "# Book\n")?;
    let stub = PandocStub::install(temp.path(), StubBehavior::Echo)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("trpl-ebook");
    cmd.args([
        "export",
        "--input",
        input.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--name",
        "book",
        "--date",
        "2020-02-29",
        "--format",
        "epub",
        "--pandoc",
        stub.bin.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout("[✓] EPUB\n");

    assert_eq!(fs::read_to_string(out.join("book-2020-02-29.epub"))?, "# Book\n");
    assert_eq!(stub.invocations()?.len(), 1);
    Ok(())
}
