#![forbid(unsafe_code)]

pub mod assemble;
pub mod build;
pub mod chapter;
pub mod cli;
pub mod config;
pub mod export;
pub mod formats;
pub mod index;
pub mod links;
pub mod logging;
pub mod pandoc;
pub mod snippets;
pub mod summary;
pub mod tables;
pub mod wrap;
