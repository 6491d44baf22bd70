//! mdgen CLI: CSV content exports to a front-matter Markdown page tree.
//!
//! Each CSV row becomes `<output>/<url>/README.md` with its columns as front
//! matter and its HTML (or Textile) body converted to Markdown.

mod commands;
mod prompt;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
