//! pagemark CLI — convert web pages to Markdown with a local model.
//!
//! Fetches a page through a content-cleaning proxy, runs it through a
//! locally installed Ollama model, and prints or saves the Markdown.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
