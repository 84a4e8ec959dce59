//! Command-line extractor
//!
//! Runs one extraction over a saved page and writes the export document to
//! disk, using the same pipeline the panels drive through the coordinator.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use teor_extract::{extract, DownloadArtifact, ExtractionRequest, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Whole page body, sanitized
    FullPage,
    /// Content anchored at the "Inteiro Teor" marker
    Marker,
    /// Content around a search term (requires --text)
    Search,
}

#[derive(Parser)]
#[command(name = "teor-extract", version, about = "Extract document content from a saved page")]
struct Cli {
    /// Path to the saved page HTML
    input: PathBuf,

    /// URL the page was captured from
    #[arg(long, default_value = "https://www.jusbrasil.com.br/")]
    url: String,

    /// Extraction mode
    #[arg(long, value_enum, default_value_t = Mode::Marker)]
    mode: Mode,

    /// Search term for --mode search, or a marker override for --mode marker
    #[arg(long)]
    text: Option<String>,

    /// Output path; defaults to extracao_<date>.html in the current directory
    #[arg(long, short)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let html = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let page = Page::new(&html, cli.url.clone());

    let request = match cli.mode {
        Mode::FullPage => ExtractionRequest::full_page(),
        Mode::Marker => {
            let mut request = ExtractionRequest::marker_search();
            request.search_text = cli.text.clone();
            request
        }
        Mode::Search => {
            let text = cli
                .text
                .clone()
                .context("--mode search requires --text")?;
            ExtractionRequest::custom_search(text)
        }
    };

    let document = extract(&page, &request)?;
    let artifact = DownloadArtifact::for_document(&document);
    let out = cli.out.unwrap_or_else(|| PathBuf::from(&artifact.filename));

    std::fs::write(&out, artifact.contents)
        .with_context(|| format!("writing {}", out.display()))?;
    log::info!("wrote \"{}\" to {}", document.title, out.display());
    println!("{}", out.display());

    Ok(())
}
