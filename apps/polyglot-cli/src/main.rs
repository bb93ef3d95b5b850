use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use polyglot_core::{Config, Error, PageSource, TextPageSource};
use polyglot_rag::{Assistant, Outcome, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Ask questions about a single text document.
#[derive(Debug, Parser)]
#[command(name = "polyglot", version)]
struct Cli {
    /// Configuration environment (`config.<env>.toml`); defaults to `RUST_ENV` or `dev`.
    #[arg(long, global = true)]
    config_env: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Chunk a document and list its chunks.
    Index { path: PathBuf },
    /// Rank a document's passages against a query.
    Search {
        path: PathBuf,
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Answer a question from a document with the offline extractive answerer.
    Ask { path: PathBuf, question: String },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("polyglot=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_pages(path: &Path) -> anyhow::Result<Vec<polyglot_core::PageText>> {
    TextPageSource::new(path).pages().with_context(|| format!("Could not read pages from {}", path.display()))
}

fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max_chars {
        format!("{}…", flat.chars().take(max_chars).collect::<String>())
    } else {
        flat
    }
}

fn index(config: &Config, path: &Path, json: bool) -> anyhow::Result<()> {
    let pages = load_pages(path)?;
    let session = Session::new(config.chunking.clone(), config.retrieval.clone())?;
    let snapshot = session.index(&pages)?;

    if json {
        println!("{}", serde_json::to_string_pretty(snapshot.chunks())?);
        return Ok(());
    }
    println!("Indexed {} chunks from {} pages ({})", snapshot.chunks().len(), snapshot.page_count(), path.display());
    for chunk in snapshot.chunks() {
        println!(
            "{:>5}  page {:<4} [{}..{})  {}  {}",
            chunk.id.to_string(),
            chunk.page,
            chunk.start,
            chunk.end,
            &chunk.content_hash[..12.min(chunk.content_hash.len())],
            preview(&chunk.text, 60)
        );
    }
    Ok(())
}

fn search(config: &Config, path: &Path, query: &str, top_k: Option<usize>, json: bool) -> anyhow::Result<()> {
    let mut retrieval = config.retrieval.clone();
    if let Some(top_k) = top_k {
        retrieval.top_k = top_k;
    }
    let session = Session::new(config.chunking.clone(), retrieval)?;
    session.index(&load_pages(path)?)?;
    let passages = session.query(query);
    info!(query, hits = passages.len(), "search finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&passages)?);
        return Ok(());
    }
    if passages.is_empty() {
        println!("No passage cleared the relevance floor ({}).", session.retrieval_config().min_score);
        return Ok(());
    }
    for (rank, passage) in passages.iter().enumerate() {
        println!("#{} {:.3} [Page {}] {}", rank + 1, passage.score, passage.chunk.page, preview(&passage.chunk.text, 100));
    }
    Ok(())
}

async fn ask(config: &Config, path: &Path, question: &str, json: bool) -> anyhow::Result<()> {
    let assistant = Assistant::extractive(config)?;
    assistant.upload(&load_pages(path)?)?;
    let answer = assistant.ask(question, &[]).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }
    println!("{}", answer.text);
    if answer.outcome == Outcome::Grounded {
        let pages: Vec<String> = answer.citations.iter().map(u32::to_string).collect();
        println!("\nSources: page {}", pages.join(", "));
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_for_env(cli.config_env.as_deref()).context("Error loading config")?;
    match &cli.command {
        Command::Index { path } => index(&config, path, cli.json),
        Command::Search { path, query, top_k } => search(&config, path, query, *top_k, cli.json),
        Command::Ask { path, question } => ask(&config, path, question, cli.json).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<Error>() {
                Some(Error::EmptyDocument) => eprintln!("The document has no extractable text; nothing was indexed."),
                _ => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
