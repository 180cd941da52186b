//! Catalog search CLI - run storefront searches against a catalog snapshot.
//!
//! Commands:
//! - `catalog-search search` - Search with query-string parameters
//! - `catalog-search latest` - List the newest products
//! - `catalog-search recommended` - List products related to one product

mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use turbo_search::prelude::*;

use output::Output;

/// Catalog search CLI - query a product catalog snapshot
#[derive(Parser)]
#[command(name = "catalog-search")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Search config file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Catalog snapshot file (JSON)
    #[arg(long, global = true, default_value = "catalog.json")]
    catalog: PathBuf,

    /// Behave like a store without trigram similarity
    #[arg(long, global = true)]
    no_similarity: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search products
    Search(SearchArgs),

    /// List the newest products
    Latest(LatestArgs),

    /// List products related to a product
    Recommended(RecommendedArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Raw query string, e.g. "search=bateria+willard&sort=price_asc"
    query: Option<String>,

    /// Search text (overrides the query string)
    #[arg(short, long)]
    search: Option<String>,

    /// Sort: featured, newest, price_asc, price_desc
    #[arg(long)]
    sort: Option<String>,

    /// Page number (1-indexed)
    #[arg(short, long)]
    page: Option<u32>,

    /// Page size
    #[arg(short, long)]
    limit: Option<u32>,
}

#[derive(Args)]
struct LatestArgs {
    /// Number of products (defaults to the configured latest_limit)
    #[arg(short, long)]
    limit: Option<u32>,
}

#[derive(Args)]
struct RecommendedArgs {
    /// Product ID
    id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.verbose, cli.json);

    if let Err(e) = run(&cli, &output).await {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: &Cli, output: &Output) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };
    let snapshot = load_snapshot(&cli.catalog)?;
    output.debug(&format!(
        "Loaded {} products from {}",
        snapshot.products.len(),
        cli.catalog.display()
    ));

    let store = InMemoryCatalog::new(snapshot).with_similarity(!cli.no_similarity);
    if !store.supports_similarity() {
        output.warn("Similarity disabled; searches match substrings only");
    }
    let engine = SearchEngine::with_config(store, config);

    match &cli.command {
        Commands::Search(args) => search(&engine, args, output).await,
        Commands::Latest(args) => latest(&engine, args, output).await,
        Commands::Recommended(args) => recommended(&engine, args, output).await,
    }
}

fn load_snapshot(path: &Path) -> Result<CatalogSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))
}

async fn search(
    engine: &SearchEngine<InMemoryCatalog>,
    args: &SearchArgs,
    output: &Output,
) -> Result<()> {
    let mut params = RawParams::from_query_string(args.query.as_deref().unwrap_or(""));
    if let Some(search) = &args.search {
        params.set("search", search.as_str());
    }
    if let Some(sort) = &args.sort {
        params.set("sort", sort.as_str());
    }
    if let Some(page) = args.page {
        params.set("page", page.to_string());
    }
    if let Some(limit) = args.limit {
        params.set("limit", limit.to_string());
    }

    let filter = engine.normalizer().normalize_params(&params);
    output.debug(&format!("Filter: {}", serde_json::to_string(&filter)?));

    let results = engine.search_filter(&filter).await?;
    if output.is_json() {
        output.json(&results);
        return Ok(());
    }

    match &filter.search {
        Some(text) => output.header(&format!("Results for \"{}\"", text)),
        None => output.header(&format!("Products ({})", filter.sort.display_name())),
    }
    output.products(&results.products);
    output.pagination(&results.pagination(filter.page, filter.limit));
    Ok(())
}

async fn latest(
    engine: &SearchEngine<InMemoryCatalog>,
    args: &LatestArgs,
    output: &Output,
) -> Result<()> {
    let products = engine.latest(args.limit).await?;
    if output.is_json() {
        output.json(&products);
        return Ok(());
    }

    output.header("Latest products");
    output.products(&products);
    Ok(())
}

async fn recommended(
    engine: &SearchEngine<InMemoryCatalog>,
    args: &RecommendedArgs,
    output: &Output,
) -> Result<()> {
    let products = engine.recommended(&ProductId::new(args.id.as_str())).await?;
    if output.is_json() {
        output.json(&products);
        return Ok(());
    }

    output.header(&format!("Recommended for {}", args.id));
    output.products(&products);
    Ok(())
}
