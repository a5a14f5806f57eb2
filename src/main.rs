#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::prelude::*;

use awsgraph::app::cloud::properties::NAME;
use awsgraph::app::cloud::ResourceType;
use awsgraph::app::config::Config;
use awsgraph::app::error::Error;
use awsgraph::app::fetch::FetchContext;
use awsgraph::app::graph::{rdf, Graph};
use awsgraph::app::provider::{Clients, RecordedProvider};
use awsgraph::app::services::ServiceRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Triples,
    Json,
    Tree,
}

/// Fetch cloud resources into a graph and print it.
#[derive(Debug, Parser)]
#[command(name = "awsgraph", version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("AWSGRAPH_GIT_COMMIT"), ")"))]
struct Cli {
    /// Configuration file. Defaults to config.toml in the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recorded provider responses (JSON or YAML).
    #[arg(long)]
    fixture: PathBuf,

    /// Region to fetch, overriding `cloud.region`.
    #[arg(long)]
    region: Option<String>,

    /// Service to fetch. Repeat for several; all services when omitted.
    #[arg(long = "service")]
    services: Vec<String>,

    /// Fetch a single resource type, without relation inference.
    #[arg(long = "type")]
    kind: Option<ResourceType>,

    /// `key=value` filter handed to the fetch-funcs. Repeatable.
    #[arg(long = "filter")]
    filters: Vec<String>,

    /// Fetch types whose sync is disabled.
    #[arg(long)]
    force: bool,

    #[arg(long, value_enum, default_value_t = Format::Triples)]
    format: Format,
}

fn init_logging() {
    let Some(proj_dirs) = directories::ProjectDirs::from("com", "", "awsgraph") else {
        return;
    };
    let log_dir = proj_dirs.data_dir().join("logs");
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("cannot create log directory {:?}: {}", log_dir, e);
        return;
    }
    let log_path = log_dir.join("awsgraph.log");

    let file = match std::fs::OpenOptions::new().append(true).create(true).open(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("cannot open log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = file.metadata() {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            if let Err(e) = std::fs::set_permissions(&log_path, perms) {
                eprintln!("[SECURITY] Failed to set log file permissions: {}", e);
            }
        }
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("awsgraph=info"));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false),
    );

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("cannot install tracing subscriber: {}", e);
        return;
    }
    // Must come after the subscriber is set
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("cannot bridge log records: {}", e);
    }

    tracing::info!("Logging initialized to: {:?}", log_path);
}

fn print_tree(graph: &Graph) -> Result<()> {
    let regions = graph.get_all_resources(&[ResourceType::Region]);
    for region in regions {
        graph.visit_children(&region, |res, depth| {
            let name = res
                .property_str(NAME)
                .map(|n| format!(" {}", n))
                .unwrap_or_default();
            println!("{}{}{}", "  ".repeat(depth), res.key(), name);
        })?;
    }
    Ok(())
}

fn print_json(graph: &Graph) -> Result<()> {
    let relations: Vec<serde_json::Value> = graph
        .edges()
        .into_iter()
        .map(|(kind, from, to)| {
            serde_json::json!({
                "relation": kind.predicate(),
                "from": from.to_string(),
                "to": to.to_string(),
            })
        })
        .collect();
    let mut resources = graph.resources();
    resources.sort_by_key(|r| r.key());
    let document = serde_json::json!({
        "resources": resources,
        "relations": relations,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn report(errors: &Error) -> Result<()> {
    for e in errors.iter() {
        eprintln!("error: {}", e);
    }
    match errors.first_fatal() {
        Some(fatal) => bail!("fetch failed: {}", fatal),
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();
    tracing::info!("awsgraph starting: {:?}", cli);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(region) = &cli.region {
        config.set(awsgraph::app::config::REGION_KEY, region)?;
    }
    let region = config.region().to_string();

    let provider = RecordedProvider::load(&cli.fixture)
        .with_context(|| format!("loading fixture {}", cli.fixture.display()))?;
    let clients = Clients::from_provider(Arc::new(provider));
    let registry = ServiceRegistry::new(Arc::new(config), clients, &region);

    let ctx = FetchContext::new(region.as_str())
        .with_force(cli.force)
        .with_filters(&cli.filters);

    let (graph, errors) = match cli.kind {
        Some(kind) => registry.fetch_by_type(&ctx, kind).await,
        None => registry.fetch_all(&ctx, &cli.services).await,
    };
    tracing::info!("fetched {} resources ({} errors)", graph.len(), errors.len());

    match cli.format {
        Format::Triples => println!("{}", rdf::to_ntriples(&graph.triples())),
        Format::Json => print_json(&graph)?,
        Format::Tree => print_tree(&graph)?,
    }

    report(&errors)
}
