use anyhow::Result;
use citelink::config::{self, ConfigError};
use citelink::relations::{enrich_library, ITEM_DELAY};
use citelink::sources::SemanticScholarClient;
use citelink::zotero::ZoteroClient;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Citelink - Cross-link Zotero library items that cite each other
#[derive(Parser, Debug)]
#[command(name = "citelink")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "hongkongkiwi")]
#[command(about = "Cross-link Zotero library items that cite each other", long_about = None)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Path to the connection file
    #[arg(long, default_value = config::CONNECTION_FILE)]
    secret: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("citelink={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let connection = match config::load_or_init(&cli.secret) {
        Ok(connection) => connection,
        Err(ConfigError::TemplateWritten(path)) => {
            anyhow::bail!(
                "no connection data found; wrote a template to {} - fill in library_id, \
                 library_type and api_key, then rerun",
                path.display()
            );
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "Connecting to Zotero {} library {}...",
        connection.library_type, connection.library_id
    );
    let zotero = ZoteroClient::new(&connection);
    let graph = SemanticScholarClient::new();

    let count = enrich_library(&zotero, &graph, ITEM_DELAY).await?;
    println!("Finished! Submitted {} items.", count);

    Ok(())
}
