use anyhow::Context;
use clap::{Parser, Subcommand};
use crowdseq::crowdseq_api::{self, AppState};
use crowdseq::crowdseq_core::{Config, SearchEngine, SearchEnvelope, Store};
use crowdseq::crowdseq_import::Importer;
use crowdseq::telemetry;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "crowdseq", about = "Genomics reference API with federated search")]
struct Cli {
    /// Write debug logs to /tmp/crowdseq-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of ~/.config/crowdseq/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Address to bind, overriding [server] bind.
        #[arg(long)]
        bind: Option<String>,
        /// SQLite database, overriding [database] path.
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Import a spreadsheet (.xlsx, .xls, .ods, .csv, .tsv) and print the report.
    Import {
        file: PathBuf,
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Search and print the result envelope.
    Search {
        /// Search terms; none lists every variant.
        query: Vec<String>,
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.debug)?;

    let config = match &cli.config {
        Some(path) => Config::load_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load()?,
    };

    match cli.command {
        Command::Serve { bind, database } => {
            let store = open_store(database.as_deref().unwrap_or(&config.database.path))?;
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(crowdseq_api::serve(AppState::new(store, config), &bind))
        }
        Command::Import { file, database } => {
            let store = open_store(database.as_deref().unwrap_or(&config.database.path))?;
            let bytes = std::fs::read(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let report = Importer::new(&store, config.import.default_priority)
                .import_bytes(file_name, &bytes)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Search { query, database } => {
            let store = open_store(database.as_deref().unwrap_or(&config.database.path))?;
            let results = SearchEngine::new(&store).search(&query.join(" "))?;
            let envelope = SearchEnvelope::shape(&store, results)?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(())
        }
    }
}

fn open_store(path: &Path) -> anyhow::Result<Store> {
    Store::open(path).with_context(|| format!("opening database {}", path.display()))
}
