use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use storage::{LoadOutcome, MemoryStore, PersistenceGateway, StoredValue};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "dualstore")]
#[command(about = "Save and load values through the environment-aware store")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a value under a key
    Save {
        key: String,
        value: String,
        /// Parse the value as JSON before storing
        #[arg(long)]
        json: bool,
    },
    /// Print the value stored under a key
    Load { key: String },
    /// Print the file path a key maps to
    Path { key: String },
    /// Print the active storage mode
    Mode,
}

fn init_logging(json: bool) {
    // Load .env first so RUST_LOG, DATA_DIR and DATABASE_URL take effect
    dotenv().ok();
    if json {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let cfg = configs::AppConfig::load_and_validate().context("loading configuration")?;
    // The memory backend lives exactly as long as this process.
    let gateway = PersistenceGateway::new(&cfg.storage, MemoryStore::new());
    info!(event = "start", mode = %gateway.mode(), data_dir = %cfg.storage.data_dir.display(), "dualstore ready");

    match cli.command {
        Commands::Save { key, value, json } => {
            let value = if json {
                let parsed: serde_json::Value = serde_json::from_str(&value).context("value is not valid JSON")?;
                StoredValue::from(parsed)
            } else {
                StoredValue::from(value)
            };
            gateway.save(&key, value)?;
        }
        Commands::Load { key } => match gateway.load(&key) {
            LoadOutcome::Found(StoredValue::Structured(v)) => println!("{v}"),
            LoadOutcome::Found(StoredValue::Opaque(s)) => println!("{s}"),
            LoadOutcome::Absent => return Ok(ExitCode::FAILURE),
        },
        Commands::Path { key } => println!("{}", gateway.resolve_path(&key)?.display()),
        Commands::Mode => println!("{}", gateway.mode()),
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(event = "run_failed", error = %e, "dualstore command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
