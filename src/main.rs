use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chatpad::core::config::{self, ChatpadConfig, CliOverrides, ResolvedConfig};
use chatpad::storage::{ChatStore, Database, SqliteChatStore, StoreError};
use chatpad::tui;
use clap::Parser;
use log::{error, info};
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(name = "chatpad", about = "Terminal chat pad backed by SQLite")]
struct Args {
    /// Database file (overrides config and CHATPAD_DB)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// Print stored messages as JSON lines and exit
    #[arg(long)]
    dump: bool,
}

fn init_logging(config: &ResolvedConfig) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    match File::create(&config.log_file) {
        Ok(log_file) => {
            let _ = WriteLogger::init(config.log_level, log_config, log_file);
        }
        Err(e) => eprintln!(
            "Could not open log file {}: {}",
            config.log_file.display(),
            e
        ),
    }
}

async fn dump(store: &dyn ChatStore) -> Result<(), StoreError> {
    for chat in store.query_all().await? {
        match serde_json::to_string(&chat) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to serialize message {}: {}", chat.id, e),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Ignoring config file: {}", e);
        ChatpadConfig::default()
    });
    let overrides = CliOverrides {
        database_path: args.db,
        log_level: args.log_level,
    };
    let config = config::resolve(&file_config, &overrides);

    init_logging(&config);
    info!("Chatpad starting up with database {}", config.database_path.display());

    let db = match Database::open(&config.database_path) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to open database: {}", e);
            eprintln!(
                "Failed to open database {}: {}",
                config.database_path.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    if args.dump {
        let store = SqliteChatStore::new(db);
        return match dump(&store).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Failed to read messages: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    match tui::run(db) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Terminal error: {}", e);
            eprintln!("Terminal error: {}", e);
            ExitCode::FAILURE
        }
    }
}
