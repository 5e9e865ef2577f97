//! # Grocer Command-Line Front End
//!
//! A thin presentation layer over `grocer-core` and `grocer-db`.
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (logging, to stderr)
//! 3. Resolve the database path (flag, `GROCER_DB_PATH`, or data dir)
//! 4. Open the database, run the command, close the database
//!
//! ## Examples
//! ```bash
//! grocer add --name "Oat Milk" --pkg-unit Bottle --pkg-qty 2 \
//!     --inv-unit Liters --inv-qty 1 --price 3.49 --store Co-op --date 2024-05-01
//! grocer list
//! grocer check upc 036000291452
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use grocer_core::ItemForm;
use grocer_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grocer")]
#[command(about = "Track grocery purchases and inventory", long_about = None)]
struct Cli {
    /// SQLite database file (default: platform data directory)
    #[arg(long, global = true, env = "GROCER_DB_PATH")]
    db: Option<PathBuf>,

    /// Blank database copied into place on first run
    #[arg(long, global = true, env = "GROCER_DB_TEMPLATE")]
    template: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and store a new item
    Add(AddArgs),

    /// Show every stored item
    List {
        /// Print JSON instead of one line per item
        #[arg(long)]
        json: bool,
    },

    /// Type text into a field one character at a time and show each step
    Check {
        /// Which field validator to use
        field: FieldKind,

        /// Text to type
        text: String,
    },

    /// Show the package and counting unit vocabularies
    Units,

    /// Fill an empty database with sample purchases
    Seed {
        /// Number of items to generate
        #[arg(long, short = 'c', default_value_t = 25)]
        count: usize,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    name: String,
    /// Package unit (Pack, Case, Box, Bag, Bottle, Sack)
    #[arg(long)]
    pkg_unit: String,
    /// Packages bought
    #[arg(long)]
    pkg_qty: String,
    /// Counting unit (see `grocer units`)
    #[arg(long)]
    inv_unit: String,
    /// Count per package
    #[arg(long)]
    inv_qty: String,
    #[arg(long)]
    price: String,
    #[arg(long)]
    store: String,
    /// Purchase date, YYYY-MM-DD
    #[arg(long)]
    date: String,
    #[arg(long, default_value = "")]
    sku: String,
    #[arg(long, default_value = "")]
    upc: String,
}

impl From<AddArgs> for ItemForm {
    fn from(args: AddArgs) -> Self {
        ItemForm {
            name: args.name,
            pkg_unit: args.pkg_unit,
            pkg_qty: args.pkg_qty,
            inv_unit: args.inv_unit,
            inv_qty: args.inv_qty,
            price: args.price,
            store: args.store,
            date: args.date,
            sku: args.sku,
            upc: args.upc,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldKind {
    Date,
    Sku,
    Upc,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match &cli.command {
        Commands::Check { field, text } => {
            commands::check(*field, text);
            return Ok(());
        }
        Commands::Units => {
            commands::units();
            return Ok(());
        }
        _ => {}
    }

    let db_path = match cli.db {
        Some(path) => path,
        None => default_database_path()?,
    };
    info!(path = %db_path.display(), "Database path determined");

    let mut config = DbConfig::new(db_path);
    if let Some(template) = cli.template {
        config = config.template_path(template);
    }
    let db = Database::new(config)
        .await
        .context("opening the grocery database")?;

    let outcome = match cli.command {
        Commands::Add(args) => commands::add(&db, args.into()).await,
        Commands::List { json } => commands::list(&db, json).await,
        Commands::Seed { count } => commands::seed(&db, count).await,
        Commands::Check { .. } | Commands::Units => Ok(()),
    };

    db.close().await;
    outcome
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=grocer=trace` - Show trace for grocer crates only
/// - Default: warnings, plus INFO from grocer crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,grocer=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Database file in the platform data directory.
///
/// - **macOS**: `~/Library/Application Support/com.grocer.grocer/grocer.db`
/// - **Windows**: `%APPDATA%\grocer\grocer\data\grocer.db`
/// - **Linux**: `~/.local/share/grocer/grocer.db`
fn default_database_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "grocer", "grocer")
        .context("could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    Ok(data_dir.join("grocer.db"))
}
