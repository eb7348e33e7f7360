//! Shule CLI
//!
//! Command-line front end for the Shule survey store.
//!
//! # Commands
//!
//! - `add-site` / `add-report` - Capture survey data locally
//! - `list` - Show stored entities and their sync state
//! - `inspect` - Display store statistics
//! - `sync` - Run a sync pass against a simulated field network
//! - `log` - Show recent sync attempts
//! - `export` - Emit row-oriented CSV of the stored data
//! - `auto-sync` - Persist the auto-sync preference

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Offline-first school ICT survey data collection.
#[derive(Parser)]
#[command(name = "shule")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the survey store snapshot
    #[arg(global = true, short, long, default_value = "shule.json")]
    store: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which entity collection a command targets.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Collection {
    /// School sites
    Sites,
    /// ICT reports
    Reports,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a new school site
    AddSite {
        /// School name
        #[arg(long)]
        name: String,

        /// Administrative district
        #[arg(long)]
        district: String,

        /// Contact person
        #[arg(long)]
        contact: Option<String>,

        /// Latitude in decimal degrees
        #[arg(long)]
        latitude: Option<f64>,

        /// Longitude in decimal degrees
        #[arg(long)]
        longitude: Option<f64>,
    },

    /// Capture a new ICT report for a site
    AddReport {
        /// Id of the school site this report describes
        #[arg(long)]
        school: String,

        /// Number of working computers
        #[arg(long, default_value = "0")]
        computers: u32,

        /// Number of working tablets
        #[arg(long, default_value = "0")]
        tablets: u32,

        /// Connectivity (none, cellular, broadband, satellite)
        #[arg(long, default_value = "none")]
        connectivity: String,

        /// Power source (none, grid, solar, generator)
        #[arg(long, default_value = "none")]
        power: String,

        /// Free-form observations
        #[arg(long)]
        notes: Option<String>,
    },

    /// List stored entities with their sync state
    List {
        /// Which collection to list
        #[arg(value_enum)]
        collection: Collection,

        /// Only show unsynced entities
        #[arg(short, long)]
        unsynced: bool,
    },

    /// Display store statistics
    Inspect,

    /// Run one sync pass against a simulated field network
    Sync {
        /// Simulated failure probability (0.0 - 1.0)
        #[arg(long, default_value = "0.1")]
        failure_rate: f64,

        /// Skip the simulated network latency
        #[arg(long)]
        instant: bool,
    },

    /// Show recent sync attempts, newest first
    Log {
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Emit row-oriented CSV of stored data
    Export {
        /// Which collection to export
        #[arg(value_enum)]
        collection: Collection,
    },

    /// Persist the auto-sync preference
    AutoSync {
        /// Turn automatic syncing on or off
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::AddSite {
            name,
            district,
            contact,
            latitude,
            longitude,
        } => {
            commands::add_site::run(&cli.store, name, district, contact, latitude, longitude)?;
        }
        Commands::AddReport {
            school,
            computers,
            tablets,
            connectivity,
            power,
            notes,
        } => {
            commands::add_report::run(
                &cli.store,
                &school,
                computers,
                tablets,
                &connectivity,
                &power,
                notes,
            )?;
        }
        Commands::List {
            collection,
            unsynced,
        } => {
            commands::list::run(&cli.store, collection.into(), unsynced)?;
        }
        Commands::Inspect => {
            commands::inspect::run(&cli.store)?;
        }
        Commands::Sync {
            failure_rate,
            instant,
        } => {
            commands::sync::run(&cli.store, failure_rate, instant)?;
        }
        Commands::Log { limit } => {
            commands::log::run(&cli.store, limit)?;
        }
        Commands::Export { collection } => {
            commands::export::run(&cli.store, collection.into())?;
        }
        Commands::AutoSync { state } => {
            commands::auto_sync::run(&cli.store, state == "on")?;
        }
        Commands::Version => {
            println!("Shule CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Shule Core v{}", shule_core::VERSION);
        }
    }

    Ok(())
}

impl From<Collection> for shule_core::EntityKind {
    fn from(collection: Collection) -> Self {
        match collection {
            Collection::Sites => Self::Site,
            Collection::Reports => Self::Report,
        }
    }
}
