//! Roster CLI: run the demo sequence or a single directory operation.
//!
//! # Commands
//!
//! - `roster demo` - Reset, load, delete, search and facet two collections
//! - `roster reset <collection>` - Drop and recreate a collection
//! - `roster index <collection>` - Index the sample set or a JSON file
//! - `roster search <collection> <field> <value>` - Field search
//! - `roster count <collection>` - Count records
//! - `roster delete <collection> <id>` - Delete by identifier
//! - `roster facet <collection>` - Value distribution of a field
//! - `roster ping` - Check the search service

use clap::{Parser, Subcommand};
use colored::Colorize;
use roster::{DirectoryConfig, EmployeeDirectory, Result, demo, sample_records};
use roster_log::{Level, LogConfig};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Employee directory over OpenSearch
#[derive(Parser)]
#[command(name = "roster")]
#[command(version)]
#[command(about = "Index, search and summarize employee records in OpenSearch")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML or JSON configuration file
    #[arg(short, long, global = true, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,

    /// Search node URL, overriding configuration
    #[arg(long, global = true)]
    url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full demo sequence
    Demo {
        /// Collection indexed without Department
        #[arg(long, default_value = demo::NAME_COLLECTION)]
        name_collection: String,

        /// Collection indexed without Gender
        #[arg(long, default_value = demo::PHONE_COLLECTION)]
        phone_collection: String,
    },

    /// Drop a collection if present and create it empty
    Reset { collection: String },

    /// Index records into a collection
    Index {
        collection: String,

        /// Field to strip from every record
        #[arg(short, long)]
        exclude: Option<String>,

        /// JSON file holding an array of records (default: built-in sample set)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Find records whose field matches a value
    Search {
        collection: String,
        field: String,
        value: String,
    },

    /// Count records in a collection
    Count { collection: String },

    /// Delete records by identifier
    Delete { collection: String, id: String },

    /// Value distribution of a field
    Facet {
        collection: String,

        /// Field to aggregate (default: the configured department field)
        #[arg(short, long)]
        field: Option<String>,
    },

    /// Check that the search service answers
    Ping,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.with_level(Level::Debug);
    }
    roster_log::init_with(log_config);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = DirectoryConfig::resolve(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.url = url;
    }
    config.validate()?;

    let directory = EmployeeDirectory::from_config(&config)?;

    match cli.command {
        Commands::Demo {
            name_collection,
            phone_collection,
        } => {
            let mut stdout = std::io::stdout().lock();
            demo::run(&directory, &name_collection, &phone_collection, &mut stdout).await
        }
        Commands::Reset { collection } => {
            directory.reset_collection(&collection).await?;
            print_json(&serde_json::json!({ "reset": collection }))
        }
        Commands::Index {
            collection,
            exclude,
            file,
        } => {
            let records = match file {
                Some(path) => read_records(&path)?,
                None => sample_records(),
            };
            let report = directory
                .index_records(&collection, exclude.as_deref(), records)
                .await?;
            print_json(&report)
        }
        Commands::Search {
            collection,
            field,
            value,
        } => print_json(&directory.search_by_field(&collection, &field, &value).await?),
        Commands::Count { collection } => print_json(&directory.count(&collection).await?),
        Commands::Delete { collection, id } => {
            let deleted = directory.delete_by_identifier(&collection, &id).await?;
            print_json(&serde_json::json!({ "deleted": deleted }))
        }
        Commands::Facet { collection, field } => {
            let buckets = match field {
                Some(field) => directory.facet(&collection, &field).await?,
                None => directory.department_facet(&collection).await?,
            };
            print_json(&buckets)
        }
        Commands::Ping => {
            let up = directory.ping().await;
            print_json(&serde_json::json!({ "url": config.url, "available": up }))
        }
    }
}

/// A JSON array is indexed element by element; any other value as one record.
fn read_records(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    Ok(match serde_json::from_str(&content)? {
        Value::Array(items) => items,
        other => vec![other],
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
