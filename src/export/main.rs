//! Geocoder export pipeline.
//!
//! Reads the address register and stop-place records, builds search
//! documents with administrative parents, and writes the importer CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use placedoc::config::Config;
use placedoc::pip::{load_admin_units, AdminUnitIndex};
use placedoc::source::{LocalSourceStore, SourceStore};
use placedoc::stop_place::load_stop_places;
use placedoc::pipeline;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "export")]
#[command(about = "Build geocoder search documents from address and stop place sources")]
struct Args {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory searched for the newest address register file
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// File name prefix of the address register inside the data directory
    #[arg(long, default_value = "Basisdata_0000_Norge_25833_MatrikkelenAdresse")]
    addresses_prefix: String,

    /// Stop place records (JSON)
    #[arg(long)]
    stop_places: Option<PathBuf>,

    /// Admin unit reference data (JSON)
    #[arg(long)]
    admin_units: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not export addresses and streets
    #[arg(long)]
    skip_addresses: bool,

    /// Do not export stop places
    #[arg(long)]
    skip_stop_places: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Geocoder export");

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let mut documents = Vec::new();

    if !args.skip_addresses {
        let store = LocalSourceStore::new(&args.data_dir);
        let path = store
            .find_latest(&args.addresses_prefix)
            .context("Address register not found")?;
        let addresses = pipeline::load_addresses(&path)?;
        documents.extend(pipeline::build_address_documents(&addresses, &config));
    }

    if !args.skip_stop_places {
        let stop_places = args
            .stop_places
            .as_ref()
            .context("--stop-places is required unless --skip-stop-places is set")?;
        let records = load_stop_places(stop_places)?;

        let units = match &args.admin_units {
            Some(path) => load_admin_units(path)?,
            None => Vec::new(),
        };
        let index = AdminUnitIndex::build(units);

        documents.extend(pipeline::build_stop_place_documents(
            records,
            &index,
            &config,
            Utc::now(),
        ));
    }

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "geocoder_export_{}.csv",
            Utc::now().timestamp_millis()
        ))
    });

    pipeline::write_export(&documents, &config, &output).context("Failed to write export")?;
    Ok(())
}
