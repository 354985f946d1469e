//! Local invocation harness for the ingestion pipeline.
//!
//! In production the library entry point is invoked by the queue trigger; this
//! binary replays a captured batch file through the same pipeline, which is
//! how the upstream system was exercised during development.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use sesame_bus::BusConfig;
use sesame_ingest::{Batch, BatchIngestor, IngestConfig, QueueRecord};
use sesame_store::StoreConfig;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "sesame", about = "Replay a delivery-event batch through the ingestion pipeline")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "sesame.toml")]
    config: PathBuf,

    /// Batch file to replay: `{"Records": [...]}` or a bare array of records.
    batch: PathBuf,
}

/// Top-level configuration, one section per subsystem.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    store: StoreConfig,
    bus: BusConfig,
    ingest: IngestConfig,
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist. A file that exists but fails to parse is an error.
    fn load(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }
}

fn load_batch(path: &Path) -> anyhow::Result<Batch> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading batch file {}", path.display()))?;

    serde_json::from_str::<Batch>(&raw)
        .or_else(|err| {
            serde_json::from_str::<Vec<QueueRecord>>(&raw)
                .map(|records| Batch { records })
                .map_err(|_| err)
        })
        .with_context(|| format!("parsing batch file {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sesame_common::logging::init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    let (audit, suppression) = config.store.into_stores()?;
    let bus = config.bus.into_bus();
    let ingestor = BatchIngestor::new(audit, suppression, bus, &config.ingest);

    let batch = load_batch(&args.batch)?;
    let summary = ingestor.process_batch(&batch.records).await?;

    info!(
        records = summary.records,
        suppressions = summary.suppressions,
        publish_failures = summary.publish_failures,
        "replay complete"
    );

    Ok(())
}
