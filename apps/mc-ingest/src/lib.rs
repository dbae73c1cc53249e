pub mod scan;

mod error;

pub use error::{Error, Result};

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre;

use mc_config::Ingest;
use mc_service::MissionControl;
use mc_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = mc_cli::VERSION,
	rename_all = "kebab",
	styles = mc_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
	pub scanned: usize,
	pub upserted: usize,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = mc_config::load(&args.config)?;

	mc_cli::init_tracing(&config.service.log_level);

	let Some(ingest_cfg) = config.ingest.clone() else {
		return Err(eyre::eyre!("The [ingest] section is required by mc-ingest."));
	};
	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let service = MissionControl::new(config, db);
	let report = ingest(&service, &ingest_cfg).await?;

	println!("Ingested {} documents.", report.upserted);

	Ok(())
}

/// Scans the workspace and upserts one document per file, in path order.
pub async fn ingest(service: &MissionControl, cfg: &Ingest) -> Result<IngestReport> {
	let files = scan::scan(cfg)?;
	let scanned = files.len();
	let mut upserted = 0;

	for file in files {
		let path = file.rel_path.clone();

		service.upsert_document(file.into_request()).await.inspect_err(|err| {
			tracing::error!(path = %path, error = %err, "Document upsert failed.");
		})?;

		upserted += 1;
	}

	tracing::info!(root = %cfg.root.display(), scanned, upserted, "Workspace ingested.");

	Ok(IngestReport { scanned, upserted })
}
