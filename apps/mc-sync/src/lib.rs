pub mod feed;
pub mod jobs;

mod error;

pub use error::{Error, Result};

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre;

use mc_domain::clock;

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

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = mc_config::load(&args.config)?;

	mc_cli::init_tracing(&config.service.log_level);

	let Some(sync_cfg) = config.sync else {
		return Err(eyre::eyre!("The [sync] section is required by mc-sync."));
	};
	let jobs = feed::collect_jobs(&sync_cfg).await?;
	let now = clock::now_ms();
	let tasks =
		jobs.into_iter().filter_map(|job| job.into_descriptor(now)).collect::<Vec<_>>();

	if tasks.is_empty() {
		println!("No scheduler jobs to sync.");

		return Ok(());
	}

	tracing::info!(count = tasks.len(), endpoint = %sync_cfg.endpoint, "Pushing scheduler jobs.");

	let count = feed::push(&sync_cfg, tasks).await?;

	println!("Synced {count} tasks.");

	Ok(())
}
