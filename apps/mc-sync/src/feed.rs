//! Running the scheduler's listing command and pushing the result to the sync endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio::{process::Command, time};

use crate::{Error, Result, jobs::{self, FeedJob}};
use mc_config::SyncFeed;
use mc_domain::feed::{SyncBatch, TaskDescriptor};

pub const SYNC_SECRET_HEADER: &str = "X-Sync-Secret";

#[derive(Debug, Deserialize)]
struct SyncAck {
	count: usize,
}

/// Runs `argv` and returns its stdout. A non-zero exit is an error.
pub async fn run_listing(argv: &[String], timeout: Duration) -> Result<String> {
	let Some((program, args)) = argv.split_first() else {
		return Err(Error::Spawn {
			program: String::new(),
			source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
		});
	};
	let output = time::timeout(timeout, Command::new(program).args(args).kill_on_drop(true).output())
		.await
		.map_err(|_| Error::Timeout {
			program: program.clone(),
			timeout_ms: timeout.as_millis() as u64,
		})?
		.map_err(|source| Error::Spawn { program: program.clone(), source })?;

	if !output.status.success() {
		return Err(Error::CommandFailed {
			program: program.clone(),
			status: output.status.to_string(),
			stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
		});
	}

	Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Lists scheduler jobs, preferring the JSON listing and falling back to the table form.
pub async fn collect_jobs(cfg: &SyncFeed) -> Result<Vec<FeedJob>> {
	let timeout = Duration::from_millis(cfg.timeout_ms);
	let primary = run_listing(&cfg.command, timeout).await;

	match &primary {
		Ok(output) =>
			if let Some(jobs) = jobs::parse_json_listing(output) {
				return Ok(jobs);
			},
		Err(err) => tracing::warn!(error = %err, "Scheduler JSON listing failed."),
	}

	tracing::warn!("Falling back to the plain-text job listing.");

	let text = if cfg.fallback_command.is_empty() {
		primary?
	} else {
		run_listing(&cfg.fallback_command, timeout).await?
	};

	Ok(jobs::parse_table_listing(&text))
}

/// Posts the descriptors to the sync endpoint and returns the count it reports.
pub async fn push(cfg: &SyncFeed, tasks: Vec<TaskDescriptor>) -> Result<usize> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let res = client
		.post(&cfg.endpoint)
		.header(SYNC_SECRET_HEADER, &cfg.secret)
		.json(&SyncBatch { tasks })
		.send()
		.await?;
	let status = res.status();

	if !status.is_success() {
		let body = res.text().await.unwrap_or_default();

		return Err(Error::Rejected { status: status.as_u16(), body });
	}

	let ack: SyncAck = res.json().await?;

	Ok(ack.count)
}
