use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub security: Security,
	pub ingest: Option<Ingest>,
	pub sync: Option<SyncFeed>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Security {
	#[serde(default = "default_bind_localhost_only")]
	pub bind_localhost_only: bool,
	/// Shared secret expected in `x-activity-secret`. Unset means the endpoint refuses everything.
	pub activity_secret: Option<String>,
	/// Shared secret expected in `x-sync-secret` for task sync and document upserts.
	pub sync_secret: Option<String>,
}

/// Workspace scan used by `mc-ingest`.
#[derive(Clone, Debug, Deserialize)]
pub struct Ingest {
	pub root: PathBuf,
	/// Files matched only at the root, e.g. `MEMORY.md`.
	#[serde(default = "default_root_files")]
	pub root_files: Vec<String>,
	/// Directories scanned recursively, relative to `root`.
	#[serde(default = "default_dirs")]
	pub dirs: Vec<String>,
	#[serde(default = "default_extension")]
	pub extension: String,
}

/// External scheduler feed used by `mc-sync`.
#[derive(Clone, Debug, Deserialize)]
pub struct SyncFeed {
	pub endpoint: String,
	/// Argv of the command that lists scheduler jobs.
	pub command: Vec<String>,
	/// Argv of a plain-text listing, run when `command` does not print the JSON listing.
	#[serde(default)]
	pub fallback_command: Vec<String>,
	pub secret: String,
	#[serde(default = "default_sync_timeout_ms")]
	pub timeout_ms: u64,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_bind_localhost_only() -> bool {
	true
}

fn default_root_files() -> Vec<String> {
	vec!["MEMORY.md".to_string()]
}

fn default_dirs() -> Vec<String> {
	vec!["memory".to_string(), "notes".to_string()]
}

fn default_extension() -> String {
	"md".to_string()
}

fn default_sync_timeout_ms() -> u64 {
	10_000
}
