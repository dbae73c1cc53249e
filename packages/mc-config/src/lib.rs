mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Ingest, Postgres, Security, Service, Storage, SyncFeed};

use std::{fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw, path)
}

/// Same as [`load`] for a config document already in memory.
pub fn from_toml_str(raw: &str) -> Result<Config> {
	parse(raw, Path::new("<inline>"))
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	let http_addr: SocketAddr = cfg.service.http_bind.parse().map_err(|_| Error::Validation {
		message: "service.http_bind must be a socket address, e.g. 127.0.0.1:8080.".to_string(),
	})?;

	if cfg.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.http_bind must be a loopback address when security.bind_localhost_only is true."
				.to_string(),
		});
	}

	if let Some(ingest) = cfg.ingest.as_ref() {
		if ingest.root.as_os_str().is_empty() {
			return Err(Error::Validation { message: "ingest.root must be non-empty.".to_string() });
		}
		if ingest.root_files.is_empty() && ingest.dirs.is_empty() {
			return Err(Error::Validation {
				message: "ingest.root_files and ingest.dirs must not both be empty.".to_string(),
			});
		}
		if ingest.dirs.iter().any(|dir| dir.trim().is_empty() || dir.contains("..")) {
			return Err(Error::Validation {
				message: "ingest.dirs entries must be non-empty relative paths without '..'."
					.to_string(),
			});
		}
		if ingest.extension.is_empty() {
			return Err(Error::Validation {
				message: "ingest.extension must be non-empty.".to_string(),
			});
		}
	}
	if let Some(sync) = cfg.sync.as_ref() {
		for (label, value) in [("sync.endpoint", &sync.endpoint), ("sync.secret", &sync.secret)] {
			if value.trim().is_empty() {
				return Err(Error::Validation { message: format!("{label} must be non-empty.") });
			}
		}

		if sync.command.first().map(|program| program.trim().is_empty()).unwrap_or(true) {
			return Err(Error::Validation {
				message: "sync.command must name a program to run.".to_string(),
			});
		}
		if sync.fallback_command.first().is_some_and(|program| program.trim().is_empty()) {
			return Err(Error::Validation {
				message: "sync.fallback_command must be empty or name a program to run.".to_string(),
			});
		}
		if sync.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "sync.timeout_ms must be greater than zero.".to_string(),
			});
		}
	}

	Ok(())
}

fn parse(raw: &str, path: &Path) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

fn normalize(cfg: &mut Config) {
	if cfg.security.activity_secret.as_deref().map(|s| s.trim().is_empty()).unwrap_or(false) {
		cfg.security.activity_secret = None;
	}
	if cfg.security.sync_secret.as_deref().map(|s| s.trim().is_empty()).unwrap_or(false) {
		cfg.security.sync_secret = None;
	}
	if let Some(ingest) = cfg.ingest.as_mut() {
		ingest.extension = ingest.extension.trim().trim_start_matches('.').to_string();
		ingest.root_files.retain(|file| !file.trim().is_empty());
	}
}
