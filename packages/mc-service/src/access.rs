//! Shared-secret checks for the write boundaries.

use crate::{Error, MissionControl, Result};

impl MissionControl {
	/// Checks the credential sent with an activity ingestion call.
	pub fn authorize_activity(&self, provided: Option<&str>) -> Result<()> {
		authorize(self.cfg.security.activity_secret.as_deref(), provided)
	}

	/// Checks the credential sent with a task sync or document upsert call.
	pub fn authorize_sync(&self, provided: Option<&str>) -> Result<()> {
		authorize(self.cfg.security.sync_secret.as_deref(), provided)
	}
}

/// An unset `expected` secret refuses everything.
pub fn authorize(expected: Option<&str>, provided: Option<&str>) -> Result<()> {
	let Some(expected) = expected else {
		return Err(Error::Unauthorized { message: "Endpoint secret is not configured.".to_string() });
	};
	let Some(provided) = provided else {
		return Err(Error::Unauthorized { message: "Missing secret.".to_string() });
	};

	if !constant_time_eq(expected.as_bytes(), provided.as_bytes()) {
		return Err(Error::Unauthorized { message: "Secret mismatch.".to_string() });
	}

	Ok(())
}

fn constant_time_eq(lhs: &[u8], rhs: &[u8]) -> bool {
	if lhs.len() != rhs.len() {
		return false;
	}

	lhs.iter().zip(rhs).fold(0_u8, |acc, (a, b)| acc | (a ^ b)) == 0
}
