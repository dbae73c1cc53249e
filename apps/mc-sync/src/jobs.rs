//! Job listings printed by the external scheduler.
//!
//! The preferred form is JSON (`{"jobs": [...]}`); older schedulers only print a table whose
//! columns are separated by two or more spaces.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use mc_domain::{TaskKind, clock, feed::TaskDescriptor};

pub const DEFAULT_PAYLOAD_SUMMARY: &str = "Scheduled task";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FeedJob {
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	/// Usually a cron expression; other shapes are kept as their JSON text.
	#[serde(default)]
	pub schedule: Option<Value>,
	#[serde(default)]
	pub enabled: Option<Value>,
	#[serde(default)]
	pub prompt: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub state: Option<FeedJobState>,
	#[serde(default)]
	pub timezone: Option<String>,
}
impl FeedJob {
	/// Maps the job onto a sync descriptor. Jobs without an id are dropped.
	pub fn into_descriptor(self, now_ms: i64) -> Option<TaskDescriptor> {
		let external_id = self.id.trim().to_string();

		if external_id.is_empty() {
			tracing::warn!("Skipping scheduler job without an id.");

			return None;
		}

		let next_run_ts = self
			.state
			.and_then(|state| state.next_run)
			.and_then(|raw| clock::parse_rfc3339_ms(&raw))
			.unwrap_or(now_ms);
		let schedule = match self.schedule {
			Some(Value::String(raw)) => raw,
			Some(Value::Null) | None => String::new(),
			Some(other) => other.to_string(),
		};
		let payload_summary = non_empty(self.prompt)
			.or_else(|| non_empty(self.description))
			.unwrap_or_else(|| DEFAULT_PAYLOAD_SUMMARY.to_string());

		Some(TaskDescriptor {
			name: Some(non_empty(self.name).unwrap_or_else(|| external_id.clone())),
			kind: Some(TaskKind::Cron.as_str().to_string()),
			schedule: Some(schedule),
			tz: non_empty(self.timezone),
			next_run_ts: Some(next_run_ts),
			enabled: Some(self.enabled.and_then(|value| value.as_bool()).unwrap_or(true)),
			payload_summary: Some(payload_summary),
			external_id,
		})
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedJobState {
	/// RFC 3339 instant of the next run.
	#[serde(default)]
	pub next_run: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobListing {
	#[serde(default)]
	jobs: Vec<FeedJob>,
}

/// Returns `None` when the output is not a JSON job listing.
pub fn parse_json_listing(raw: &str) -> Option<Vec<FeedJob>> {
	serde_json::from_str::<JobListing>(raw).ok().map(|listing| listing.jobs)
}

/// Parses the table form: `id  name  schedule  enabled`, with an optional header row.
pub fn parse_table_listing(raw: &str) -> Vec<FeedJob> {
	let Ok(columns) = Regex::new(r"\s{2,}") else {
		return Vec::new();
	};
	let mut lines = raw.trim().lines().peekable();

	if lines.peek().is_some_and(|header| header.to_lowercase().contains("id")) {
		lines.next();
	}

	lines
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.filter_map(|line| {
			let parts = columns.split(line).collect::<Vec<_>>();

			if parts.len() < 4 {
				return None;
			}

			Some(FeedJob {
				id: parts[0].to_string(),
				name: Some(parts[1].to_string()),
				schedule: Some(Value::String(parts[2].to_string())),
				enabled: Some(Value::Bool(parts[3].eq_ignore_ascii_case("true"))),
				prompt: Some(parts[1].to_string()),
				..Default::default()
			})
		})
		.collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|raw| !raw.trim().is_empty())
}
