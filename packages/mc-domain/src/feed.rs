use serde::{Deserialize, Serialize};

/// One job as reported by the external scheduler feed.
///
/// Only `externalId` is mandatory; the service fills in the rest when it upserts the task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
	pub external_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Free-form; anything other than `at` or `every` becomes `cron`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub schedule: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tz: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub next_run_ts: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payload_summary: Option<String>,
}

/// Request body of the scheduled-task sync endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncBatch {
	#[serde(default)]
	pub tasks: Vec<TaskDescriptor>,
}
