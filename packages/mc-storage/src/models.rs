use serde_json::Value;
use uuid::Uuid;

/// Row of `activity_events`. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityEvent {
	pub event_id: Uuid,
	pub ts: i64,
	#[sqlx(rename = "type")]
	pub r#type: String,
	pub title: String,
	pub details: Option<String>,
	pub search_text: String,
	pub status: String,
	pub tags: Vec<String>,
	pub source: String,
	pub metadata: Option<Value>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScheduledTask {
	pub task_id: Uuid,
	pub external_id: String,
	pub name: String,
	pub kind: String,
	pub schedule: String,
	pub tz: Option<String>,
	pub next_run_ts: i64,
	pub enabled: bool,
	pub payload_summary: String,
	pub search_text: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Document {
	pub doc_id: Uuid,
	pub path: String,
	pub title: String,
	pub content: String,
	pub kind: String,
	pub updated_at: i64,
	pub search_text: String,
}

/// Result of an upsert keyed on a natural identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted {
	pub id: Uuid,
	pub inserted: bool,
}
