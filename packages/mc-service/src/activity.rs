use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{Error, MissionControl, Result};
use mc_domain::{EventMetadata, EventSource, EventStatus, clock, search_text};
use mc_storage::{
	activity::{self, EventCursor},
	models::ActivityEvent,
};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

const DEFAULT_EVENT_TYPE: &str = "action";
const DEFAULT_EVENT_TITLE: &str = "(untitled)";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEventRequest {
	pub r#type: String,
	pub title: String,
	pub status: EventStatus,
	pub source: EventSource,
	/// Epoch milliseconds; the call time when absent.
	#[serde(default)]
	pub ts: Option<i64>,
	#[serde(default)]
	pub details: Option<String>,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub metadata: Option<EventMetadata>,
}

/// Body accepted by the activity ingestion endpoint. Every field is optional there.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestActivityPayload {
	#[serde(default)]
	pub r#type: Option<String>,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub status: Option<EventStatus>,
	#[serde(default)]
	pub source: Option<EventSource>,
	#[serde(default)]
	pub ts: Option<i64>,
	#[serde(default)]
	pub details: Option<String>,
	#[serde(default)]
	pub tags: Option<Vec<String>>,
	#[serde(default)]
	pub metadata: Option<EventMetadata>,
}
impl IngestActivityPayload {
	pub fn into_request(self) -> LogEventRequest {
		LogEventRequest {
			r#type: non_blank(self.r#type).unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
			title: non_blank(self.title).unwrap_or_else(|| DEFAULT_EVENT_TITLE.to_string()),
			status: self.status.unwrap_or(EventStatus::Info),
			source: self.source.unwrap_or(EventSource::ExternalSystem),
			ts: self.ts,
			details: self.details,
			tags: self.tags.unwrap_or_default(),
			metadata: self.metadata,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEventResponse {
	pub id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventItem {
	pub id: Uuid,
	pub ts: i64,
	pub r#type: String,
	pub title: String,
	pub details: Option<String>,
	pub status: String,
	pub tags: Vec<String>,
	pub source: String,
	pub metadata: Option<Value>,
	pub search_text: String,
}
impl From<ActivityEvent> for EventItem {
	fn from(row: ActivityEvent) -> Self {
		Self {
			id: row.event_id,
			ts: row.ts,
			r#type: row.r#type,
			title: row.title,
			details: row.details,
			status: row.status,
			tags: row.tags,
			source: row.source,
			metadata: row.metadata,
			search_text: row.search_text,
		}
	}
}

/// Query for one page of the activity feed.
///
/// `page_size` counts rows scanned from the time index before the optional filters run, so a
/// page can hold fewer matches than requested, or none, while later pages still have some.
/// Keep following `continue_cursor` until `is_done`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsRequest {
	#[serde(default)]
	pub cursor: Option<String>,
	#[serde(default)]
	pub page_size: Option<i64>,
	#[serde(default)]
	pub status: Option<EventStatus>,
	#[serde(default)]
	pub r#type: Option<String>,
	#[serde(default)]
	pub tag: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
	pub page: Vec<EventItem>,
	/// Position of the last scanned row. Absent when nothing was scanned.
	pub continue_cursor: Option<String>,
	pub is_done: bool,
}

impl MissionControl {
	pub async fn log_event(&self, req: LogEventRequest) -> Result<LogEventResponse> {
		let search_text =
			search_text::activity_search_text(&req.r#type, &req.title, req.details.as_deref(), &req.tags);
		let event = ActivityEvent {
			event_id: Uuid::new_v4(),
			ts: req.ts.unwrap_or_else(clock::now_ms),
			r#type: req.r#type,
			title: req.title,
			details: req.details,
			search_text,
			status: req.status.as_str().to_string(),
			tags: req.tags,
			source: req.source.as_str().to_string(),
			metadata: req.metadata.as_ref().map(EventMetadata::to_value),
		};

		activity::insert_event(&self.db.pool, &event).await?;

		tracing::debug!(event_id = %event.event_id, ts = event.ts, "Activity event logged.");

		Ok(LogEventResponse { id: event.event_id })
	}

	pub async fn list_events(&self, req: ListEventsRequest) -> Result<EventPage> {
		let page_size = req.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
		let after = match req.cursor.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
			Some(raw) => Some(raw.parse::<EventCursor>()?),
			None => None,
		};
		let scanned = activity::scan_events_desc(&self.db.pool, after, page_size).await?;
		let is_done = (scanned.len() as i64) < page_size;
		let continue_cursor = scanned.last().map(|row| EventCursor::from(row).to_string());
		let page = scanned
			.into_iter()
			.filter(|row| event_matches(row, &req))
			.map(EventItem::from)
			.collect::<Vec<_>>();

		Ok(EventPage { page, continue_cursor, is_done })
	}

	pub async fn get_event(&self, event_id: Uuid) -> Result<EventItem> {
		let row = activity::get_event(&self.db.pool, event_id).await?.ok_or_else(|| {
			Error::NotFound { message: format!("Activity event {event_id} does not exist.") }
		})?;

		Ok(row.into())
	}
}

fn event_matches(row: &ActivityEvent, req: &ListEventsRequest) -> bool {
	if let Some(status) = req.status
		&& row.status != status.as_str()
	{
		return false;
	}
	if let Some(event_type) = req.r#type.as_deref()
		&& row.r#type != event_type
	{
		return false;
	}
	if let Some(tag) = req.tag.as_deref()
		&& !row.tags.iter().any(|candidate| candidate == tag)
	{
		return false;
	}

	true
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.filter(|raw| !raw.trim().is_empty())
}
