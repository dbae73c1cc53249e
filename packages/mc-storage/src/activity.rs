use std::{fmt, str::FromStr};

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
	Error, Result,
	models::ActivityEvent,
	search::{self, TextQuery},
};

const EVENT_COLUMNS: &str =
	"event_id, ts, type, title, details, search_text, status, tags, source, metadata";

/// Position in the `(ts DESC, event_id DESC)` index.
///
/// Rendered as `<ts>:<event_id>`; callers should treat it as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCursor {
	pub ts: i64,
	pub event_id: Uuid,
}
impl From<&ActivityEvent> for EventCursor {
	fn from(event: &ActivityEvent) -> Self {
		Self { ts: event.ts, event_id: event.event_id }
	}
}
impl fmt::Display for EventCursor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.ts, self.event_id.simple())
	}
}
impl FromStr for EventCursor {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		let invalid = || Error::InvalidArgument(format!("Malformed event cursor {raw:?}."));
		let (ts, event_id) = raw.split_once(':').ok_or_else(invalid)?;
		let ts = ts.parse::<i64>().map_err(|_| invalid())?;
		let event_id = Uuid::parse_str(event_id).map_err(|_| invalid())?;

		Ok(Self { ts, event_id })
	}
}

/// Equality filters supported by the activity search index.
#[derive(Debug, Clone, Default)]
pub struct EventSearchFilter {
	pub status: Option<String>,
	pub r#type: Option<String>,
	pub source: Option<String>,
}

pub async fn insert_event<'e, E>(executor: E, event: &ActivityEvent) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO activity_events (
\tevent_id,
\tts,
\ttype,
\ttitle,
\tdetails,
\tsearch_text,
\tstatus,
\ttags,
\tsource,
\tmetadata
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)",
	)
	.bind(event.event_id)
	.bind(event.ts)
	.bind(event.r#type.as_str())
	.bind(event.title.as_str())
	.bind(event.details.as_deref())
	.bind(event.search_text.as_str())
	.bind(event.status.as_str())
	.bind(&event.tags)
	.bind(event.source.as_str())
	.bind(&event.metadata)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn get_event<'e, E>(executor: E, event_id: Uuid) -> Result<Option<ActivityEvent>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, ActivityEvent>(
		"\
SELECT
\tevent_id,
\tts,
\ttype,
\ttitle,
\tdetails,
\tsearch_text,
\tstatus,
\ttags,
\tsource,
\tmetadata
FROM activity_events
WHERE event_id = $1",
	)
	.bind(event_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// Reads up to `limit` rows strictly after `after` in newest-first index order.
///
/// Keyset pagination: rows inserted behind the cursor never shift the rows in front of it.
pub async fn scan_events_desc<'e, E>(
	executor: E,
	after: Option<EventCursor>,
	limit: i64,
) -> Result<Vec<ActivityEvent>>
where
	E: PgExecutor<'e>,
{
	let rows = match after {
		Some(cursor) =>
			sqlx::query_as::<_, ActivityEvent>(
				"\
SELECT
\tevent_id,
\tts,
\ttype,
\ttitle,
\tdetails,
\tsearch_text,
\tstatus,
\ttags,
\tsource,
\tmetadata
FROM activity_events
WHERE (ts, event_id) < ($1, $2)
ORDER BY ts DESC, event_id DESC
LIMIT $3",
			)
			.bind(cursor.ts)
			.bind(cursor.event_id)
			.bind(limit)
			.fetch_all(executor)
			.await?,
		None =>
			sqlx::query_as::<_, ActivityEvent>(
				"\
SELECT
\tevent_id,
\tts,
\ttype,
\ttitle,
\tdetails,
\tsearch_text,
\tstatus,
\ttags,
\tsource,
\tmetadata
FROM activity_events
ORDER BY ts DESC, event_id DESC
LIMIT $1",
			)
			.bind(limit)
			.fetch_all(executor)
			.await?,
	};

	Ok(rows)
}

pub async fn search_events(
	pool: &PgPool,
	query: &TextQuery,
	filter: &EventSearchFilter,
	limit: i64,
) -> Result<Vec<ActivityEvent>> {
	let mut builder = search::select_matching(EVENT_COLUMNS, "activity_events", query);

	if let Some(status) = filter.status.as_deref() {
		builder.push(" AND status = ");
		builder.push_bind(status);
	}
	if let Some(event_type) = filter.r#type.as_deref() {
		builder.push(" AND type = ");
		builder.push_bind(event_type);
	}
	if let Some(source) = filter.source.as_deref() {
		builder.push(" AND source = ");
		builder.push_bind(source);
	}

	search::push_ranked_limit(&mut builder, "ts DESC, event_id DESC", limit);

	let rows = builder.build_query_as::<ActivityEvent>().fetch_all(pool).await?;

	Ok(rows)
}
