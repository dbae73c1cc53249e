use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
	Result,
	models::{ScheduledTask, Upserted},
	search::{self, TextQuery},
};

const TASK_COLUMNS: &str = "task_id, external_id, name, kind, schedule, tz, next_run_ts, enabled, payload_summary, search_text";

/// Equality filters supported by the task search index.
#[derive(Debug, Clone, Default)]
pub struct TaskSearchFilter {
	pub enabled: Option<bool>,
	pub kind: Option<String>,
}

/// Inserts the task, or overwrites every mutable column of the row sharing its `external_id`.
///
/// On conflict the stored `task_id` wins, so the returned id is stable across calls.
pub async fn upsert_task<'e, E>(executor: E, task: &ScheduledTask) -> Result<Upserted>
where
	E: PgExecutor<'e>,
{
	let (id, inserted): (Uuid, bool) = sqlx::query_as(
		"\
INSERT INTO scheduled_tasks (
\ttask_id,
\texternal_id,
\tname,
\tkind,
\tschedule,
\ttz,
\tnext_run_ts,
\tenabled,
\tpayload_summary,
\tsearch_text
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
ON CONFLICT (external_id) DO UPDATE
SET
\tname = EXCLUDED.name,
\tkind = EXCLUDED.kind,
\tschedule = EXCLUDED.schedule,
\ttz = EXCLUDED.tz,
\tnext_run_ts = EXCLUDED.next_run_ts,
\tenabled = EXCLUDED.enabled,
\tpayload_summary = EXCLUDED.payload_summary,
\tsearch_text = EXCLUDED.search_text
RETURNING task_id, (xmax = 0) AS inserted",
	)
	.bind(task.task_id)
	.bind(task.external_id.as_str())
	.bind(task.name.as_str())
	.bind(task.kind.as_str())
	.bind(task.schedule.as_str())
	.bind(task.tz.as_deref())
	.bind(task.next_run_ts)
	.bind(task.enabled)
	.bind(task.payload_summary.as_str())
	.bind(task.search_text.as_str())
	.fetch_one(executor)
	.await?;

	Ok(Upserted { id, inserted })
}

pub async fn get_task<'e, E>(executor: E, task_id: Uuid) -> Result<Option<ScheduledTask>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, ScheduledTask>(
		"\
SELECT
\ttask_id,
\texternal_id,
\tname,
\tkind,
\tschedule,
\ttz,
\tnext_run_ts,
\tenabled,
\tpayload_summary,
\tsearch_text
FROM scheduled_tasks
WHERE task_id = $1",
	)
	.bind(task_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// Same as [`get_task`] but row-locks the task until the surrounding transaction ends.
pub async fn get_task_for_update<'e, E>(executor: E, task_id: Uuid) -> Result<Option<ScheduledTask>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, ScheduledTask>(
		"\
SELECT
\ttask_id,
\texternal_id,
\tname,
\tkind,
\tschedule,
\ttz,
\tnext_run_ts,
\tenabled,
\tpayload_summary,
\tsearch_text
FROM scheduled_tasks
WHERE task_id = $1
FOR UPDATE",
	)
	.bind(task_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn find_task_by_external_id<'e, E>(
	executor: E,
	external_id: &str,
) -> Result<Option<ScheduledTask>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, ScheduledTask>(
		"\
SELECT
\ttask_id,
\texternal_id,
\tname,
\tkind,
\tschedule,
\ttz,
\tnext_run_ts,
\tenabled,
\tpayload_summary,
\tsearch_text
FROM scheduled_tasks
WHERE external_id = $1",
	)
	.bind(external_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// Writes the editable columns of an existing task. `external_id` and `kind` are left alone.
pub async fn update_task_fields<'e, E>(executor: E, task: &ScheduledTask) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE scheduled_tasks
SET
\tname = $1,
\tschedule = $2,
\ttz = $3,
\tnext_run_ts = $4,
\tenabled = $5,
\tpayload_summary = $6,
\tsearch_text = $7
WHERE task_id = $8",
	)
	.bind(task.name.as_str())
	.bind(task.schedule.as_str())
	.bind(task.tz.as_deref())
	.bind(task.next_run_ts)
	.bind(task.enabled)
	.bind(task.payload_summary.as_str())
	.bind(task.search_text.as_str())
	.bind(task.task_id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected())
}

/// Tasks with `start_ts <= next_run_ts <= end_ts`, soonest first.
pub async fn list_tasks_in_range<'e, E>(
	executor: E,
	start_ts: i64,
	end_ts: i64,
) -> Result<Vec<ScheduledTask>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, ScheduledTask>(
		"\
SELECT
\ttask_id,
\texternal_id,
\tname,
\tkind,
\tschedule,
\ttz,
\tnext_run_ts,
\tenabled,
\tpayload_summary,
\tsearch_text
FROM scheduled_tasks
WHERE next_run_ts >= $1 AND next_run_ts <= $2
ORDER BY next_run_ts ASC, task_id ASC",
	)
	.bind(start_ts)
	.bind(end_ts)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn search_tasks(
	pool: &PgPool,
	query: &TextQuery,
	filter: &TaskSearchFilter,
	limit: i64,
) -> Result<Vec<ScheduledTask>> {
	let mut builder = search::select_matching(TASK_COLUMNS, "scheduled_tasks", query);

	if let Some(enabled) = filter.enabled {
		builder.push(" AND enabled = ");
		builder.push_bind(enabled);
	}
	if let Some(kind) = filter.kind.as_deref() {
		builder.push(" AND kind = ");
		builder.push_bind(kind);
	}

	search::push_ranked_limit(&mut builder, "next_run_ts DESC, task_id ASC", limit);

	let rows = builder.build_query_as::<ScheduledTask>().fetch_all(pool).await?;

	Ok(rows)
}
