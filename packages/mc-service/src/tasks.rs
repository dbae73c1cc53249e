use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, MissionControl, Result};
use mc_domain::{TaskKind, search_text};
use mc_storage::{models::ScheduledTask, tasks};

/// Full description of a task as the sync feed reports it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTaskRequest {
	pub external_id: String,
	pub name: String,
	pub kind: TaskKind,
	pub schedule: String,
	pub next_run_ts: i64,
	pub enabled: bool,
	pub payload_summary: String,
	/// Replaces the stored timezone, so an absent `tz` clears one set through a manual patch.
	#[serde(default)]
	pub tz: Option<String>,
}

/// Manual edit of a stored task. Absent fields keep their stored value.
///
/// A blank `tz` clears the timezone.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub enabled: Option<bool>,
	#[serde(default)]
	pub next_run_ts: Option<i64>,
	#[serde(default)]
	pub payload_summary: Option<String>,
	#[serde(default)]
	pub schedule: Option<String>,
	#[serde(default)]
	pub tz: Option<String>,
}

#[derive(Clone, Debug)]
pub struct UpdateTaskRequest {
	pub id: Uuid,
	pub patch: TaskPatch,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksInRangeRequest {
	pub start_ts: i64,
	pub end_ts: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
	pub id: Uuid,
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
impl From<ScheduledTask> for TaskItem {
	fn from(row: ScheduledTask) -> Self {
		Self {
			id: row.task_id,
			external_id: row.external_id,
			name: row.name,
			kind: row.kind,
			schedule: row.schedule,
			tz: row.tz,
			next_run_ts: row.next_run_ts,
			enabled: row.enabled,
			payload_summary: row.payload_summary,
			search_text: row.search_text,
		}
	}
}

impl MissionControl {
	/// Inserts the task or overwrites every mutable field of the one with the same `externalId`.
	pub async fn upsert_scheduled_task(&self, req: UpsertTaskRequest) -> Result<Uuid> {
		let external_id = req.external_id.trim();

		if external_id.is_empty() {
			return Err(Error::InvalidRequest { message: "externalId must be non-empty.".to_string() });
		}

		let search_text = search_text::task_search_text(
			external_id,
			&req.name,
			req.kind,
			&req.schedule,
			&req.payload_summary,
		);
		let task = ScheduledTask {
			task_id: Uuid::new_v4(),
			external_id: external_id.to_string(),
			name: req.name,
			kind: req.kind.as_str().to_string(),
			schedule: req.schedule,
			tz: blank_to_none(req.tz),
			next_run_ts: req.next_run_ts,
			enabled: req.enabled,
			payload_summary: req.payload_summary,
			search_text,
		};
		let upserted = tasks::upsert_task(&self.db.pool, &task).await?;

		tracing::debug!(
			task_id = %upserted.id,
			external_id = %task.external_id,
			inserted = upserted.inserted,
			"Scheduled task upserted."
		);

		Ok(upserted.id)
	}

	/// Applies a partial patch. `externalId` and `kind` are never changed here.
	pub async fn update_scheduled_task(&self, req: UpdateTaskRequest) -> Result<Uuid> {
		let mut tx = self.db.pool.begin().await?;
		let mut task = tasks::get_task_for_update(&mut *tx, req.id).await?.ok_or_else(|| {
			Error::NotFound { message: format!("Scheduled task {} does not exist.", req.id) }
		})?;
		let kind = task
			.kind
			.parse::<TaskKind>()
			.map_err(|err| Error::Storage { message: err.to_string() })?;
		let TaskPatch { name, enabled, next_run_ts, payload_summary, schedule, tz } = req.patch;

		if let Some(name) = name {
			task.name = name;
		}
		if let Some(enabled) = enabled {
			task.enabled = enabled;
		}
		if let Some(next_run_ts) = next_run_ts {
			task.next_run_ts = next_run_ts;
		}
		if let Some(payload_summary) = payload_summary {
			task.payload_summary = payload_summary;
		}
		if let Some(schedule) = schedule {
			task.schedule = schedule;
		}
		if let Some(tz) = tz {
			task.tz = blank_to_none(Some(tz));
		}

		task.search_text = search_text::task_search_text(
			&task.external_id,
			&task.name,
			kind,
			&task.schedule,
			&task.payload_summary,
		);

		tasks::update_task_fields(&mut *tx, &task).await?;

		tx.commit().await?;

		tracing::debug!(task_id = %task.task_id, "Scheduled task updated.");

		Ok(task.task_id)
	}

	/// Tasks whose next run falls in `[start_ts, end_ts]`, soonest first.
	pub async fn tasks_in_range(&self, req: TasksInRangeRequest) -> Result<Vec<TaskItem>> {
		if req.start_ts > req.end_ts {
			return Err(Error::InvalidRequest {
				message: "startTs must not be greater than endTs.".to_string(),
			});
		}

		let rows = tasks::list_tasks_in_range(&self.db.pool, req.start_ts, req.end_ts).await?;

		Ok(rows.into_iter().map(TaskItem::from).collect())
	}

	pub async fn get_task(&self, task_id: Uuid) -> Result<TaskItem> {
		let row = tasks::get_task(&self.db.pool, task_id).await?.ok_or_else(|| {
			Error::NotFound { message: format!("Scheduled task {task_id} does not exist.") }
		})?;

		Ok(row.into())
	}
}

pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
	value.map(|raw| raw.trim().to_string()).filter(|raw| !raw.is_empty())
}
