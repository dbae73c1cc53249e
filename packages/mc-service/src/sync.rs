//! Batch upsert of the descriptors pushed by the scheduler feed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, MissionControl, Result, UpsertTaskRequest, tasks};
use mc_domain::{TaskKind, clock, feed::TaskDescriptor};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
	pub count: usize,
	pub ids: Vec<Uuid>,
}

impl MissionControl {
	/// Upserts each descriptor in order.
	///
	/// There is no batch transaction: the first failure stops the loop and is returned, leaving
	/// the descriptors before it committed and the ones after it untouched.
	pub async fn sync_scheduled_tasks(&self, descriptors: Vec<TaskDescriptor>) -> Result<SyncReport> {
		let now = clock::now_ms();
		let mut ids = Vec::with_capacity(descriptors.len());

		for (index, descriptor) in descriptors.into_iter().enumerate() {
			let req = normalize_descriptor(descriptor, now)?;
			let external_id = req.external_id.clone();

			match self.upsert_scheduled_task(req).await {
				Ok(id) => ids.push(id),
				Err(err) => {
					tracing::warn!(
						index,
						external_id = %external_id,
						committed = ids.len(),
						error = %err,
						"Scheduled task sync stopped."
					);

					return Err(err);
				},
			}
		}

		tracing::info!(count = ids.len(), "Scheduled tasks synced.");

		Ok(SyncReport { count: ids.len(), ids })
	}
}

/// Fills the defaults of a feed descriptor. `now` is used when no next run is reported.
pub fn normalize_descriptor(descriptor: TaskDescriptor, now: i64) -> Result<UpsertTaskRequest> {
	let external_id = descriptor.external_id.trim().to_string();

	if external_id.is_empty() {
		return Err(Error::InvalidRequest {
			message: "Every task descriptor needs a non-empty externalId.".to_string(),
		});
	}

	Ok(UpsertTaskRequest {
		name: descriptor
			.name
			.filter(|name| !name.trim().is_empty())
			.unwrap_or_else(|| external_id.clone()),
		kind: TaskKind::from_feed(descriptor.kind.as_deref()),
		schedule: descriptor.schedule.unwrap_or_default(),
		next_run_ts: descriptor.next_run_ts.unwrap_or(now),
		enabled: descriptor.enabled.unwrap_or(true),
		payload_summary: descriptor.payload_summary.unwrap_or_default(),
		tz: tasks::blank_to_none(descriptor.tz),
		external_id,
	})
}
