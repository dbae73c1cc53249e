//! Federated search over documents, activity, and tasks.

use serde::{Deserialize, Serialize};

use crate::{DocumentItem, EventItem, MissionControl, Result, TaskItem};
use mc_domain::search_text;
use mc_storage::{
	activity::{self, EventSearchFilter},
	documents::{self, DocumentSearchFilter},
	search::TextQuery,
	tasks::{self, TaskSearchFilter},
};

pub const DEFAULT_SEARCH_LIMIT: i64 = 20;
pub const MAX_SEARCH_LIMIT: i64 = 50;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GlobalSearchRequest {
	#[serde(default)]
	pub q: String,
	#[serde(default)]
	pub limit: Option<i64>,
}

/// One ranked list per table. The lists are never merged, and `limit` caps each list separately.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GlobalSearchResponse {
	pub documents: Vec<DocumentItem>,
	pub activity: Vec<EventItem>,
	pub tasks: Vec<TaskItem>,
}
impl GlobalSearchResponse {
	pub fn is_empty(&self) -> bool {
		self.documents.is_empty() && self.activity.is_empty() && self.tasks.is_empty()
	}
}

impl MissionControl {
	pub async fn global_search(&self, req: GlobalSearchRequest) -> Result<GlobalSearchResponse> {
		let Some(normalized) = search_text::normalize_query(&req.q) else {
			return Ok(GlobalSearchResponse::default());
		};
		let terms = search_text::query_terms(&normalized);
		let Some(query) = TextQuery::from_terms(&terms) else {
			return Ok(GlobalSearchResponse::default());
		};
		let limit = search_limit(req.limit);
		let pool = &self.db.pool;
		let doc_filter = DocumentSearchFilter::default();
		let event_filter = EventSearchFilter::default();
		let task_filter = TaskSearchFilter::default();
		let (doc_rows, event_rows, task_rows) = tokio::try_join!(
			documents::search_documents(pool, &query, &doc_filter, limit),
			activity::search_events(pool, &query, &event_filter, limit),
			tasks::search_tasks(pool, &query, &task_filter, limit),
		)?;

		tracing::debug!(
			terms = terms.len(),
			documents = doc_rows.len(),
			activity = event_rows.len(),
			tasks = task_rows.len(),
			"Global search finished."
		);

		Ok(GlobalSearchResponse {
			documents: doc_rows.into_iter().map(DocumentItem::from).collect(),
			activity: event_rows.into_iter().map(EventItem::from).collect(),
			tasks: task_rows.into_iter().map(TaskItem::from).collect(),
		})
	}
}

pub fn search_limit(requested: Option<i64>) -> i64 {
	requested.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT)
}
