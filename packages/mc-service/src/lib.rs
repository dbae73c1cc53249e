pub mod access;
pub mod activity;
pub mod documents;
pub mod search;
pub mod sync;
pub mod tasks;

mod error;

pub use activity::{
	EventItem, EventPage, IngestActivityPayload, ListEventsRequest, LogEventRequest,
	LogEventResponse,
};
pub use documents::{DocumentItem, UpsertDocumentRequest};
pub use error::{Error, Result};
pub use search::{GlobalSearchRequest, GlobalSearchResponse};
pub use sync::SyncReport;
pub use tasks::{TaskItem, TaskPatch, TasksInRangeRequest, UpdateTaskRequest, UpsertTaskRequest};

use mc_config::Config;
use mc_storage::db::Db;

/// The mission control core: every mutation, query, and search goes through one of these.
///
/// Built once by each binary from its config and a connected [`Db`], then shared by reference.
pub struct MissionControl {
	pub cfg: Config,
	pub db: Db,
}
impl MissionControl {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db }
	}
}
