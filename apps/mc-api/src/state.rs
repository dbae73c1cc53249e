use std::sync::Arc;

use mc_service::MissionControl;
use mc_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MissionControl>,
}
impl AppState {
	/// Connects to Postgres and bootstraps the schema before serving.
	pub async fn new(config: mc_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(MissionControl::new(config, db)))
	}

	pub fn from_service(service: MissionControl) -> Self {
		Self { service: Arc::new(service) }
	}
}
