use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, MissionControl, Result};
use mc_domain::{DocumentKind, search_text};
use mc_storage::{documents, models::Document};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDocumentRequest {
	pub path: String,
	pub title: String,
	pub content: String,
	pub kind: DocumentKind,
	/// Epoch milliseconds, usually the file's modification time.
	pub updated_at: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentItem {
	pub id: Uuid,
	pub path: String,
	pub title: String,
	pub content: String,
	pub kind: String,
	pub updated_at: i64,
	pub search_text: String,
}
impl From<Document> for DocumentItem {
	fn from(row: Document) -> Self {
		Self {
			id: row.doc_id,
			path: row.path,
			title: row.title,
			content: row.content,
			kind: row.kind,
			updated_at: row.updated_at,
			search_text: row.search_text,
		}
	}
}

impl MissionControl {
	pub async fn upsert_document(&self, req: UpsertDocumentRequest) -> Result<Uuid> {
		let path = req.path.trim();

		if path.is_empty() {
			return Err(Error::InvalidRequest { message: "path must be non-empty.".to_string() });
		}

		let doc = Document {
			doc_id: Uuid::new_v4(),
			path: path.to_string(),
			search_text: search_text::document_search_text(path, &req.title, &req.content),
			title: req.title,
			content: req.content,
			kind: req.kind.as_str().to_string(),
			updated_at: req.updated_at,
		};
		let upserted = documents::upsert_document(&self.db.pool, &doc).await?;

		tracing::debug!(
			doc_id = %upserted.id,
			path = %doc.path,
			inserted = upserted.inserted,
			"Document upserted."
		);

		Ok(upserted.id)
	}

	pub async fn get_document_by_path(&self, path: &str) -> Result<DocumentItem> {
		let row = documents::find_document_by_path(&self.db.pool, path.trim())
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("Document {path:?} does not exist.") })?;

		Ok(row.into())
	}
}
