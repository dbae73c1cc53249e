use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
	Result,
	models::{Document, Upserted},
	search::{self, TextQuery},
};

const DOCUMENT_COLUMNS: &str = "doc_id, path, title, content, kind, updated_at, search_text";

/// Equality filters supported by the document search index.
#[derive(Debug, Clone, Default)]
pub struct DocumentSearchFilter {
	pub kind: Option<String>,
}

/// Inserts the document, or overwrites the row stored under the same `path`.
pub async fn upsert_document<'e, E>(executor: E, doc: &Document) -> Result<Upserted>
where
	E: PgExecutor<'e>,
{
	let (id, inserted): (Uuid, bool) = sqlx::query_as(
		"\
INSERT INTO documents (
\tdoc_id,
\tpath,
\ttitle,
\tcontent,
\tkind,
\tupdated_at,
\tsearch_text
)
VALUES ($1,$2,$3,$4,$5,$6,$7)
ON CONFLICT (path) DO UPDATE
SET
\ttitle = EXCLUDED.title,
\tcontent = EXCLUDED.content,
\tkind = EXCLUDED.kind,
\tupdated_at = EXCLUDED.updated_at,
\tsearch_text = EXCLUDED.search_text
RETURNING doc_id, (xmax = 0) AS inserted",
	)
	.bind(doc.doc_id)
	.bind(doc.path.as_str())
	.bind(doc.title.as_str())
	.bind(doc.content.as_str())
	.bind(doc.kind.as_str())
	.bind(doc.updated_at)
	.bind(doc.search_text.as_str())
	.fetch_one(executor)
	.await?;

	Ok(Upserted { id, inserted })
}

pub async fn get_document<'e, E>(executor: E, doc_id: Uuid) -> Result<Option<Document>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, Document>(
		"\
SELECT
\tdoc_id,
\tpath,
\ttitle,
\tcontent,
\tkind,
\tupdated_at,
\tsearch_text
FROM documents
WHERE doc_id = $1",
	)
	.bind(doc_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn find_document_by_path<'e, E>(executor: E, path: &str) -> Result<Option<Document>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, Document>(
		"\
SELECT
\tdoc_id,
\tpath,
\ttitle,
\tcontent,
\tkind,
\tupdated_at,
\tsearch_text
FROM documents
WHERE path = $1",
	)
	.bind(path)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn search_documents(
	pool: &PgPool,
	query: &TextQuery,
	filter: &DocumentSearchFilter,
	limit: i64,
) -> Result<Vec<Document>> {
	let mut builder = search::select_matching(DOCUMENT_COLUMNS, "documents", query);

	if let Some(kind) = filter.kind.as_deref() {
		builder.push(" AND kind = ");
		builder.push_bind(kind);
	}

	search::push_ranked_limit(&mut builder, "updated_at DESC, doc_id ASC", limit);

	let rows = builder.build_query_as::<Document>().fetch_all(pool).await?;

	Ok(rows)
}
