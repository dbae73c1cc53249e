//! Full-text matching over the generated `search_vector` columns.
//!
//! Each table indexes `to_tsvector('simple', search_text)` with non-alphanumeric runs replaced by
//! spaces, so a query only needs alphanumeric terms. Every term is matched as a prefix and terms
//! are OR-ed; `ts_rank` orders the matches.

use sqlx::{Postgres, QueryBuilder};

/// A sanitized `tsquery` expression such as `build:* | ci:*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery(String);
impl TextQuery {
	/// Returns `None` when no term survives sanitizing.
	pub fn from_terms<S>(terms: &[S]) -> Option<Self>
	where
		S: AsRef<str>,
	{
		let parts = terms
			.iter()
			.map(|term| term.as_ref().chars().filter(|ch| ch.is_alphanumeric()).collect::<String>())
			.filter(|term| !term.is_empty())
			.map(|term| format!("{}:*", term.to_lowercase()))
			.collect::<Vec<_>>();

		if parts.is_empty() {
			return None;
		}

		Some(Self(parts.join(" | ")))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Starts `SELECT <columns> FROM <table>, to_tsquery(...) AS q WHERE search_vector @@ q`.
pub(crate) fn select_matching<'args>(
	columns: &str,
	table: &str,
	query: &'args TextQuery,
) -> QueryBuilder<'args, Postgres> {
	let mut builder = QueryBuilder::new(format!("SELECT {columns} FROM {table}, to_tsquery('simple', "));

	builder.push_bind(query.as_str());
	builder.push(") AS q WHERE search_vector @@ q");

	builder
}

/// Appends `ORDER BY ts_rank(...) DESC, <tie_breaker> LIMIT n`.
pub(crate) fn push_ranked_limit(
	builder: &mut QueryBuilder<'_, Postgres>,
	tie_breaker: &str,
	limit: i64,
) {
	builder.push(format!(" ORDER BY ts_rank(search_vector, q) DESC, {tie_breaker} LIMIT "));
	builder.push_bind(limit);
}
