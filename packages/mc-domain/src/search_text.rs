//! Derived `searchText` fields and query normalization.
//!
//! Every record stores a lowercase concatenation of its searchable fields; the store's text index
//! is built over that column only.

use crate::TaskKind;

pub const SEPARATOR: &str = "\n";
/// Upper bound on terms taken from a single user query.
pub const MAX_QUERY_TERMS: usize = 16;
/// Cap on a stored `searchText`. Postgres rejects a tsvector over 1 MiB, and the text index is
/// generated from this column.
pub const MAX_SEARCH_TEXT_BYTES: usize = 256 * 1024;

pub fn activity_search_text(
	event_type: &str,
	title: &str,
	details: Option<&str>,
	tags: &[String],
) -> String {
	let tags = tags.join(" ");

	join_lower(&[event_type, title, details.unwrap_or(""), tags.as_str()])
}

pub fn task_search_text(
	external_id: &str,
	name: &str,
	kind: TaskKind,
	schedule: &str,
	payload_summary: &str,
) -> String {
	join_lower(&[external_id, name, kind.as_str(), schedule, payload_summary])
}

pub fn document_search_text(path: &str, title: &str, content: &str) -> String {
	join_lower(&[path, title, content])
}

/// Trims and lowercases a user query. Returns `None` when nothing is left.
pub fn normalize_query(raw: &str) -> Option<String> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return None;
	}

	Some(trimmed.to_lowercase())
}

/// Splits a normalized query into alphanumeric terms, deduplicated in first-seen order.
pub fn query_terms(normalized: &str) -> Vec<String> {
	let mut terms: Vec<String> = Vec::new();

	for term in normalized.split(|ch: char| !ch.is_alphanumeric()) {
		if term.is_empty() || terms.iter().any(|seen| seen == term) {
			continue;
		}

		terms.push(term.to_string());

		if terms.len() == MAX_QUERY_TERMS {
			break;
		}
	}

	terms
}

fn join_lower(parts: &[&str]) -> String {
	let mut text = parts.join(SEPARATOR).to_lowercase();

	if text.len() > MAX_SEARCH_TEXT_BYTES {
		let mut end = MAX_SEARCH_TEXT_BYTES;

		while !text.is_char_boundary(end) {
			end -= 1;
		}

		text.truncate(end);
	}

	text
}
