use uuid::Uuid;

use mc_storage::{activity::EventCursor, schema, search::TextQuery};

#[test]
fn text_query_prefixes_and_ors_terms() {
	let query = TextQuery::from_terms(&["Build", "ci"]).expect("Expected a query.");

	assert_eq!(query.as_str(), "build:* | ci:*");
}

#[test]
fn text_query_strips_tsquery_operators() {
	let query = TextQuery::from_terms(&["a&b", "!x|", "(y)"]).expect("Expected a query.");

	assert_eq!(query.as_str(), "ab:* | x:* | y:*");
}

#[test]
fn text_query_without_usable_terms_is_none() {
	assert!(TextQuery::from_terms::<&str>(&[]).is_none());
	assert!(TextQuery::from_terms(&["&", "::", " "]).is_none());
}

#[test]
fn event_cursor_renders_and_parses() {
	let event_id = Uuid::new_v4();
	let cursor = EventCursor { ts: 1_700_000_000_000, event_id };
	let rendered = cursor.to_string();

	assert_eq!(rendered, format!("1700000000000:{}", event_id.simple()));
	assert_eq!(rendered.parse::<EventCursor>().expect("Expected a valid cursor."), cursor);
}

#[test]
fn event_cursor_rejects_malformed_input() {
	for raw in ["", "123", "abc:def", "12:not-a-uuid", ":0194c5d3a2b84c2e9f1e7c6b2a9d0e11"] {
		assert!(
			matches!(raw.parse::<EventCursor>(), Err(mc_storage::Error::InvalidArgument(_))),
			"Expected {raw:?} to be rejected."
		);
	}
}

#[test]
fn rendered_schema_inlines_every_table() {
	let sql = schema::render_schema();

	assert!(!sql.contains("\\ir "));

	for table in ["activity_events", "scheduled_tasks", "documents"] {
		assert!(
			sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
			"Missing table {table}."
		);
	}
}
