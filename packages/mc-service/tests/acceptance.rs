use std::collections::BTreeMap;

use uuid::Uuid;

use mc_config::{Config, Postgres, Security, Service, Storage};
use mc_domain::{
	DocumentKind, EventMetadata, EventSource, EventStatus, TaskKind, feed::TaskDescriptor,
};
use mc_service::{
	Error, GlobalSearchRequest, ListEventsRequest, LogEventRequest, MissionControl, TaskPatch,
	TasksInRangeRequest, UpdateTaskRequest, UpsertDocumentRequest, UpsertTaskRequest,
};
use mc_storage::db::Db;
use mc_testkit::TestDatabase;

const DAY_MS: i64 = 86_400_000;

async fn test_service(test_db: &TestDatabase) -> MissionControl {
	let cfg = Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			postgres: Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 4 },
		},
		security: Security {
			bind_localhost_only: true,
			activity_secret: Some("activity".to_string()),
			sync_secret: Some("sync".to_string()),
		},
		ingest: None,
		sync: None,
	};
	let db = Db::connect(&cfg.storage.postgres).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	MissionControl::new(cfg, db)
}

fn event_request(ts: i64, status: EventStatus, title: &str) -> LogEventRequest {
	LogEventRequest {
		r#type: "task.run".to_string(),
		title: title.to_string(),
		status,
		source: EventSource::System,
		ts: Some(ts),
		details: None,
		tags: vec!["ci".to_string()],
		metadata: None,
	}
}

fn task_request(external_id: &str, next_run_ts: i64) -> UpsertTaskRequest {
	UpsertTaskRequest {
		external_id: external_id.to_string(),
		name: format!("Build {external_id}"),
		kind: TaskKind::Cron,
		schedule: "0 3 * * *".to_string(),
		next_run_ts,
		enabled: true,
		payload_summary: "Nightly build".to_string(),
		tz: Some("UTC".to_string()),
	}
}

async fn task_count(service: &MissionControl) -> i64 {
	sqlx::query_scalar("SELECT count(*) FROM scheduled_tasks")
		.fetch_one(&service.db.pool)
		.await
		.expect("Failed to count tasks.")
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MC_PG_DSN to run."]
async fn logged_event_stores_derived_search_text() {
	let Some(base_dsn) = mc_testkit::env_dsn() else {
		eprintln!("Skipping logged_event_stores_derived_search_text; set MC_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;
	let response = service
		.log_event(event_request(1_000, EventStatus::Success, "Build finished"))
		.await
		.expect("Failed to log event.");
	let stored = service.get_event(response.id).await.expect("Failed to load event.");

	assert_eq!(stored.search_text, "task.run\nbuild finished\n\nci");
	assert_eq!(stored.status, "success");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MC_PG_DSN to run."]
async fn status_filter_runs_after_the_page_is_scanned() {
	let Some(base_dsn) = mc_testkit::env_dsn() else {
		eprintln!("Skipping status_filter_runs_after_the_page_is_scanned; set MC_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;

	// Newest first: info, info, error, info, error.
	for (ts, status) in [
		(5, EventStatus::Info),
		(4, EventStatus::Info),
		(3, EventStatus::Error),
		(2, EventStatus::Info),
		(1, EventStatus::Error),
	] {
		service.log_event(event_request(ts, status, "Step")).await.expect("Failed to log event.");
	}

	let mut cursor = None;
	let mut pages = Vec::new();

	loop {
		let page = service
			.list_events(ListEventsRequest {
				cursor: cursor.clone(),
				page_size: Some(2),
				status: Some(EventStatus::Error),
				..Default::default()
			})
			.await
			.expect("Failed to list events.");

		assert!(page.page.iter().all(|item| item.status == "error"));

		pages.push(page.page.iter().map(|item| item.ts).collect::<Vec<_>>());
		cursor = page.continue_cursor;

		if page.is_done {
			break;
		}
	}

	assert_eq!(pages, vec![vec![], vec![3], vec![1]]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MC_PG_DSN to run."]
async fn task_upsert_is_idempotent_and_patch_is_partial() {
	let Some(base_dsn) = mc_testkit::env_dsn() else {
		eprintln!("Skipping task_upsert_is_idempotent_and_patch_is_partial; set MC_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;
	let first = service
		.upsert_scheduled_task(task_request("nightly", 100))
		.await
		.expect("Failed to upsert task.");
	let second = service
		.upsert_scheduled_task(task_request("nightly", 100))
		.await
		.expect("Failed to upsert task.");

	assert_eq!(first, second);

	assert_eq!(task_count(&service).await, 1);

	let before = service.get_task(first).await.expect("Failed to load task.");
	let updated = service
		.update_scheduled_task(UpdateTaskRequest {
			id: first,
			patch: TaskPatch { enabled: Some(false), ..Default::default() },
		})
		.await
		.expect("Failed to update task.");
	let after = service.get_task(updated).await.expect("Failed to load task.");

	assert_eq!(updated, first);
	assert!(!after.enabled);
	assert_eq!(after.external_id, before.external_id);
	assert_eq!(after.kind, before.kind);
	assert_eq!(after.name, before.name);
	assert_eq!(after.schedule, before.schedule);
	assert_eq!(after.next_run_ts, before.next_run_ts);
	assert_eq!(after.payload_summary, before.payload_summary);
	assert_eq!(after.tz, before.tz);
	assert_eq!(after.search_text, "nightly\nbuild nightly\ncron\n0 3 * * *\nnightly build");

	let missing = service
		.update_scheduled_task(UpdateTaskRequest {
			id: Uuid::new_v4(),
			patch: TaskPatch { name: Some("ghost".to_string()), ..Default::default() },
		})
		.await;

	assert!(matches!(missing, Err(Error::NotFound { .. })));

	let names: Vec<String> = sqlx::query_scalar("SELECT name FROM scheduled_tasks")
		.fetch_all(&service.db.pool)
		.await
		.expect("Failed to load task names.");

	assert_eq!(names, vec!["Build nightly".to_string()]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MC_PG_DSN to run."]
async fn tasks_in_range_is_inclusive_and_ascending() {
	let Some(base_dsn) = mc_testkit::env_dsn() else {
		eprintln!("Skipping tasks_in_range_is_inclusive_and_ascending; set MC_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;
	let start = 1_700_000_000_000;
	let end = start + 7 * DAY_MS;

	for (external_id, ts) in [
		("before", start - 1),
		("last", end),
		("first", start),
		("middle", start + DAY_MS),
		("after", end + 1),
	] {
		service
			.upsert_scheduled_task(task_request(external_id, ts))
			.await
			.expect("Failed to upsert task.");
	}

	let tasks = service
		.tasks_in_range(TasksInRangeRequest { start_ts: start, end_ts: end })
		.await
		.expect("Failed to list tasks.");

	assert_eq!(tasks.iter().map(|task| task.external_id.as_str()).collect::<Vec<_>>(), vec![
		"first", "middle", "last"
	]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MC_PG_DSN to run."]
async fn document_upsert_keeps_identity_and_search_caps_each_list() {
	let Some(base_dsn) = mc_testkit::env_dsn() else {
		eprintln!(
			"Skipping document_upsert_keeps_identity_and_search_caps_each_list; set MC_PG_DSN to run."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;
	let memory = |content: &str| UpsertDocumentRequest {
		path: "MEMORY.md".to_string(),
		title: "Memory".to_string(),
		content: content.to_string(),
		kind: DocumentKind::Memory,
		updated_at: 1,
	};
	let first = service.upsert_document(memory("old build notes")).await.expect("Failed to upsert.");
	let second = service.upsert_document(memory("fresh deploy notes")).await.expect("Failed to upsert.");

	assert_eq!(first, second);

	let stored = service.get_document_by_path("MEMORY.md").await.expect("Failed to load document.");

	assert_eq!(stored.search_text, "memory.md\nmemory\nfresh deploy notes");

	for index in 0..7 {
		service
			.upsert_document(UpsertDocumentRequest {
				path: format!("notes/build-{index}.md"),
				title: format!("Build {index}"),
				content: "build log".to_string(),
				kind: DocumentKind::Note,
				updated_at: index,
			})
			.await
			.expect("Failed to upsert document.");
		service
			.log_event(event_request(index, EventStatus::Info, "Build finished"))
			.await
			.expect("Failed to log event.");
	}
	for external_id in ["build-a", "build-b"] {
		service
			.upsert_scheduled_task(task_request(external_id, 10))
			.await
			.expect("Failed to upsert task.");
	}

	let response = service
		.global_search(GlobalSearchRequest { q: "  BUILD ".to_string(), limit: Some(5) })
		.await
		.expect("Failed to search.");

	assert_eq!(response.documents.len(), 5);
	assert_eq!(response.activity.len(), 5);
	assert_eq!(response.tasks.len(), 2);
	assert!(response.documents.iter().all(|doc| doc.path != "MEMORY.md"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MC_PG_DSN to run."]
async fn cursor_pages_survive_inserts_between_calls() {
	let Some(base_dsn) = mc_testkit::env_dsn() else {
		eprintln!("Skipping cursor_pages_survive_inserts_between_calls; set MC_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;
	let mut original = Vec::new();

	for ts in 1..=6 {
		let logged = service
			.log_event(event_request(ts, EventStatus::Info, "Step"))
			.await
			.expect("Failed to log event.");

		original.push(logged.id);
	}

	let first = service
		.list_events(ListEventsRequest { page_size: Some(3), ..Default::default() })
		.await
		.expect("Failed to list events.");

	assert_eq!(first.page.iter().map(|item| item.ts).collect::<Vec<_>>(), vec![6, 5, 4]);
	assert!(!first.is_done);

	let boundary = first.page[2].id;
	let mut late = BTreeMap::new();

	for ts in [100, 5, 4] {
		let logged = service
			.log_event(event_request(ts, EventStatus::Info, "Late step"))
			.await
			.expect("Failed to log event.");

		late.insert(ts, logged.id);
	}

	let mut cursor = first.continue_cursor.clone();
	let mut rest = Vec::new();

	loop {
		let page = service
			.list_events(ListEventsRequest {
				cursor: cursor.clone(),
				page_size: Some(3),
				..Default::default()
			})
			.await
			.expect("Failed to list events.");

		rest.extend(page.page.iter().map(|item| (item.ts, item.id)));
		cursor = page.continue_cursor;

		if page.is_done {
			break;
		}
	}

	// Rows newer than the cursor never show up; a late row at the boundary ts only does when it
	// sorts after the boundary row.
	let mut expected = Vec::new();

	if late[&4] < boundary {
		expected.push((4, late[&4]));
	}

	expected.extend([(3, original[2]), (2, original[1]), (1, original[0])]);

	assert_eq!(rest, expected);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MC_PG_DSN to run."]
async fn second_upsert_overwrites_fields_and_search_text() {
	let Some(base_dsn) = mc_testkit::env_dsn() else {
		eprintln!("Skipping second_upsert_overwrites_fields_and_search_text; set MC_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;
	let first = service
		.upsert_scheduled_task(task_request("x", 100))
		.await
		.expect("Failed to upsert task.");
	let second = service
		.upsert_scheduled_task(UpsertTaskRequest {
			external_id: "x".to_string(),
			name: "Renamed".to_string(),
			kind: TaskKind::Every,
			schedule: "every 5m".to_string(),
			next_run_ts: 200,
			enabled: false,
			payload_summary: "Poll inbox".to_string(),
			tz: None,
		})
		.await
		.expect("Failed to upsert task.");

	assert_eq!(first, second);
	assert_eq!(task_count(&service).await, 1);

	let stored = service.get_task(first).await.expect("Failed to load task.");

	assert_eq!(stored.name, "Renamed");
	assert_eq!(stored.kind, "every");
	assert_eq!(stored.schedule, "every 5m");
	assert_eq!(stored.next_run_ts, 200);
	assert!(!stored.enabled);
	assert_eq!(stored.payload_summary, "Poll inbox");
	assert_eq!(stored.tz, None);
	assert_eq!(stored.search_text, "x\nrenamed\nevery\nevery 5m\npoll inbox");

	let response = service
		.global_search(GlobalSearchRequest { q: "nightly".to_string(), limit: None })
		.await
		.expect("Failed to search.");

	assert!(response.tasks.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MC_PG_DSN to run."]
async fn failed_sync_keeps_earlier_descriptors_only() {
	let Some(base_dsn) = mc_testkit::env_dsn() else {
		eprintln!("Skipping failed_sync_keeps_earlier_descriptors_only; set MC_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;
	let descriptor = |external_id: &str| TaskDescriptor {
		external_id: external_id.to_string(),
		next_run_ts: Some(10),
		..Default::default()
	};
	let result = service
		.sync_scheduled_tasks(vec![
			descriptor("alpha"),
			descriptor("beta"),
			descriptor("  "),
			descriptor("gamma"),
		])
		.await;

	assert!(matches!(result, Err(Error::InvalidRequest { .. })));

	let mut stored: Vec<String> = sqlx::query_scalar("SELECT external_id FROM scheduled_tasks")
		.fetch_all(&service.db.pool)
		.await
		.expect("Failed to load external ids.");

	stored.sort();

	assert_eq!(stored, vec!["alpha".to_string(), "beta".to_string()]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MC_PG_DSN to run."]
async fn event_metadata_round_trips_through_the_store() {
	let Some(base_dsn) = mc_testkit::env_dsn() else {
		eprintln!("Skipping event_metadata_round_trips_through_the_store; set MC_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;
	let metadata = EventMetadata::Fields(BTreeMap::from([
		("branch".to_string(), "main".to_string()),
		("runner".to_string(), "ci-3".to_string()),
	]));
	let logged = service
		.log_event(LogEventRequest {
			metadata: Some(metadata.clone()),
			..event_request(7, EventStatus::Success, "Deploy")
		})
		.await
		.expect("Failed to log event.");
	let stored = service.get_event(logged.id).await.expect("Failed to load event.");
	let value = stored.metadata.expect("Expected stored metadata.");

	assert_eq!(EventMetadata::from_value(value).expect("Expected valid metadata."), metadata);

	let plain = service
		.log_event(event_request(8, EventStatus::Info, "Plain"))
		.await
		.expect("Failed to log event.");

	assert_eq!(service.get_event(plain.id).await.expect("Failed to load event.").metadata, None);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MC_PG_DSN to run."]
async fn oversized_document_is_stored_and_searchable() {
	let Some(base_dsn) = mc_testkit::env_dsn() else {
		eprintln!("Skipping oversized_document_is_stored_and_searchable; set MC_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;
	let content = (0..300_000).map(|index| format!("w{index}")).collect::<Vec<_>>().join(" ");

	assert!(content.len() > 2 * 1024 * 1024);

	service
		.upsert_document(UpsertDocumentRequest {
			path: "notes/huge.md".to_string(),
			title: "Huge".to_string(),
			content: content.clone(),
			kind: DocumentKind::Note,
			updated_at: 1,
		})
		.await
		.expect("Failed to upsert oversized document.");

	let stored = service.get_document_by_path("notes/huge.md").await.expect("Failed to load.");

	assert_eq!(stored.content, content);
	assert!(stored.search_text.len() <= mc_domain::search_text::MAX_SEARCH_TEXT_BYTES);

	let response = service
		.global_search(GlobalSearchRequest { q: "huge".to_string(), limit: None })
		.await
		.expect("Failed to search.");

	assert_eq!(response.documents.len(), 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
