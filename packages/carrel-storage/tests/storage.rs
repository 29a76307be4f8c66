use carrel_storage::{cache, db::Db, documents, facets, taxonomy};
use carrel_testkit::TestDatabase;
use serde_json::json;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};

const VECTOR_DIM: u32 = 4;
const SKIP_NOTE: &str = "Requires external Postgres. Set CARREL_PG_DSN to run.";

async fn test_db() -> Option<TestDatabase> {
	let base_dsn = carrel_testkit::env_dsn()?;
	let db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");

	Some(db)
}

async fn connect(dsn: &str) -> Db {
	let cfg = carrel_config::Postgres { dsn: dsn.to_string(), pool_max_conns: 4 };
	let db = Db::connect(&cfg).await.expect("Failed to connect.");

	db.ensure_schema(VECTOR_DIM).await.expect("Failed to apply schema.");

	db
}

async fn insert_document(
	pool: &PgPool,
	filename: &str,
	text: &str,
	keywords: Option<serde_json::Value>,
) -> i64 {
	sqlx::query_scalar::<_, i64>(
		"\
INSERT INTO documents (filename, file_path, file_size, status, extracted_text, search_content, keywords)
VALUES ($1, $2, 1024, 'COMPLETED', $3, $3, $4)
RETURNING id",
	)
	.bind(filename)
	.bind(format!("/store/{filename}"))
	.bind(text)
	.bind(keywords)
	.fetch_one(pool)
	.await
	.expect("Failed to insert document.")
}

fn mapped_keywords(primary: &str, sub: Option<&str>, canonical: &str) -> serde_json::Value {
	let mut mapping = json!({
		"verbatim_term": canonical.to_lowercase(),
		"mapped_primary_category": primary,
		"mapped_canonical_term": canonical,
	});

	if let Some(sub) = sub {
		mapping["mapped_subcategory"] = json!(sub);
	}

	json!({ "keyword_mappings": [mapping] })
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CARREL_PG_DSN to run."]
async fn filter_ids_requires_every_supplied_taxonomy_value() {
	let Some(test_db) = test_db().await else {
		eprintln!("Skipping; {SKIP_NOTE}");

		return;
	};
	let db = connect(test_db.dsn()).await;
	let pool = &db.pool;
	let taxed = insert_document(
		pool,
		"levy.pdf",
		"property tax relief",
		Some(mapped_keywords("Economy", Some("Taxation"), "Taxes")),
	)
	.await;
	let parks = insert_document(
		pool,
		"parks.pdf",
		"park cleanup",
		Some(mapped_keywords("Environment", None, "Parks")),
	)
	.await;
	let _plain = insert_document(pool, "memo.pdf", "staff memo", None).await;

	let by_term = documents::filter_ids(pool, None, None, None, Some("Taxes"))
		.await
		.expect("Filter failed.");

	assert_eq!(by_term, vec![taxed]);

	let by_category = documents::filter_ids(pool, None, Some("Environment"), None, None)
		.await
		.expect("Filter failed.");

	assert_eq!(by_category, vec![parks]);

	let conflicting = documents::filter_ids(pool, None, Some("Economy"), None, Some("Parks"))
		.await
		.expect("Filter failed.");

	assert!(conflicting.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CARREL_PG_DSN to run."]
async fn minimal_search_honors_taxonomy_filters() {
	let Some(test_db) = test_db().await else {
		eprintln!("Skipping; {SKIP_NOTE}");

		return;
	};
	let db = connect(test_db.dsn()).await;
	let pool = &db.pool;
	let taxed = insert_document(
		pool,
		"levy_report.pdf",
		"annual report on tax levies",
		Some(mapped_keywords("Economy", Some("Taxation"), "Taxes")),
	)
	.await;
	let _unmapped = insert_document(pool, "parks_report.pdf", "annual report on parks", None).await;

	let rows = documents::search_minimal(pool, "report", None, None, Some("Taxes"), 20, 0)
		.await
		.expect("Minimal search failed.");
	let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

	assert_eq!(ids, vec![taxed]);

	let count = documents::count_minimal(pool, "report", None, None, Some("Taxes"))
		.await
		.expect("Minimal count failed.");

	assert_eq!(count, 1);

	let unfiltered = documents::count_minimal(pool, "report", None, None, None)
		.await
		.expect("Minimal count failed.");

	assert_eq!(unfiltered, 2);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CARREL_PG_DSN to run."]
async fn subcategory_facets_group_under_their_primary_category() {
	let Some(test_db) = test_db().await else {
		eprintln!("Skipping; {SKIP_NOTE}");

		return;
	};
	let db = connect(test_db.dsn()).await;
	let pool = &db.pool;

	taxonomy::upsert_term(pool, "Taxes", "Economy", Some("Taxation"))
		.await
		.expect("Failed to seed taxonomy.");
	taxonomy::upsert_term(pool, "Parks", "Environment", Some("Green Space"))
		.await
		.expect("Failed to seed taxonomy.");

	let taxed = insert_document(
		pool,
		"levy.pdf",
		"tax levy",
		Some(mapped_keywords("Economy", Some("Taxation"), "Taxes")),
	)
	.await;
	let parks = insert_document(
		pool,
		"parks.pdf",
		"park plan",
		Some(mapped_keywords("Environment", Some("Green Space"), "Parks")),
	)
	.await;
	let unlisted = insert_document(
		pool,
		"rumor.pdf",
		"unvetted extraction",
		Some(mapped_keywords("Gossip", Some("Hearsay"), "Rumors")),
	)
	.await;

	let rows = facets::subcategory_counts(pool, &[taxed, parks, unlisted])
		.await
		.expect("Facet query failed.");

	assert_eq!(rows.len(), 2);
	assert_eq!(rows[0].primary_category, "Economy");
	assert_eq!(rows[0].value, "Taxation");
	assert_eq!(rows[0].count, 1);
	assert_eq!(rows[1].primary_category, "Environment");
	assert_eq!(rows[1].value, "Green Space");
	assert_eq!(rows[1].count, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CARREL_PG_DSN to run."]
async fn expired_cache_rows_are_invisible_and_purgeable() {
	let Some(test_db) = test_db().await else {
		eprintln!("Skipping; {SKIP_NOTE}");

		return;
	};
	let db = connect(test_db.dsn()).await;
	let pool = &db.pool;
	let now = OffsetDateTime::now_utc();

	cache::store_payload(pool, "stale", &json!({"items": []}), now - Duration::minutes(1))
		.await
		.expect("Store failed.");
	cache::store_payload(pool, "fresh", &json!({"items": [1]}), now + Duration::minutes(5))
		.await
		.expect("Store failed.");

	assert!(cache::fetch_payload(pool, "stale").await.expect("Fetch failed.").is_none());
	assert!(cache::fetch_payload(pool, "fresh").await.expect("Fetch failed.").is_some());

	let purged = cache::purge_expired(pool).await.expect("Purge failed.");

	assert_eq!(purged, 1);
	assert!(cache::fetch_payload(pool, "fresh").await.expect("Fetch failed.").is_some());

	cache::delete_payload(pool, "fresh").await.expect("Delete failed.");

	assert!(cache::fetch_payload(pool, "fresh").await.expect("Fetch failed.").is_none());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
