use serde_json::Value;
use time::OffsetDateTime;

/// One document row, minus the raw vector payload. `has_embedding` is computed
/// in SQL so the multi-kilobyte embedding column never crosses the wire.
#[derive(Debug, sqlx::FromRow)]
pub struct DocumentRow {
	pub id: i64,
	pub filename: String,
	pub file_path: String,
	pub file_size: i64,
	pub status: String,
	pub created_at: OffsetDateTime,
	pub updated_at: Option<OffsetDateTime>,
	pub processed_at: Option<OffsetDateTime>,
	pub extracted_text: Option<String>,
	pub ai_analysis: Option<Value>,
	pub keywords: Option<Value>,
	pub has_embedding: bool,
	pub embedding_dim: Option<i32>,
}

/// A candidate document id paired with one retrieval-stage similarity score.
#[derive(Clone, Copy, Debug, sqlx::FromRow)]
pub struct ScoredId {
	pub id: i64,
	pub score: f32,
}

#[derive(Debug, sqlx::FromRow)]
pub struct TaxonomyTermRow {
	pub id: i64,
	pub term: String,
	pub primary_category: String,
	pub subcategory: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct FacetCount {
	pub value: String,
	pub count: i64,
}

/// A subcategory count tagged with the primary category it belongs under.
#[derive(Debug, sqlx::FromRow)]
pub struct SubcategoryFacetCount {
	pub primary_category: String,
	pub value: String,
	pub count: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct QueryCount {
	pub query: String,
	pub count: i64,
}
