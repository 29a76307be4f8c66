use sqlx::PgExecutor;

use crate::{
	Result,
	models::{DocumentRow, ScoredId},
};

const DOCUMENT_COLUMNS: &str = "\
	id,
	filename,
	file_path,
	file_size,
	status,
	created_at,
	updated_at,
	processed_at,
	extracted_text,
	ai_analysis,
	keywords,
	(embedding IS NOT NULL) AS has_embedding,
	embedding_dim";

/// pgvector accepts its bracketed text form, so query vectors travel as text
/// and are cast server side.
pub fn vector_literal(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8 + 2);

	out.push('[');
	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}
		out.push_str(&value.to_string());
	}
	out.push(']');

	out
}

/// Nearest completed documents by cosine similarity. Rows embedded at a
/// different dimensionality are excluded rather than erroring.
pub async fn vector_candidates<'e, E>(
	executor: E,
	query_vec: &[f32],
	limit: i64,
) -> Result<Vec<ScoredId>>
where
	E: PgExecutor<'e>,
{
	let literal = vector_literal(query_vec);
	let rows = sqlx::query_as::<_, ScoredId>(
		"\
SELECT id, CAST(1 - (embedding <=> $1::text::vector) AS real) AS score
FROM documents
WHERE status = 'COMPLETED'
	AND embedding IS NOT NULL
	AND embedding_dim = $2
ORDER BY embedding <=> $1::text::vector
LIMIT $3",
	)
	.bind(literal.as_str())
	.bind(query_vec.len() as i32)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn lexical_candidates<'e, E>(
	executor: E,
	query: &str,
	limit: i64,
) -> Result<Vec<ScoredId>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, ScoredId>(
		"\
SELECT id, CAST(ts_rank_cd(ts_lexical, plainto_tsquery('english', $1), 32) AS real) AS score
FROM documents
WHERE status = 'COMPLETED'
	AND ts_lexical @@ plainto_tsquery('english', $1)
ORDER BY score DESC, id DESC
LIMIT $2",
	)
	.bind(query)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Ids of every searchable document, used when browsing without a query.
pub async fn completed_ids<'e, E>(executor: E) -> Result<Vec<i64>>
where
	E: PgExecutor<'e>,
{
	let ids = sqlx::query_scalar::<_, i64>(
		"\
SELECT id
FROM documents
WHERE status = 'COMPLETED'",
	)
	.fetch_all(executor)
	.await?;

	Ok(ids)
}

/// Narrows `ids` (or all completed documents when `ids` is absent) to those
/// whose keyword mappings contain every supplied taxonomy value. Containment
/// runs against the JSONB mappings array, so the GIN index on `keywords`
/// applies.
pub async fn filter_ids<'e, E>(
	executor: E,
	ids: Option<&[i64]>,
	primary_category: Option<&str>,
	subcategory: Option<&str>,
	canonical_term: Option<&str>,
) -> Result<Vec<i64>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_scalar::<_, i64>(
		"\
SELECT id
FROM documents
WHERE status = 'COMPLETED'
	AND ($1::bigint[] IS NULL OR id = ANY($1))
	AND ($2::text IS NULL OR keywords->'keyword_mappings'
		@> jsonb_build_array(jsonb_build_object('mapped_primary_category', $2::text)))
	AND ($3::text IS NULL OR keywords->'keyword_mappings'
		@> jsonb_build_array(jsonb_build_object('mapped_subcategory', $3::text)))
	AND ($4::text IS NULL OR keywords->'keyword_mappings'
		@> jsonb_build_array(jsonb_build_object('mapped_canonical_term', $4::text)))",
	)
	.bind(ids)
	.bind(primary_category)
	.bind(subcategory)
	.bind(canonical_term)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn fetch_documents<'e, E>(executor: E, ids: &[i64]) -> Result<Vec<DocumentRow>>
where
	E: PgExecutor<'e>,
{
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!(
		"\
SELECT
{DOCUMENT_COLUMNS}
FROM documents
WHERE id = ANY($1)",
	);
	let rows =
		sqlx::query_as::<_, DocumentRow>(&sql).bind(ids).fetch_all(executor).await?;

	Ok(rows)
}

/// Degraded plan for when similarity retrieval is unavailable. Plain substring
/// match over filename and flattened text, newest first, paginated in SQL.
/// Taxonomy filters still apply; JSONB containment does not depend on the
/// tsquery or pgvector machinery.
pub async fn search_minimal<'e, E>(
	executor: E,
	query: &str,
	primary_category: Option<&str>,
	subcategory: Option<&str>,
	canonical_term: Option<&str>,
	limit: i64,
	offset: i64,
) -> Result<Vec<DocumentRow>>
where
	E: PgExecutor<'e>,
{
	let pattern = format!("%{query}%");
	let sql = format!(
		"\
SELECT
{DOCUMENT_COLUMNS}
FROM documents
WHERE status = 'COMPLETED'
	AND (filename ILIKE $1 OR search_content ILIKE $1)
	AND ($2::text IS NULL OR keywords->'keyword_mappings'
		@> jsonb_build_array(jsonb_build_object('mapped_primary_category', $2::text)))
	AND ($3::text IS NULL OR keywords->'keyword_mappings'
		@> jsonb_build_array(jsonb_build_object('mapped_subcategory', $3::text)))
	AND ($4::text IS NULL OR keywords->'keyword_mappings'
		@> jsonb_build_array(jsonb_build_object('mapped_canonical_term', $4::text)))
ORDER BY created_at DESC, id DESC
LIMIT $5 OFFSET $6",
	);
	let rows = sqlx::query_as::<_, DocumentRow>(&sql)
		.bind(pattern.as_str())
		.bind(primary_category)
		.bind(subcategory)
		.bind(canonical_term)
		.bind(limit)
		.bind(offset)
		.fetch_all(executor)
		.await?;

	Ok(rows)
}

pub async fn count_minimal<'e, E>(
	executor: E,
	query: &str,
	primary_category: Option<&str>,
	subcategory: Option<&str>,
	canonical_term: Option<&str>,
) -> Result<i64>
where
	E: PgExecutor<'e>,
{
	let pattern = format!("%{query}%");
	let count = sqlx::query_scalar::<_, i64>(
		"\
SELECT count(*)
FROM documents
WHERE status = 'COMPLETED'
	AND (filename ILIKE $1 OR search_content ILIKE $1)
	AND ($2::text IS NULL OR keywords->'keyword_mappings'
		@> jsonb_build_array(jsonb_build_object('mapped_primary_category', $2::text)))
	AND ($3::text IS NULL OR keywords->'keyword_mappings'
		@> jsonb_build_array(jsonb_build_object('mapped_subcategory', $3::text)))
	AND ($4::text IS NULL OR keywords->'keyword_mappings'
		@> jsonb_build_array(jsonb_build_object('mapped_canonical_term', $4::text)))",
	)
	.bind(pattern.as_str())
	.bind(primary_category)
	.bind(subcategory)
	.bind(canonical_term)
	.fetch_one(executor)
	.await?;

	Ok(count)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn vector_literal_is_bracketed_csv() {
		assert_eq!(vector_literal(&[0.5, -1.0, 2.0]), "[0.5,-1,2]");
		assert_eq!(vector_literal(&[]), "[]");
	}
}
