use sqlx::PgExecutor;

use crate::{Result, models::TaxonomyTermRow};

pub async fn list_terms<'e, E>(executor: E) -> Result<Vec<TaxonomyTermRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, TaxonomyTermRow>(
		"\
SELECT id, term, primary_category, subcategory
FROM taxonomy_terms
ORDER BY primary_category, COALESCE(subcategory, 'General'), term",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn list_primary_categories<'e, E>(executor: E) -> Result<Vec<String>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_scalar::<_, String>(
		"\
SELECT DISTINCT primary_category
FROM taxonomy_terms
ORDER BY primary_category",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Subcategories under one primary category. Rows without a subcategory report
/// the implicit 'General' bucket.
pub async fn list_subcategories<'e, E>(executor: E, primary_category: &str) -> Result<Vec<String>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_scalar::<_, String>(
		"\
SELECT DISTINCT COALESCE(subcategory, 'General') AS subcategory
FROM taxonomy_terms
WHERE primary_category = $1
ORDER BY subcategory",
	)
	.bind(primary_category)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Locates a term anywhere in the hierarchy. Terms duplicated across
/// categories resolve to the first in hierarchy order.
pub async fn term_path<'e, E>(executor: E, term: &str) -> Result<Option<TaxonomyTermRow>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, TaxonomyTermRow>(
		"\
SELECT id, term, primary_category, subcategory
FROM taxonomy_terms
WHERE term = $1
ORDER BY primary_category, COALESCE(subcategory, 'General')
LIMIT 1",
	)
	.bind(term)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn upsert_term<'e, E>(
	executor: E,
	term: &str,
	primary_category: &str,
	subcategory: Option<&str>,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO taxonomy_terms (term, primary_category, subcategory)
VALUES ($1, $2, $3)
ON CONFLICT (primary_category, COALESCE(subcategory, 'General'), term) DO NOTHING",
	)
	.bind(term)
	.bind(primary_category)
	.bind(subcategory)
	.execute(executor)
	.await?;

	Ok(())
}
