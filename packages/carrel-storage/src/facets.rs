use sqlx::PgExecutor;

use crate::{
	Result,
	models::{FacetCount, SubcategoryFacetCount},
};

/// Canonical-term counts over the given result set, most frequent first with a
/// stable alphabetical tie break.
pub async fn canonical_term_counts<'e, E>(
	executor: E,
	ids: &[i64],
	limit: i64,
) -> Result<Vec<FacetCount>>
where
	E: PgExecutor<'e>,
{
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let rows = sqlx::query_as::<_, FacetCount>(
		"\
SELECT mapping->>'mapped_canonical_term' AS value, count(DISTINCT d.id) AS count
FROM documents d,
	jsonb_array_elements(COALESCE(d.keywords->'keyword_mappings', '[]'::jsonb)) mapping
WHERE d.id = ANY($1)
	AND mapping->>'mapped_canonical_term' IS NOT NULL
GROUP BY 1
ORDER BY count DESC, value
LIMIT $2",
	)
	.bind(ids)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Primary-category counts, restricted to categories the taxonomy recognises
/// so extraction noise never surfaces as a facet.
pub async fn primary_category_counts<'e, E>(executor: E, ids: &[i64]) -> Result<Vec<FacetCount>>
where
	E: PgExecutor<'e>,
{
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let rows = sqlx::query_as::<_, FacetCount>(
		"\
SELECT mapping->>'mapped_primary_category' AS value, count(DISTINCT d.id) AS count
FROM documents d,
	jsonb_array_elements(COALESCE(d.keywords->'keyword_mappings', '[]'::jsonb)) mapping
WHERE d.id = ANY($1)
	AND mapping->>'mapped_primary_category' IS NOT NULL
	AND EXISTS (
		SELECT 1
		FROM taxonomy_terms t
		WHERE t.primary_category = mapping->>'mapped_primary_category'
	)
GROUP BY 1
ORDER BY count DESC, value",
	)
	.bind(ids)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Subcategory counts for every primary category in the result set, so the
/// caller can group them without one query per category.
pub async fn subcategory_counts<'e, E>(
	executor: E,
	ids: &[i64],
) -> Result<Vec<SubcategoryFacetCount>>
where
	E: PgExecutor<'e>,
{
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let rows = sqlx::query_as::<_, SubcategoryFacetCount>(
		"\
SELECT mapping->>'mapped_primary_category' AS primary_category,
	COALESCE(mapping->>'mapped_subcategory', 'General') AS value,
	count(DISTINCT d.id) AS count
FROM documents d,
	jsonb_array_elements(COALESCE(d.keywords->'keyword_mappings', '[]'::jsonb)) mapping
WHERE d.id = ANY($1)
	AND mapping->>'mapped_primary_category' IS NOT NULL
	AND EXISTS (
		SELECT 1
		FROM taxonomy_terms t
		WHERE t.primary_category = mapping->>'mapped_primary_category'
			AND COALESCE(t.subcategory, 'General')
				= COALESCE(mapping->>'mapped_subcategory', 'General')
	)
GROUP BY 1, 2
ORDER BY primary_category, count DESC, value",
	)
	.bind(ids)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
