use std::collections::BTreeMap;

use carrel_domain::TaxonomyFilter;
use carrel_storage::{documents, facets as storage_facets};

use crate::{CarrelService, Result};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FacetEntry {
	pub value: String,
	pub count: i64,
}

/// Facet counts computed over the full filtered result set, not just the
/// returned page. Subcategories are grouped under their primary category.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Facets {
	pub canonical_terms: Vec<FacetEntry>,
	pub primary_categories: Vec<FacetEntry>,
	pub subcategories: BTreeMap<String, Vec<FacetEntry>>,
}

impl CarrelService {
	/// Facet counts for a filter context on its own, so filter UIs can be
	/// populated without running a search.
	pub async fn facets(&self, filter: &TaxonomyFilter) -> Result<Facets> {
		let pool = &self.db.pool;
		let ids = if filter.is_active() {
			documents::filter_ids(
				pool,
				None,
				filter.primary_category.as_deref(),
				filter.subcategory.as_deref(),
				filter.canonical_term.as_deref(),
			)
			.await?
		} else {
			documents::completed_ids(pool).await?
		};

		self.build_facets(&ids).await
	}

	pub(crate) async fn build_facets(&self, ids: &[i64]) -> Result<Facets> {
		let pool = &self.db.pool;
		let term_limit = i64::from(self.cfg.search.facet_term_limit);
		let canonical_terms = storage_facets::canonical_term_counts(pool, ids, term_limit)
			.await?
			.into_iter()
			.map(|row| FacetEntry { value: row.value, count: row.count })
			.collect();
		let primary_categories = storage_facets::primary_category_counts(pool, ids)
			.await?
			.into_iter()
			.map(|row| FacetEntry { value: row.value, count: row.count })
			.collect();
		let mut subcategories: BTreeMap<String, Vec<FacetEntry>> = BTreeMap::new();

		for row in storage_facets::subcategory_counts(pool, ids).await? {
			subcategories
				.entry(row.primary_category)
				.or_default()
				.push(FacetEntry { value: row.value, count: row.count });
		}

		Ok(Facets { canonical_terms, primary_categories, subcategories })
	}
}
