use std::collections::BTreeMap;

use carrel_storage::{models::TaxonomyTermRow, taxonomy};

use crate::{CarrelService, Result};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TaxonomyHierarchy {
	pub categories: Vec<CategoryNode>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CategoryNode {
	pub primary_category: String,
	pub subcategories: Vec<SubcategoryNode>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubcategoryNode {
	pub subcategory: String,
	pub terms: Vec<String>,
}

/// Where one canonical term sits in the two-level hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TermPath {
	pub primary_category: String,
	pub subcategory: String,
	pub term: String,
}

impl CarrelService {
	pub async fn primary_categories(&self) -> Result<Vec<String>> {
		let categories = taxonomy::list_primary_categories(&self.db.pool).await?;

		Ok(categories)
	}

	pub async fn subcategories(&self, primary_category: &str) -> Result<Vec<String>> {
		let subcategories =
			taxonomy::list_subcategories(&self.db.pool, primary_category).await?;

		Ok(subcategories)
	}

	pub async fn taxonomy_hierarchy(&self) -> Result<TaxonomyHierarchy> {
		let rows = taxonomy::list_terms(&self.db.pool).await?;

		Ok(build_hierarchy(rows))
	}

	pub async fn term_hierarchy(&self, term: &str) -> Result<Option<TermPath>> {
		let row = taxonomy::term_path(&self.db.pool, term).await?;

		Ok(row.map(|row| TermPath {
			primary_category: row.primary_category,
			subcategory: row.subcategory.unwrap_or_else(|| "General".to_string()),
			term: row.term,
		}))
	}
}

/// Groups flat taxonomy rows into category -> subcategory -> terms. Rows
/// without a subcategory land in the implicit 'General' bucket. Ordering is
/// alphabetical at every level.
fn build_hierarchy(rows: Vec<TaxonomyTermRow>) -> TaxonomyHierarchy {
	let mut grouped: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();

	for row in rows {
		let subcategory = row.subcategory.unwrap_or_else(|| "General".to_string());

		grouped
			.entry(row.primary_category)
			.or_default()
			.entry(subcategory)
			.or_default()
			.push(row.term);
	}

	let categories = grouped
		.into_iter()
		.map(|(primary_category, subcategories)| CategoryNode {
			primary_category,
			subcategories: subcategories
				.into_iter()
				.map(|(subcategory, mut terms)| {
					terms.sort();

					SubcategoryNode { subcategory, terms }
				})
				.collect(),
		})
		.collect();

	TaxonomyHierarchy { categories }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn term(id: i64, term: &str, primary: &str, sub: Option<&str>) -> TaxonomyTermRow {
		TaxonomyTermRow {
			id,
			term: term.to_string(),
			primary_category: primary.to_string(),
			subcategory: sub.map(str::to_string),
		}
	}

	#[test]
	fn groups_terms_under_category_and_subcategory() {
		let rows = vec![
			term(1, "Roads", "Infrastructure", Some("Transport")),
			term(2, "Bridges", "Infrastructure", Some("Transport")),
			term(3, "Taxes", "Economy", None),
		];
		let hierarchy = build_hierarchy(rows);

		assert_eq!(hierarchy.categories.len(), 2);
		assert_eq!(hierarchy.categories[0].primary_category, "Economy");
		assert_eq!(hierarchy.categories[0].subcategories[0].subcategory, "General");

		let transport = &hierarchy.categories[1].subcategories[0];

		assert_eq!(transport.terms, vec!["Bridges".to_string(), "Roads".to_string()]);
	}

	#[test]
	fn empty_taxonomy_yields_an_empty_hierarchy() {
		assert!(build_hierarchy(Vec::new()).categories.is_empty());
	}
}
