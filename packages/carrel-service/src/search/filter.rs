use carrel_domain::{
	TaxonomyFilter,
	paging::{self, SortDirection, SortKey},
};

use crate::search::SearchRequest;

/// A request with every loose input pinned down: trimmed query, clamped
/// pagination, allow-listed sort, empty filter strings dropped.
#[derive(Clone, Debug)]
pub struct NormalizedRequest {
	pub query: Option<String>,
	pub filter: TaxonomyFilter,
	pub page: u32,
	pub per_page: u32,
	pub sort_key: SortKey,
	pub sort_direction: SortDirection,
	pub include_facets: bool,
	pub user_id: Option<String>,
}

pub fn normalize(request: &SearchRequest, cfg: &carrel_config::Search) -> NormalizedRequest {
	let query = request
		.query
		.as_deref()
		.map(str::trim)
		.filter(|query| !query.is_empty())
		.map(str::to_string);
	let filter = TaxonomyFilter {
		primary_category: non_empty(request.primary_category.as_deref()),
		subcategory: non_empty(request.subcategory.as_deref()),
		canonical_term: non_empty(request.canonical_term.as_deref()),
	};

	NormalizedRequest {
		query,
		filter,
		page: paging::clamp_page(request.page.unwrap_or(1)),
		per_page: paging::clamp_per_page(
			request.per_page.unwrap_or(cfg.default_per_page),
			cfg.default_per_page,
			cfg.max_per_page,
		),
		sort_key: request.sort_by.as_deref().map(SortKey::parse).unwrap_or_default(),
		sort_direction: request
			.sort_order
			.as_deref()
			.map(SortDirection::parse)
			.unwrap_or_default(),
		include_facets: request.include_facets.unwrap_or(true),
		user_id: non_empty(request.user_id.as_deref()),
	}
}

fn non_empty(raw: Option<&str>) -> Option<String> {
	raw.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}
