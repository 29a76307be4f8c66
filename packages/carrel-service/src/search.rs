pub mod filter;
pub mod ranking;
pub mod retrieval;

pub use filter::NormalizedRequest;

use std::collections::HashMap;

use carrel_domain::{
	QueryAnalysis, QueryIntent, analyze, canonical_terms,
	paging::PageInfo,
	resolve_weights,
};
use carrel_storage::documents;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::warn;

use crate::{
	CarrelService, Error, Result, cache,
	facets::Facets,
	search::ranking::RankedDocument,
};

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub query: Option<String>,
	pub primary_category: Option<String>,
	pub subcategory: Option<String>,
	pub canonical_term: Option<String>,
	pub page: Option<u32>,
	pub per_page: Option<u32>,
	pub sort_by: Option<String>,
	pub sort_order: Option<String>,
	pub include_facets: Option<bool>,
	pub user_id: Option<String>,
}

/// Which retrieval plan produced a response. Degraded responses come from the
/// substring fallback and carry no relevance scores or facets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
	Enhanced,
	Degraded,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DocumentSummary {
	pub id: i64,
	pub filename: String,
	pub file_size: i64,
	pub status: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde::option")]
	pub updated_at: Option<OffsetDateTime>,
	pub summary: Option<String>,
	pub canonical_terms: Vec<String>,
	pub mapping_count: usize,
	pub preview_url: String,
	pub thumbnail_url: String,
	pub download_url: String,
	pub relevance_score: Option<f32>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub items: Vec<DocumentSummary>,
	pub page_info: PageInfo,
	pub intent: Option<QueryIntent>,
	pub facets: Option<Facets>,
	pub search_mode: SearchMode,
	#[serde(default)]
	pub from_cache: bool,
}

impl CarrelService {
	/// Search entry point. Logs the query, probes the result cache, runs the
	/// ranked plan, and falls back to the minimal plan when storage-side
	/// ranking machinery fails.
	pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse> {
		let normalized = filter::normalize(&request, &self.cfg.search);

		if let Some(query) = normalized.query.as_deref()
			&& let Err(err) = self.log_query(query, normalized.user_id.as_deref()).await
		{
			warn!(error = %err, "Failed to log search query.");
		}

		let cache_key = cache::build_result_cache_key(&normalized)?;

		match self.cache.fetch(&cache_key).await {
			Ok(Some(payload)) =>
				match cache::decode_json::<SearchResponse>(payload, "search cache") {
					Ok(mut response) => {
						response.from_cache = true;

						return Ok(response);
					},
					Err(err) =>
						warn!(error = %err, "Discarding undecodable cached search response."),
				},
			Ok(None) => {},
			Err(err) => warn!(error = %err, "Search cache read failed."),
		}

		let response = match self.search_ranked(&normalized).await {
			Ok(response) => response,
			Err(Error::Storage { message }) => {
				warn!(error = %message, "Ranked search failed; falling back to the minimal plan.");

				self.search_minimal(&normalized).await?
			},
			Err(err) => return Err(err),
		};

		if response.search_mode == SearchMode::Enhanced {
			match serde_json::to_value(&response) {
				Ok(payload) =>
					if let Err(err) = self.cache.store(&cache_key, &payload).await {
						warn!(error = %err, "Search cache write failed.");
					},
				Err(err) => warn!(error = %err, "Failed to encode search response for caching."),
			}
		}

		Ok(response)
	}

	/// Drops any cached response for `request`, forcing the next identical
	/// call to recompute. Used after reindexing or taxonomy edits.
	pub async fn invalidate_cached_search(&self, request: &SearchRequest) -> Result<()> {
		let normalized = filter::normalize(request, &self.cfg.search);
		let cache_key = cache::build_result_cache_key(&normalized)?;

		self.cache.invalidate(&cache_key).await
	}

	async fn search_ranked(&self, request: &NormalizedRequest) -> Result<SearchResponse> {
		let pool = &self.db.pool;
		let candidate_k = self.cfg.search.candidate_k as usize;
		let analysis = request.query.as_deref().map(analyze);
		let candidates = if let Some(query) = request.query.as_deref() {
			let vector_hits = match self.embed_query(query).await {
				Ok(embedding) =>
					documents::vector_candidates(pool, &embedding, candidate_k as i64).await?,
				Err(err) => {
					warn!(error = %err, "Query embedding failed; using lexical retrieval only.");

					Vec::new()
				},
			};
			let lexical_hits =
				documents::lexical_candidates(pool, query, candidate_k as i64).await?;

			Some(retrieval::merge_candidates(&vector_hits, &lexical_hits, candidate_k))
		} else {
			None
		};
		let candidate_ids: Option<Vec<i64>> = candidates
			.as_ref()
			.map(|merged| merged.iter().map(|candidate| candidate.id).collect());
		let filtered_ids: Vec<i64> = if request.filter.is_active() {
			documents::filter_ids(
				pool,
				candidate_ids.as_deref(),
				request.filter.primary_category.as_deref(),
				request.filter.subcategory.as_deref(),
				request.filter.canonical_term.as_deref(),
			)
			.await?
		} else if let Some(ids) = candidate_ids {
			ids
		} else {
			documents::completed_ids(pool).await?
		};
		let total_count = filtered_ids.len() as u64;
		let rows = documents::fetch_documents(pool, &filtered_ids).await?;
		let candidate_map: HashMap<i64, retrieval::Candidate> = candidates
			.as_deref()
			.unwrap_or(&[])
			.iter()
			.map(|candidate| (candidate.id, *candidate))
			.collect();
		let now = OffsetDateTime::now_utc();
		let mut docs = if request.query.is_some() || request.filter.is_active() {
			let analysis = analysis.clone().unwrap_or_else(QueryAnalysis::empty);
			let weights = resolve_weights(&analysis, request.filter.is_active());

			ranking::score_documents(
				rows,
				&candidate_map,
				&analysis,
				&request.filter,
				&weights,
				now,
			)
		} else {
			ranking::unscored_documents(rows)
		};

		ranking::sort_documents(&mut docs, request.sort_key, request.sort_direction);

		let page_info = PageInfo::build(request.page, request.per_page, total_count);
		let page_docs: Vec<RankedDocument> = docs
			.into_iter()
			.skip(page_info.offset())
			.take(request.per_page as usize)
			.collect();
		let facets = if request.include_facets {
			Some(self.build_facets(&filtered_ids).await?)
		} else {
			None
		};
		let items = page_docs.into_iter().map(|doc| self.summarize(doc)).collect();

		Ok(SearchResponse {
			items,
			page_info,
			intent: analysis.map(|analysis| analysis.intent),
			facets,
			search_mode: SearchMode::Enhanced,
			from_cache: false,
		})
	}

	/// Minimal plan: substring match, newest first, no scoring, no facets.
	/// Taxonomy filters still apply so a degraded response never widens the
	/// result set past what the caller asked for.
	async fn search_minimal(&self, request: &NormalizedRequest) -> Result<SearchResponse> {
		let pool = &self.db.pool;
		let query = request.query.as_deref().unwrap_or("");
		let filter = &request.filter;
		let total_count = documents::count_minimal(
			pool,
			query,
			filter.primary_category.as_deref(),
			filter.subcategory.as_deref(),
			filter.canonical_term.as_deref(),
		)
		.await? as u64;
		let page_info = PageInfo::build(request.page, request.per_page, total_count);
		let rows = documents::search_minimal(
			pool,
			query,
			filter.primary_category.as_deref(),
			filter.subcategory.as_deref(),
			filter.canonical_term.as_deref(),
			request.per_page as i64,
			page_info.offset() as i64,
		)
		.await?;
		let items = ranking::unscored_documents(rows)
			.into_iter()
			.map(|doc| self.summarize(doc))
			.collect();

		Ok(SearchResponse {
			items,
			page_info,
			intent: None,
			facets: None,
			search_mode: SearchMode::Degraded,
			from_cache: false,
		})
	}

	async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;
		let texts = [query.to_string()];
		let mut embeddings = self.providers.embedding.embed(cfg, &texts).await?;

		if embeddings.is_empty() {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		}

		Ok(embeddings.remove(0))
	}

	fn summarize(&self, doc: RankedDocument) -> DocumentSummary {
		let base = &self.cfg.service.media_base_url;
		let id = doc.row.id;
		let summary = doc
			.row
			.ai_analysis
			.as_ref()
			.and_then(|analysis| analysis.get("summary"))
			.and_then(Value::as_str)
			.map(str::to_string);
		let mapping_count = doc.mappings.len();
		let mut terms = canonical_terms(&doc.mappings);

		terms.truncate(5);

		DocumentSummary {
			id,
			filename: doc.row.filename,
			file_size: doc.row.file_size,
			status: doc.row.status,
			created_at: doc.row.created_at,
			updated_at: doc.row.updated_at,
			summary,
			canonical_terms: terms,
			mapping_count,
			preview_url: format!("{base}/documents/{id}/preview"),
			thumbnail_url: format!("{base}/documents/{id}/thumbnail"),
			download_url: format!("{base}/documents/{id}/download"),
			relevance_score: doc.relevance.map(round_score),
		}
	}
}

/// Presentation rounding only; full precision ranks internally.
fn round_score(score: f32) -> f32 {
	(score * 100.0).round() / 100.0
}
