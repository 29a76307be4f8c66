use std::{cmp::Ordering, collections::HashMap};

use carrel_domain::{
	KeywordMapping, QueryAnalysis, ScoreWeights, TaxonomyFilter,
	paging::{SortDirection, SortKey},
	parse_keyword_mappings,
	scoring::{self, QualitySignals, SignalScores},
};
use carrel_storage::models::DocumentRow;
use time::OffsetDateTime;

use crate::search::retrieval::Candidate;

pub struct RankedDocument {
	pub row: DocumentRow,
	pub mappings: Vec<KeywordMapping>,
	pub relevance: Option<f32>,
}

/// Applies the six-component composite to each fetched row. Rows absent from
/// the candidate map carry zero similarity and rank on the remaining signals.
pub fn score_documents(
	rows: Vec<DocumentRow>,
	candidates: &HashMap<i64, Candidate>,
	analysis: &QueryAnalysis,
	filter: &TaxonomyFilter,
	weights: &ScoreWeights,
	now: OffsetDateTime,
) -> Vec<RankedDocument> {
	rows.into_iter()
		.map(|row| {
			let mappings = parse_keyword_mappings(row.keywords.as_ref());
			let candidate = candidates.get(&row.id);
			let scores = SignalScores {
				vector: candidate.map(|c| c.vector).unwrap_or(0.0),
				text: candidate.map(|c| c.text).unwrap_or(0.0),
				taxonomy: scoring::taxonomy_score(&mappings, filter, &analysis.terms),
				quality: scoring::quality_score(&QualitySignals {
					completed: row.status == "COMPLETED",
					has_extracted_text: row.extracted_text.is_some(),
					has_analysis: row.ai_analysis.is_some(),
					has_embedding: row.has_embedding,
					mapping_count: mappings.len(),
				}),
				freshness: scoring::freshness_score(row.created_at, now),
				popularity: scoring::popularity_score(row.has_embedding),
			};
			let relevance = scoring::composite_score(&scores, weights);

			RankedDocument { row, mappings, relevance: Some(relevance) }
		})
		.collect()
}

/// Wraps rows without scoring, for browsing without a query or filter.
pub fn unscored_documents(rows: Vec<DocumentRow>) -> Vec<RankedDocument> {
	rows.into_iter()
		.map(|row| {
			let mappings = parse_keyword_mappings(row.keywords.as_ref());

			RankedDocument { row, mappings, relevance: None }
		})
		.collect()
}

/// Total order over ranked documents. Identical corpus and request always
/// paginate identically; ids are the final tie break.
pub fn sort_documents(docs: &mut [RankedDocument], key: SortKey, direction: SortDirection) {
	docs.sort_by(|a, b| {
		let ordering = match key {
			// Relevance is always best-first; the direction knob applies to
			// column sorts only.
			SortKey::Relevance => b
				.relevance
				.unwrap_or(0.0)
				.total_cmp(&a.relevance.unwrap_or(0.0))
				.then_with(|| b.row.created_at.cmp(&a.row.created_at)),
			SortKey::CreatedAt => directed(a.row.created_at.cmp(&b.row.created_at), direction),
			SortKey::UpdatedAt =>
				directed(a.row.updated_at.cmp(&b.row.updated_at), direction),
			SortKey::Filename => directed(a.row.filename.cmp(&b.row.filename), direction),
			SortKey::FileSize => directed(a.row.file_size.cmp(&b.row.file_size), direction),
		};

		ordering.then_with(|| b.row.id.cmp(&a.row.id))
	});
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
	match direction {
		SortDirection::Asc => ordering,
		SortDirection::Desc => ordering.reverse(),
	}
}
