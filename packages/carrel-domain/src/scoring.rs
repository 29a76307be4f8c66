use time::{Duration, OffsetDateTime};

use crate::{mapping::KeywordMapping, weights::ScoreWeights};

/// Query terms considered for the verbatim-term co-occurrence bonus. Bounded to
/// keep the containment scan cheap on long queries.
const VERBATIM_MATCH_TERM_CAP: usize = 3;

/// Active structured taxonomy filters, matched exactly against a document's
/// keyword mappings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaxonomyFilter {
	pub primary_category: Option<String>,
	pub subcategory: Option<String>,
	pub canonical_term: Option<String>,
}
impl TaxonomyFilter {
	pub fn is_active(&self) -> bool {
		self.primary_category.is_some()
			|| self.subcategory.is_some()
			|| self.canonical_term.is_some()
	}
}

/// Raw per-document signal values, each already in (or near) [0, 1] except
/// `popularity`, which is the coarse 1.0/1.2 multiplier.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SignalScores {
	pub vector: f32,
	pub text: f32,
	pub taxonomy: f32,
	pub quality: f32,
	pub freshness: f32,
	pub popularity: f32,
}

/// Processing-completeness facts about one document, used by the quality signal.
#[derive(Clone, Copy, Debug)]
pub struct QualitySignals {
	pub completed: bool,
	pub has_extracted_text: bool,
	pub has_analysis: bool,
	pub has_embedding: bool,
	pub mapping_count: usize,
}

pub fn composite_score(scores: &SignalScores, weights: &ScoreWeights) -> f32 {
	scores.vector * weights.vector
		+ scores.text * weights.text
		+ scores.taxonomy * weights.taxonomy
		+ scores.quality * weights.quality
		+ scores.freshness * weights.freshness
		+ scores.popularity * weights.popularity
}

/// Taxonomy match component.
///
/// Exact canonical-term filter match wins, then primary-category filter match;
/// with no filters active, a small bonus rewards query terms contained in the
/// document's verbatim terms.
pub fn taxonomy_score(
	mappings: &[KeywordMapping],
	filter: &TaxonomyFilter,
	query_terms: &[String],
) -> f32 {
	if let Some(canonical) = filter.canonical_term.as_deref()
		&& mappings.iter().any(|mapping| mapping.mapped_canonical_term == canonical)
	{
		return 1.0;
	}
	if let Some(primary) = filter.primary_category.as_deref()
		&& mappings.iter().any(|mapping| mapping.mapped_primary_category == primary)
	{
		return 0.8;
	}
	if filter.is_active() {
		return 0.0;
	}

	for term in query_terms.iter().take(VERBATIM_MATCH_TERM_CAP) {
		if mappings.iter().any(|mapping| {
			mapping.verbatim_term.to_lowercase().contains(term.as_str())
		}) {
			return 0.3;
		}
	}

	0.0
}

pub fn quality_score(signals: &QualitySignals) -> f32 {
	let base = if signals.completed
		&& signals.has_extracted_text
		&& signals.has_analysis
		&& signals.has_embedding
	{
		1.0
	} else if signals.completed && signals.has_extracted_text {
		0.7
	} else if signals.completed {
		0.5
	} else {
		// Only COMPLETED documents are queried; kept for safety.
		0.1
	};
	let mapping_bonus = if signals.mapping_count > 5 {
		0.2
	} else if signals.mapping_count > 2 {
		0.1
	} else {
		0.0
	};

	base + mapping_bonus
}

pub fn freshness_score(created_at: OffsetDateTime, now: OffsetDateTime) -> f32 {
	let age = now - created_at;

	if age <= Duration::days(30) {
		1.0
	} else if age <= Duration::days(90) {
		0.7
	} else {
		0.5
	}
}

/// Placeholder popularity signal: a flat boost for fully embedded documents.
/// There is no genuine click/feedback loop behind this yet.
pub fn popularity_score(has_embedding: bool) -> f32 {
	if has_embedding { 1.2 } else { 1.0 }
}
