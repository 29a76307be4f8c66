use carrel_domain::{
	QualitySignals, ScoreWeights, SignalScores, TaxonomyFilter, analyze,
	scoring::{composite_score, popularity_score, quality_score, taxonomy_score},
	resolve_weights,
};
use serde_json::json;

fn scores_for(keywords: &serde_json::Value, query: &str) -> f32 {
	let analysis = analyze(query);
	let weights = resolve_weights(&analysis, false);
	let mappings = carrel_domain::parse_keyword_mappings(Some(keywords));
	let quality = QualitySignals {
		completed: true,
		has_extracted_text: true,
		has_analysis: true,
		has_embedding: true,
		mapping_count: mappings.len(),
	};
	let scores = SignalScores {
		vector: 0.8,
		text: 0.6,
		taxonomy: taxonomy_score(&mappings, &TaxonomyFilter::default(), &analysis.terms),
		quality: quality_score(&quality),
		freshness: 1.0,
		popularity: popularity_score(true),
	};

	composite_score(&scores, &weights)
}

#[test]
fn verbatim_taxonomy_overlap_lifts_the_composite() {
	let keywords = json!({
		"keyword_mappings": [{
			"verbatim_term": "road repair backlog",
			"mapped_primary_category": "Infrastructure",
			"mapped_canonical_term": "Roads"
		}]
	});

	let matching = scores_for(&keywords, "road repair");
	let unrelated = scores_for(&keywords, "school lunches");

	assert!(matching > unrelated);
}

#[test]
fn intent_shifts_weight_mass_between_signals() {
	let short = resolve_weights(&analyze("zoning"), false);
	let phrase = resolve_weights(&analyze("\"fix the roads before winter\""), false);

	assert!(short.vector > phrase.vector);
	assert!(phrase.text > short.text);
	assert!((short.sum() - 1.0).abs() < 1e-5);
	assert!((phrase.sum() - 1.0).abs() < 1e-5);
}

#[test]
fn filtered_browsing_downplays_similarity_signals() {
	let filtered = resolve_weights(&analyze("budget"), true);
	let unfiltered = resolve_weights(&analyze("budget"), false);

	assert!(filtered.taxonomy > unfiltered.taxonomy);
	assert!(filtered.vector < unfiltered.vector);
}

#[test]
fn default_weights_are_the_general_intent_row() {
	let general = resolve_weights(&analyze("annual report on municipal water quality"), false);

	assert!((general.vector - ScoreWeights::DEFAULT.vector).abs() < 1e-6);
	assert!((general.text - ScoreWeights::DEFAULT.text).abs() < 1e-6);
	assert!((general.taxonomy - ScoreWeights::DEFAULT.taxonomy).abs() < 1e-6);
}
