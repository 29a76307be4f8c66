use crate::intent::{QueryAnalysis, QueryIntent};

/// Relative emphasis of the six scoring components for one search call.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScoreWeights {
	pub vector: f32,
	pub text: f32,
	pub taxonomy: f32,
	pub quality: f32,
	pub freshness: f32,
	pub popularity: f32,
}
impl ScoreWeights {
	pub const DEFAULT: Self = Self {
		vector: 0.4,
		text: 0.25,
		taxonomy: 0.15,
		quality: 0.1,
		freshness: 0.05,
		popularity: 0.05,
	};

	pub fn sum(&self) -> f32 {
		self.vector + self.text + self.taxonomy + self.quality + self.freshness + self.popularity
	}

	fn normalized(mut self) -> Self {
		let sum = self.sum();

		if sum > 0.0 {
			self.vector /= sum;
			self.text /= sum;
			self.taxonomy /= sum;
			self.quality /= sum;
			self.freshness /= sum;
			self.popularity /= sum;
		}

		self
	}
}

/// Picks component weights from the fixed per-intent table, normalized to sum
/// to 1.0. An active taxonomy filter overrides the intent-based rows.
pub fn resolve_weights(analysis: &QueryAnalysis, has_taxonomy_filter: bool) -> ScoreWeights {
	let raw = if has_taxonomy_filter {
		ScoreWeights {
			vector: 0.05,
			text: 0.05,
			taxonomy: 0.4,
			quality: 0.2,
			freshness: 0.15,
			popularity: 0.15,
		}
	} else {
		match analysis.intent {
			QueryIntent::Empty => ScoreWeights {
				vector: 0.025,
				text: 0.025,
				taxonomy: 0.15,
				quality: 0.4,
				freshness: 0.3,
				popularity: 0.1,
			},
			QueryIntent::Entity =>
				ScoreWeights { vector: 0.3, text: 0.35, taxonomy: 0.2, ..ScoreWeights::DEFAULT },
			QueryIntent::Category =>
				ScoreWeights { vector: 0.35, text: 0.2, taxonomy: 0.3, ..ScoreWeights::DEFAULT },
			QueryIntent::ShortKeyword =>
				ScoreWeights { vector: 0.5, text: 0.2, taxonomy: 0.15, ..ScoreWeights::DEFAULT },
			QueryIntent::Phrase =>
				ScoreWeights { vector: 0.3, text: 0.4, taxonomy: 0.15, ..ScoreWeights::DEFAULT },
			QueryIntent::General => ScoreWeights::DEFAULT,
		}
	};

	raw.normalized()
}

#[cfg(test)]
mod tests {
	use crate::intent::analyze;

	use super::*;

	fn assert_unit_sum(weights: ScoreWeights) {
		assert!((weights.sum() - 1.0).abs() < 1e-6, "weights must sum to 1.0: {weights:?}");
	}

	#[test]
	fn all_weight_rows_are_normalized() {
		for query in ["", "Jane Smith", "taxes", "zoning", "\"fix the roads before winter\"", "quarterly report about downtown zoning"]
		{
			assert_unit_sum(resolve_weights(&analyze(query), false));
		}

		assert_unit_sum(resolve_weights(&analyze("anything"), true));
	}

	#[test]
	fn taxonomy_filter_dominates_intent_rows() {
		let weights = resolve_weights(&analyze("Jane Smith"), true);

		assert!((weights.taxonomy - 0.4).abs() < 1e-6);
		assert!((weights.vector - 0.05).abs() < 1e-6);
	}

	#[test]
	fn browse_mode_emphasizes_quality_and_freshness() {
		let weights = resolve_weights(&analyze(""), false);

		assert!(weights.quality > weights.vector);
		assert!(weights.freshness > weights.text);
		assert!((weights.quality - 0.4).abs() < 1e-6);
	}

	#[test]
	fn short_keyword_leans_on_vector_similarity() {
		let weights = resolve_weights(&analyze("zoning"), false);

		assert!(weights.vector > weights.text);
		assert!(weights.vector > weights.taxonomy);
	}

	#[test]
	fn phrase_queries_lean_on_lexical_rank() {
		let weights = resolve_weights(&analyze("\"fix the roads before winter\""), false);

		assert!(weights.text > weights.vector);
	}
}
