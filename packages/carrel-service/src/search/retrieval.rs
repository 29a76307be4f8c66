use std::collections::HashMap;

use carrel_storage::models::ScoredId;

/// Weights for the provisional admission score used while merging the two
/// retrieval legs. Final ranking re-weights per intent later.
const PROVISIONAL_VECTOR_WEIGHT: f32 = 0.7;
const PROVISIONAL_TEXT_WEIGHT: f32 = 0.3;

/// One admitted candidate with its per-leg similarity scores. A document found
/// by only one leg keeps 0.0 for the other.
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
	pub id: i64,
	pub vector: f32,
	pub text: f32,
}
impl Candidate {
	pub fn provisional(&self) -> f32 {
		self.vector * PROVISIONAL_VECTOR_WEIGHT + self.text * PROVISIONAL_TEXT_WEIGHT
	}
}

/// Unions the vector and lexical legs, drops candidates whose provisional
/// score is not positive, and keeps the strongest `candidate_k` in a
/// deterministic order.
pub fn merge_candidates(
	vector: &[ScoredId],
	lexical: &[ScoredId],
	candidate_k: usize,
) -> Vec<Candidate> {
	let mut by_id: HashMap<i64, Candidate> = HashMap::with_capacity(vector.len() + lexical.len());

	for hit in vector {
		by_id.insert(hit.id, Candidate { id: hit.id, vector: hit.score, text: 0.0 });
	}
	for hit in lexical {
		by_id
			.entry(hit.id)
			.and_modify(|candidate| candidate.text = hit.score)
			.or_insert(Candidate { id: hit.id, vector: 0.0, text: hit.score });
	}

	let mut merged: Vec<Candidate> =
		by_id.into_values().filter(|candidate| candidate.provisional() > 0.0).collect();

	merged.sort_by(|a, b| {
		b.provisional().total_cmp(&a.provisional()).then_with(|| b.id.cmp(&a.id))
	});
	merged.truncate(candidate_k);

	merged
}

#[cfg(test)]
mod tests {
	use super::*;

	fn hit(id: i64, score: f32) -> ScoredId {
		ScoredId { id, score }
	}

	#[test]
	fn union_keeps_single_leg_candidates() {
		let merged = merge_candidates(&[hit(1, 0.9)], &[hit(2, 0.4)], 10);
		let ids: Vec<i64> = merged.iter().map(|candidate| candidate.id).collect();

		assert_eq!(ids, vec![1, 2]);
		assert_eq!(merged[0].text, 0.0);
		assert_eq!(merged[1].vector, 0.0);
	}

	#[test]
	fn both_legs_merge_into_one_candidate() {
		let merged = merge_candidates(&[hit(7, 0.8)], &[hit(7, 0.5)], 10);

		assert_eq!(merged.len(), 1);
		assert_eq!(merged[0].vector, 0.8);
		assert_eq!(merged[0].text, 0.5);
	}

	#[test]
	fn non_positive_provisional_scores_are_dropped() {
		let merged = merge_candidates(&[hit(1, 0.0)], &[hit(2, 0.0)], 10);

		assert!(merged.is_empty());
	}

	#[test]
	fn merge_caps_at_candidate_k_keeping_the_strongest() {
		let vector: Vec<ScoredId> =
			(1..=5).map(|id| hit(id, id as f32 / 10.0)).collect();
		let merged = merge_candidates(&vector, &[], 2);
		let ids: Vec<i64> = merged.iter().map(|candidate| candidate.id).collect();

		assert_eq!(ids, vec![5, 4]);
	}

	#[test]
	fn equal_scores_break_ties_by_id() {
		let merged = merge_candidates(&[hit(3, 0.5), hit(9, 0.5)], &[], 10);
		let ids: Vec<i64> = merged.iter().map(|candidate| candidate.id).collect();

		assert_eq!(ids, vec![9, 3]);
	}
}
