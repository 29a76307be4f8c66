use serde_json::Value;

/// One verbatim-phrase-to-taxonomy association extracted from a document.
///
/// Stored per document as a JSONB array under `keywords.keyword_mappings`; this is
/// the join surface between free-text content and the controlled taxonomy.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeywordMapping {
	pub verbatim_term: String,
	#[serde(default)]
	pub mapped_primary_category: String,
	#[serde(default)]
	pub mapped_subcategory: Option<String>,
	pub mapped_canonical_term: String,
	#[serde(default)]
	pub extraction_confidence: Option<f32>,
}

/// Decodes a document's `keywords` JSONB column into typed mappings.
///
/// The column is written by the ingestion pipeline; its shape is never assumed on
/// read. Entries that fail to decode are skipped rather than failing the search.
pub fn parse_keyword_mappings(keywords: Option<&Value>) -> Vec<KeywordMapping> {
	let Some(keywords) = keywords else { return Vec::new() };
	let Some(entries) = keywords.get("keyword_mappings").and_then(Value::as_array) else {
		return Vec::new();
	};

	entries
		.iter()
		.filter_map(|entry| serde_json::from_value(entry.clone()).ok())
		.collect()
}

/// Distinct canonical terms in first-seen order.
pub fn canonical_terms(mappings: &[KeywordMapping]) -> Vec<String> {
	let mut out = Vec::new();

	for mapping in mappings {
		if mapping.mapped_canonical_term.is_empty() {
			continue;
		}
		if !out.contains(&mapping.mapped_canonical_term) {
			out.push(mapping.mapped_canonical_term.clone());
		}
	}

	out
}
