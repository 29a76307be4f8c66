use std::sync::LazyLock;

use regex::Regex;

/// Two capitalized words in a row, e.g. a person or organization name.
static ENTITY_NAME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b").expect("entity regex must compile"));

const ENTITY_TERMS: &[&str] =
	&["campaign", "committee", "party", "organization", "candidate", "opponent", "client"];

const CATEGORY_TERMS: &[&str] = &[
	"healthcare",
	"education",
	"economy",
	"environment",
	"immigration",
	"defense",
	"taxes",
	"jobs",
	"infrastructure",
	"energy",
	"brochure",
	"flyer",
	"poster",
	"mailer",
	"advertisement",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
	Empty,
	Entity,
	Category,
	ShortKeyword,
	Phrase,
	General,
}
impl QueryIntent {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Empty => "empty",
			Self::Entity => "entity",
			Self::Category => "category",
			Self::ShortKeyword => "short_keyword",
			Self::Phrase => "phrase",
			Self::General => "general",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryAnalysis {
	pub intent: QueryIntent,
	pub terms: Vec<String>,
	pub term_count: usize,
	pub is_short: bool,
	pub is_long: bool,
	pub has_quotes: bool,
	pub has_boolean: bool,
}
impl QueryAnalysis {
	pub fn empty() -> Self {
		Self {
			intent: QueryIntent::Empty,
			terms: Vec::new(),
			term_count: 0,
			is_short: true,
			is_long: false,
			has_quotes: false,
			has_boolean: false,
		}
	}
}

/// Classifies a raw query into an intent type used for scoring-weight selection.
///
/// Pure and deterministic: the same input always yields the same analysis.
pub fn analyze(query: &str) -> QueryAnalysis {
	let trimmed = query.trim();

	if trimmed.is_empty() {
		return QueryAnalysis::empty();
	}

	let terms = tokenize(trimmed);
	let term_count = terms.len();
	let is_short = term_count <= 2;
	let is_long = term_count >= 5;
	let has_quotes = trimmed.contains('"');
	let has_boolean =
		terms.iter().any(|term| matches!(term.as_str(), "and" | "or" | "not"));
	let is_entity = ENTITY_NAME.is_match(trimmed)
		|| terms.iter().any(|term| ENTITY_TERMS.contains(&term.as_str()));
	let is_category = terms.iter().any(|term| CATEGORY_TERMS.contains(&term.as_str()));
	let intent = if is_entity {
		QueryIntent::Entity
	} else if is_category {
		QueryIntent::Category
	} else if is_short {
		QueryIntent::ShortKeyword
	} else if has_quotes {
		QueryIntent::Phrase
	} else {
		QueryIntent::General
	};

	QueryAnalysis { intent, terms, term_count, is_short, is_long, has_quotes, has_boolean }
}

fn tokenize(query: &str) -> Vec<String> {
	let mut normalized = String::with_capacity(query.len());

	for ch in query.chars() {
		if ch.is_alphanumeric() || ch == '_' {
			normalized.extend(ch.to_lowercase());
		} else {
			normalized.push(' ');
		}
	}

	normalized.split_whitespace().map(str::to_string).collect()
}
