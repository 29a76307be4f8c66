pub mod intent;
pub mod mapping;
pub mod paging;
pub mod scoring;
pub mod weights;

pub use intent::{QueryAnalysis, QueryIntent, analyze};
pub use mapping::{KeywordMapping, canonical_terms, parse_keyword_mappings};
pub use paging::{PageInfo, SortDirection, SortKey};
pub use scoring::{QualitySignals, SignalScores, TaxonomyFilter};
pub use weights::{ScoreWeights, resolve_weights};
