pub mod cache;
pub mod facets;
pub mod providers;
pub mod query_log;
pub mod search;
pub mod taxonomy;
pub mod time_serde;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

pub use cache::{NoopCache, PgResultCache, ResultCache};
use carrel_config::{Config, EmbeddingProviderConfig};
pub use carrel_domain::TaxonomyFilter;
use carrel_storage::db::Db;
pub use facets::{FacetEntry, Facets};
pub use providers::HttpEmbedding;
pub use query_log::TopQuery;
pub use search::{DocumentSummary, SearchMode, SearchRequest, SearchResponse};
pub use taxonomy::{CategoryNode, SubcategoryNode, TaxonomyHierarchy, TermPath};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, carrel_providers::Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}

pub struct CarrelService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
	pub cache: Arc<dyn ResultCache>,
}
impl CarrelService {
	pub fn new(cfg: Config, db: Db, providers: Providers) -> Self {
		let cache: Arc<dyn ResultCache> = if cfg.search.cache.enabled {
			Arc::new(PgResultCache::new(db.pool.clone(), &cfg.search.cache))
		} else {
			Arc::new(NoopCache)
		};

		Self { cfg, db, providers, cache }
	}
}
