use carrel_config::EmbeddingProviderConfig;
use carrel_providers::embedding;

use crate::{BoxFuture, EmbeddingProvider};

/// Production embedding provider backed by the configured HTTP endpoint.
pub struct HttpEmbedding;
impl EmbeddingProvider for HttpEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, carrel_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}
