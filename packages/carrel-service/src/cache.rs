use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};

use crate::{BoxFuture, Error, Result, search::NormalizedRequest};

const RESULT_CACHE_SCHEMA_VERSION: i32 = 1;

/// Read-through cache for whole search responses. Failures never surface to
/// callers; a broken cache degrades to recomputing.
pub trait ResultCache
where
	Self: Send + Sync,
{
	fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>>;

	fn store<'a>(&'a self, key: &'a str, payload: &'a Value) -> BoxFuture<'a, Result<()>>;

	fn invalidate<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>>;
}

pub struct PgResultCache {
	pool: PgPool,
	ttl: Duration,
	max_payload_bytes: Option<u64>,
}
impl PgResultCache {
	pub fn new(pool: PgPool, cfg: &carrel_config::SearchCache) -> Self {
		Self {
			pool,
			ttl: Duration::minutes(cfg.ttl_minutes),
			max_payload_bytes: cfg.max_payload_bytes,
		}
	}
}
impl ResultCache for PgResultCache {
	fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>> {
		Box::pin(async move {
			let payload = carrel_storage::cache::fetch_payload(&self.pool, key).await?;

			Ok(payload)
		})
	}

	fn store<'a>(&'a self, key: &'a str, payload: &'a Value) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if let Some(max) = self.max_payload_bytes {
				let encoded = serde_json::to_vec(payload).map_err(|err| Error::Storage {
					message: format!("Failed to encode cache payload: {err}"),
				})?;

				if encoded.len() as u64 > max {
					tracing::debug!(key, bytes = encoded.len(), "Skipping oversized cache payload.");

					return Ok(());
				}
			}

			let expires_at = OffsetDateTime::now_utc() + self.ttl;

			// Writes are the only recurring cache traffic, so expired rows are
			// swept here rather than by a background task.
			carrel_storage::cache::purge_expired(&self.pool).await?;
			carrel_storage::cache::store_payload(&self.pool, key, payload, expires_at).await?;

			Ok(())
		})
	}

	fn invalidate<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			carrel_storage::cache::delete_payload(&self.pool, key).await?;

			Ok(())
		})
	}
}

/// Used when caching is disabled in config.
pub struct NoopCache;
impl ResultCache for NoopCache {
	fn fetch<'a>(&'a self, _key: &'a str) -> BoxFuture<'a, Result<Option<Value>>> {
		Box::pin(async move { Ok(None) })
	}

	fn store<'a>(&'a self, _key: &'a str, _payload: &'a Value) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(()) })
	}

	fn invalidate<'a>(&'a self, _key: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(()) })
	}
}

pub fn decode_json<T>(value: Value, label: &str) -> Result<T>
where
	T: DeserializeOwned,
{
	serde_json::from_value(value)
		.map_err(|err| Error::Storage { message: format!("Invalid {label} value: {err}") })
}

pub fn hash_cache_key(payload: &Value) -> Result<String> {
	let raw = serde_json::to_vec(payload).map_err(|err| Error::Storage {
		message: format!("Failed to encode cache key payload: {err}"),
	})?;

	Ok(blake3::hash(&raw).to_hex().to_string())
}

/// Cache key over everything that shapes the response body. The requesting
/// user is deliberately excluded; responses are identical across users.
pub fn build_result_cache_key(request: &NormalizedRequest) -> Result<String> {
	let payload = serde_json::json!({
		"kind": "search_result",
		"schema_version": RESULT_CACHE_SCHEMA_VERSION,
		"query": request.query,
		"primary_category": request.filter.primary_category,
		"subcategory": request.filter.subcategory,
		"canonical_term": request.filter.canonical_term,
		"page": request.page,
		"per_page": request.per_page,
		"sort_by": request.sort_key.as_str(),
		"sort_order": request.sort_direction.as_str(),
		"include_facets": request.include_facets,
	});

	hash_cache_key(&payload)
}
