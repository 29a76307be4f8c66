use serde_json::Value;
use sqlx::PgExecutor;
use time::OffsetDateTime;

use crate::Result;

/// Returns the cached payload for `key` if it has not expired. Expired rows
/// are swept by `purge_expired` on the next write.
pub async fn fetch_payload<'e, E>(executor: E, key: &str) -> Result<Option<Value>>
where
	E: PgExecutor<'e>,
{
	let payload = sqlx::query_scalar::<_, Value>(
		"\
SELECT payload
FROM search_cache
WHERE cache_key = $1
	AND expires_at > now()",
	)
	.bind(key)
	.fetch_optional(executor)
	.await?;

	Ok(payload)
}

pub async fn store_payload<'e, E>(
	executor: E,
	key: &str,
	payload: &Value,
	expires_at: OffsetDateTime,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO search_cache (cache_key, payload, stored_at, expires_at)
VALUES ($1, $2, now(), $3)
ON CONFLICT (cache_key)
DO UPDATE SET payload = EXCLUDED.payload,
	stored_at = EXCLUDED.stored_at,
	expires_at = EXCLUDED.expires_at",
	)
	.bind(key)
	.bind(payload)
	.bind(expires_at)
	.execute(executor)
	.await?;

	Ok(())
}

/// Drops every expired row so the table stays bounded by the working set.
pub async fn purge_expired<'e, E>(executor: E) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
DELETE FROM search_cache
WHERE expires_at <= now()",
	)
	.execute(executor)
	.await?;

	Ok(result.rows_affected())
}

pub async fn delete_payload<'e, E>(executor: E, key: &str) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
DELETE FROM search_cache
WHERE cache_key = $1",
	)
	.bind(key)
	.execute(executor)
	.await?;

	Ok(())
}
